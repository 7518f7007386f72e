//! Request-scoped yielded values

use crate::dependency::DependencyKey;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A value yielded by a dependency's acquire step.
pub type DependencyValue = Arc<dyn Any + Send + Sync>;

/// The yielded values of one request's chain, keyed by dependency.
///
/// Later dependencies and the handler read earlier yielded values from here.
/// Cloning is cheap; clones share the same underlying map, so the executor
/// and the handler observe one consistent view for the request's duration.
///
/// # Examples
///
/// ```
/// use reqscope::{DependencyKey, ResolvedValues};
/// use std::sync::Arc;
///
/// let values = ResolvedValues::new();
/// values.insert(DependencyKey::new("db"), Arc::new(String::from("session")));
///
/// let session = values.get::<String>(DependencyKey::new("db")).unwrap();
/// assert_eq!(*session, "session");
/// ```
#[derive(Clone)]
pub struct ResolvedValues {
	cache: Arc<RwLock<HashMap<DependencyKey, DependencyValue>>>,
}

impl ResolvedValues {
	pub fn new() -> Self {
		Self {
			cache: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Retrieves the value yielded under `key`, downcast to `T`.
	///
	/// Returns `None` if the key was never acquired or the stored value is
	/// not a `T`.
	pub fn get<T: Any + Send + Sync>(&self, key: DependencyKey) -> Option<Arc<T>> {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.get(&key).and_then(|arc| arc.clone().downcast::<T>().ok())
	}

	/// Retrieves the type-erased value yielded under `key`.
	pub fn get_raw(&self, key: DependencyKey) -> Option<DependencyValue> {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.get(&key).cloned()
	}

	/// Stores a yielded value under `key`.
	pub fn insert(&self, key: DependencyKey, value: DependencyValue) {
		let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
		cache.insert(key, value);
	}

	pub fn contains(&self, key: DependencyKey) -> bool {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.contains_key(&key)
	}

	pub fn len(&self) -> usize {
		let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
		cache.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for ResolvedValues {
	fn default() -> Self {
		Self::new()
	}
}
