//! Dependency chain planning
//!
//! Resolves a handler's declared dependencies into the ordered acquisition
//! sequence for one request. Planning happens entirely before the first
//! acquire runs: cycles and unknown keys are build errors with no partial
//! side effects.

use crate::dependency::{DependencyKey, ScopedDependency};
use std::collections::HashMap;
use std::sync::Arc;

/// Errors detected while planning a chain, before any acquisition.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
	/// The declared dependency graph contains a cycle.
	#[error("cyclic dependency detected: {key}\n  Path: {path}")]
	CyclicDependency {
		/// The key at which the cycle closed
		key: DependencyKey,
		/// The cycle rendered as `A -> B -> C -> A`
		path: String,
	},

	/// A dependency requires a key that was never declared.
	#[error("dependency `{consumer}` requires `{missing}`, which was never declared")]
	UnknownDependency {
		consumer: DependencyKey,
		missing: DependencyKey,
	},
}

/// The ordered acquisition plan for one request.
///
/// Ordering is a topological order of the declared dependency DAG: every
/// dependency appears before anything that consumes its yielded value.
/// Immutable once built.
pub struct DependencyChain {
	ordered: Vec<Arc<dyn ScopedDependency>>,
}

enum Mark {
	InProgress,
	Done,
}

impl DependencyChain {
	/// Plan a chain from a handler's declared dependencies.
	///
	/// Declarations may reference each other through
	/// [`requires`](ScopedDependency::requires). Duplicate declarations of
	/// one key collapse to the first (each key is acquired at most once per
	/// request). The resulting order is deterministic: depth-first over the
	/// declarations in their given order, dependencies before dependents.
	pub fn build(declared: &[Arc<dyn ScopedDependency>]) -> Result<Self, ChainError> {
		let mut by_key: HashMap<DependencyKey, Arc<dyn ScopedDependency>> = HashMap::new();
		let mut declaration_order: Vec<DependencyKey> = Vec::new();
		for dep in declared {
			let key = dep.key();
			if !by_key.contains_key(&key) {
				by_key.insert(key, Arc::clone(dep));
				declaration_order.push(key);
			}
		}

		let mut marks: HashMap<DependencyKey, Mark> = HashMap::new();
		let mut path: Vec<DependencyKey> = Vec::new();
		let mut ordered: Vec<Arc<dyn ScopedDependency>> = Vec::new();
		for key in declaration_order {
			visit(key, &by_key, &mut marks, &mut path, &mut ordered)?;
		}

		Ok(Self { ordered })
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ScopedDependency>> {
		self.ordered.iter()
	}

	pub(crate) fn as_slice(&self) -> &[Arc<dyn ScopedDependency>] {
		&self.ordered
	}

	/// The keys in acquisition order.
	pub fn keys(&self) -> Vec<DependencyKey> {
		self.ordered.iter().map(|dep| dep.key()).collect()
	}

	pub fn len(&self) -> usize {
		self.ordered.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ordered.is_empty()
	}
}

fn visit(
	key: DependencyKey,
	by_key: &HashMap<DependencyKey, Arc<dyn ScopedDependency>>,
	marks: &mut HashMap<DependencyKey, Mark>,
	path: &mut Vec<DependencyKey>,
	ordered: &mut Vec<Arc<dyn ScopedDependency>>,
) -> Result<(), ChainError> {
	match marks.get(&key) {
		Some(Mark::Done) => return Ok(()),
		Some(Mark::InProgress) => {
			// The current DFS path closed back on `key`; render the cycle.
			let start = path.iter().position(|k| *k == key).unwrap_or(0);
			let mut names: Vec<&str> = path[start..].iter().map(|k| k.name()).collect();
			names.push(key.name());
			return Err(ChainError::CyclicDependency {
				key,
				path: names.join(" -> "),
			});
		}
		None => {}
	}

	marks.insert(key, Mark::InProgress);
	path.push(key);

	// Safe lookup: `key` is only ever taken from `by_key` or checked below.
	if let Some(dep) = by_key.get(&key) {
		let dep = Arc::clone(dep);
		for required in dep.requires() {
			if !by_key.contains_key(&required) {
				return Err(ChainError::UnknownDependency {
					consumer: key,
					missing: required,
				});
			}
			visit(required, by_key, marks, path, ordered)?;
		}
		ordered.push(dep);
	}

	path.pop();
	marks.insert(key, Mark::Done);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fault::Fault;
	use crate::values::{DependencyValue, ResolvedValues};

	struct Node {
		key: &'static str,
		requires: Vec<&'static str>,
	}

	impl Node {
		fn new(key: &'static str, requires: &[&'static str]) -> Arc<dyn ScopedDependency> {
			Arc::new(Self {
				key,
				requires: requires.to_vec(),
			})
		}
	}

	#[async_trait::async_trait]
	impl ScopedDependency for Node {
		fn key(&self) -> DependencyKey {
			DependencyKey::new(self.key)
		}

		fn requires(&self) -> Vec<DependencyKey> {
			self.requires.iter().copied().map(DependencyKey::new).collect()
		}

		async fn acquire(&self, _deps: &ResolvedValues) -> Result<DependencyValue, Fault> {
			Ok(Arc::new(()))
		}
	}

	fn names(chain: &DependencyChain) -> Vec<&'static str> {
		chain.keys().into_iter().map(|k| k.name()).collect()
	}

	#[test]
	fn test_dependencies_come_before_dependents() {
		let chain = DependencyChain::build(&[
			Node::new("handler_dep", &["service"]),
			Node::new("service", &["db", "cache"]),
			Node::new("db", &[]),
			Node::new("cache", &[]),
		])
		.unwrap();

		assert_eq!(names(&chain), vec!["db", "cache", "service", "handler_dep"]);
	}

	#[test]
	fn test_duplicate_keys_collapse_to_first() {
		let chain = DependencyChain::build(&[
			Node::new("db", &[]),
			Node::new("a", &["db"]),
			Node::new("db", &[]),
			Node::new("b", &["db"]),
		])
		.unwrap();

		assert_eq!(names(&chain), vec!["db", "a", "b"]);
	}

	#[test]
	fn test_cycle_is_rejected_with_path() {
		let result = DependencyChain::build(&[
			Node::new("a", &["b"]),
			Node::new("b", &["c"]),
			Node::new("c", &["a"]),
		]);

		match result {
			Err(ChainError::CyclicDependency { key, path }) => {
				assert_eq!(key, DependencyKey::new("a"));
				assert_eq!(path, "a -> b -> c -> a");
			}
			other => panic!("expected CyclicDependency, got {:?}", other.map(|c| c.keys())),
		}
	}

	#[test]
	fn test_self_cycle() {
		let result = DependencyChain::build(&[Node::new("a", &["a"])]);

		match result {
			Err(ChainError::CyclicDependency { path, .. }) => {
				assert_eq!(path, "a -> a");
			}
			other => panic!("expected CyclicDependency, got {:?}", other.map(|c| c.keys())),
		}
	}

	#[test]
	fn test_unknown_requirement() {
		let result = DependencyChain::build(&[Node::new("a", &["ghost"])]);

		match result {
			Err(ChainError::UnknownDependency { consumer, missing }) => {
				assert_eq!(consumer, DependencyKey::new("a"));
				assert_eq!(missing, DependencyKey::new("ghost"));
			}
			other => panic!("expected UnknownDependency, got {:?}", other.map(|c| c.keys())),
		}
	}

	#[test]
	fn test_empty_chain() {
		let chain = DependencyChain::build(&[]).unwrap();
		assert!(chain.is_empty());
		assert_eq!(chain.len(), 0);
	}

	#[test]
	fn test_diamond_is_acquired_once() {
		// a and b both require db; db appears exactly once, first.
		let chain = DependencyChain::build(&[
			Node::new("a", &["db"]),
			Node::new("b", &["db"]),
			Node::new("db", &[]),
		])
		.unwrap();

		assert_eq!(names(&chain), vec!["db", "a", "b"]);
	}
}
