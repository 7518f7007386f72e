//! Scoped dependency contract

use crate::fault::Fault;
use crate::values::{DependencyValue, ResolvedValues};
use std::fmt;

/// Identity of a scoped dependency within one request's chain.
///
/// Keys are deliberately name-based rather than `TypeId`-based: one request
/// may carry two instances of the same Rust type under different keys (two
/// database sessions, say), and release-phase diagnostics need a printable
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey(&'static str);

impl DependencyKey {
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub fn name(&self) -> &'static str {
		self.0
	}
}

impl fmt::Display for DependencyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

impl From<&'static str> for DependencyKey {
	fn from(name: &'static str) -> Self {
		Self(name)
	}
}

/// A unit of work with a two-phase lifecycle bound to one request.
///
/// `acquire` runs before the handler and yields a value; `release` runs after
/// the handler completes, in reverse acquisition order, exactly once per
/// acquired instance regardless of how the scope ends.
///
/// The `fault` argument to `release` is the pending propagated fault, if one
/// is in flight. The return value decides its fate:
///
/// - `Err(fault)` re-raises the pending fault unchanged;
/// - `Err(other)` replaces it (also the shape of "raised while handling");
/// - `Ok(())` with a pending fault suppresses it for every dependency
///   earlier in the chain — legal, but the scope then finishes
///   [`Suppressed`](crate::ScopeOutcome::Suppressed), never `Success`.
///
/// The default `release` passes any pending fault through untouched, which
/// is the safe behavior for dependencies with no teardown work.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reqscope::{DependencyKey, DependencyValue, Fault, ResolvedValues, ScopedDependency};
/// use std::sync::Arc;
///
/// struct DbSession;
///
/// #[async_trait]
/// impl ScopedDependency for DbSession {
///     fn key(&self) -> DependencyKey {
///         DependencyKey::new("db")
///     }
///
///     async fn acquire(&self, _deps: &ResolvedValues) -> Result<DependencyValue, Fault> {
///         // open the session here
///         Ok(Arc::new(String::from("session-1")))
///     }
///
///     async fn release(
///         &self,
///         _value: DependencyValue,
///         fault: Option<Fault>,
///     ) -> Result<(), Fault> {
///         // close the session here, then pass any pending fault on
///         match fault {
///             Some(fault) => Err(fault),
///             None => Ok(()),
///         }
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ScopedDependency: Send + Sync + 'static {
	/// Identity of this dependency. Distinct keys are acquired at most once
	/// per request.
	fn key(&self) -> DependencyKey;

	/// Keys of the dependencies whose yielded values this one consumes.
	/// They are guaranteed to be acquired (and present in `deps`) before
	/// `acquire` runs.
	fn requires(&self) -> Vec<DependencyKey> {
		Vec::new()
	}

	/// Setup step. Runs in chain order; may suspend.
	async fn acquire(&self, deps: &ResolvedValues) -> Result<DependencyValue, Fault>;

	/// Teardown step. Runs in reverse chain order after the handler (or after
	/// a failed acquisition), receiving the value this dependency yielded and
	/// the pending propagated fault, if any.
	async fn release(&self, value: DependencyValue, fault: Option<Fault>) -> Result<(), Fault> {
		let _ = value;
		match fault {
			Some(fault) => Err(fault),
			None => Ok(()),
		}
	}
}
