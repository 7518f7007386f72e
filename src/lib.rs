//! # reqscope
//!
//! Request-scoped dependency lifecycle management with explicit
//! acquire/release exception routing.
//!
//! ## Features
//!
//! - **Two-phase dependencies**: each [`ScopedDependency`] has an acquire
//!   step that yields a value and a release step that runs after the handler
//!   completes, regardless of outcome
//! - **Planned chains**: [`DependencyChain`] resolves the declared dependency
//!   DAG into a deterministic topological order, rejecting cycles and unknown
//!   keys before any acquisition runs
//! - **Fault routing**: [`LifecycleExecutor`] carries an in-flight
//!   [`Fault`] backward through the release phase, where each step can
//!   re-raise it, replace it, or suppress it — with suppression surfaced as
//!   a distinct [`ScopeOutcome::Suppressed`], never conflated with success
//! - **Cancellation-safe**: a cancelled request still runs the full release
//!   phase, so no acquired dependency leaks on any exit path
//! - **Transport seam**: the [`OutcomeTranslator`] is the only component
//!   that knows about status codes and bodies
//!
//! ## Example
//!
//! ```
//! use async_trait::async_trait;
//! use reqscope::{
//!     DependencyChain, DependencyKey, DependencyValue, Fault, LifecycleExecutor,
//!     ResolvedValues, ScopedDependency,
//! };
//! use std::sync::Arc;
//!
//! struct DbSession;
//!
//! #[async_trait]
//! impl ScopedDependency for DbSession {
//!     fn key(&self) -> DependencyKey {
//!         DependencyKey::new("db")
//!     }
//!
//!     async fn acquire(&self, _deps: &ResolvedValues) -> Result<DependencyValue, Fault> {
//!         Ok(Arc::new(String::from("session-1")))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let chain = DependencyChain::build(&[Arc::new(DbSession) as Arc<dyn ScopedDependency>])
//!     .expect("acyclic");
//! let executor = LifecycleExecutor::new(chain);
//!
//! let outcome = executor
//!     .run(|values| async move {
//!         let session = values
//!             .get::<String>(DependencyKey::new("db"))
//!             .ok_or_else(|| Fault::new("db missing"))?;
//!         Ok::<_, Fault>(format!("hello from {session}"))
//!     })
//!     .await;
//!
//! assert_eq!(outcome.success().as_deref(), Some("hello from session-1"));
//! # }
//! ```
//!
//! ## Release-phase fault routing
//!
//! Releases run in strict reverse acquisition order, single pass. A pending
//! fault (from the handler, from a failed acquisition, or from a later
//! release step) is handed to each release step in turn:
//!
//! - `Err(fault)` passes it on (or replaces it — last writer wins, moving
//!   outward);
//! - `Ok(())` suppresses it for every earlier dependency, and the scope
//!   finishes [`ScopeOutcome::Suppressed`].
//!
//! Failing to re-raise inside a teardown step is a latent-bug pattern;
//! suppression is legal but always observable, both in the outcome and in
//! the logs.

pub mod chain;
pub mod dependency;
pub mod executor;
pub mod fault;
pub mod outcome;
pub mod translator;
pub mod values;

pub use chain::{ChainError, DependencyChain};
pub use dependency::{DependencyKey, ScopedDependency};
pub use executor::LifecycleExecutor;
pub use fault::{BoxError, Fault, FaultOrigin};
pub use outcome::ScopeOutcome;
pub use translator::{JsonTranslator, OutcomeTranslator, Response};
pub use values::{DependencyValue, ResolvedValues};
