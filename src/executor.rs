//! Lifecycle executor — the per-request state machine
//!
//! Drives one request's chain: acquires in chain order, invokes the handler,
//! then releases in strict reverse order, routing any in-flight fault through
//! each release step on the way out. One executor serves exactly one logical
//! request; concurrent requests run independent executors.

use crate::chain::DependencyChain;
use crate::fault::{Fault, FaultOrigin};
use crate::outcome::ScopeOutcome;
use crate::values::{DependencyValue, ResolvedValues};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a planned [`DependencyChain`] for one request.
///
/// # Examples
///
/// ```rust,ignore
/// let chain = DependencyChain::build(&[db_dep, session_dep])?;
/// let executor = LifecycleExecutor::new(chain);
///
/// let outcome = executor
///     .run(|values| async move {
///         let db = values.get::<DbSession>(DependencyKey::new("db")).unwrap();
///         Ok(db.list_users().await?)
///     })
///     .await;
/// ```
pub struct LifecycleExecutor {
	chain: DependencyChain,
}

impl LifecycleExecutor {
	pub fn new(chain: DependencyChain) -> Self {
		Self { chain }
	}

	pub fn chain(&self) -> &DependencyChain {
		&self.chain
	}

	/// Run the chain to completion with no external cancellation.
	pub async fn run<H, Fut, T>(&self, handler: H) -> ScopeOutcome<T>
	where
		H: FnOnce(ResolvedValues) -> Fut,
		Fut: Future<Output = Result<T, Fault>>,
	{
		self.run_cancellable(handler, &CancellationToken::new()).await
	}

	/// Run the chain, racing acquisition steps and the handler against the
	/// given cancellation token.
	///
	/// Cancellation never skips teardown: every dependency acquired before
	/// the token fired is still released, with a cancellation-flavored fault
	/// pending, so nothing leaks on that exit path. Release steps themselves
	/// are not raced against the token — release order and completion are a
	/// correctness requirement.
	///
	/// A dependency whose acquire step is dropped mid-flight by cancellation
	/// never yielded a value and is not released.
	pub async fn run_cancellable<H, Fut, T>(
		&self,
		handler: H,
		cancel: &CancellationToken,
	) -> ScopeOutcome<T>
	where
		H: FnOnce(ResolvedValues) -> Fut,
		Fut: Future<Output = Result<T, Fault>>,
	{
		let values = ResolvedValues::new();
		let mut acquired: Vec<(usize, DependencyValue)> = Vec::new();
		let mut pending: Option<Fault> = None;

		// Acquire phase: chain order, strictly sequential. A failure at any
		// step skips the handler and unwinds whatever already succeeded.
		for (index, dep) in self.chain.iter().enumerate() {
			let key = dep.key();
			let step = tokio::select! {
				biased;
				_ = cancel.cancelled() => None,
				result = dep.acquire(&values) => Some(result),
			};
			match step {
				Some(Ok(value)) => {
					values.insert(key, Arc::clone(&value));
					acquired.push((index, value));
				}
				Some(Err(mut fault)) => {
					fault.stamp_origin(FaultOrigin::Acquire(key));
					tracing::debug!(%key, detail = %fault, "dependency acquisition failed");
					pending = Some(fault);
					break;
				}
				None => {
					let mut fault = Fault::cancelled();
					fault.stamp_origin(FaultOrigin::Cancellation);
					tracing::debug!(%key, "request cancelled while acquiring");
					pending = Some(fault);
					break;
				}
			}
		}

		// Run phase: only reached when every acquisition succeeded.
		let mut value: Option<T> = None;
		if pending.is_none() {
			let step = tokio::select! {
				biased;
				_ = cancel.cancelled() => None,
				result = handler(values.clone()) => Some(result),
			};
			match step {
				Some(Ok(returned)) => value = Some(returned),
				Some(Err(mut fault)) => {
					fault.stamp_origin(FaultOrigin::Handler);
					tracing::debug!(detail = %fault, "handler failed");
					pending = Some(fault);
				}
				None => {
					let mut fault = Fault::cancelled();
					fault.stamp_origin(FaultOrigin::Cancellation);
					tracing::debug!("request cancelled while running handler");
					pending = Some(fault);
				}
			}
		}

		// Release phase: single pass backward over everything acquired.
		// Each step receives the pending fault (if any) and decides its
		// fate; whatever it raises overwrites the pending fault for the
		// steps still ahead.
		for (index, yielded) in acquired.into_iter().rev() {
			let dep = &self.chain.as_slice()[index];
			let key = dep.key();
			let had_pending = pending.is_some();
			match dep.release(yielded, pending.take()).await {
				Ok(()) => {
					if had_pending {
						tracing::warn!(
							%key,
							"release step suppressed an in-flight fault; the scope will \
							 finish Suppressed with no diagnostic detail"
						);
					}
				}
				Err(mut fault) => {
					fault.stamp_origin(FaultOrigin::Release(key));
					if had_pending {
						fault.mark_claimed();
					}
					pending = Some(fault);
				}
			}
		}

		match pending {
			Some(fault) => ScopeOutcome::Unhandled(fault),
			None => match value {
				Some(value) => ScopeOutcome::Success(value),
				None => ScopeOutcome::Suppressed,
			},
		}
	}
}
