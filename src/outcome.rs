//! Terminal result of running one request's scope

use crate::fault::Fault;

/// The tagged result of running a chain to completion.
///
/// Produced exactly once per request, after the earliest dependency's release
/// step has finished. `Suppressed` is deliberately distinct from `Success`: a
/// fault cleared during release leaves no value to hand the caller, so the
/// request still failed even though no fault remains to report.
#[derive(Debug)]
pub enum ScopeOutcome<T> {
	/// The handler returned a value and no fault survived the release phase.
	Success(T),
	/// A fault was cleared by a release step without being re-raised; the
	/// handler's work (if any) was discarded and no diagnostic remains.
	Suppressed,
	/// A fault survived the entire release phase unhandled.
	Unhandled(Fault),
}

impl<T> ScopeOutcome<T> {
	pub fn is_success(&self) -> bool {
		matches!(self, ScopeOutcome::Success(_))
	}

	pub fn is_suppressed(&self) -> bool {
		matches!(self, ScopeOutcome::Suppressed)
	}

	pub fn is_unhandled(&self) -> bool {
		matches!(self, ScopeOutcome::Unhandled(_))
	}

	/// The handler's value, if the scope succeeded.
	pub fn success(self) -> Option<T> {
		match self {
			ScopeOutcome::Success(value) => Some(value),
			_ => None,
		}
	}

	/// The surviving fault, if the scope ended unhandled.
	pub fn fault(&self) -> Option<&Fault> {
		match self {
			ScopeOutcome::Unhandled(fault) => Some(fault),
			_ => None,
		}
	}
}
