//! The propagated fault carried backward through the release phase

use crate::dependency::DependencyKey;
use hyper::StatusCode;
use std::fmt;

/// Boxed error type used as a fault's underlying source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Where in the request scope a fault was raised.
///
/// Stamped by the executor at the failure site; dependency and handler code
/// never set this themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOrigin {
	/// A dependency's acquire step failed before the handler ran
	Acquire(DependencyKey),
	/// The handler itself failed
	Handler,
	/// A dependency's release step raised (or re-raised) during unwind
	Release(DependencyKey),
	/// The request was cancelled before it could complete
	Cancellation,
}

impl fmt::Display for FaultOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FaultOrigin::Acquire(key) => write!(f, "acquire({key})"),
			FaultOrigin::Handler => write!(f, "handler"),
			FaultOrigin::Release(key) => write!(f, "release({key})"),
			FaultOrigin::Cancellation => write!(f, "cancellation"),
		}
	}
}

/// An in-flight failure travelling backward through the release phase.
///
/// A fault optionally carries an HTTP-style status and always carries a
/// human-readable detail. Release steps receive the pending fault by value
/// and decide its fate: return `Err(fault)` to re-raise it unchanged,
/// return `Err(other)` to replace it, or return `Ok(())` to suppress it.
///
/// # Examples
///
/// ```
/// use hyper::StatusCode;
/// use reqscope::Fault;
///
/// let fault = Fault::with_status(StatusCode::BAD_REQUEST, "invalid cursor");
/// assert_eq!(fault.status(), Some(StatusCode::BAD_REQUEST));
/// assert_eq!(fault.detail(), "invalid cursor");
/// assert!(!fault.claimed());
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{detail}")]
pub struct Fault {
	detail: String,
	status: Option<StatusCode>,
	#[source]
	source: Option<BoxError>,
	origin: Option<FaultOrigin>,
	claimed: bool,
}

impl Fault {
	/// Create a fault with a detail message and no declared status.
	pub fn new(detail: impl Into<String>) -> Self {
		Self {
			detail: detail.into(),
			status: None,
			source: None,
			origin: None,
			claimed: false,
		}
	}

	/// Create a fault that declares the HTTP status the translator should use.
	pub fn with_status(status: StatusCode, detail: impl Into<String>) -> Self {
		Self {
			status: Some(status),
			..Self::new(detail)
		}
	}

	/// The cancellation-flavored fault propagated through release when a
	/// request is cancelled mid-flight.
	pub fn cancelled() -> Self {
		Self::new("request cancelled before completion")
	}

	/// Attach the underlying error this fault wraps.
	pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
		self.source = Some(source.into());
		self
	}

	pub fn detail(&self) -> &str {
		&self.detail
	}

	pub fn status(&self) -> Option<StatusCode> {
		self.status
	}

	/// Where this fault was raised, once the executor has stamped it.
	pub fn origin(&self) -> Option<FaultOrigin> {
		self.origin
	}

	/// Whether any release step re-raised this fault while it was pending.
	pub fn claimed(&self) -> bool {
		self.claimed
	}

	/// Record the failure site. The first stamp wins so a fault re-raised by
	/// a release step keeps its original origin.
	pub(crate) fn stamp_origin(&mut self, origin: FaultOrigin) {
		if self.origin.is_none() {
			self.origin = Some(origin);
		}
	}

	pub(crate) fn mark_claimed(&mut self) {
		self.claimed = true;
	}
}
