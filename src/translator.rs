//! Outcome translation — the transport boundary
//!
//! The translator is the only component that knows about status codes and
//! body serialization. The executor hands it a [`ScopeOutcome`]; everything
//! upstream of that is transport-agnostic.

use crate::outcome::ScopeOutcome;
use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

/// Transport-level response produced from a [`ScopeOutcome`].
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Build a JSON response from a serializable body.
	pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self, serde_json::Error> {
		let body = serde_json::to_vec(body)?;
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(Self {
			status,
			headers,
			body: Bytes::from(body),
		})
	}
}

/// Maps a scope's final outcome to a transport response.
///
/// Contract (mirrored by [`JsonTranslator`]):
/// - `Success(value)` becomes a normal response;
/// - `Unhandled(fault)` becomes an error response shaped by the fault's
///   declared status and detail when present, or a generic server fault
///   otherwise;
/// - `Suppressed` is an error condition, never success — the handler's work
///   was discarded and no diagnostic payload exists, so implementations must
///   log the event.
pub trait OutcomeTranslator {
	fn translate<T: Serialize>(&self, outcome: ScopeOutcome<T>) -> Response;
}

/// Default translator: JSON bodies, FastAPI-style `{"detail": ...}` errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTranslator;

#[derive(Serialize)]
struct ErrorBody<'a> {
	detail: &'a str,
}

const GENERIC_FAULT: &str = "Internal Server Error";

fn error_response(status: StatusCode, detail: &str) -> Response {
	match Response::json(status, &ErrorBody { detail }) {
		Ok(response) => response,
		Err(_) => Response::new(status),
	}
}

impl OutcomeTranslator for JsonTranslator {
	fn translate<T: Serialize>(&self, outcome: ScopeOutcome<T>) -> Response {
		match outcome {
			ScopeOutcome::Success(value) => match Response::json(StatusCode::OK, &value) {
				Ok(response) => response,
				Err(err) => {
					tracing::error!(error = %err, "failed to serialize handler value");
					error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAULT)
				}
			},
			ScopeOutcome::Suppressed => {
				// The caller receives no diagnostic by design; the log line is
				// the only record that this request faulted at all.
				tracing::error!(
					"request fault was suppressed during release; responding with a \
					 generic server fault and no diagnostic detail"
				);
				error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAULT)
			}
			ScopeOutcome::Unhandled(fault) => {
				let status = fault.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
				tracing::error!(
					%status,
					origin = ?fault.origin(),
					detail = %fault.detail(),
					"request finished with unhandled fault"
				);
				if fault.status().is_some() {
					error_response(status, fault.detail())
				} else {
					error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAULT)
				}
			}
		}
	}
}
