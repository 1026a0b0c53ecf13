//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `storefront_client.call` with the `call`
//!   (request/refresh/retry) and `stage` (call site) fields, plus warnings when a session is
//!   dropped or a login lockout is recorded.
//! - Enable `metrics` to increment the `storefront_client_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

/// Kinds of outbound calls the client makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// First dispatch of a caller's request.
	Request,
	/// Token refresh against the refresh endpoint.
	Refresh,
	/// Single retry after a successful refresh.
	Retry,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Request => "request",
			CallKind::Refresh => "refresh",
			CallKind::Retry => "retry",
		}
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Call started.
	Attempt,
	/// Call completed successfully.
	Success,
	/// Call failed.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_stay_stable() {
		assert_eq!(
			[CallKind::Request, CallKind::Refresh, CallKind::Retry].map(CallKind::as_str),
			["request", "refresh", "retry"],
		);
		assert_eq!(
			[CallOutcome::Attempt, CallOutcome::Success, CallOutcome::Failure]
				.map(CallOutcome::as_str),
			["attempt", "success", "failure"],
		);
	}
}
