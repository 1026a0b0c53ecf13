//! Login lockout tracking driven by server 429 responses.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::_prelude::*;

/// Receives the start of a server-imposed login lockout.
///
/// The client forwards the envelope `timestamp` verbatim; implementations own any grace margin.
pub trait RateLimitNotifier
where
	Self: Send + Sync,
{
	/// Records that a lockout window started at `raw_timestamp`.
	fn record_lockout_start(&self, raw_timestamp: &str);
}

/// Notifier that ignores lockouts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRateLimitNotifier;
impl RateLimitNotifier for NoopRateLimitNotifier {
	fn record_lockout_start(&self, _raw_timestamp: &str) {}
}

/// Tracks whether the admin login form should stay disabled.
///
/// A recorded timestamp blocks logins until the timestamp plus [`LoginRateLimiter::grace`].
#[derive(Debug)]
pub struct LoginRateLimiter {
	grace: Duration,
	blocked_until: RwLock<Option<OffsetDateTime>>,
}
impl LoginRateLimiter {
	/// Grace margin applied when none is configured.
	pub const DEFAULT_GRACE: Duration = Duration::minutes(5);

	/// Creates a limiter with a custom grace margin.
	pub fn with_grace(grace: Duration) -> Self {
		Self { grace, blocked_until: RwLock::new(None) }
	}

	/// Configured grace margin.
	pub fn grace(&self) -> Duration {
		self.grace
	}

	/// End of the current lockout, if one was recorded.
	pub fn blocked_until(&self) -> Option<OffsetDateTime> {
		*self.blocked_until.read()
	}

	/// Returns `true` while `now` falls inside the lockout.
	pub fn is_blocked_at(&self, now: OffsetDateTime) -> bool {
		self.blocked_until().is_some_and(|until| now < until)
	}

	/// Returns `true` while the current instant falls inside the lockout.
	pub fn is_blocked(&self) -> bool {
		self.is_blocked_at(OffsetDateTime::now_utc())
	}

	/// Whole seconds left in the lockout at `now`, rounded up; zero when not blocked.
	pub fn remaining_seconds_at(&self, now: OffsetDateTime) -> u64 {
		let Some(until) = self.blocked_until() else {
			return 0;
		};

		if now >= until {
			return 0;
		}

		let remaining = until - now;
		let whole = remaining.whole_seconds();
		let rounded = if remaining.subsec_nanoseconds() > 0 { whole + 1 } else { whole };

		u64::try_from(rounded).unwrap_or(0)
	}

	/// Whole seconds left in the lockout, rounded up.
	pub fn remaining_seconds(&self) -> u64 {
		self.remaining_seconds_at(OffsetDateTime::now_utc())
	}

	/// Lifts any recorded lockout.
	pub fn clear(&self) {
		*self.blocked_until.write() = None;
	}
}
impl Default for LoginRateLimiter {
	fn default() -> Self {
		Self::with_grace(Self::DEFAULT_GRACE)
	}
}
impl RateLimitNotifier for LoginRateLimiter {
	fn record_lockout_start(&self, raw_timestamp: &str) {
		match OffsetDateTime::parse(raw_timestamp, &Rfc3339) {
			Ok(start) => *self.blocked_until.write() = Some(start + self.grace),
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(
					timestamp = raw_timestamp,
					error = %_e,
					"Ignoring unparsable lockout timestamp."
				);
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn lockout_adds_grace_margin() {
		let limiter = LoginRateLimiter::default();

		limiter.record_lockout_start("2024-01-01T00:00:00Z");

		assert_eq!(limiter.blocked_until(), Some(datetime!(2024-01-01 00:05:00 UTC)));
		assert!(limiter.is_blocked_at(datetime!(2024-01-01 00:04:59 UTC)));
		assert!(!limiter.is_blocked_at(datetime!(2024-01-01 00:05:00 UTC)));
	}

	#[test]
	fn remaining_seconds_rounds_up() {
		let limiter = LoginRateLimiter::with_grace(Duration::seconds(10));

		limiter.record_lockout_start("2024-01-01T00:00:00Z");

		assert_eq!(limiter.remaining_seconds_at(datetime!(2024-01-01 00:00:00.5 UTC)), 10);
		assert_eq!(limiter.remaining_seconds_at(datetime!(2024-01-01 00:00:09 UTC)), 1);
		assert_eq!(limiter.remaining_seconds_at(datetime!(2024-01-01 00:00:11 UTC)), 0);

		limiter.clear();

		assert_eq!(limiter.remaining_seconds_at(datetime!(2024-01-01 00:00:00 UTC)), 0);
	}

	#[test]
	fn unparsable_timestamp_is_ignored() {
		let limiter = LoginRateLimiter::default();

		limiter.record_lockout_start("yesterday");

		assert!(limiter.blocked_until().is_none());
	}
}
