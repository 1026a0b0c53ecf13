//! Single-flight coordination for token refreshes and the retries that follow them.
//!
//! Every dispatch records the refresh generation it observed before reading credentials. A
//! request that receives a 401 enters [`RefreshCoordinator::run`] with that generation: the
//! first caller through the gate performs the refresh, and every caller that observed the same
//! generation adopts its outcome once the gate opens. A refresh that already completed after the
//! caller's dispatch is likewise adopted rather than repeated, so one wave of expired requests
//! costs exactly one refresh call.
//!
//! The refresh itself runs on a spawned task that owns the gate until the outcome is published.
//! Dropping the caller that started it (a timeout, a `select!`) leaves the refresh running, and
//! the callers still waiting adopt its outcome.
//!
//! The coordinator also tracks a session epoch. Logging out bumps it, and a refresh that
//! finishes under a stale epoch must discard its tokens.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::{
	sync::atomic::{AtomicU64, AtomicUsize, Ordering},
	time::Duration as StdDuration,
};
// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, config::RetryJitter};

/// Result of one refresh, shared with every request that waited on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// New tokens were stored; waiting requests retry once.
	Succeeded,
	/// The session ended; waiting requests surface their original 401.
	Failed,
}

#[derive(Debug)]
struct RefreshState {
	generation: u64,
	last: RefreshOutcome,
}

/// Serializes refreshes and hands their outcome to concurrent callers.
#[derive(Debug)]
pub struct RefreshCoordinator {
	gate: Arc<AsyncMutex<()>>,
	state: Mutex<RefreshState>,
	session_epoch: AtomicU64,
	pending_retries: AtomicUsize,
	metrics: RefreshMetrics,
}
impl RefreshCoordinator {
	/// Creates an idle coordinator.
	pub fn new() -> Self {
		Self {
			gate: Arc::new(AsyncMutex::new(())),
			state: Mutex::new(RefreshState { generation: 0, last: RefreshOutcome::Failed }),
			session_epoch: AtomicU64::new(0),
			pending_retries: AtomicUsize::new(0),
			metrics: RefreshMetrics::default(),
		}
	}

	/// Number of refreshes completed so far.
	pub fn generation(&self) -> u64 {
		self.state.lock().generation
	}

	/// Current session epoch.
	pub fn session_epoch(&self) -> u64 {
		self.session_epoch.load(Ordering::SeqCst)
	}

	/// Marks every in-flight refresh as stale.
	pub fn invalidate_session(&self) -> u64 {
		self.session_epoch.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Number of retries currently waiting or in flight.
	pub fn pending_retries(&self) -> usize {
		self.pending_retries.load(Ordering::SeqCst)
	}

	/// Refresh counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Performs or joins a refresh for a request that dispatched under `observed_generation`.
	///
	/// `refresh` receives the session epoch read at its start and runs at most once per
	/// generation; callers that lose the race never invoke it. The future it returns is spawned
	/// onto the runtime and completes even if this call is dropped.
	pub async fn run<F, Fut>(
		self: &Arc<Self>,
		observed_generation: u64,
		refresh: F,
	) -> RefreshOutcome
	where
		F: FnOnce(u64) -> Fut,
		Fut: 'static + Send + Future<Output = RefreshOutcome>,
	{
		let singleflight = self.gate.lock_arc().await;

		{
			let state = self.state.lock();

			if state.generation != observed_generation {
				self.metrics.record_joined();

				return state.last;
			}
		}

		self.metrics.record_attempt();

		let coordinator = self.clone();
		let pending = refresh(self.session_epoch());
		let task = tokio::spawn(async move {
			let outcome = pending.await;

			coordinator.publish(outcome);
			drop(singleflight);

			outcome
		});

		match task.await {
			Ok(outcome) => outcome,
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "Token refresh task did not complete.");

				RefreshOutcome::Failed
			},
		}
	}

	/// Registers a retry; the returned ticket releases the slot when dropped.
	pub fn begin_retry(&self) -> RetryTicket<'_> {
		let pending = self.pending_retries.fetch_add(1, Ordering::SeqCst) + 1;

		RetryTicket { coordinator: self, pending }
	}

	fn publish(&self, outcome: RefreshOutcome) {
		match outcome {
			RefreshOutcome::Succeeded => self.metrics.record_success(),
			RefreshOutcome::Failed => self.metrics.record_failure(),
		}

		let mut state = self.state.lock();

		state.generation += 1;
		state.last = outcome;
	}
}
impl Default for RefreshCoordinator {
	fn default() -> Self {
		Self::new()
	}
}

/// Slot held by a retry between its refresh and its final response.
#[derive(Debug)]
pub struct RetryTicket<'a> {
	coordinator: &'a RefreshCoordinator,
	pending: usize,
}
impl RetryTicket<'_> {
	/// Pending retries counted when this ticket was issued, itself included.
	pub fn pending(&self) -> usize {
		self.pending
	}

	/// Draws a delay uniformly from `[0, window)` for the observed contention.
	pub fn delay(&self, jitter: &RetryJitter) -> StdDuration {
		let window = jitter.window(self.pending);
		let micros = u64::try_from(window.as_micros()).unwrap_or(u64::MAX);

		if micros == 0 {
			return StdDuration::ZERO;
		}

		StdDuration::from_micros(rand::rng().random_range(0..micros))
	}
}
impl Drop for RetryTicket<'_> {
	fn drop(&mut self) {
		self.coordinator.pending_retries.fetch_sub(1, Ordering::SeqCst);
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::AtomicUsize;
	// self
	use super::*;

	fn counting_refresh(
		calls: &Arc<AtomicUsize>,
		delay: StdDuration,
		outcome: RefreshOutcome,
	) -> impl FnOnce(u64) -> Pin<Box<dyn Future<Output = RefreshOutcome> + Send>> {
		let calls = calls.clone();

		move |_epoch| {
			Box::pin(async move {
				calls.fetch_add(1, Ordering::SeqCst);
				tokio::time::sleep(delay).await;

				outcome
			})
		}
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_refresh() {
		let coordinator = Arc::new(RefreshCoordinator::new());
		let calls = Arc::new(AtomicUsize::new(0));
		let observed = coordinator.generation();
		let delay = StdDuration::from_millis(20);
		let (a, b, c) = tokio::join!(
			coordinator.run(observed, counting_refresh(&calls, delay, RefreshOutcome::Succeeded)),
			coordinator.run(observed, counting_refresh(&calls, delay, RefreshOutcome::Succeeded)),
			coordinator.run(observed, counting_refresh(&calls, delay, RefreshOutcome::Succeeded)),
		);

		assert_eq!([a, b, c], [RefreshOutcome::Succeeded; 3]);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(coordinator.generation(), observed + 1);
		assert_eq!(coordinator.metrics().attempts(), 1);
		assert_eq!(coordinator.metrics().joined(), 2);
	}

	#[tokio::test]
	async fn dropped_leader_does_not_restart_refresh() {
		let coordinator = Arc::new(RefreshCoordinator::new());
		let calls = Arc::new(AtomicUsize::new(0));
		let observed = coordinator.generation();
		let slow = StdDuration::from_millis(200);
		let leader = tokio::time::timeout(
			StdDuration::from_millis(50),
			coordinator.run(observed, counting_refresh(&calls, slow, RefreshOutcome::Succeeded)),
		);
		let follower =
			coordinator.run(observed, counting_refresh(&calls, slow, RefreshOutcome::Succeeded));
		let (leader, follower) = tokio::join!(leader, follower);

		assert!(leader.is_err());
		assert_eq!(follower, RefreshOutcome::Succeeded);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(coordinator.generation(), observed + 1);
		assert_eq!(coordinator.metrics().attempts(), 1);
		assert_eq!(coordinator.metrics().joined(), 1);
	}

	#[tokio::test]
	async fn late_callers_adopt_completed_failure() {
		let coordinator = Arc::new(RefreshCoordinator::new());
		let calls = Arc::new(AtomicUsize::new(0));
		let observed = coordinator.generation();
		let first = coordinator.run(observed, |_| async { RefreshOutcome::Failed }).await;
		let late = coordinator
			.run(
				observed,
				counting_refresh(&calls, StdDuration::ZERO, RefreshOutcome::Succeeded),
			)
			.await;

		assert_eq!(first, RefreshOutcome::Failed);
		assert_eq!(late, RefreshOutcome::Failed);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(coordinator.metrics().failures(), 1);

		let fresh = coordinator.run(coordinator.generation(), |_| async {
			RefreshOutcome::Succeeded
		});

		assert_eq!(fresh.await, RefreshOutcome::Succeeded);
	}

	#[tokio::test]
	async fn refresh_receives_current_epoch() {
		let coordinator = Arc::new(RefreshCoordinator::new());

		coordinator.invalidate_session();

		let outcome = coordinator
			.run(0, |epoch| async move {
				if epoch == 1 { RefreshOutcome::Succeeded } else { RefreshOutcome::Failed }
			})
			.await;

		assert_eq!(outcome, RefreshOutcome::Succeeded);
	}

	#[test]
	fn retry_tickets_track_contention() {
		let coordinator = RefreshCoordinator::new();
		let jitter = RetryJitter::default();
		let first = coordinator.begin_retry();
		let second = coordinator.begin_retry();

		assert_eq!(second.pending(), 2);
		assert!(second.delay(&jitter) < jitter.window(2));
		assert_eq!(second.delay(&RetryJitter::disabled()), StdDuration::ZERO);

		drop(first);
		drop(second);

		assert_eq!(coordinator.pending_retries(), 0);
	}
}
