//! Navigation hook invoked when a session cannot be recovered.

/// Moves the user to the unauthenticated entry point (usually the login screen).
///
/// The client calls this exactly once per failed refresh, no matter how many requests were
/// waiting on it.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Leaves the authenticated area.
	fn go_to_unauthenticated_entry(&self);
}

/// Navigator for headless callers that have nowhere to redirect.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn go_to_unauthenticated_entry(&self) {}
}
