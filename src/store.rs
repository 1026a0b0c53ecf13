//! Credential storage contracts and built-in store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, User},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend holding the current session's tokens and user profile.
///
/// The request client is the only writer of the token triple during a refresh; other writers
/// (login, logout) go through the same operations. Every write replaces the whole triple so
/// readers never observe a half-updated session.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the current token triple (empty when logged out).
	fn load(&self) -> StoreFuture<'_, Credentials>;

	/// Atomically replaces the access token, refresh token, and expiry.
	fn replace_tokens(&self, credentials: Credentials) -> StoreFuture<'_, ()>;

	/// Persists the authenticated user's profile.
	fn save_user(&self, user: User) -> StoreFuture<'_, ()>;

	/// Returns the stored user profile, if any.
	fn user(&self) -> StoreFuture<'_, Option<User>>;

	/// Removes tokens and user profile.
	fn clear_all(&self) -> StoreFuture<'_, ()>;
}

/// Snapshot persisted by the built-in stores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Current token triple.
	#[serde(default)]
	pub credentials: Credentials,
	/// Logged-in user, if known.
	#[serde(default)]
	pub user: Option<User>,
}
impl Session {
	/// Returns `true` when an access token is held.
	pub fn is_authenticated(&self) -> bool {
		self.credentials.access_token.is_some()
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unavailable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unavailable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn default_session_is_logged_out() {
		let session = Session::default();

		assert!(!session.is_authenticated());
		assert!(session.credentials.is_empty());
	}
}
