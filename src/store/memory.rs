//! Thread-safe in-memory [`CredentialStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, User},
	store::{CredentialStore, Session, StoreFuture},
};

/// Keeps the session in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Session>>);
impl MemoryStore {
	/// Creates a store seeded with `credentials`.
	pub fn with_credentials(credentials: Credentials) -> Self {
		Self(Arc::new(RwLock::new(Session { credentials, user: None })))
	}

	/// Returns a copy of the current session without going through the async trait.
	pub fn snapshot(&self) -> Session {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Credentials> {
		let session = self.0.clone();

		Box::pin(async move { Ok(session.read().credentials.clone()) })
	}

	fn replace_tokens(&self, credentials: Credentials) -> StoreFuture<'_, ()> {
		let session = self.0.clone();

		Box::pin(async move {
			session.write().credentials = credentials;

			Ok(())
		})
	}

	fn save_user(&self, user: User) -> StoreFuture<'_, ()> {
		let session = self.0.clone();

		Box::pin(async move {
			session.write().user = Some(user);

			Ok(())
		})
	}

	fn user(&self) -> StoreFuture<'_, Option<User>> {
		let session = self.0.clone();

		Box::pin(async move { Ok(session.read().user.clone()) })
	}

	fn clear_all(&self) -> StoreFuture<'_, ()> {
		let session = self.0.clone();

		Box::pin(async move {
			*session.write() = Session::default();

			Ok(())
		})
	}
}
