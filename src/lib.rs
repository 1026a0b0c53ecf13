//! Storefront REST client with single-flight token refresh, bounded retries, and typed
//! operations for carts, catalog, orders, and shipping quotes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod checkout;
pub mod compression;
pub mod config;
pub mod currency;
pub mod error;
pub mod ext;
pub mod http;
pub mod model;
pub mod obs;
pub mod services;
pub mod shipping;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		api::ApiClient,
		config::{ClientConfig, RetryJitter},
		ext::{LoginRateLimiter, Navigator},
		http::ReqwestHttpClient,
		store::{CredentialStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestHttpClient>;

	/// Navigator that counts how many times the client sent the user back to the login entry.
	#[derive(Debug, Default)]
	pub struct RecordingNavigator(AtomicUsize);
	impl RecordingNavigator {
		/// Number of recorded redirects.
		pub fn redirects(&self) -> usize {
			self.0.load(Ordering::SeqCst)
		}
	}
	impl Navigator for RecordingNavigator {
		fn go_to_unauthenticated_entry(&self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	/// Collaborators handed back by [`build_reqwest_test_client`] for assertions.
	#[derive(Clone, Debug)]
	pub struct TestHarness {
		/// In-memory credential store shared with the client.
		pub store: Arc<MemoryStore>,
		/// Rate limiter receiving lockout timestamps.
		pub rate_limit: Arc<LoginRateLimiter>,
		/// Navigator recording redirects.
		pub navigator: Arc<RecordingNavigator>,
	}

	/// Builds a reqwest transport with a cookie store for tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::new().expect("Failed to build Reqwest transport for tests.")
	}

	/// Constructs an [`ApiClient`] pointed at `base_url`, backed by an in-memory store, a
	/// recording navigator, and zero retry jitter so tests stay fast.
	pub fn build_reqwest_test_client(base_url: &str) -> (ReqwestTestClient, TestHarness) {
		let config = ClientConfig::builder(
			Url::parse(base_url).expect("Test base URL should parse successfully."),
		)
		.retry_jitter(RetryJitter::disabled())
		.build()
		.expect("Test client configuration should be valid.");
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let rate_limit = Arc::new(LoginRateLimiter::default());
		let navigator = Arc::new(RecordingNavigator::default());
		let client = ApiClient::with_http_client(config, store, test_reqwest_http_client())
			.with_rate_limit_notifier(rate_limit.clone())
			.with_navigator(navigator.clone());

		(client, TestHarness { store: store_backend, rate_limit, navigator })
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
