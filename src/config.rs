//! Client configuration: API base URL, authentication endpoint paths, and retry jitter.

// std
use std::time::Duration as StdDuration;
// crates.io
use figment::{Figment, providers::Env};
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable holding the API base URL.
pub const API_BASE_ENV: &str = "STOREFRONT_API_BASE";
/// Base URL used by [`ClientConfig::from_env`] when [`API_BASE_ENV`] is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Paths of the endpoints that bootstrap a session.
///
/// A 401 from any of these is final: the client never attempts a refresh for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoints {
	/// Customer login.
	pub login: String,
	/// Token refresh.
	pub refresh: String,
	/// Account registration.
	pub register: String,
	/// Admin console login; its 429 responses start a lockout window.
	pub admin_login: String,
}
impl AuthEndpoints {
	/// Returns `true` when `endpoint` (query string ignored) is a bootstrap endpoint.
	pub fn is_bootstrap(&self, endpoint: &str) -> bool {
		let path = endpoint.split('?').next().unwrap_or(endpoint);

		[&self.login, &self.refresh, &self.register, &self.admin_login]
			.into_iter()
			.any(|candidate| candidate == path)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		for (name, value) in [
			("login", &self.login),
			("refresh", &self.refresh),
			("register", &self.register),
			("admin login", &self.admin_login),
		] {
			if !value.starts_with('/') {
				return Err(ConfigError::InvalidEndpoint { name, value: value.clone() });
			}
		}

		Ok(())
	}
}
impl Default for AuthEndpoints {
	fn default() -> Self {
		Self {
			login: "/auth/login".into(),
			refresh: "/auth/refresh".into(),
			register: "/auth/register".into(),
			admin_login: "/auth/admin/login".into(),
		}
	}
}

/// Randomized delay applied before a request is retried after a refresh.
///
/// The delay is drawn uniformly from `[0, window)`. The window equals `base` while the number
/// of pending retries stays at or below `congestion_threshold`; past it the window grows to
/// `base * pending`, capped at `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryJitter {
	/// Window used under normal contention.
	pub base: StdDuration,
	/// Upper bound on the window.
	pub max: StdDuration,
	/// Pending-retry count above which the window widens.
	pub congestion_threshold: usize,
}
impl RetryJitter {
	/// Jitter that never sleeps.
	pub const fn disabled() -> Self {
		Self { base: StdDuration::ZERO, max: StdDuration::ZERO, congestion_threshold: 0 }
	}

	/// Computes the jitter window for `pending` concurrent retries.
	pub fn window(&self, pending: usize) -> StdDuration {
		if pending <= self.congestion_threshold {
			return self.base.min(self.max);
		}

		let factor = u32::try_from(pending).unwrap_or(u32::MAX);

		self.base.checked_mul(factor).unwrap_or(self.max).min(self.max)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.base > self.max {
			return Err(ConfigError::InvalidJitter);
		}

		Ok(())
	}
}
impl Default for RetryJitter {
	fn default() -> Self {
		Self {
			base: StdDuration::from_millis(100),
			max: StdDuration::from_secs(1),
			congestion_threshold: 3,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct ApiEnv {
	storefront_api_base: Option<String>,
}

/// Validated configuration consumed by [`ApiClient`](crate::api::ApiClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// API base URL; endpoints are appended to it verbatim.
	pub base_url: Url,
	/// Session bootstrap endpoints.
	pub endpoints: AuthEndpoints,
	/// Retry jitter policy.
	pub retry_jitter: RetryJitter,
	/// Headers sent with every request before caller overrides.
	pub default_headers: BTreeMap<String, String>,
}
impl ClientConfig {
	/// Starts a builder for the provided base URL.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a configuration from [`API_BASE_ENV`], falling back to [`DEFAULT_API_BASE`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_figment(Figment::new().merge(Env::raw().only(&[API_BASE_ENV])))
	}

	/// Builds a configuration from a figment carrying a `storefront_api_base` key.
	pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
		let env: ApiEnv = figment.extract().map_err(ConfigError::environment)?;
		let raw = env.storefront_api_base.filter(|value| !value.is_empty());

		Self::builder(parse_base_url(raw.as_deref().unwrap_or(DEFAULT_API_BASE))?).build()
	}

	/// Joins `endpoint` onto the base URL.
	pub fn url_for(&self, endpoint: &str) -> Result<Url, url::ParseError> {
		let base = self.base_url.as_str().trim_end_matches('/');

		Url::parse(&format!("{base}{endpoint}"))
	}

	/// Returns `true` when a server-reported `path` names the admin login endpoint.
	///
	/// Servers report the path they routed, which may include the base URL's own path prefix
	/// (`/api/auth/admin/login`), so both forms are accepted.
	pub fn is_admin_login_path(&self, path: &str) -> bool {
		let admin_login = self.endpoints.admin_login.as_str();

		if path == admin_login {
			return true;
		}

		let prefix = self.base_url.path().trim_end_matches('/');

		path.strip_prefix(prefix).is_some_and(|rest| rest == admin_login)
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	base_url: Url,
	endpoints: AuthEndpoints,
	retry_jitter: RetryJitter,
	default_headers: BTreeMap<String, String>,
}
impl ClientConfigBuilder {
	fn new(base_url: Url) -> Self {
		let mut default_headers = BTreeMap::new();

		default_headers.insert("Accept".into(), "application/json".into());

		Self {
			base_url,
			endpoints: AuthEndpoints::default(),
			retry_jitter: RetryJitter::default(),
			default_headers,
		}
	}

	/// Overrides the bootstrap endpoints.
	pub fn endpoints(mut self, endpoints: AuthEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the retry jitter policy.
	pub fn retry_jitter(mut self, jitter: RetryJitter) -> Self {
		self.retry_jitter = jitter;

		self
	}

	/// Adds (or replaces) a header sent with every request.
	pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.default_headers.insert(name.into(), value.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		match self.base_url.scheme() {
			"http" | "https" => {},
			other => return Err(ConfigError::UnsupportedScheme { scheme: other.to_owned() }),
		}

		self.endpoints.validate()?;
		self.retry_jitter.validate()?;

		Ok(ClientConfig {
			base_url: self.base_url,
			endpoints: self.endpoints,
			retry_jitter: self.retry_jitter,
			default_headers: self.default_headers,
		})
	}
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl { value: raw.to_owned(), source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(base: &str) -> ClientConfig {
		ClientConfig::builder(Url::parse(base).expect("Fixture base URL should parse."))
			.build()
			.expect("Fixture configuration should be valid.")
	}

	#[test]
	fn bootstrap_endpoints_ignore_query_strings() {
		let endpoints = AuthEndpoints::default();

		assert!(endpoints.is_bootstrap("/auth/login"));
		assert!(endpoints.is_bootstrap("/auth/refresh?source=web"));
		assert!(endpoints.is_bootstrap("/auth/admin/login"));
		assert!(!endpoints.is_bootstrap("/auth/me"));
	}

	#[test]
	fn url_for_preserves_base_path() {
		let config = config("https://shop.example.com/api/");

		assert_eq!(
			config.url_for("/categories?level=1").expect("Joined URL should parse.").as_str(),
			"https://shop.example.com/api/categories?level=1",
		);
		assert!(config.is_admin_login_path("/api/auth/admin/login"));
		assert!(config.is_admin_login_path("/auth/admin/login"));
		assert!(!config.is_admin_login_path("/api/auth/login"));
	}

	#[test]
	fn builder_rejects_invalid_settings() {
		let base = |raw| Url::parse(raw).expect("URL should parse.");
		let err = ClientConfig::builder(base("ftp://example.com"))
			.build()
			.expect_err("Non-HTTP schemes should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { .. }));

		let err = ClientConfig::builder(base("https://example.com"))
			.endpoints(AuthEndpoints { login: "auth/login".into(), ..AuthEndpoints::default() })
			.build()
			.expect_err("Relative endpoints should be rejected.");

		assert!(matches!(err, ConfigError::InvalidEndpoint { name: "login", .. }));

		let err = ClientConfig::builder(base("https://example.com"))
			.retry_jitter(RetryJitter {
				base: StdDuration::from_secs(2),
				max: StdDuration::from_secs(1),
				congestion_threshold: 3,
			})
			.build()
			.expect_err("Inverted jitter bounds should be rejected.");

		assert!(matches!(err, ConfigError::InvalidJitter));
	}

	#[test]
	fn from_env_reads_base_url_or_falls_back() {
		figment::Jail::expect_with(|jail| {
			jail.set_env(API_BASE_ENV, "");

			let fallback = ClientConfig::from_env().expect("Empty base URL should fall back.");

			assert_eq!(fallback.base_url.as_str(), "http://localhost:3001/");

			jail.set_env(API_BASE_ENV, "https://shop.example.com/api");

			let config = ClientConfig::from_env().expect("Configured base URL should parse.");

			assert_eq!(config.base_url.as_str(), "https://shop.example.com/api");

			jail.set_env(API_BASE_ENV, "not a url");

			assert!(matches!(ClientConfig::from_env(), Err(ConfigError::InvalidBaseUrl { .. })));

			Ok(())
		});
	}

	#[test]
	fn jitter_window_widens_with_contention() {
		let jitter = RetryJitter::default();

		assert_eq!(jitter.window(0), StdDuration::from_millis(100));
		assert_eq!(jitter.window(3), StdDuration::from_millis(100));
		assert_eq!(jitter.window(5), StdDuration::from_millis(500));
		assert_eq!(jitter.window(50), StdDuration::from_secs(1));
		assert_eq!(RetryJitter::disabled().window(10), StdDuration::ZERO);
	}
}
