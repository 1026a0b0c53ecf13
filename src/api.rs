//! Authenticated request client with single-flight refresh and a bounded retry.
//!
//! [`ApiClient::request`] attaches the stored bearer token, unwraps the success envelope, and
//! normalizes every failure into a [`NormalizedError`]. A 401 on a non-bootstrap endpoint
//! triggers a refresh shared by all concurrent callers (see [`refresh`]); after a successful
//! refresh the request is retried exactly once, after a small randomized delay. A failed refresh
//! clears the store and calls the [`Navigator`] once for the whole wave.

pub mod envelope;
pub mod error;
pub mod refresh;

pub use envelope::*;
pub use error::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, RefreshRequest, RefreshResponse},
	config::ClientConfig,
	error::TransportError,
	ext::{Navigator, NoopNavigator, NoopRateLimitNotifier, RateLimitNotifier},
	http::{CredentialsMode, HttpRequest, HttpTransport, Method, RequestBody},
	obs::{self, CallKind, CallOutcome, CallSpan},
	store::{CredentialStore, StoreError},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Outcome of every request: the decoded payload or a normalized failure.
pub type ApiResult<T> = Result<T, NormalizedError>;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Per-call options for [`ApiClient::request`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Surfaces a 401 directly instead of refreshing and retrying.
	pub skip_retry: bool,
	/// Extra headers; they override the configured defaults.
	pub headers: BTreeMap<String, String>,
	/// Cookie policy for the call.
	pub credentials: CredentialsMode,
}
impl RequestOptions {
	/// Options with every default applied.
	pub fn new() -> Self {
		Self::default()
	}

	/// Disables refresh-and-retry for this call.
	pub fn skip_retry(mut self) -> Self {
		self.skip_retry = true;

		self
	}

	/// Adds a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Sends and stores cookies (anonymous cart sessions).
	pub fn include_credentials(mut self) -> Self {
		self.credentials = CredentialsMode::Include;

		self
	}
}

/// Everything needed to dispatch a request again after a refresh.
#[derive(Clone, Debug)]
struct RequestDescriptor {
	method: Method,
	endpoint: String,
	body: RequestBody,
	options: RequestOptions,
}

#[derive(Debug, ThisError)]
enum RefreshFailure {
	#[error("No refresh token is stored.")]
	MissingRefreshToken,
	#[error(transparent)]
	Store(#[from] StoreError),
	#[error("Refresh endpoint URL is invalid: {0}.")]
	InvalidUrl(#[from] url::ParseError),
	#[error(transparent)]
	Transport(#[from] TransportError),
	#[error("Refresh endpoint rejected the request: {0}")]
	Rejected(NormalizedError),
}

/// Storefront API client.
///
/// Cloning is cheap and clones share the transport, the credential store, and the refresh
/// coordinator, so a refresh triggered through one clone is joined by requests issued through
/// any other.
pub struct ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Holder of the session's tokens and user profile.
	pub store: Arc<dyn CredentialStore>,
	/// Base URL, bootstrap endpoints, and retry policy.
	pub config: ClientConfig,
	/// Receives admin login lockouts.
	pub rate_limit: Arc<dyn RateLimitNotifier>,
	/// Invoked once per failed refresh.
	pub navigator: Arc<dyn Navigator>,
	refresh: Arc<RefreshCoordinator>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			config,
			rate_limit: Arc::new(NoopRateLimitNotifier),
			navigator: Arc::new(NoopNavigator),
			refresh: Default::default(),
		}
	}

	/// Sets the lockout notifier.
	pub fn with_rate_limit_notifier(mut self, notifier: Arc<dyn RateLimitNotifier>) -> Self {
		self.rate_limit = notifier;

		self
	}

	/// Sets the navigator used when the session cannot be recovered.
	pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
		self.navigator = navigator;

		self
	}

	/// Refresh coordinator shared by this client and its clones.
	pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
		&self.refresh
	}

	/// Issues a request and decodes the success payload into `R`.
	///
	/// `endpoint` is appended verbatim to the base URL and may carry a query string. Never
	/// returns anything but the payload or a [`NormalizedError`].
	pub async fn request<R, B>(
		&self,
		method: Method,
		endpoint: &str,
		body: Option<&B>,
		options: RequestOptions,
	) -> ApiResult<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = match body {
			Some(body) => RequestBody::Json(serde_json::to_value(body).map_err(|e| {
				NormalizedError::client(400, format!("Request body could not be serialized: {e}"))
			})?),
			None => RequestBody::Empty,
		};
		let descriptor = RequestDescriptor { method, endpoint: endpoint.to_owned(), body, options };

		envelope::decode(self.execute(&descriptor).await?)
	}

	/// `GET` shorthand.
	pub async fn get<R>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<R>
	where
		R: DeserializeOwned,
	{
		self.request(Method::Get, endpoint, None::<&()>, options).await
	}

	/// `POST` shorthand.
	pub async fn post<R, B>(
		&self,
		endpoint: &str,
		body: &B,
		options: RequestOptions,
	) -> ApiResult<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(Method::Post, endpoint, Some(body), options).await
	}

	/// `PUT` shorthand.
	pub async fn put<R, B>(&self, endpoint: &str, body: &B, options: RequestOptions) -> ApiResult<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(Method::Put, endpoint, Some(body), options).await
	}

	/// `PATCH` shorthand.
	pub async fn patch<R, B>(
		&self,
		endpoint: &str,
		body: &B,
		options: RequestOptions,
	) -> ApiResult<R>
	where
		R: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		self.request(Method::Patch, endpoint, Some(body), options).await
	}

	/// `DELETE` shorthand.
	pub async fn delete<R>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<R>
	where
		R: DeserializeOwned,
	{
		self.request(Method::Delete, endpoint, None::<&()>, options).await
	}

	/// Ends the session: clears the store and discards the result of any refresh in flight.
	///
	/// The navigator is not called; logging out is the caller's own decision.
	pub async fn end_session(&self) -> Result<(), StoreError> {
		self.refresh.invalidate_session();
		self.store.clear_all().await
	}

	async fn execute(&self, descriptor: &RequestDescriptor) -> ApiResult<Value> {
		let span = CallSpan::new(CallKind::Request, descriptor.method.as_str());

		span.instrument(async move {
			let (observed, first) = self.dispatch(descriptor, CallKind::Request).await;
			let error = match first {
				Ok(value) => return Ok(value),
				Err(error) => error,
			};

			if !self.should_refresh(descriptor, &error) {
				return Err(error);
			}

			let client = self.clone();
			let refresh = |epoch| async move { client.refresh_session(epoch).await };

			match self.refresh.run(observed, refresh).await {
				RefreshOutcome::Succeeded => self.retry(descriptor).await,
				RefreshOutcome::Failed => Err(error),
			}
		})
		.await
	}

	fn should_refresh(&self, descriptor: &RequestDescriptor, error: &NormalizedError) -> bool {
		error.origin == ErrorOrigin::Server
			&& error.is_unauthorized()
			&& !descriptor.options.skip_retry
			&& !self.config.endpoints.is_bootstrap(&descriptor.endpoint)
	}

	async fn retry(&self, descriptor: &RequestDescriptor) -> ApiResult<Value> {
		let ticket = self.refresh.begin_retry();
		let delay = ticket.delay(&self.config.retry_jitter);

		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}

		let span = CallSpan::new(CallKind::Retry, descriptor.method.as_str());
		let (_, result) = span.instrument(self.dispatch(descriptor, CallKind::Retry)).await;

		drop(ticket);

		result
	}

	/// Sends one attempt and returns the refresh generation observed before reading credentials.
	async fn dispatch(
		&self,
		descriptor: &RequestDescriptor,
		kind: CallKind,
	) -> (u64, ApiResult<Value>) {
		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let generation = self.refresh.generation();
		let result = self.send_once(descriptor).await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		(generation, result)
	}

	async fn send_once(&self, descriptor: &RequestDescriptor) -> ApiResult<Value> {
		let credentials = self.store.load().await.map_err(|e| {
			NormalizedError::client(500, format!("Credential store is unavailable: {e}"))
		})?;
		let url = self.config.url_for(&descriptor.endpoint).map_err(|e| {
			NormalizedError::client(
				400,
				format!("Endpoint `{}` does not form a valid URL: {e}", descriptor.endpoint),
			)
		})?;
		let mut request = HttpRequest::new(descriptor.method, url)
			.with_credentials(descriptor.options.credentials);

		request.headers = self.config.default_headers.clone();

		if let RequestBody::Json(value) = &descriptor.body {
			request = request.with_json(value.clone());
		}

		request.headers.extend(descriptor.options.headers.clone());

		if let Some(token) = &credentials.access_token {
			request.headers.insert("Authorization".into(), token.bearer());
		}

		let response =
			self.http_client.send(request).await.map_err(|e| NormalizedError::transport(&e))?;
		let result = if response.is_success() {
			envelope::unwrap_success(&response.body)
		} else {
			Err(envelope::parse_error(&response.body).unwrap_or_else(|| {
				NormalizedError::server(
					response.status,
					format!("Request failed with status {}.", response.status),
				)
			}))
		};

		if let Err(error) = &result {
			self.observe_lockout(error);
		}

		result
	}

	fn observe_lockout(&self, error: &NormalizedError) {
		if error.origin != ErrorOrigin::Server || !error.is_rate_limited() {
			return;
		}

		let (Some(path), Some(timestamp)) = (&error.path, &error.timestamp) else {
			return;
		};

		if self.config.is_admin_login_path(path) {
			#[cfg(feature = "tracing")]
			tracing::warn!(path = %path, timestamp = %timestamp, "Admin login lockout started.");

			self.rate_limit.record_lockout_start(timestamp);
		}
	}

	/// Runs on the refresh task while it holds the single-flight gate; called at most once per
	/// refresh generation.
	async fn refresh_session(&self, epoch: u64) -> RefreshOutcome {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_session");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let outcome = span
			.instrument(async move {
				let credentials = match self.exchange_refresh_token().await {
					Ok(credentials) => credentials,
					Err(_reason) => {
						if self.refresh.session_epoch() != epoch {
							return RefreshOutcome::Failed;
						}

						#[cfg(feature = "tracing")]
						tracing::warn!(reason = %_reason, "Token refresh failed; ending session.");

						self.abandon_session().await;

						return RefreshOutcome::Failed;
					},
				};

				if self.refresh.session_epoch() != epoch {
					return RefreshOutcome::Failed;
				}
				if let Err(_e) = self.store.replace_tokens(credentials).await {
					#[cfg(feature = "tracing")]
					tracing::warn!(error = %_e, "Refreshed tokens could not be stored.");

					self.abandon_session().await;

					return RefreshOutcome::Failed;
				}
				// A logout that raced the store write wins.
				if self.refresh.session_epoch() != epoch {
					if let Err(_e) = self.store.clear_all().await {
						#[cfg(feature = "tracing")]
						tracing::warn!(
							error = %_e,
							"Tokens refreshed after logout could not be cleared."
						);
					}

					return RefreshOutcome::Failed;
				}

				RefreshOutcome::Succeeded
			})
			.await;

		match outcome {
			RefreshOutcome::Succeeded => obs::record_call_outcome(KIND, CallOutcome::Success),
			RefreshOutcome::Failed => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		outcome
	}

	/// Calls the refresh endpoint directly, bypassing the request path.
	async fn exchange_refresh_token(&self) -> Result<Credentials, RefreshFailure> {
		let current = self.store.load().await?;
		let refresh_token =
			current.refresh_token.clone().ok_or(RefreshFailure::MissingRefreshToken)?;
		let url = self.config.url_for(&self.config.endpoints.refresh)?;
		let body = serde_json::to_value(RefreshRequest { refresh_token: refresh_token.expose() })
			.map_err(|e| RefreshFailure::Rejected(NormalizedError::client(400, e.to_string())))?;
		let request = HttpRequest::new(Method::Post, url)
			.with_header("Accept", "application/json")
			.with_json(body);
		let response = self.http_client.send(request).await?;

		if !response.is_success() {
			let error = envelope::parse_error(&response.body).unwrap_or_else(|| {
				NormalizedError::server(response.status, "Token refresh was rejected.")
			});

			return Err(RefreshFailure::Rejected(error));
		}

		let payload = envelope::unwrap_success(&response.body).map_err(RefreshFailure::Rejected)?;
		let refreshed: RefreshResponse =
			envelope::decode(payload).map_err(RefreshFailure::Rejected)?;

		Ok(refreshed.into_credentials(Some(refresh_token)))
	}

	async fn abandon_session(&self) {
		if let Err(_e) = self.store.clear_all().await {
			#[cfg(feature = "tracing")]
			tracing::warn!(error = %_e, "Credential store could not be cleared.");
		}

		self.navigator.go_to_unauthenticated_entry();
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport.
	pub fn new(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
	) -> Result<Self, crate::error::ConfigError> {
		Ok(Self::with_http_client(config, store, ReqwestHttpClient::new()?))
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			rate_limit: self.rate_limit.clone(),
			navigator: self.navigator.clone(),
			refresh: self.refresh.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_generation", &self.refresh.generation())
			.field("pending_retries", &self.refresh.pending_retries())
			.finish()
	}
}
