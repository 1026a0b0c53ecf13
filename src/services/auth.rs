//! Session bootstrap: login, registration, admin login, and logout.
//!
//! These endpoints never trigger a refresh; a 401 from them is the final answer.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, RequestOptions},
	auth::{LoginData, LoginResponse, RegisterUserData, User},
	http::HttpTransport,
	services,
};

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Logs a customer in and stores the issued credentials and profile.
	pub async fn login(&self, data: &LoginData) -> ApiResult<LoginResponse> {
		self.establish_session(&self.config.endpoints.login, data).await
	}

	/// Creates an account and stores the issued credentials and profile.
	pub async fn register(&self, data: &RegisterUserData) -> ApiResult<LoginResponse> {
		self.establish_session(&self.config.endpoints.register, data).await
	}

	/// Logs in to the admin console.
	///
	/// A 429 from this endpoint starts a lockout on the configured
	/// [`RateLimitNotifier`](crate::ext::RateLimitNotifier).
	pub async fn admin_login(&self, data: &LoginData) -> ApiResult<LoginResponse> {
		self.establish_session(&self.config.endpoints.admin_login, data).await
	}

	/// Logs out locally: clears tokens and profile and voids any refresh in flight.
	pub async fn logout(&self) -> ApiResult<()> {
		self.end_session().await.map_err(services::store_failure)
	}

	/// Profile of the logged-in user, if any.
	pub async fn current_user(&self) -> ApiResult<Option<User>> {
		self.store.user().await.map_err(services::store_failure)
	}

	async fn establish_session<B>(&self, endpoint: &str, body: &B) -> ApiResult<LoginResponse>
	where
		B: ?Sized + Serialize,
	{
		let response: LoginResponse = self.post(endpoint, body, RequestOptions::new()).await?;

		self.store.replace_tokens(response.credentials()).await.map_err(services::store_failure)?;

		if let Some(user) = &response.user {
			self.store.save_user(user.clone()).await.map_err(services::store_failure)?;
		}

		Ok(response)
	}
}
