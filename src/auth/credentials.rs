//! Access/refresh token triple and the wire payloads that mint it.

// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, User},
};

/// Token triple owned by a [`CredentialStore`](crate::store::CredentialStore).
///
/// The client never edits individual fields; it reads the whole value and asks the store to
/// replace it wholesale after a refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
	/// Bearer token attached to authenticated requests.
	pub access_token: Option<TokenSecret>,
	/// Token exchanged at the refresh endpoint for a new triple.
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds, as reported by the server.
	pub expires_in: Option<i64>,
}
impl Credentials {
	/// Builds credentials holding only an access token.
	pub fn with_access_token(access_token: impl Into<String>) -> Self {
		Self { access_token: Some(TokenSecret::new(access_token)), ..Default::default() }
	}

	/// Sets the refresh token.
	pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Sets the reported lifetime.
	pub fn expires_in(mut self, seconds: i64) -> Self {
		self.expires_in = Some(seconds);

		self
	}

	/// Returns `true` when no token of any kind is held.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}
}

/// Body sent to the refresh endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
	pub refresh_token: &'a str,
}

/// Token triple returned by the refresh endpoint inside the success envelope.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
	/// Newly minted access token.
	#[serde(alias = "token")]
	pub access_token: String,
	/// Rotated refresh token; servers that do not rotate omit it.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Access token lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
}
impl RefreshResponse {
	/// Merges the response into a full triple, keeping `previous_refresh` when the server did not
	/// rotate it.
	pub fn into_credentials(self, previous_refresh: Option<TokenSecret>) -> Credentials {
		Credentials {
			access_token: Some(TokenSecret::new(self.access_token)),
			refresh_token: self.refresh_token.map(TokenSecret::new).or(previous_refresh),
			expires_in: self.expires_in,
		}
	}
}

/// Payload returned by the login, register, and admin-login endpoints.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	/// Access token; older deployments call the field `token`.
	#[serde(alias = "token")]
	pub access_token: String,
	/// Refresh token, when the deployment issues one.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Access token lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Authenticated user profile.
	#[serde(default)]
	pub user: Option<User>,
}
impl LoginResponse {
	/// Extracts the token triple.
	pub fn credentials(&self) -> Credentials {
		Credentials {
			access_token: Some(TokenSecret::new(self.access_token.clone())),
			refresh_token: self.refresh_token.clone().map(TokenSecret::new),
			expires_in: self.expires_in,
		}
	}
}

/// Email/password pair accepted by the login endpoints.
#[derive(Clone, Serialize)]
pub struct LoginData {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl LoginData {
	/// Builds a login payload.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for LoginData {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginData")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Account registration payload.
#[derive(Clone, Serialize)]
pub struct RegisterUserData {
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
	/// Roles requested for the account.
	pub roles: Vec<String>,
}
impl Debug for RegisterUserData {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterUserData")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("roles", &self.roles)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_response_keeps_previous_refresh_when_not_rotated() {
		let response: RefreshResponse =
			serde_json::from_str(r#"{"accessToken":"access-2","expiresIn":900}"#)
				.expect("Refresh payload fixture should decode.");
		let credentials = response.into_credentials(Some(TokenSecret::new("refresh-1")));

		assert_eq!(credentials.access_token.as_ref().map(TokenSecret::expose), Some("access-2"));
		assert_eq!(credentials.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh-1"));
		assert_eq!(credentials.expires_in, Some(900));
	}

	#[test]
	fn login_response_accepts_legacy_token_field() {
		let response: LoginResponse = serde_json::from_value(serde_json::json!({
			"token": "legacy",
			"user": { "id": "u1", "name": "Ana", "email": "ana@example.com", "roles": ["ADMIN"] },
		}))
		.expect("Legacy login payload should decode.");
		let access = response.credentials().access_token.map(|s| s.expose().to_owned());

		assert_eq!(access.as_deref(), Some("legacy"));
		assert!(response.user.expect("User should be present.").is_admin());
	}

	#[test]
	fn login_data_debug_redacts_password() {
		let data = LoginData::new("ana@example.com", "hunter2");

		assert!(!format!("{data:?}").contains("hunter2"));
	}
}
