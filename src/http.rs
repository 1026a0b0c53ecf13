//! Transport primitives for storefront API calls.
//!
//! The module exposes [`HttpTransport`] alongside the owned [`HttpRequest`] and
//! [`HttpResponse`] values so downstream crates can plug in their own HTTP stack. The
//! request client only ever talks to the network through this trait, which keeps the
//! refresh protocol testable with fake transports.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over fetch-style HTTP transports.
///
/// Implementations must resolve with `Ok` for every HTTP response, whatever its status; only
/// failures that produced no response at all (DNS, TCP, TLS, IO) map to [`TransportError`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches one request.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the storefront API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
	/// `HEAD`
	Head,
	/// `OPTIONS`
	Options,
}
impl Method {
	/// Returns the canonical verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
			Method::Head => "HEAD",
			Method::Options => "OPTIONS",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Whether cookies travel with a request.
///
/// The anonymous cart lives in a server-side session identified by a cookie, so cart and order
/// calls use [`CredentialsMode::Include`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CredentialsMode {
	/// Send no cookies and ignore `Set-Cookie`.
	#[default]
	Omit,
	/// Send and store cookies.
	Include,
}

/// Request payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document.
	Json(Value),
	/// Raw bytes with their media type (presigned uploads).
	Bytes {
		/// Media type sent as `Content-Type`.
		content_type: String,
		/// Payload.
		data: Vec<u8>,
	},
}

/// Owned request handed to an [`HttpTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
	/// Verb.
	pub method: Method,
	/// Absolute URL.
	pub url: Url,
	/// Header map; names are sent as given.
	pub headers: BTreeMap<String, String>,
	/// Payload.
	pub body: RequestBody,
	/// Cookie policy.
	pub credentials: CredentialsMode,
}
impl HttpRequest {
	/// Creates a bodiless request.
	pub fn new(method: Method, url: Url) -> Self {
		Self {
			method,
			url,
			headers: BTreeMap::new(),
			body: RequestBody::Empty,
			credentials: CredentialsMode::Omit,
		}
	}

	/// Adds a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Sets a JSON body and its content type.
	pub fn with_json(mut self, value: Value) -> Self {
		self.headers.insert("Content-Type".into(), "application/json".into());
		self.body = RequestBody::Json(value);

		self
	}

	/// Sets the cookie policy.
	pub fn with_credentials(mut self, credentials: CredentialsMode) -> Self {
		self.credentials = credentials;

		self
	}

	/// Returns the value of `name`, compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Response returned by an [`HttpTransport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from a status code and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Reqwest-backed transport.
///
/// Holds two clients: one with a cookie jar for [`CredentialsMode::Include`] requests and one
/// without for [`CredentialsMode::Omit`]. Redirects follow reqwest's default policy.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
	with_cookies: ReqwestClient,
	without_cookies: ReqwestClient,
}
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds both clients with default settings.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let with_cookies = ReqwestClient::builder().cookie_store(true).build()?;

		Ok(Self::with_clients(with_cookies, ReqwestClient::new()))
	}

	/// Wraps caller-configured clients. `with_cookies` should have a cookie store enabled.
	pub fn with_clients(with_cookies: ReqwestClient, without_cookies: ReqwestClient) -> Self {
		Self { with_cookies, without_cookies }
	}

	fn client_for(&self, mode: CredentialsMode) -> &ReqwestClient {
		match mode {
			CredentialsMode::Include => &self.with_cookies,
			CredentialsMode::Omit => &self.without_cookies,
		}
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
				.map_err(TransportError::network)?;
			let mut builder = self.client_for(request.credentials).request(method, request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(value) => builder.body(
					serde_json::to_vec(&value)
						.map_err(|e| TransportError::Io(std::io::Error::other(e)))?,
				),
				RequestBody::Bytes { content_type, data } =>
					builder.header(reqwest::header::CONTENT_TYPE, content_type).body(data),
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_is_case_insensitive() {
		let request = HttpRequest::new(
			Method::Get,
			Url::parse("https://example.com/products").expect("Fixture URL should parse."),
		)
		.with_header("Authorization", "Bearer abc")
		.with_json(Value::Null);

		assert_eq!(request.header("authorization"), Some("Bearer abc"));
		assert_eq!(request.header("content-type"), Some("application/json"));
		assert_eq!(request.header("cookie"), None);
	}

	#[test]
	fn success_covers_2xx_only() {
		assert!(HttpResponse::new(204, Vec::new()).is_success());
		assert!(!HttpResponse::new(304, Vec::new()).is_success());
		assert!(!HttpResponse::new(401, Vec::new()).is_success());
	}
}
