//! Zipnova shipping quotes.
//!
//! Quotes go straight to the carrier API with HTTP Basic credentials; they share the storefront
//! client's transport but none of its session handling.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use figment::{Figment, providers::Env};
// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, NormalizedError},
	config,
	error::ConfigError,
	http::{HttpRequest, HttpTransport, Method},
	model::{Address, CartItem, ResourceId},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Zipnova API root.
pub const ZIPNOVA_API_BASE: &str = "https://api.zipnova.com.ar/v2";
/// Prefix shared by the carrier's environment variables.
pub const ZIPNOVA_ENV_PREFIX: &str = "ZIPNOVA_";
/// Environment variable holding the API token.
pub const ZIPNOVA_API_TOKEN_ENV: &str = "ZIPNOVA_API_TOKEN";
/// Environment variable holding the API secret.
pub const ZIPNOVA_API_SECRET_ENV: &str = "ZIPNOVA_API_SECRET";
/// Environment variable holding the account identifier.
pub const ZIPNOVA_ACCOUNT_ID_ENV: &str = "ZIPNOVA_ACCOUNT_ID";
/// Environment variable holding the origin warehouse identifier.
pub const ZIPNOVA_ORIGIN_ID_ENV: &str = "ZIPNOVA_ORIGIN_ID";
/// Weight assumed for products without one, and the carrier's minimum.
pub const MIN_ITEM_WEIGHT: u64 = 10;

// Figment reads digit-only values as numbers, so every field accepts both forms.
#[derive(Default, Deserialize)]
struct ShippingEnv {
	account_id: Option<ResourceId>,
	origin_id: Option<ResourceId>,
	api_token: Option<ResourceId>,
	api_secret: Option<ResourceId>,
}

/// Carrier account settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ShippingConfig {
	/// API root; quotes post to `{base_url}/shipments/quote`.
	pub base_url: Url,
	/// API token.
	pub api_token: Option<String>,
	/// API secret.
	pub api_secret: Option<String>,
	/// Carrier account.
	pub account_id: ResourceId,
	/// Origin warehouse.
	pub origin_id: ResourceId,
}
impl ShippingConfig {
	/// Creates settings for the production API without credentials.
	pub fn new(
		account_id: impl Into<ResourceId>,
		origin_id: impl Into<ResourceId>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			base_url: config::parse_base_url(ZIPNOVA_API_BASE)?,
			api_token: None,
			api_secret: None,
			account_id: account_id.into(),
			origin_id: origin_id.into(),
		})
	}

	/// Reads the `ZIPNOVA_*` variables. Token and secret may be absent; quoting then fails.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_figment(Figment::new().merge(Env::prefixed(ZIPNOVA_ENV_PREFIX)))
	}

	/// Reads settings from a figment keyed like the unprefixed `ZIPNOVA_*` variables
	/// (`account_id`, `origin_id`, `api_token`, `api_secret`).
	pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
		let env: ShippingEnv = figment.extract().map_err(ConfigError::environment)?;
		let account_id = non_empty(env.account_id)
			.ok_or(ConfigError::MissingEnv { name: ZIPNOVA_ACCOUNT_ID_ENV })?;
		let origin_id = non_empty(env.origin_id)
			.ok_or(ConfigError::MissingEnv { name: ZIPNOVA_ORIGIN_ID_ENV })?;
		let mut settings = Self::new(account_id, origin_id)?;

		settings.api_token = non_empty(env.api_token).map(|token| token.to_string());
		settings.api_secret = non_empty(env.api_secret).map(|secret| secret.to_string());

		Ok(settings)
	}

	/// Sets the API credentials.
	pub fn with_credentials(mut self, token: impl Into<String>, secret: impl Into<String>) -> Self {
		self.api_token = Some(token.into());
		self.api_secret = Some(secret.into());

		self
	}

	/// Points the client at another API root.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = base_url;

		self
	}

	/// `Authorization` header value, when both credentials are set.
	pub fn basic_authorization(&self) -> Option<String> {
		let (token, secret) = (self.api_token.as_deref()?, self.api_secret.as_deref()?);

		Some(format!("Basic {}", STANDARD.encode(format!("{token}:{secret}"))))
	}
}
impl Debug for ShippingConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ShippingConfig")
			.field("base_url", &self.base_url.as_str())
			.field("credentials_set", &self.basic_authorization().is_some())
			.field("account_id", &self.account_id)
			.field("origin_id", &self.origin_id)
			.finish()
	}
}

/// Destination of a quote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShippingDestination {
	/// City.
	pub city: String,
	/// Province.
	pub state: String,
	/// Postal code.
	pub zipcode: String,
}
impl From<&Address> for ShippingDestination {
	fn from(address: &Address) -> Self {
		Self {
			city: address.city.clone(),
			state: address.state.clone(),
			zipcode: address.zip_code.clone(),
		}
	}
}

/// Body of `POST /shipments/quote`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteRequest {
	/// Carrier account.
	pub account_id: ResourceId,
	/// Origin warehouse.
	pub origin_id: ResourceId,
	/// Declared value of the parcel.
	pub declared_value: f64,
	/// Destination.
	pub destination: ShippingDestination,
	/// Parcel contents.
	pub items: Vec<QuoteItem>,
}

/// Parcel line of a [`QuoteRequest`]; dimensions are whole units rounded up.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteItem {
	/// Product identifier.
	pub id: String,
	/// Units.
	pub quantity: u32,
	/// Weight, at least [`MIN_ITEM_WEIGHT`].
	pub weight: u64,
	/// Length.
	pub length: u64,
	/// Height.
	pub height: u64,
	/// Width.
	pub width: u64,
	/// Unit price.
	pub value: f64,
}
impl From<&CartItem> for QuoteItem {
	fn from(item: &CartItem) -> Self {
		let size = item.product.size.unwrap_or_default();
		let weight = size.weight.filter(|weight| *weight != 0.0).map_or(MIN_ITEM_WEIGHT, ceil);

		Self {
			id: item.product_id.to_string(),
			quantity: item.quantity,
			weight: weight.max(MIN_ITEM_WEIGHT),
			length: size.length.map_or(0, ceil),
			height: size.height.map_or(0, ceil),
			width: size.width.map_or(0, ceil),
			value: item.product.price,
		}
	}
}

/// Quote client bound to a transport.
pub struct ShippingClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Transport used for carrier calls.
	pub http_client: Arc<C>,
	/// Account settings.
	pub config: ShippingConfig,
}
impl<C> ShippingClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client over an existing transport.
	pub fn with_http_client(config: ShippingConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), config }
	}

	/// Builds the quote body for `items` shipped to `destination`.
	pub fn quote_request(
		&self,
		items: &[CartItem],
		destination: ShippingDestination,
		declared_value: f64,
	) -> QuoteRequest {
		QuoteRequest {
			account_id: self.config.account_id.clone(),
			origin_id: self.config.origin_id.clone(),
			declared_value,
			destination,
			items: items.iter().map(QuoteItem::from).collect(),
		}
	}

	/// Requests a quote; the carrier's response is returned as raw JSON.
	pub async fn quote(
		&self,
		items: &[CartItem],
		destination: ShippingDestination,
		declared_value: f64,
	) -> ApiResult<Value> {
		let Some(authorization) = self.config.basic_authorization() else {
			return Err(NormalizedError::client(
				400,
				"Shipping API credentials are not configured.",
			));
		};
		let base = self.config.base_url.as_str().trim_end_matches('/');
		let url = Url::parse(&format!("{base}/shipments/quote")).map_err(|e| {
			NormalizedError::client(400, format!("Shipping API URL is invalid: {e}"))
		})?;
		let body = serde_json::to_value(self.quote_request(items, destination, declared_value))
			.map_err(|e| NormalizedError::client(400, format!("Quote could not be encoded: {e}")))?;
		let request = HttpRequest::new(Method::Post, url)
			.with_header("Accept", "application/json")
			.with_header("Authorization", authorization)
			.with_json(body);
		let response =
			self.http_client.send(request).await.map_err(|e| NormalizedError::transport(&e))?;
		let payload = if response.body.is_empty() {
			Ok(Value::Null)
		} else {
			serde_json::from_slice::<Value>(&response.body)
		};

		if !response.is_success() {
			let message = payload
				.as_ref()
				.ok()
				.and_then(|payload| payload.get("message"))
				.and_then(Value::as_str)
				.map(str::to_owned)
				.unwrap_or_else(|| {
					format!("Shipping quote failed with status {}.", response.status)
				});

			#[cfg(feature = "tracing")]
			tracing::warn!(
				status = response.status,
				message = %message,
				"Shipping quote rejected."
			);

			return Err(NormalizedError::server(response.status, message));
		}

		payload.map_err(|e| {
			NormalizedError::client(500, format!("Shipping quote response is not valid JSON: {e}"))
		})
	}
}
#[cfg(feature = "reqwest")]
impl ShippingClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport.
	pub fn new(config: ShippingConfig) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}
}
impl<C> Clone for ShippingClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), config: self.config.clone() }
	}
}
impl<C> Debug for ShippingClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ShippingClient").field("config", &self.config).finish()
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Quote client sharing this client's transport.
	pub fn shipping(&self, config: ShippingConfig) -> ShippingClient<C> {
		ShippingClient { http_client: self.http_client.clone(), config }
	}
}

fn ceil(value: f64) -> u64 {
	value.ceil().max(0.) as u64
}

fn non_empty(value: Option<ResourceId>) -> Option<ResourceId> {
	value.filter(|value| !matches!(value, ResourceId::Text(text) if text.is_empty()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn item(size: Value) -> CartItem {
		serde_json::from_value(serde_json::json!({
			"id": "i-1",
			"productId": 31,
			"quantity": 2,
			"subTotal": 900.0,
			"product": { "title": "Yerba", "price": 450.0, "size": size },
		}))
		.expect("Cart item fixture should decode.")
	}

	#[test]
	fn items_round_dimensions_up_and_floor_weight() {
		let light = QuoteItem::from(&item(serde_json::json!({
			"weight": 2.5, "length": 10.2, "height": 4.0, "width": 0.1,
		})));

		assert_eq!(light.id, "31");
		assert_eq!(light.weight, MIN_ITEM_WEIGHT);
		assert_eq!((light.length, light.height, light.width), (11, 4, 1));
		assert_eq!(light.value, 450.0);

		let heavy = QuoteItem::from(&item(serde_json::json!({ "weight": 1200.2 })));

		assert_eq!(heavy.weight, 1201);
		assert_eq!((heavy.length, heavy.height, heavy.width), (0, 0, 0));

		let unsized_item = QuoteItem::from(&item(Value::Null));

		assert_eq!(unsized_item.weight, MIN_ITEM_WEIGHT);
	}

	#[test]
	fn basic_authorization_needs_both_credentials() {
		let config = ShippingConfig::new(7_u64, "origin").expect("Default base URL should parse.");

		assert!(config.basic_authorization().is_none());

		let config = config.with_credentials("token", "secret");

		assert_eq!(config.basic_authorization().as_deref(), Some("Basic dG9rZW46c2VjcmV0"));
		assert!(!format!("{config:?}").contains("secret"));
	}

	#[test]
	fn from_env_reads_prefixed_variables() {
		figment::Jail::expect_with(|jail| {
			jail.set_env(ZIPNOVA_ACCOUNT_ID_ENV, "7");
			jail.set_env(ZIPNOVA_ORIGIN_ID_ENV, "warehouse-1");
			jail.set_env(ZIPNOVA_API_TOKEN_ENV, "12345");
			jail.set_env(ZIPNOVA_API_SECRET_ENV, "secret");

			let settings = ShippingConfig::from_env().expect("Complete settings should load.");

			assert_eq!(settings.account_id, ResourceId::Number(7));
			assert_eq!(settings.origin_id, ResourceId::from("warehouse-1"));
			assert_eq!(settings.api_token.as_deref(), Some("12345"));
			assert_eq!(settings.api_secret.as_deref(), Some("secret"));

			jail.set_env(ZIPNOVA_ORIGIN_ID_ENV, "");

			assert!(matches!(
				ShippingConfig::from_env(),
				Err(ConfigError::MissingEnv { name: ZIPNOVA_ORIGIN_ID_ENV })
			));

			Ok(())
		});
	}
}
