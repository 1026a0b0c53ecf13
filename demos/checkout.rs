//! Walks a shopper through checkout against a mocked storefront: the expired access token is
//! refreshed transparently, the cart becomes an order, and totals are printed in pesos.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use storefront_client::{
	api::ReqwestApiClient,
	auth::Credentials,
	checkout::{BuyerDetails, CartSummary, cart_to_order},
	config::ClientConfig,
	currency::{CurrencyFormat, format_currency},
	ext::LoginRateLimiter,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/carts/anonymous").header("authorization", "Bearer expired");
			then.status(401).json_body(json!({
				"success": false,
				"statusCode": 401,
				"message": "Token expired",
				"timestamp": "2024-01-01T00:00:00Z",
				"path": "/carts/anonymous",
			}));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).json_body(json!({
				"success": true,
				"data": { "accessToken": "fresh", "refreshToken": "rotated", "expiresIn": 900 },
			}));
		})
		.await;
	let cart = server
		.mock_async(|when, then| {
			when.method(GET).path("/carts/anonymous").header("authorization", "Bearer fresh");
			then.status(200).json_body(json!({
				"success": true,
				"data": {
					"id": 12,
					"items": [{
						"id": 1,
						"productId": 31,
						"quantity": 3,
						"subTotal": 13500.0,
						"product": { "title": "Yerba orgánica 1kg", "price": 4500.0 },
					}],
					"deliveryType": "PICKUP",
					"total": 13500.0,
				},
			}));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/orders").header("authorization", "Bearer fresh");
			then.status(201).json_body(json!({
				"success": true,
				"data": {
					"id": 501,
					"email": "ana@example.com",
					"name": "Ana",
					"total": 13500.0,
					"status": "PENDING_PAYMENT",
					"deliveryType": "PICKUP",
				},
			}));
		})
		.await;

	let store = Arc::new(MemoryStore::default());

	store.replace_tokens(Credentials::with_access_token("expired").refresh_token("r1")).await?;

	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let client = <ReqwestApiClient>::new(config, store.clone())?
		.with_rate_limit_notifier(Arc::new(LoginRateLimiter::default()));
	let current = client.anonymous_cart().await?;

	if let Some(summary) = CartSummary::from_cart(&current) {
		for item in &summary.items {
			println!(
				"{} x{} = {}.",
				item.name,
				item.quantity,
				format_currency(item.price * f64::from(item.quantity), CurrencyFormat::default())
			);
		}
	}

	let draft = cart_to_order(&current, &BuyerDetails::new("ana@example.com", "Ana"))?;
	let placed = client.create_order(&draft).await?;

	println!(
		"Order {} is {} for {}.",
		placed.order.id.unwrap_or_default(),
		placed.order.status.map_or("new", |status| status.friendly_label()),
		format_currency(placed.order.total, CurrencyFormat::default())
	);
	println!("Refreshes performed: {}.", client.refresh_coordinator().metrics().successes());

	expired.assert_async().await;
	refresh.assert_async().await;
	cart.assert_calls_async(2).await;

	println!("Session authenticated: {}.", store.snapshot().is_authenticated());

	Ok(())
}
