#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use storefront_client::{
	_preludet::*,
	api::ErrorOrigin,
	model::{Address, CartItem},
	shipping::{ShippingConfig, ShippingDestination},
};

fn items() -> Vec<CartItem> {
	serde_json::from_value(json!([{
		"id": 1,
		"productId": 31,
		"quantity": 2,
		"subTotal": 900.0,
		"product": {
			"title": "Yerba",
			"price": 450.0,
			"size": { "weight": 1000.4, "length": 20.0, "height": 8.5, "width": 10.0 },
		},
	}]))
	.expect("Cart item fixture should decode.")
}

fn destination() -> ShippingDestination {
	let address: Address = serde_json::from_value(json!({
		"street": "Mitre",
		"number": "100",
		"city": "Rosario",
		"state": "Santa Fe",
		"zipCode": "2000",
	}))
	.expect("Address fixture should decode.");

	ShippingDestination::from(&address)
}

fn settings(server: &MockServer) -> ShippingConfig {
	ShippingConfig::new(7_u64, "warehouse-1")
		.expect("Default base URL should parse.")
		.with_base_url(Url::parse(&server.url("/v2")).expect("Mock URL should parse."))
}

#[tokio::test]
async fn quote_posts_basic_auth_and_rounded_items() {
	let server = MockServer::start_async().await;
	let quote = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v2/shipments/quote")
				.header("authorization", "Basic dG9rZW46c2VjcmV0")
				.header("content-type", "application/json")
				.json_body(json!({
					"account_id": 7,
					"origin_id": "warehouse-1",
					"declared_value": 900.0,
					"destination": { "city": "Rosario", "state": "Santa Fe", "zipcode": "2000" },
					"items": [{
						"id": "31",
						"quantity": 2,
						"weight": 1001,
						"length": 20,
						"height": 9,
						"width": 10,
						"value": 450.0,
					}],
				}));
			then.status(200)
				.json_body(json!({ "all_results": [{ "amounts": { "price": 3200 } }] }));
		})
		.await;
	let (client, _harness) = build_reqwest_test_client(&server.base_url());
	let shipping = client.shipping(settings(&server).with_credentials("token", "secret"));
	let response = shipping
		.quote(&items(), destination(), 900.0)
		.await
		.expect("Quote should succeed.");

	assert_eq!(response["all_results"][0]["amounts"]["price"], 3200);

	quote.assert_calls_async(1).await;
}

#[tokio::test]
async fn quote_without_credentials_makes_no_call() {
	let server = MockServer::start_async().await;
	let quote = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/shipments/quote");
			then.status(200).json_body(json!({}));
		})
		.await;
	let (client, _harness) = build_reqwest_test_client(&server.base_url());
	let err = client
		.shipping(settings(&server))
		.quote(&items(), destination(), 900.0)
		.await
		.expect_err("Missing credentials should fail locally.");

	assert_eq!(err.status_code, 400);

	quote.assert_calls_async(0).await;
}

#[tokio::test]
async fn carrier_rejection_uses_reported_message() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/shipments/quote");
			then.status(422).json_body(json!({ "message": "Invalid zipcode" }));
		})
		.await;

	let (client, _harness) = build_reqwest_test_client(&server.base_url());
	let err = client
		.shipping(settings(&server).with_credentials("token", "secret"))
		.quote(&items(), destination(), 900.0)
		.await
		.expect_err("Carrier rejection should surface.");

	assert_eq!(err.status_code, 422);
	assert_eq!(err.message, "Invalid zipcode");
}

#[tokio::test]
async fn maintenance_page_with_success_status_is_an_error() {
	let server = MockServer::start_async().await;
	let quote = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/shipments/quote");
			then.status(200)
				.header("content-type", "text/html")
				.body("<html>maintenance</html>");
		})
		.await;
	let (client, _harness) = build_reqwest_test_client(&server.base_url());
	let err = client
		.shipping(settings(&server).with_credentials("token", "secret"))
		.quote(&items(), destination(), 900.0)
		.await
		.expect_err("A non-JSON success body should not pass as a quote.");

	assert_eq!(err.status_code, 500);
	assert_eq!(err.origin, ErrorOrigin::Client);
	assert!(err.message.contains("not valid JSON"));

	quote.assert_calls_async(1).await;
}
