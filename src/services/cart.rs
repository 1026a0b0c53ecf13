//! Anonymous cart operations.
//!
//! The cart lives in a server session tracked by cookie, so every call here sends cookies.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, RequestOptions},
	http::HttpTransport,
	model::{AddItemRequest, Cart, CartItem, ResourceId},
};

/// Anonymous cart endpoint.
pub const ANONYMOUS_CART_ENDPOINT: &str = "/carts/anonymous";

#[derive(Serialize)]
struct QuantityUpdate {
	quantity: u32,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the session's cart, creating it server-side when missing.
	pub async fn anonymous_cart(&self) -> ApiResult<Cart> {
		self.get(ANONYMOUS_CART_ENDPOINT, cart_options()).await
	}

	/// Adds units of a product to the cart.
	pub async fn add_cart_item(&self, product_id: u64, quantity: u32) -> ApiResult<CartItem> {
		self.post(
			&format!("{ANONYMOUS_CART_ENDPOINT}/items"),
			&AddItemRequest { product_id, quantity },
			cart_options(),
		)
		.await
	}

	/// Sets the quantity of a cart line.
	pub async fn update_cart_item_quantity(
		&self,
		item_id: &ResourceId,
		quantity: u32,
	) -> ApiResult<CartItem> {
		self.patch(
			&format!("{ANONYMOUS_CART_ENDPOINT}/items/{item_id}"),
			&QuantityUpdate { quantity },
			cart_options(),
		)
		.await
	}

	/// Removes a cart line.
	pub async fn remove_cart_item(&self, item_id: &ResourceId) -> ApiResult<Value> {
		self.delete(&format!("{ANONYMOUS_CART_ENDPOINT}/items/{item_id}"), cart_options()).await
	}

	/// Total units in the cart; any failure counts as an empty cart.
	pub async fn cart_item_count(&self) -> u64 {
		match self.anonymous_cart().await {
			Ok(cart) => cart.item_count(),
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(error = %_e, "Cart unavailable; reporting zero items.");

				0
			},
		}
	}
}

fn cart_options() -> RequestOptions {
	RequestOptions::new().include_credentials()
}
