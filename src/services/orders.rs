//! Order placement.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, RequestOptions},
	http::HttpTransport,
	model::{Cart, Order},
};

/// Result of [`ApiClient::create_order`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedOrder {
	/// Order as stored by the server.
	pub order: Order,
	/// Session cart re-read after placement (normally empty); `None` if the read failed.
	pub cart: Option<Cart>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Places an order from the session cart, then re-reads the cart.
	pub async fn create_order(&self, order: &Order) -> ApiResult<PlacedOrder> {
		let order: Order =
			self.post("/orders", order, RequestOptions::new().include_credentials()).await?;
		let cart = self.anonymous_cart().await.ok();

		Ok(PlacedOrder { order, cart })
	}
}
