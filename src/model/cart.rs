//! Anonymous shopping cart held in the server session.

// self
use crate::{
	_prelude::*,
	model::{Address, Product, ResourceId},
};

/// How an order reaches the buyer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
	/// Home delivery.
	#[default]
	Shipping,
	/// Pickup at a seller pickup point.
	Pickup,
}

/// Shopping cart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
	/// Server identifier.
	pub id: ResourceId,
	/// Session owning an anonymous cart.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	/// Owner, for registered customers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Line items.
	#[serde(default)]
	pub items: Vec<CartItem>,
	/// Shipping address, once chosen.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<Address>,
	/// Identifier of the shipping address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address_id: Option<ResourceId>,
	/// Chosen delivery method.
	#[serde(default)]
	pub delivery_type: DeliveryType,
	/// Items total computed by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<f64>,
	/// Shipping cost, present for home delivery once quoted.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_price: Option<f64>,
}
impl Cart {
	/// Returns `true` when the cart has no line items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Total units across line items.
	pub fn item_count(&self) -> u64 {
		self.items.iter().map(|item| u64::from(item.quantity)).sum()
	}
}

/// Cart line item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
	/// Server identifier.
	pub id: ResourceId,
	/// Owning cart.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cart_id: Option<ResourceId>,
	/// Product identifier.
	pub product_id: u64,
	/// Product snapshot.
	pub product: Product,
	/// Units.
	pub quantity: u32,
	/// Line total.
	pub sub_total: f64,
}

/// Body of `POST /carts/anonymous/items`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
	/// Product to add.
	pub product_id: u64,
	/// Units to add.
	pub quantity: u32,
}
