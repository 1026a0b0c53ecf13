//! Turning the session cart into an order.

// self
use crate::{
	_prelude::*,
	api::{ApiResult, NormalizedError},
	model::{Cart, DeliveryType, Order, OrderItem},
};

/// Buyer contact details collected at checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuyerDetails {
	/// Contact email.
	pub email: String,
	/// Full name.
	pub name: String,
	/// Phone number.
	pub phone: Option<String>,
	/// Notes for the seller.
	pub notes: Option<String>,
}
impl BuyerDetails {
	/// Creates details with the required fields.
	pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
		Self { email: email.into(), name: name.into(), phone: None, notes: None }
	}

	/// Sets the phone number.
	pub fn phone(mut self, phone: impl Into<String>) -> Self {
		self.phone = Some(phone.into());

		self
	}

	/// Sets notes for the seller.
	pub fn notes(mut self, notes: impl Into<String>) -> Self {
		self.notes = Some(notes.into());

		self
	}
}

/// Builds the order submitted for `cart`.
///
/// Prices are copied from the cart's product snapshots. The address, its identifier, and the
/// delivery price are carried over only when the cart has them.
pub fn cart_to_order(cart: &Cart, buyer: &BuyerDetails) -> ApiResult<Order> {
	if cart.is_empty() {
		return Err(NormalizedError::client(400, "The cart is empty."));
	}

	let items = cart
		.items
		.iter()
		.map(|item| OrderItem {
			product_id: item.product_id,
			title: item.product.title.clone(),
			unit_price: item.product.price,
			sub_total: item.sub_total,
			quantity: item.quantity,
			image_url: item.product.first_image_url().map(str::to_owned),
			..Default::default()
		})
		.collect();

	Ok(Order {
		address_id: cart.address_id.clone(),
		address: cart.address.clone(),
		email: buyer.email.clone(),
		name: buyer.name.clone(),
		phone: buyer.phone.clone(),
		total: cart.total.unwrap_or_default(),
		delivery_type: cart.delivery_type,
		delivery_price: cart.delivery_price,
		notes: buyer.notes.clone(),
		items,
		..Default::default()
	})
}

/// Condensed cart shown on the checkout page.
#[derive(Clone, Debug, PartialEq)]
pub struct CartSummary {
	/// One entry per cart line.
	pub items: Vec<SummaryItem>,
	/// Items total.
	pub sub_total: f64,
	/// Chosen delivery method.
	pub delivery_type: DeliveryType,
}
impl CartSummary {
	/// Summarizes `cart`; `None` when it has no items.
	pub fn from_cart(cart: &Cart) -> Option<Self> {
		if cart.is_empty() {
			return None;
		}

		let items = cart
			.items
			.iter()
			.map(|item| SummaryItem {
				product_id: item.product_id,
				name: item.product.title.clone(),
				price: item.product.price,
				quantity: item.quantity,
				image: item.product.first_image_url().map(str::to_owned),
			})
			.collect();

		Some(Self {
			items,
			sub_total: cart.total.unwrap_or_default(),
			delivery_type: cart.delivery_type,
		})
	}
}

/// Line of a [`CartSummary`].
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryItem {
	/// Product identifier.
	pub product_id: u64,
	/// Product title.
	pub name: String,
	/// Unit price.
	pub price: f64,
	/// Units.
	pub quantity: u32,
	/// First product image.
	pub image: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::api::ErrorKind;

	fn cart(value: Value) -> Cart {
		serde_json::from_value(value).expect("Cart fixture should decode.")
	}

	#[test]
	fn empty_cart_is_rejected() {
		let empty = cart(serde_json::json!({ "id": "c-1", "items": [] }));
		let err = cart_to_order(&empty, &BuyerDetails::default())
			.expect_err("Empty carts should not become orders.");

		assert_eq!(err.kind(), ErrorKind::Validation);
		assert!(CartSummary::from_cart(&empty).is_none());
	}

	#[test]
	fn optional_cart_fields_carry_over_only_when_present() {
		let pickup = cart(serde_json::json!({
			"id": "c-1",
			"deliveryType": "PICKUP",
			"total": 300.0,
			"items": [{
				"id": "i-1", "productId": 4, "quantity": 3, "subTotal": 300.0,
				"product": {
					"title": "Miel", "price": 100.0,
					"images": [
						{ "url": "https://cdn.test/miel-1.jpg", "key": "m1" },
						{ "url": "https://cdn.test/miel-2.jpg", "key": "m2", "main": true },
					],
				},
			}],
		}));
		let buyer = BuyerDetails::new("ana@example.com", "Ana").notes("Timbre 2B");
		let order = cart_to_order(&pickup, &buyer).expect("Pickup cart should convert.");
		let wire = serde_json::to_value(&order).expect("Order should encode.");

		assert_eq!(order.items[0].image_url.as_deref(), Some("https://cdn.test/miel-1.jpg"));
		assert_eq!(order.items[0].unit_price, 100.0);
		assert_eq!(order.total, 300.0);
		assert!(wire.get("addressId").is_none());
		assert!(wire.get("address").is_none());
		assert!(wire.get("deliveryPrice").is_none());
		assert_eq!(wire["notes"], "Timbre 2B");

		let shipping = cart(serde_json::json!({
			"id": "c-2",
			"deliveryType": "SHIPPING",
			"addressId": "addr-9",
			"deliveryPrice": 0.0,
			"items": [{
				"id": "i-1", "productId": 4, "quantity": 1, "subTotal": 100.0,
				"product": { "title": "Miel", "price": 100.0 },
			}],
		}));
		let order = cart_to_order(&shipping, &buyer).expect("Shipping cart should convert.");
		let wire = serde_json::to_value(&order).expect("Order should encode.");

		assert_eq!(wire["addressId"], "addr-9");
		assert_eq!(wire["deliveryPrice"], 0.0);
		assert_eq!(order.total, 0.0);
		assert!(order.items[0].image_url.is_none());
	}

	#[test]
	fn summary_lists_each_line() {
		let summary = CartSummary::from_cart(&cart(serde_json::json!({
			"id": "c-1",
			"total": 50.0,
			"items": [{
				"id": "i-1", "productId": 8, "quantity": 2, "subTotal": 50.0,
				"product": { "title": "Té", "price": 25.0 },
			}],
		})))
		.expect("Non-empty cart should summarize.");

		assert_eq!(summary.items.len(), 1);
		assert_eq!(summary.items[0].name, "Té");
		assert_eq!(summary.sub_total, 50.0);
		assert_eq!(summary.delivery_type, DeliveryType::Shipping);
	}
}
