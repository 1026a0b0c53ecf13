//! Orders placed from a cart.

// self
use crate::{
	_prelude::*,
	model::{Address, DeliveryType, ResourceId},
};

/// Order lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Awaiting payment.
	PendingPayment,
	/// Paid, awaiting processing.
	Pending,
	/// Being prepared.
	Processing,
	/// Prepared for pickup.
	ReadyForPickup,
	/// Handed to the carrier.
	Shipped,
	/// Received by the buyer.
	Delivered,
	/// Cancelled.
	Cancelled,
}
impl OrderStatus {
	/// Label shown to shoppers and sellers.
	pub const fn friendly_label(self) -> &'static str {
		match self {
			OrderStatus::PendingPayment => "Pendiente de pago",
			OrderStatus::Pending => "Pendiente",
			OrderStatus::Processing => "En proceso",
			OrderStatus::ReadyForPickup => "Listo para retirar",
			OrderStatus::Shipped => "Enviado",
			OrderStatus::Delivered => "Entregado",
			OrderStatus::Cancelled => "Cancelado",
		}
	}
}
impl Display for OrderStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.friendly_label())
	}
}

/// Order, both as submitted and as returned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ResourceId>,
	/// Buyer account, for registered customers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Shipping address identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address_id: Option<ResourceId>,
	/// Shipping address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<Address>,
	/// Buyer email.
	pub email: String,
	/// Buyer name.
	pub name: String,
	/// Buyer phone.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Items total.
	pub total: f64,
	/// Lifecycle state; assigned by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<OrderStatus>,
	/// Delivery method.
	#[serde(default)]
	pub delivery_type: DeliveryType,
	/// Shipping cost, for home delivery.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_price: Option<f64>,
	/// Anonymous session that placed the order.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	/// Buyer notes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Line items.
	#[serde(default)]
	pub items: Vec<OrderItem>,
	/// Creation instant.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub updated_at: Option<OffsetDateTime>,
}

/// Order line item; prices are frozen at checkout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ResourceId>,
	/// Owning order.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_id: Option<ResourceId>,
	/// Product identifier.
	pub product_id: u64,
	/// Product title at checkout.
	pub title: String,
	/// Unit price at checkout.
	pub unit_price: f64,
	/// Line total.
	pub sub_total: f64,
	/// Units.
	pub quantity: u32,
	/// Cover image URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_uses_wire_names_and_spanish_labels() {
		let status: OrderStatus =
			serde_json::from_str(r#""READY_FOR_PICKUP""#).expect("Status should decode.");

		assert_eq!(status, OrderStatus::ReadyForPickup);
		assert_eq!(status.friendly_label(), "Listo para retirar");
		assert_eq!(OrderStatus::PendingPayment.to_string(), "Pendiente de pago");
	}

	#[test]
	fn timestamps_parse_as_rfc3339() {
		let order: Order = serde_json::from_value(serde_json::json!({
			"id": 12,
			"email": "ana@example.com",
			"name": "Ana",
			"total": 10.5,
			"status": "SHIPPED",
			"deliveryType": "SHIPPING",
			"items": [],
			"createdAt": "2024-03-01T12:00:00.000Z",
		}))
		.expect("Order fixture should decode.");

		assert_eq!(order.created_at.map(|at| at.unix_timestamp()), Some(1_709_294_400));
		assert_eq!(order.status, Some(OrderStatus::Shipped));
	}
}
