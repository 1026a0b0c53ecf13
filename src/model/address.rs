//! Shipping addresses attached to carts and orders.

// self
use crate::{_prelude::*, model::ResourceId};

/// Customer shipping address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ResourceId>,
	/// Street name.
	pub street: String,
	/// Street number.
	pub number: String,
	/// City.
	pub city: String,
	/// Province or state.
	pub state: String,
	/// Postal code.
	pub zip_code: String,
	/// Country.
	#[serde(default)]
	pub country: String,
	/// Owning user, for registered customers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
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
