//! Seller pickup points.

// self
use crate::_prelude::*;

/// Pickup point owned by a seller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupAddress {
	/// Server identifier.
	pub id: u64,
	/// Display name.
	pub name: String,
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
	/// Free-form directions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub additional_info: Option<String>,
	/// Whether buyers may choose it.
	#[serde(default)]
	pub is_active: bool,
	/// Owning seller.
	#[serde(default)]
	pub user_id: String,
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

/// Body of `POST /pickup-addresses`; the server assigns the owner and country.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPickupAddress {
	/// Display name.
	pub name: String,
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
	/// Free-form directions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub additional_info: Option<String>,
	/// Whether buyers may choose it.
	pub is_active: bool,
}

/// Partial update of a [`PickupAddress`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupAddressPatch {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New street name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub street: Option<String>,
	/// New street number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub number: Option<String>,
	/// New city.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	/// New province or state.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// New postal code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zip_code: Option<String>,
	/// New directions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub additional_info: Option<String>,
	/// New active flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
}
