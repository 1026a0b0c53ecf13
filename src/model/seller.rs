//! Delivery preferences of a seller account.

// self
use crate::{_prelude::*, model::ResourceId};

/// Delivery methods a seller offers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSettings {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ResourceId>,
	/// Ships to the buyer's address.
	#[serde(default)]
	pub accepts_home_delivery: bool,
	/// Offers pickup at one of the seller's pickup points.
	#[serde(default)]
	pub accepts_pickup: bool,
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

/// Partial update of [`SellerSettings`]; unset fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSettingsPatch {
	/// New home delivery flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub accepts_home_delivery: Option<bool>,
	/// New pickup flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub accepts_pickup: Option<bool>,
}
