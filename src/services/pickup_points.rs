//! Seller pickup point administration.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, RequestOptions},
	http::HttpTransport,
	model::{NewPickupAddress, PickupAddress, PickupAddressPatch},
};

const PICKUP_ENDPOINT: &str = "/pickup-addresses";

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the seller's pickup points.
	pub async fn pickup_points(&self) -> ApiResult<Vec<PickupAddress>> {
		self.get(PICKUP_ENDPOINT, RequestOptions::new()).await
	}

	/// Fetches one pickup point.
	pub async fn pickup_point(&self, id: u64) -> ApiResult<PickupAddress> {
		self.get(&format!("{PICKUP_ENDPOINT}/{id}"), RequestOptions::new()).await
	}

	/// Creates a pickup point.
	pub async fn create_pickup_point(&self, point: &NewPickupAddress) -> ApiResult<PickupAddress> {
		self.post(PICKUP_ENDPOINT, point, RequestOptions::new()).await
	}

	/// Updates the provided fields of a pickup point.
	pub async fn update_pickup_point(
		&self,
		id: u64,
		patch: &PickupAddressPatch,
	) -> ApiResult<PickupAddress> {
		self.patch(&format!("{PICKUP_ENDPOINT}/{id}"), patch, RequestOptions::new()).await
	}

	/// Deletes a pickup point.
	pub async fn delete_pickup_point(&self, id: u64) -> ApiResult<Value> {
		self.delete(&format!("{PICKUP_ENDPOINT}/{id}"), RequestOptions::new()).await
	}
}
