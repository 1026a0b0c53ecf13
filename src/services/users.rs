//! Settings of the logged-in seller.

// self
use crate::{
	api::{ApiClient, ApiResult, RequestOptions},
	http::HttpTransport,
	model::{SellerSettings, SellerSettingsPatch},
};

const SELLER_SETTINGS_ENDPOINT: &str = "/users/me/seller-settings";

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Reads the seller's delivery settings.
	pub async fn seller_settings(&self) -> ApiResult<SellerSettings> {
		self.get(SELLER_SETTINGS_ENDPOINT, RequestOptions::new()).await
	}

	/// Updates the provided delivery settings.
	pub async fn update_seller_settings(
		&self,
		patch: &SellerSettingsPatch,
	) -> ApiResult<SellerSettings> {
		self.patch(SELLER_SETTINGS_ENDPOINT, patch, RequestOptions::new()).await
	}
}
