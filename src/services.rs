//! Typed storefront operations layered on [`ApiClient`](crate::api::ApiClient).
//!
//! Each file extends the client with the endpoints of one resource. Every operation returns an
//! [`ApiResult`](crate::api::ApiResult), so the refresh-and-retry protocol and error
//! normalization apply uniformly.

pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod pickup_points;
pub mod products;
pub mod users;

pub use cart::*;
pub use orders::*;
pub use products::*;

// self
use crate::{api::NormalizedError, store::StoreError};

pub(crate) fn store_failure(error: StoreError) -> NormalizedError {
	NormalizedError::client(500, format!("Credential store failed: {error}"))
}
