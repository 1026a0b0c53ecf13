//! Storefront domain types exchanged with the API.

pub mod address;
pub mod cart;
pub mod category;
pub mod id;
pub mod order;
pub mod pickup;
pub mod product;
pub mod seller;

pub use address::*;
pub use cart::*;
pub use category::*;
pub use id::*;
pub use order::*;
pub use pickup::*;
pub use product::*;
pub use seller::*;
