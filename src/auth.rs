//! Session credentials, users, and the payloads exchanged with the authentication endpoints.

pub mod credentials;
pub mod secret;
pub mod user;

pub use credentials::*;
pub use secret::*;
pub use user::*;
