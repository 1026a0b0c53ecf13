//! Collaborator contracts the request client calls out to (rate-limit notification and
//! navigation), with small ready-made implementations.

pub mod navigator;
pub mod rate_limit;

pub use navigator::*;
pub use rate_limit::*;
