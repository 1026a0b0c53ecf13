//! Authenticated user profile and role helpers.

// self
use crate::_prelude::*;

/// Role granted to store administrators.
pub const ROLE_ADMIN: &str = "ADMIN";
/// Role granted to producers who manage their own catalog.
pub const ROLE_PRODUCER: &str = "PRODUCTOR";

/// User profile returned alongside login credentials.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Server-side identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
	/// Granted roles.
	#[serde(default)]
	pub roles: Vec<String>,
}
impl User {
	/// Returns `true` when the user holds `role`.
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r == role)
	}

	/// Returns `true` for administrators.
	pub fn is_admin(&self) -> bool {
		self.has_role(ROLE_ADMIN)
	}

	/// Returns `true` for producers.
	pub fn is_producer(&self) -> bool {
		self.has_role(ROLE_PRODUCER)
	}

	/// Returns `true` when the user may open the admin console.
	pub fn can_access_console(&self) -> bool {
		self.is_admin() || self.is_producer()
	}
}
