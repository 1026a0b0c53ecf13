//! Identifiers that the API emits as either JSON numbers or strings.

// std
use std::str::FromStr;
// self
use crate::_prelude::*;

/// Server-assigned identifier.
///
/// Some resources use numeric keys and others use UUID strings; both round-trip in the form the
/// server sent them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
	/// Numeric key.
	Number(u64),
	/// Opaque string key.
	Text(String),
}
impl ResourceId {
	/// Returns the numeric form, parsing string keys that hold digits.
	pub fn as_number(&self) -> Option<u64> {
		match self {
			ResourceId::Number(value) => Some(*value),
			ResourceId::Text(value) => value.parse().ok(),
		}
	}
}
impl Default for ResourceId {
	fn default() -> Self {
		Self::Text(String::new())
	}
}
impl From<u64> for ResourceId {
	fn from(value: u64) -> Self {
		Self::Number(value)
	}
}
impl From<&str> for ResourceId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for ResourceId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl FromStr for ResourceId {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::from(s))
	}
}
impl Debug for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ResourceId({self})")
	}
}
impl Display for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			ResourceId::Number(value) => write!(f, "{value}"),
			ResourceId::Text(value) => f.write_str(value),
		}
	}
}
