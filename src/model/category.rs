//! Three-level product taxonomy.

// crates.io
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Catalog category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<u64>,
	/// Depth in the taxonomy (1 to 3).
	pub level: u8,
	/// Display name.
	pub name: String,
	/// URL-safe slug.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_name: Option<String>,
	/// Parent category; `None` for top-level entries.
	#[serde(default)]
	pub parent_id: Option<u64>,
}
impl Category {
	/// Creates an unsaved category.
	pub fn new(level: u8, name: impl Into<String>, parent_id: Option<u64>) -> Self {
		Self { id: None, level, name: name.into(), id_name: None, parent_id }
	}
}

/// Criteria for `GET /categories/filter`; unset criteria are omitted from the query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryFilter {
	/// Taxonomy depth.
	pub level: Option<u8>,
	/// Display name.
	pub name: Option<String>,
	/// Slug.
	pub id_name: Option<String>,
}
impl CategoryFilter {
	/// Restricts to a depth.
	pub fn level(mut self, level: u8) -> Self {
		self.level = Some(level);

		self
	}

	/// Restricts to a display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Restricts to a slug.
	pub fn id_name(mut self, id_name: impl Into<String>) -> Self {
		self.id_name = Some(id_name.into());

		self
	}

	/// Encodes the criteria as a URL query (without the leading `?`).
	///
	/// A level of zero and empty strings count as unset.
	pub fn query_string(&self) -> String {
		let mut query = form_urlencoded::Serializer::new(String::new());

		if let Some(level) = self.level.filter(|level| *level > 0) {
			query.append_pair("level", &level.to_string());
		}
		if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
			query.append_pair("name", name);
		}
		if let Some(id_name) = self.id_name.as_deref().filter(|id_name| !id_name.is_empty()) {
			query.append_pair("idName", id_name);
		}

		query.finish()
	}
}
