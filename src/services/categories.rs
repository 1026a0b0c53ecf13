//! Category administration and lookup.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, RequestOptions},
	http::HttpTransport,
	model::{Category, CategoryFilter},
};

#[derive(Serialize)]
struct CategoryRename<'a> {
	name: &'a str,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists every category.
	pub async fn categories(&self) -> ApiResult<Vec<Category>> {
		self.get("/categories", RequestOptions::new()).await
	}

	/// Lists categories matching `filter`.
	pub async fn filter_categories(&self, filter: &CategoryFilter) -> ApiResult<Vec<Category>> {
		self.get(&format!("/categories/filter?{}", filter.query_string()), RequestOptions::new())
			.await
	}

	/// Creates a category.
	pub async fn create_category(&self, category: &Category) -> ApiResult<Category> {
		self.post("/categories", category, RequestOptions::new()).await
	}

	/// Renames a category.
	pub async fn rename_category(&self, id: u64, name: &str) -> ApiResult<Category> {
		self.patch(&format!("/categories/{id}"), &CategoryRename { name }, RequestOptions::new())
			.await
	}

	/// Deletes a category.
	pub async fn delete_category(&self, id: u64) -> ApiResult<Value> {
		self.delete(&format!("/categories/{id}"), RequestOptions::new()).await
	}
}
