//! Catalog products, their images, and shipping dimensions.

// self
use crate::{_prelude::*, model::ResourceId};

/// Catalog product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ResourceId>,
	/// Display title.
	pub title: String,
	/// Long description.
	#[serde(default)]
	pub description: String,
	/// Unit price in ARS.
	pub price: f64,
	/// Units available.
	#[serde(default)]
	pub stock: i64,
	/// Whether the product is listed.
	#[serde(default)]
	pub active: bool,
	/// Images in display order.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub images: Vec<ProductImage>,
	/// Categories to attach on creation.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub category_ids: Vec<u64>,
	/// Attached categories as returned by the server.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub product_categories: Vec<ProductCategory>,
	/// Package dimensions used for shipping quotes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<ProductSize>,
}
impl Product {
	/// URL of the first image, if any.
	pub fn first_image_url(&self) -> Option<&str> {
		self.images.first().map(|image| image.url.as_str())
	}

	/// Image flagged as main, falling back to the first one.
	pub fn main_image(&self) -> Option<&ProductImage> {
		self.images.iter().find(|image| image.main).or_else(|| self.images.first())
	}
}

/// Stored product image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
	/// Server identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ResourceId>,
	/// Public URL.
	pub url: String,
	/// Storage object key.
	pub key: String,
	/// Whether this is the product's cover image.
	#[serde(default)]
	pub main: bool,
	/// Display position.
	#[serde(default)]
	pub order: u32,
}

/// Package dimensions; centimeters and grams as the shipping carrier expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSize {
	/// Weight.
	#[serde(default)]
	pub weight: Option<f64>,
	/// Length.
	#[serde(default)]
	pub length: Option<f64>,
	/// Height.
	#[serde(default)]
	pub height: Option<f64>,
	/// Width.
	#[serde(default)]
	pub width: Option<f64>,
}

/// Join row between a product and a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
	/// Join row identifier.
	pub id: u64,
	/// Product side.
	pub product_id: u64,
	/// Category side.
	pub category_id: u64,
	/// Category with up to two ancestors.
	pub category: CategoryNode,
}

/// Category embedded in a product, with its ancestors inlined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
	/// Category identifier.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Slug.
	pub id_name: String,
	/// Depth in the taxonomy.
	pub level: u8,
	/// Parent identifier.
	#[serde(default)]
	pub parent_id: Option<u64>,
	/// Parent, when the server inlined it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent: Option<Box<CategoryNode>>,
}
impl CategoryNode {
	/// Names from the root category down to this one.
	pub fn lineage(&self) -> Vec<&str> {
		let mut names = Vec::new();
		let mut node = Some(self);

		while let Some(current) = node {
			names.push(current.name.as_str());
			node = current.parent.as_deref();
		}

		names.reverse();

		names
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lineage_walks_inlined_parents() {
		let product: Product = serde_json::from_value(serde_json::json!({
			"id": "p-1",
			"title": "Almendras",
			"price": 1500.0,
			"images": [
				{ "url": "https://cdn.test/a.jpg", "key": "a", "main": false, "order": 0 },
				{ "url": "https://cdn.test/b.jpg", "key": "b", "main": true, "order": 1 },
			],
			"productCategories": [{
				"id": 1,
				"productId": 9,
				"categoryId": 3,
				"category": {
					"id": 3, "name": "Almendras", "idName": "almendras", "level": 3, "parentId": 2,
					"parent": {
						"id": 2, "name": "Frutos secos", "idName": "frutos-secos", "level": 2,
						"parentId": 1,
						"parent": {
							"id": 1, "name": "Almacén", "idName": "almacen", "level": 1,
							"parentId": null,
						},
					},
				},
			}],
		}))
		.expect("Product fixture should decode.");

		assert_eq!(
			product.product_categories[0].category.lineage(),
			vec!["Almacén", "Frutos secos", "Almendras"]
		);
		assert_eq!(product.first_image_url(), Some("https://cdn.test/a.jpg"));
		assert_eq!(product.main_image().map(|image| image.key.as_str()), Some("b"));
	}
}
