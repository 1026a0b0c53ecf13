//! Product creation and image management.
//!
//! Images never pass through the API server: the client asks for a presigned storage URL,
//! uploads the bytes straight to storage, then registers the stored object with the product.
//! Deletion mirrors that sequence. Storage calls bypass the authenticated request path, so they
//! carry no bearer token and never trigger a refresh.

// self
use crate::{
	_prelude::*,
	api::{ApiClient, ApiResult, NormalizedError, RequestOptions},
	http::{HttpRequest, HttpTransport, Method, RequestBody},
	model::{Product, ProductImage, ResourceId},
};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Accepted image media types.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Image file queued for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
	/// Original file name; its extension names the stored object.
	pub file_name: String,
	/// Media type.
	pub content_type: String,
	/// File contents.
	pub data: Vec<u8>,
	/// Marks the image as the product cover.
	pub main: bool,
	/// Display position; batch uploads default it to the image's index.
	pub order: Option<u32>,
}
impl ImageUpload {
	/// Creates an upload with no cover flag and no explicit position.
	pub fn new(
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		data: impl Into<Vec<u8>>,
	) -> Self {
		Self {
			file_name: file_name.into(),
			content_type: content_type.into(),
			data: data.into(),
			main: false,
			order: None,
		}
	}

	/// Marks the image as the product cover.
	pub fn main(mut self) -> Self {
		self.main = true;

		self
	}

	/// Sets the display position.
	pub fn order(mut self, order: u32) -> Self {
		self.order = Some(order);

		self
	}

	/// Extension after the last `.` of the file name, `jpg` when there is none.
	pub fn file_extension(&self) -> &str {
		match self.file_name.rsplit_once('.') {
			Some((_, extension)) if !extension.is_empty() => extension,
			_ => "jpg",
		}
	}

	/// Rejects files over [`MAX_IMAGE_BYTES`] or outside [`ACCEPTED_IMAGE_TYPES`].
	pub fn validate(&self) -> ApiResult<()> {
		if self.data.len() > MAX_IMAGE_BYTES {
			return Err(NormalizedError::client(400, "Images must not exceed 5 MB."));
		}
		if !ACCEPTED_IMAGE_TYPES.contains(&self.content_type.as_str()) {
			return Err(NormalizedError::client(
				400,
				format!("Unsupported image type `{}`; use JPEG, PNG or WebP.", self.content_type),
			));
		}

		Ok(())
	}
}
impl Debug for ImageUpload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ImageUpload")
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("bytes", &self.data.len())
			.field("main", &self.main)
			.field("order", &self.order)
			.finish()
	}
}

/// Storage slot issued for one upload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
	/// URL accepting a `PUT` of the raw bytes.
	pub presigned_url: String,
	/// URL the stored image is served from.
	pub public_url: String,
	/// Storage object key.
	pub key: String,
}

/// Storage URL accepting a `DELETE` of an image object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDeleteUrl {
	/// Presigned delete URL.
	#[serde(alias = "presignedUrl")]
	pub delete_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignedUrlRequest<'a> {
	content_type: &'a str,
	file_extension: &'a str,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a product.
	pub async fn create_product(&self, product: &Product) -> ApiResult<Product> {
		self.post("/products", product, RequestOptions::new()).await
	}

	/// Requests a storage slot for an image of `content_type`.
	pub async fn presigned_image_url(
		&self,
		content_type: &str,
		file_extension: &str,
	) -> ApiResult<PresignedUpload> {
		self.post(
			"/products/images/presigned-url",
			&PresignedUrlRequest { content_type, file_extension },
			RequestOptions::new(),
		)
		.await
	}

	/// Attaches a stored image to a product.
	pub async fn register_product_image(
		&self,
		product_id: &ResourceId,
		image: &ProductImage,
	) -> ApiResult<ProductImage> {
		self.post(&format!("/products/{product_id}/images"), image, RequestOptions::new()).await
	}

	/// Validates, uploads, and registers one image.
	pub async fn upload_product_image(
		&self,
		product_id: &ResourceId,
		upload: &ImageUpload,
	) -> ApiResult<ProductImage> {
		upload.validate()?;

		let slot = self.presigned_image_url(&upload.content_type, upload.file_extension()).await?;

		self.storage_call(
			Method::Put,
			&slot.presigned_url,
			RequestBody::Bytes {
				content_type: upload.content_type.clone(),
				data: upload.data.clone(),
			},
		)
		.await?;

		let image = ProductImage {
			id: None,
			url: slot.public_url,
			key: slot.key,
			main: upload.main,
			order: upload.order.unwrap_or_default(),
		};

		self.register_product_image(product_id, &image).await
	}

	/// Uploads images one after another; a failed image does not stop the rest.
	///
	/// Results line up with `uploads`. Images without an explicit position take their index.
	pub async fn upload_product_images(
		&self,
		product_id: &ResourceId,
		uploads: &[ImageUpload],
	) -> Vec<ApiResult<ProductImage>> {
		let mut results = Vec::with_capacity(uploads.len());

		for (index, upload) in uploads.iter().enumerate() {
			let positioned = match upload.order {
				Some(_) => upload.clone(),
				None => upload.clone().order(u32::try_from(index).unwrap_or(u32::MAX)),
			};
			let result = self.upload_product_image(product_id, &positioned).await;

			#[cfg(feature = "tracing")]
			if let Err(e) = &result {
				tracing::warn!(file = %upload.file_name, error = %e, "Image upload failed.");
			}

			results.push(result);
		}

		results
	}

	/// Removes an image from storage, then from the product.
	pub async fn delete_product_image(
		&self,
		product_id: &ResourceId,
		image_id: &ResourceId,
	) -> ApiResult<()> {
		let endpoint = format!("/products/{product_id}/images/{image_id}");
		let target: ImageDeleteUrl =
			self.get(&format!("{endpoint}/delete-url"), RequestOptions::new()).await?;

		self.storage_call(Method::Delete, &target.delete_url, RequestBody::Empty).await?;
		self.delete::<Value>(&endpoint, RequestOptions::new()).await?;

		Ok(())
	}

	async fn storage_call(&self, method: Method, url: &str, body: RequestBody) -> ApiResult<()> {
		let url = Url::parse(url).map_err(|e| {
			NormalizedError::client(400, format!("Storage URL `{url}` is invalid: {e}"))
		})?;
		let mut request = HttpRequest::new(method, url);

		request.body = body;

		let response =
			self.http_client.send(request).await.map_err(|e| NormalizedError::transport(&e))?;

		if !response.is_success() {
			return Err(NormalizedError::server(
				response.status,
				format!("Storage rejected the {method} with status {}.", response.status),
			));
		}

		Ok(())
	}
}
