//! Progressive JPEG compression for product images.
//!
//! Uploads already within the target size pass through untouched. Larger ones are decoded and
//! re-encoded as JPEG at falling quality, 90 down to 10 in steps of 10. When even the lowest
//! quality misses the target, the image is scaled by `sqrt(target / size) * 0.9` and encoded
//! once more at quality 90.

// crates.io
use image::{
	ImageResult, RgbImage,
	codecs::jpeg::JpegEncoder,
	imageops::{self, FilterType},
};
// self
use crate::{
	api::{ApiResult, NormalizedError},
	services::ImageUpload,
};

/// Target size used by the upload forms, in KiB.
pub const DEFAULT_MAX_IMAGE_KB: usize = 500;

const QUALITY_STEPS: [u8; 9] = [90, 80, 70, 60, 50, 40, 30, 20, 10];
const RESIZE_QUALITY: u8 = 90;
const RESIZE_MARGIN: f64 = 0.9;

/// Outcome of [`compress_image`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressionResult {
	/// Upload to send: the input when it already fit, otherwise a `<stem>-compressed.jpg` JPEG.
	pub file: ImageUpload,
	/// Size of the input in bytes.
	pub original_size: usize,
	/// Size of `file` in bytes.
	pub compressed_size: usize,
}
impl CompressionResult {
	/// Share of the original size saved, rounded to a whole percent.
	pub fn reduction_percent(&self) -> i64 {
		if self.original_size == 0 {
			return 0;
		}

		let kept = self.compressed_size as f64 / self.original_size as f64;

		((1. - kept) * 100.).round() as i64
	}

	/// [`reduction_percent`](Self::reduction_percent) rendered as `42%`.
	pub fn compression_ratio(&self) -> String {
		format!("{}%", self.reduction_percent())
	}
}

/// Shrinks `upload` towards `max_kb` KiB.
///
/// The result may still exceed the target when the resized image does; the cover flag and
/// display position carry over to the compressed file.
pub fn compress_image(upload: &ImageUpload, max_kb: usize) -> ApiResult<CompressionResult> {
	let max_bytes = max_kb.saturating_mul(1024);
	let original_size = upload.data.len();

	if original_size <= max_bytes {
		return Ok(CompressionResult {
			file: upload.clone(),
			original_size,
			compressed_size: original_size,
		});
	}

	let image = image::load_from_memory(&upload.data)
		.map_err(|e| NormalizedError::client(400, format!("Image could not be decoded: {e}")))?
		.to_rgb8();
	let data = shrink(&image, max_bytes, encode_jpeg)
		.map_err(|e| NormalizedError::client(500, format!("Image could not be encoded: {e}")))?;
	let compressed_size = data.len();
	let file = ImageUpload {
		file_name: format!("{}-compressed.jpg", file_stem(&upload.file_name)),
		content_type: "image/jpeg".into(),
		data,
		main: upload.main,
		order: upload.order,
	};

	Ok(CompressionResult { file, original_size, compressed_size })
}

fn shrink<E>(image: &RgbImage, max_bytes: usize, mut encode: E) -> ImageResult<Vec<u8>>
where
	E: FnMut(&RgbImage, u8) -> ImageResult<Vec<u8>>,
{
	let mut encoded = Vec::new();

	for quality in QUALITY_STEPS {
		encoded = encode(image, quality)?;

		if encoded.len() <= max_bytes {
			return Ok(encoded);
		}
	}

	let scale = (max_bytes as f64 / encoded.len() as f64).sqrt() * RESIZE_MARGIN;
	let (width, height) = scaled(image.dimensions(), scale);
	let resized = imageops::resize(image, width, height, FilterType::Lanczos3);

	encode(&resized, RESIZE_QUALITY)
}

fn scaled((width, height): (u32, u32), scale: f64) -> (u32, u32) {
	let side = |length: u32| ((f64::from(length) * scale).round() as u32).max(1);

	(side(width), side(height))
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
	let mut buffer = Vec::new();

	JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(image)?;

	Ok(buffer)
}

// Drops the last extension; dots inside directory-like segments stay.
fn file_stem(file_name: &str) -> &str {
	match file_name.rsplit_once('.') {
		Some((stem, extension)) if !extension.is_empty() && !extension.contains('/') => stem,
		_ => file_name,
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::io::Cursor;
	// crates.io
	use image::{DynamicImage, ImageFormat, Rgb};
	use rand::Rng;
	// self
	use super::*;

	fn noise(side: u32) -> RgbImage {
		let mut rng = rand::rng();

		RgbImage::from_fn(side, side, |_, _| Rgb(rng.random()))
	}

	fn png_upload(side: u32) -> ImageUpload {
		let mut bytes = Vec::new();

		DynamicImage::ImageRgb8(noise(side))
			.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
			.expect("Noise fixture should encode as PNG.");

		ImageUpload::new("shelf.photo.png", "image/png", bytes).main().order(2)
	}

	#[test]
	fn quality_steps_down_until_target_fits() {
		let image = RgbImage::new(10, 10);
		let mut attempts = Vec::new();
		let encoded = shrink(&image, 4_500, |image, quality| {
			attempts.push((image.dimensions(), quality));

			Ok(vec![0; usize::from(quality) * 100])
		})
		.expect("Scripted encoder should not fail.");

		assert_eq!(encoded.len(), 4_000);
		assert_eq!(
			attempts.iter().map(|(_, quality)| *quality).collect::<Vec<_>>(),
			[90, 80, 70, 60, 50, 40],
		);
		assert!(attempts.iter().all(|(dimensions, _)| *dimensions == (10, 10)));
	}

	#[test]
	fn resizes_when_lowest_quality_is_too_large() {
		let image = RgbImage::new(100, 100);
		let mut attempts = Vec::new();
		let encoded = shrink(&image, 1_000, |image, quality| {
			let (width, height) = image.dimensions();

			attempts.push(((width, height), quality));

			Ok(vec![0; (width * height) as usize * usize::from(quality) / 10])
		})
		.expect("Scripted encoder should not fail.");

		// sqrt(1000 / 10000) * 0.9 scales 100 px down to 28 px.
		assert_eq!(attempts.len(), QUALITY_STEPS.len() + 1);
		assert_eq!(attempts.last(), Some(&((28, 28), RESIZE_QUALITY)));
		assert_eq!(encoded.len(), 28 * 28 * 9);
	}

	#[test]
	fn uploads_within_target_pass_through() {
		let upload = ImageUpload::new("tiny.webp", "image/webp", vec![1, 2, 3]);
		let result = compress_image(&upload, 1).expect("Small uploads should not be decoded.");

		assert_eq!(result.file, upload);
		assert_eq!(result.compressed_size, 3);
		assert_eq!(result.compression_ratio(), "0%");
	}

	#[test]
	fn oversized_png_becomes_renamed_jpeg() {
		let upload = png_upload(128);
		let result = compress_image(&upload, 8).expect("Noise image should compress.");

		assert_eq!(result.file.file_name, "shelf.photo-compressed.jpg");
		assert_eq!(result.file.content_type, "image/jpeg");
		assert!(result.file.main);
		assert_eq!(result.file.order, Some(2));
		assert_eq!(result.original_size, upload.data.len());
		assert!(result.compressed_size < result.original_size);
		assert!(result.reduction_percent() > 0);
		assert_eq!(
			image::guess_format(&result.file.data).expect("Output should be a known format."),
			ImageFormat::Jpeg,
		);
	}

	#[test]
	fn undecodable_upload_over_target_is_rejected() {
		let upload = ImageUpload::new("broken.jpg", "image/jpeg", vec![0; 2_048]);
		let err = compress_image(&upload, 1).expect_err("Garbage bytes should not decode.");

		assert_eq!(err.status_code, 400);
	}

	#[test]
	fn file_stem_drops_only_the_last_extension() {
		assert_eq!(file_stem("shelf.photo.png"), "shelf.photo");
		assert_eq!(file_stem("scan"), "scan");
		assert_eq!(file_stem("dir.d/scan"), "dir.d/scan");
	}
}
