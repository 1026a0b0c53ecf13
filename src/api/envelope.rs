//! Wire envelopes wrapping every storefront API payload.

// self
use crate::{
	_prelude::*,
	api::error::{ErrorOrigin, NormalizedError},
};

/// Successful response wrapper: `{ success: true, data, message?, meta? }`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SuccessEnvelope<T> {
	/// Always `true` for this shape.
	pub success: bool,
	/// Payload surfaced to callers.
	pub data: T,
	/// Optional informational message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Optional metadata (pagination and similar).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Value>,
}

/// Error response wrapper:
/// `{ success: false, statusCode, message, error, timestamp, path }`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
	/// Always `false` for this shape.
	#[serde(default)]
	pub success: bool,
	/// HTTP status the server assigned to the failure.
	pub status_code: u16,
	/// One message, or a list of validation messages.
	pub message: ErrorMessage,
	/// Server-specific error detail.
	#[serde(default)]
	pub error: Option<Value>,
	/// ISO-8601 instant the failure was produced.
	#[serde(default)]
	pub timestamp: Option<String>,
	/// Request path the server routed.
	#[serde(default)]
	pub path: Option<String>,
}

/// `message` field of an [`ErrorEnvelope`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
	/// Single message.
	Single(String),
	/// Validation messages, one per failed constraint.
	Many(Vec<String>),
}
impl ErrorMessage {
	/// Collapses the messages into one string.
	pub fn joined(&self) -> String {
		match self {
			ErrorMessage::Single(message) => message.clone(),
			ErrorMessage::Many(messages) => messages.join("; "),
		}
	}
}

/// Paginated list payload.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ListResponse<T> {
	/// Page items.
	pub data: Vec<T>,
	/// Pagination metadata.
	pub meta: ListMeta,
}

/// Pagination metadata of a [`ListResponse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
	/// Total items across pages.
	pub total: u64,
	/// Current page, starting at 1.
	pub page: u64,
	/// Last page number.
	pub last_page: u64,
}

/// Extracts the payload of a 2xx body.
///
/// An empty body yields `null`. A body carrying `success: true` yields its `data` (`null` when
/// absent). A body carrying `success: false` is decoded as an error envelope. Any other JSON is
/// returned unchanged.
pub(crate) fn unwrap_success(body: &[u8]) -> Result<Value, NormalizedError> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}

	let mut value: Value = serde_json::from_slice(body).map_err(|e| {
		NormalizedError::client(500, format!("Response body is not valid JSON: {e}"))
	})?;

	match value.get("success") {
		Some(Value::Bool(true)) =>
			Ok(value.get_mut("data").map(Value::take).unwrap_or(Value::Null)),
		Some(Value::Bool(false)) => Err(serde_json::from_value::<ErrorEnvelope>(value)
			.map(NormalizedError::from)
			.unwrap_or_else(|e| {
				NormalizedError::client(500, format!("Error envelope could not be decoded: {e}"))
			})),
		_ => Ok(value),
	}
}

/// Decodes an error envelope from a non-2xx body, if the body carries one.
pub(crate) fn parse_error(body: &[u8]) -> Option<NormalizedError> {
	serde_json::from_slice::<ErrorEnvelope>(body).ok().map(NormalizedError::from)
}

/// Decodes a payload into `T`, reporting the JSON path of the first mismatch.
pub(crate) fn decode<T>(value: Value) -> Result<T, NormalizedError>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|e| NormalizedError {
		origin: ErrorOrigin::Client,
		..NormalizedError::server(
			500,
			format!("Response payload could not be decoded at `{}`: {}", e.path(), e.inner()),
		)
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_envelope_surfaces_data_only() {
		let value = unwrap_success(br#"{"success":true,"data":{"id":1},"message":"ok"}"#)
			.expect("Success envelope should unwrap.");

		assert_eq!(value, serde_json::json!({ "id": 1 }));
		assert_eq!(unwrap_success(b"").expect("Empty body should unwrap."), Value::Null);
		assert_eq!(
			unwrap_success(br#"{"success":true}"#).expect("Missing data should unwrap."),
			Value::Null
		);
	}

	#[test]
	fn error_envelope_joins_validation_messages() {
		let body = serde_json::to_vec(&serde_json::json!({
			"success": false,
			"statusCode": 400,
			"message": ["name must not be empty", "price must be positive"],
			"error": "Bad Request",
			"timestamp": "2024-01-01T00:00:00Z",
			"path": "/products",
		}))
		.expect("Fixture should serialize.");
		let error = parse_error(&body).expect("Validation envelope should decode.");

		assert_eq!(error.status_code, 400);
		assert_eq!(error.message, "name must not be empty; price must be positive");
		assert_eq!(error.path.as_deref(), Some("/products"));
		assert_eq!(error.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
		assert!(parse_error(b"<html>Bad Gateway</html>").is_none());
	}

	#[test]
	fn decode_reports_field_path() {
		#[derive(Debug, Deserialize)]
		struct Item {
			#[allow(dead_code)]
			id: u64,
		}

		let err = decode::<Vec<Item>>(serde_json::json!([{ "id": 1 }, { "id": "two" }]))
			.expect_err("Mismatched payload should fail to decode.");

		assert_eq!(err.origin, ErrorOrigin::Client);
		assert!(err.message.contains("[1].id"), "unexpected message: {}", err.message);
	}
}
