//! Uniform error shape returned by every request, and its display categories.

// self
use crate::{_prelude::*, api::envelope::ErrorEnvelope, error::TransportError};

/// Status code reported for failures that never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Where a [`NormalizedError`] came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorOrigin {
	/// The server answered with an error status.
	#[default]
	Server,
	/// The request never produced a response (DNS, TCP, TLS, IO).
	Transport,
	/// The client rejected the call locally (bad input, undecodable payload, unavailable store).
	Client,
}

/// Normalized request failure.
///
/// Every request resolves to either its payload or one of these; nothing is raised past the
/// client boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[serde(rename_all = "camelCase")]
#[error("{message} (status {status_code})")]
pub struct NormalizedError {
	/// Human-readable message, usually the server's own.
	pub message: String,
	/// HTTP status code (or [`TRANSPORT_FAILURE_STATUS`] for transport failures).
	pub status_code: u16,
	/// Server-reported request path.
	pub path: Option<String>,
	/// Server-reported timestamp (ISO-8601), kept verbatim.
	pub timestamp: Option<String>,
	/// Source of the failure.
	#[serde(default)]
	pub origin: ErrorOrigin,
}
impl NormalizedError {
	/// Error reported by the server without a structured body.
	pub fn server(status_code: u16, message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			status_code,
			path: None,
			timestamp: None,
			origin: ErrorOrigin::Server,
		}
	}

	/// Error raised locally before or after talking to the server.
	pub fn client(status_code: u16, message: impl Into<String>) -> Self {
		Self { origin: ErrorOrigin::Client, ..Self::server(status_code, message) }
	}

	/// Error for a request that produced no response.
	pub fn transport(error: &TransportError) -> Self {
		let detail = match StdError::source(error) {
			Some(source) => format!("{error} {source}"),
			None => error.to_string(),
		};

		Self {
			origin: ErrorOrigin::Transport,
			..Self::server(TRANSPORT_FAILURE_STATUS, format!("Network request failed: {detail}"))
		}
	}

	/// Display category derived from origin and status.
	pub fn kind(&self) -> ErrorKind {
		ErrorKind::of(self)
	}

	/// Returns `true` for 401 responses.
	pub fn is_unauthorized(&self) -> bool {
		self.status_code == 401
	}

	/// Returns `true` for 429 responses.
	pub fn is_rate_limited(&self) -> bool {
		self.status_code == 429
	}
}
impl From<ErrorEnvelope> for NormalizedError {
	fn from(envelope: ErrorEnvelope) -> Self {
		Self {
			message: envelope.message.joined(),
			status_code: envelope.status_code,
			path: envelope.path,
			timestamp: envelope.timestamp,
			origin: ErrorOrigin::Server,
		}
	}
}

/// Category used to pick user-facing copy for a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// 400: the request failed validation.
	Validation,
	/// 401: the session is missing or expired.
	Authentication,
	/// 403: the session lacks permission.
	Authorization,
	/// 404: the resource does not exist.
	NotFound,
	/// 429: too many attempts.
	RateLimited,
	/// 5xx from the server.
	Server,
	/// No response reached the client.
	Network,
	/// Anything else.
	Unknown,
}
impl ErrorKind {
	/// Classifies a normalized error.
	pub fn of(error: &NormalizedError) -> Self {
		if error.origin == ErrorOrigin::Transport {
			return ErrorKind::Network;
		}

		match error.status_code {
			400 => ErrorKind::Validation,
			401 => ErrorKind::Authentication,
			403 => ErrorKind::Authorization,
			404 => ErrorKind::NotFound,
			429 => ErrorKind::RateLimited,
			500..=599 => ErrorKind::Server,
			_ => ErrorKind::Unknown,
		}
	}

	/// Storefront copy shown to shoppers, or `None` when the server message should be shown.
	pub const fn user_message(self) -> Option<&'static str> {
		match self {
			ErrorKind::Authentication =>
				Some("Sesión expirada. Por favor, inicia sesión nuevamente."),
			ErrorKind::Authorization => Some("No tienes permisos para realizar esta acción"),
			ErrorKind::NotFound => Some("El recurso solicitado no existe"),
			ErrorKind::Server => Some("Error en el servidor. Por favor, intenta más tarde"),
			ErrorKind::Network => Some("Error de conexión. Verifica tu internet"),
			ErrorKind::Validation | ErrorKind::RateLimited | ErrorKind::Unknown => None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transport_errors_classify_as_network_despite_500() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
		let error = NormalizedError::transport(&TransportError::Io(io));

		assert_eq!(error.status_code, TRANSPORT_FAILURE_STATUS);
		assert_eq!(error.kind(), ErrorKind::Network);
		assert!(error.message.starts_with("Network request failed"));
		assert_eq!(NormalizedError::server(500, "boom").kind(), ErrorKind::Server);
	}

	#[test]
	fn status_codes_map_to_categories() {
		let kinds = [400, 401, 403, 404, 429, 503, 418]
			.map(|status| NormalizedError::server(status, "x").kind());

		assert_eq!(
			kinds,
			[
				ErrorKind::Validation,
				ErrorKind::Authentication,
				ErrorKind::Authorization,
				ErrorKind::NotFound,
				ErrorKind::RateLimited,
				ErrorKind::Server,
				ErrorKind::Unknown,
			]
		);
		assert!(ErrorKind::Validation.user_message().is_none());
		assert!(ErrorKind::Network.user_message().is_some());
	}
}
