//! API types for the HTTP settlement surface.
//!
//! The settlement core reports failures as typed errors; this module
//! carries the JSON envelope and HTTP status mapping used by the service
//! layer to hand those errors back to the relayer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code, e.g. "ORDER_EXPIRED".
	pub error: String,
	/// Human-readable description with enough context to resubmit.
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Malformed request payload (400).
	BadRequest { error_type: String, message: String },
	/// Caller lacks the required privilege (403).
	Forbidden { error_type: String, message: String },
	/// The submitted pair was already settled (409).
	Conflict { error_type: String, message: String },
	/// Well-formed but unsettleable submission (422).
	UnprocessableEntity { error_type: String, message: String },
	/// Internal server error (500).
	InternalServerError { error_type: String, message: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest { .. } => 400,
			ApiError::Forbidden { .. } => 403,
			ApiError::Conflict { .. } => 409,
			ApiError::UnprocessableEntity { .. } => 422,
			ApiError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error_type, message) = match self {
			ApiError::BadRequest { error_type, message }
			| ApiError::Forbidden { error_type, message }
			| ApiError::Conflict { error_type, message }
			| ApiError::UnprocessableEntity { error_type, message }
			| ApiError::InternalServerError { error_type, message } => (error_type, message),
		};
		ErrorResponse {
			error: error_type.clone(),
			message: message.clone(),
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let response = self.to_error_response();
		write!(f, "{}: {}", response.error, response.message)
	}
}

impl std::error::Error for ApiError {}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status =
			StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}
