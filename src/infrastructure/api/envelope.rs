//! Uniform JSON response envelope

use crate::shared::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// `{"success": bool, "data"?: ..., "error"?: ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			error: None,
		}
	}
}

impl ApiResponse<()> {
	pub fn err(message: impl Into<String>) -> Self {
		Self {
			success: false,
			data: None,
			error: Some(message.into()),
		}
	}
}

/// Error half of every handler: a status code plus an error envelope
pub struct ApiError {
	pub status: StatusCode,
	pub message: String,
}

impl ApiError {
	pub fn unauthorized() -> Self {
		Self {
			status: StatusCode::UNAUTHORIZED,
			message: "missing or invalid bearer key".into(),
		}
	}
}

impl From<CoreError> for ApiError {
	fn from(err: CoreError) -> Self {
		let status = match &err {
			CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
			CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
			CoreError::Validation(_)
			| CoreError::InvalidTransition { .. }
			| CoreError::DuplicateEmail(_) => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		// Internal detail stays in the log, not on the wire
		let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
			error!("Internal error in admin API: {err}");
			"internal error".to_string()
		} else {
			err.to_string()
		};

		Self { status, message }
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ApiResponse::err(self.message))).into_response()
	}
}
