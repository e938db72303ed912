//! Platform-wide error type and result alias.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

pub type FtResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Resource absent, or deliberately collapsed from "belongs to another
	/// tenant" at unscoped-fetch boundaries to avoid existence leakage
	NotFound,
	/// No valid caller credential (401)
	Unauthorized,
	/// Caller authenticated but lacks the role or tenant ownership (403)
	PermissionDenied,
	/// Malformed input, with field-level detail (400)
	ValidationError(String),
	/// Downstream transport failure (mail delivery etc.)
	ServiceUnavailable(String),
	/// Invalid or missing startup configuration
	ConfigError(String),
	/// Unexpected persistence failure; details are logged at the call site
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Internal(format!("JSON error: {err}"))
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ValidationError(msg) => write!(f, "validation error: {msg}"),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {msg}"),
			Error::ConfigError(msg) => write!(f, "configuration error: {msg}"),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {msg}"),
			Error::Io(err) => write!(f, "io error: {err}"),
		}
	}
}

impl std::error::Error for Error {}

#[derive(Serialize)]
struct ErrorBody {
	error: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	message: Option<String>,
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, error, message) = match self {
			Error::NotFound => (StatusCode::NOT_FOUND, "not-found", None),
			Error::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
			Error::PermissionDenied => (StatusCode::FORBIDDEN, "permission-denied", None),
			Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, "validation", Some(msg)),
			Error::ServiceUnavailable(msg) => {
				(StatusCode::SERVICE_UNAVAILABLE, "service-unavailable", Some(msg))
			}
			Error::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config", Some(msg)),
			Error::DbError => (StatusCode::INTERNAL_SERVER_ERROR, "db", None),
			Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", Some(msg)),
			Error::Io(err) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "io", Some(err.to_string()))
			}
		};
		(status, Json(ErrorBody { error, message })).into_response()
	}
}

// vim: ts=4
