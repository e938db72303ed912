//! Job trigger endpoint.

use axum::{
	Json,
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
};
use serde_json::json;

use crate::dispatcher;
use crate::prelude::*;

/// `POST /api/jobs/run-reminders`
///
/// Guarded by the configured shared job token instead of a user session;
/// the caller is an external scheduler, not a person. Runs the full
/// dispatch job and returns its summary.
pub async fn run_reminders(State(app): State<App>, headers: HeaderMap) -> Response {
	let token = headers
		.get("Authorization")
		.and_then(|header| header.to_str().ok())
		.and_then(|header| header.strip_prefix("Bearer "));

	if token != Some(&*app.opts.job_token) {
		warn!("Reminder job trigger rejected: missing or invalid job token");
		return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })))
			.into_response();
	}

	match dispatcher::run(&app).await {
		Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
		Err(err) => {
			error!("Reminder job run failed: {err}");
			err.into_response()
		}
	}
}

// vim: ts=4
