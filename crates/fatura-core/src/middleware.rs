//! Authentication middleware.

use axum::{
	body::Body,
	extract::State,
	http::{Request, response::Response},
	middleware::Next,
};

use crate::extract::Auth;
use crate::prelude::*;
use crate::token;

/// Requires a valid Bearer access token and stores the caller context in the
/// request extensions for the `Auth` extractor.
pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> FtResult<Response<Body>> {
	let auth_header = req
		.headers()
		.get("Authorization")
		.and_then(|h| h.to_str().ok())
		.ok_or(Error::Unauthorized)?;

	if !auth_header.starts_with("Bearer ") {
		return Err(Error::Unauthorized);
	}

	let token = &auth_header[7..];
	let auth = token::verify_access_token(token, &app.opts.token_secret)?;

	req.extensions_mut().insert(Auth(auth));

	Ok(next.run(req).await)
}

// vim: ts=4
