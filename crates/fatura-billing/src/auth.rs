//! Session login.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use fatura_core::{crypto, token};
use fatura_types::store_adapter::{AuthCtx, User, UserAuthRecord};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
	pub email: Box<str>,
	pub password: Box<str>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
	pub token: Box<str>,
	pub user: User,
}

/// `POST /api/auth/login`
///
/// Unknown emails and wrong passwords both answer `Unauthorized`; the
/// response never reveals whether an account exists.
pub async fn post_login(
	State(app): State<App>,
	Json(req): Json<LoginRequest>,
) -> FtResult<(StatusCode, Json<LoginResponse>)> {
	let record = match app.store_adapter.read_user_auth(&req.email).await {
		Ok(record) => record,
		Err(Error::NotFound) => return Err(Error::Unauthorized),
		Err(err) => return Err(err),
	};
	let UserAuthRecord { user, password_hash } = record;
	crypto::check_password(req.password, password_hash).await?;

	let auth = AuthCtx {
		tn_id: user.tn_id,
		user_id: user.user_id,
		name: user.name.clone(),
		role: user.role,
	};
	let token =
		token::create_access_token(&auth, &app.opts.token_secret, app.opts.token_expiry_secs)?;
	info!("User {} logged in (tenant {})", user.email, user.tn_id);

	Ok((StatusCode::OK, Json(LoginResponse { token, user })))
}

// vim: ts=4
