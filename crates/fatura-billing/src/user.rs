//! User administration within a tenant.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::prelude::*;
use crate::validate::{validate_email, validate_name};
use fatura_core::crypto;
use fatura_core::extract::Auth;
use fatura_core::perm::{Permission, authorize};
use fatura_types::store_adapter::{CreateUserData, Role, User};

/// `GET /api/users`
pub async fn list_users(
	State(app): State<App>,
	Auth(auth): Auth,
) -> FtResult<(StatusCode, Json<Vec<User>>)> {
	authorize(&auth, Permission::ViewUsers)?;
	let users = app.store_adapter.list_users(auth.tn_id).await?;
	Ok((StatusCode::OK, Json(users)))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
	pub name: Box<str>,
	pub email: Box<str>,
	pub password: Box<str>,
	pub role: Role,
}

/// `POST /api/users`
///
/// The new user always lands in the caller's tenant.
pub async fn post_user(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateUserRequest>,
) -> FtResult<(StatusCode, Json<User>)> {
	authorize(&auth, Permission::ManageUsers)?;
	validate_name(&req.name)?;
	validate_email(&req.email)?;

	let password_hash = crypto::generate_password_hash(req.password).await?;
	let user = app
		.store_adapter
		.create_user(
			auth.tn_id,
			&CreateUserData {
				name: &req.name,
				email: &req.email,
				password_hash: &password_hash,
				role: req.role,
			},
		)
		.await?;
	info!("User {} ({}) created by {}", user.email, user.role.as_str(), auth.name);

	Ok((StatusCode::CREATED, Json(user)))
}

// vim: ts=4
