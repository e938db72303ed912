//! HS256 access tokens for session authentication.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::prelude::*;
use fatura_types::store_adapter::{AuthCtx, Role};

/// JWT claims of an access token
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccessClaims {
	/// User id
	pub sub: i64,
	/// Tenant id
	pub tn: u32,
	/// Display name, embedded so audit descriptions need no user lookup
	pub name: Box<str>,
	/// Role
	pub r: Box<str>,
	/// Expiry, unix seconds
	pub exp: i64,
}

pub fn create_access_token(auth: &AuthCtx, secret: &str, expiry_secs: i64) -> FtResult<Box<str>> {
	let claims = AccessClaims {
		sub: auth.user_id,
		tn: auth.tn_id.0,
		name: auth.name.clone(),
		r: auth.role.as_str().into(),
		exp: Timestamp::now().0 + expiry_secs,
	};

	let token = encode(
		&Header::new(Algorithm::HS256),
		&claims,
		&EncodingKey::from_secret(secret.as_bytes()),
	)
	.map_err(|_| Error::Unauthorized)?;

	Ok(token.into())
}

pub fn verify_access_token(token: &str, secret: &str) -> FtResult<AuthCtx> {
	let token_data = decode::<AccessClaims>(
		token,
		&DecodingKey::from_secret(secret.as_bytes()),
		&Validation::new(Algorithm::HS256),
	)
	.map_err(|_| Error::Unauthorized)?;

	let claims = token_data.claims;
	Ok(AuthCtx {
		tn_id: TnId(claims.tn),
		user_id: claims.sub,
		name: claims.name,
		role: Role::from_str(&claims.r).map_err(|_| Error::Unauthorized)?,
	})
}


// vim: ts=4
