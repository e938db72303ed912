//! Custom Axum extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::prelude::*;
use fatura_types::store_adapter::AuthCtx;

// Auth //
//******//
/// Caller context extracted from request extensions (set by auth middleware).
#[derive(Clone, Debug)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// vim: ts=4
