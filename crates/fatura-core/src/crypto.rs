//! Password hashing helpers.
//!
//! bcrypt is CPU-bound, so both directions run on the blocking pool.

use crate::prelude::*;

const BCRYPT_COST: u32 = 10;

pub async fn generate_password_hash(password: Box<str>) -> FtResult<Box<str>> {
	tokio::task::spawn_blocking(move || {
		bcrypt::hash(password.as_ref(), BCRYPT_COST)
			.map(Into::into)
			.map_err(|err| Error::Internal(format!("password hash failed: {err}")))
	})
	.await
	.map_err(|err| Error::Internal(format!("blocking task failed: {err}")))?
}

/// Verifies a password against its stored hash. All failure modes collapse
/// into `Unauthorized` so callers cannot distinguish them.
pub async fn check_password(password: Box<str>, password_hash: Box<str>) -> FtResult<()> {
	tokio::task::spawn_blocking(move || match bcrypt::verify(password.as_ref(), &password_hash) {
		Ok(true) => Ok(()),
		Ok(false) | Err(_) => Err(Error::Unauthorized),
	})
	.await
	.map_err(|_| Error::Unauthorized)?
}


// vim: ts=4
