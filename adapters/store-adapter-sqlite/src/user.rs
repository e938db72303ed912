//! User persistence and credential lookup

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use fatura::prelude::*;
use fatura::store_adapter::{CreateUserData, User, UserAuthRecord};

use crate::utils::*;

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
	Ok(User {
		user_id: row.try_get("user_id")?,
		tn_id: TnId(row.try_get("tn_id")?),
		name: row.try_get("name")?,
		email: row.try_get("email")?,
		role: decode_enum(row.try_get::<&str, _>("role")?)?,
		created_at: row.try_get("created_at").map(Timestamp)?,
	})
}

pub(crate) async fn create(
	db: &SqlitePool,
	tn_id: TnId,
	data: &CreateUserData<'_>,
) -> FtResult<User> {
	let res = sqlx::query(
		"INSERT INTO users (tn_id, name, email, password_hash, role)
		VALUES (?, ?, ?, ?, ?)
		RETURNING user_id, tn_id, name, email, role, created_at",
	)
	.bind(tn_id.0)
	.bind(data.name)
	.bind(data.email)
	.bind(data.password_hash)
	.bind(data.role.as_str())
	.fetch_one(db)
	.await;

	// Email is globally unique, it is the login identifier
	if let Err(sqlx::Error::Database(err)) = &res {
		if err.is_unique_violation() {
			return Err(Error::ValidationError("email already registered".into()));
		}
	}

	map_res(res, |row| user_from_row(&row))
}

pub(crate) async fn read_auth(db: &SqlitePool, email: &str) -> FtResult<UserAuthRecord> {
	let res = sqlx::query(
		"SELECT user_id, tn_id, name, email, password_hash, role, created_at
		FROM users WHERE email=?",
	)
	.bind(email)
	.fetch_one(db)
	.await;

	map_res(res, |row| {
		Ok(UserAuthRecord {
			password_hash: row.try_get("password_hash")?,
			user: user_from_row(&row)?,
		})
	})
}

pub(crate) async fn list(db: &SqlitePool, tn_id: TnId) -> FtResult<Vec<User>> {
	let res = sqlx::query(
		"SELECT user_id, tn_id, name, email, role, created_at
		FROM users WHERE tn_id=? ORDER BY user_id",
	)
	.bind(tn_id.0)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(user_from_row))
}

// vim: ts=4
