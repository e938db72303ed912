//! Client persistence
//!
//! Clients are soft-deleted only: deactivation keeps the row so existing
//! invoices stay resolvable.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use fatura::prelude::*;
use fatura::store_adapter::{Client, ClientPatch, CreateClientData, ListClientsOptions};

use crate::utils::*;

pub(crate) fn client_from_row(row: &SqliteRow) -> Result<Client, sqlx::Error> {
	Ok(Client {
		client_id: row.try_get("client_id")?,
		tn_id: TnId(row.try_get("tn_id")?),
		name: row.try_get("name")?,
		email: row.try_get("email")?,
		phone: row.try_get("phone")?,
		document: row.try_get("document")?,
		address: row.try_get("address")?,
		notes: row.try_get("notes")?,
		active: row.try_get("active")?,
		created_at: row.try_get("created_at").map(Timestamp)?,
		updated_at: row.try_get("updated_at").map(Timestamp)?,
	})
}

const CLIENT_COLUMNS: &str =
	"client_id, tn_id, name, email, phone, document, address, notes, active, created_at, updated_at";

pub(crate) async fn create(
	db: &SqlitePool,
	tn_id: TnId,
	data: &CreateClientData<'_>,
) -> FtResult<Client> {
	let res = sqlx::query(&format!(
		"INSERT INTO clients (tn_id, name, email, phone, document, address, notes)
		VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {CLIENT_COLUMNS}"
	))
	.bind(tn_id.0)
	.bind(data.name)
	.bind(data.email)
	.bind(data.phone)
	.bind(data.document)
	.bind(data.address)
	.bind(data.notes)
	.fetch_one(db)
	.await;

	map_res(res, |row| client_from_row(&row))
}

pub(crate) async fn read(db: &SqlitePool, client_id: i64) -> FtResult<Client> {
	let res = sqlx::query(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id=?"))
		.bind(client_id)
		.fetch_one(db)
		.await;

	map_res(res, |row| client_from_row(&row))
}

pub(crate) async fn update(
	db: &SqlitePool,
	client_id: i64,
	patch: &ClientPatch,
) -> FtResult<Client> {
	if matches!(patch.name, Patch::Null) || matches!(patch.email, Patch::Null) {
		return Err(Error::ValidationError("name and email cannot be cleared".into()));
	}

	// Build dynamic UPDATE query based on what fields are present
	let mut query = sqlx::QueryBuilder::new("UPDATE clients SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "name", &patch.name, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "email", &patch.email, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "phone", &patch.phone, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "document", &patch.document, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "address", &patch.address, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "notes", &patch.notes, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "active", &patch.active);

	if !has_updates {
		return read(db, client_id).await;
	}

	query
		.push(", updated_at=unixepoch() WHERE client_id=")
		.push_bind(client_id)
		.push(" RETURNING ")
		.push(CLIENT_COLUMNS);
	let res = query.build().fetch_one(db).await;

	map_res(res, |row| client_from_row(&row))
}

pub(crate) async fn list(
	db: &SqlitePool,
	tn_id: TnId,
	opts: &ListClientsOptions<'_>,
) -> FtResult<Vec<Client>> {
	let mut query = sqlx::QueryBuilder::new(format!("SELECT {CLIENT_COLUMNS} FROM clients"));
	query.push(" WHERE tn_id=").push_bind(tn_id.0);

	if !opts.include_inactive {
		query.push(" AND active");
	}
	if let Some(search) = opts.search {
		query
			.push(" AND (name LIKE '%' || ")
			.push_bind(search)
			.push(" || '%' OR email LIKE '%' || ")
			.push_bind(search)
			.push(" || '%' OR document LIKE '%' || ")
			.push_bind(search)
			.push(" || '%')");
	}
	query.push(" ORDER BY name, client_id");

	let res = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(client_from_row))
}

// vim: ts=4
