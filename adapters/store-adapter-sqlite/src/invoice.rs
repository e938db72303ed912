//! Invoice and invoice event persistence
//!
//! Events are append-only; nothing here ever updates or deletes one.

use chrono::NaiveDate;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use fatura::prelude::*;
use fatura::store_adapter::{
	ClientSummary, CreateInvoiceData, Invoice, InvoiceEvent, InvoiceEventType, InvoicePatch,
	InvoiceWithClient, ListInvoicesOptions,
};

use crate::utils::*;

pub(crate) fn invoice_from_row(row: &SqliteRow) -> Result<Invoice, sqlx::Error> {
	Ok(Invoice {
		invoice_id: row.try_get("invoice_id")?,
		tn_id: TnId(row.try_get("tn_id")?),
		client_id: row.try_get("client_id")?,
		amount: decode_amount(row.try_get::<&str, _>("amount")?)?,
		due_date: decode_date(row.try_get::<&str, _>("due_date")?)?,
		description: row.try_get("description")?,
		notes: row.try_get("notes")?,
		status: decode_enum(row.try_get::<&str, _>("status")?)?,
		paid_at: row.try_get::<Option<i64>, _>("paid_at")?.map(Timestamp),
		recurrence: decode_enum(row.try_get::<&str, _>("recurrence")?)?,
		next_run_at: match row.try_get::<Option<&str>, _>("next_run_at")? {
			Some(date) => Some(decode_date(date)?),
			None => None,
		},
		created_at: row.try_get("created_at").map(Timestamp)?,
		updated_at: row.try_get("updated_at").map(Timestamp)?,
	})
}

fn invoice_with_client_from_row(row: &SqliteRow) -> Result<InvoiceWithClient, sqlx::Error> {
	Ok(InvoiceWithClient {
		invoice: invoice_from_row(row)?,
		client: ClientSummary {
			client_id: row.try_get("client_id")?,
			name: row.try_get("client_name")?,
			email: row.try_get("client_email")?,
			document: row.try_get("client_document")?,
		},
	})
}

const INVOICE_COLUMNS: &str = "invoice_id, tn_id, client_id, description, notes, amount,
	due_date, status, recurrence, paid_at, next_run_at, created_at, updated_at";

const JOINED_COLUMNS: &str = "i.invoice_id, i.tn_id, i.client_id, i.description, i.notes,
	i.amount, i.due_date, i.status, i.recurrence, i.paid_at, i.next_run_at,
	i.created_at, i.updated_at,
	c.name as client_name, c.email as client_email, c.document as client_document";

pub(crate) async fn create(
	db: &SqlitePool,
	tn_id: TnId,
	data: &CreateInvoiceData<'_>,
) -> FtResult<Invoice> {
	let res = sqlx::query(&format!(
		"INSERT INTO invoices (tn_id, client_id, description, notes, amount, due_date, recurrence, next_run_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {INVOICE_COLUMNS}"
	))
	.bind(tn_id.0)
	.bind(data.client_id)
	.bind(data.description)
	.bind(data.notes)
	.bind(data.amount.to_string())
	.bind(data.due_date.to_string())
	.bind(data.recurrence.as_str())
	.bind(data.next_run_at.map(|d| d.to_string()))
	.fetch_one(db)
	.await;

	map_res(res, |row| invoice_from_row(&row))
}

pub(crate) async fn read(db: &SqlitePool, invoice_id: i64) -> FtResult<Invoice> {
	let res = sqlx::query(&format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id=?"))
		.bind(invoice_id)
		.fetch_one(db)
		.await;

	map_res(res, |row| invoice_from_row(&row))
}

pub(crate) async fn update(
	db: &SqlitePool,
	invoice_id: i64,
	patch: &InvoicePatch,
) -> FtResult<Invoice> {
	if matches!(patch.amount, Patch::Null)
		|| matches!(patch.due_date, Patch::Null)
		|| matches!(patch.description, Patch::Null)
		|| matches!(patch.status, Patch::Null)
	{
		return Err(Error::ValidationError("required invoice fields cannot be cleared".into()));
	}

	// Build dynamic UPDATE query based on what fields are present
	let mut query = sqlx::QueryBuilder::new("UPDATE invoices SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "amount", &patch.amount, |v| v.to_string());
	has_updates = push_patch!(query, has_updates, "due_date", &patch.due_date, |v| v.to_string());
	has_updates =
		push_patch!(query, has_updates, "description", &patch.description, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "notes", &patch.notes, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "status", &patch.status, |v| v.as_str());
	has_updates = push_patch!(query, has_updates, "paid_at", &patch.paid_at, |v| v.0);

	if !has_updates {
		return read(db, invoice_id).await;
	}

	query
		.push(", updated_at=unixepoch() WHERE invoice_id=")
		.push_bind(invoice_id)
		.push(" RETURNING ")
		.push(INVOICE_COLUMNS);
	let res = query.build().fetch_one(db).await;

	map_res(res, |row| invoice_from_row(&row))
}

pub(crate) async fn list(
	db: &SqlitePool,
	tn_id: TnId,
	opts: &ListInvoicesOptions,
) -> FtResult<Vec<InvoiceWithClient>> {
	let mut query = sqlx::QueryBuilder::new(format!(
		"SELECT {JOINED_COLUMNS} FROM invoices i JOIN clients c ON c.client_id=i.client_id"
	));
	query.push(" WHERE i.tn_id=").push_bind(tn_id.0);

	if let Some(status) = opts.status {
		query.push(" AND i.status=").push_bind(status.as_str());
	}
	if let Some(client_id) = opts.client_id {
		query.push(" AND i.client_id=").push_bind(client_id);
	}
	query.push(" ORDER BY i.due_date DESC, i.invoice_id DESC");

	let res = query
		.build()
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(invoice_with_client_from_row))
}

/// PENDING and OVERDUE invoices of one tenant, what the reminder job scans
pub(crate) async fn list_open(db: &SqlitePool, tn_id: TnId) -> FtResult<Vec<InvoiceWithClient>> {
	let res = sqlx::query(&format!(
		"SELECT {JOINED_COLUMNS} FROM invoices i JOIN clients c ON c.client_id=i.client_id
		WHERE i.tn_id=? AND i.status IN ('PENDING', 'OVERDUE')
		ORDER BY i.due_date, i.invoice_id"
	))
	.bind(tn_id.0)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(invoice_with_client_from_row))
}

pub(crate) async fn list_for_client(
	db: &SqlitePool,
	client_id: i64,
	limit: u32,
) -> FtResult<Vec<Invoice>> {
	let res = sqlx::query(&format!(
		"SELECT {INVOICE_COLUMNS} FROM invoices WHERE client_id=?
		ORDER BY due_date DESC, invoice_id DESC LIMIT ?"
	))
	.bind(client_id)
	.bind(limit)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(invoice_from_row))
}

/// Bulk PENDING -> OVERDUE for invoices due strictly before `today`
pub(crate) async fn mark_overdue(db: &SqlitePool, today: NaiveDate) -> FtResult<u32> {
	let res = sqlx::query(
		"UPDATE invoices SET status='OVERDUE', updated_at=unixepoch()
		WHERE status='PENDING' AND due_date < ?",
	)
	.bind(today.to_string())
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	Ok(u32::try_from(res.rows_affected()).unwrap_or(u32::MAX))
}

// Invoice events
//****************

fn event_from_row(row: &SqliteRow) -> Result<InvoiceEvent, sqlx::Error> {
	Ok(InvoiceEvent {
		event_id: row.try_get("event_id")?,
		invoice_id: row.try_get("invoice_id")?,
		typ: decode_enum(row.try_get::<&str, _>("type")?)?,
		description: row.try_get("description")?,
		created_at: row.try_get("created_at").map(Timestamp)?,
	})
}

/// Append one audit event, inheriting the tenant id from the invoice
pub(crate) async fn create_event(
	db: &SqlitePool,
	invoice_id: i64,
	typ: InvoiceEventType,
	description: &str,
) -> FtResult<()> {
	let res = sqlx::query(
		"INSERT INTO invoice_events (tn_id, invoice_id, type, description)
		SELECT tn_id, invoice_id, ?, ? FROM invoices WHERE invoice_id=?",
	)
	.bind(typ.as_str())
	.bind(description)
	.bind(invoice_id)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn list_events(db: &SqlitePool, invoice_id: i64) -> FtResult<Vec<InvoiceEvent>> {
	let res = sqlx::query(
		"SELECT event_id, invoice_id, type, description, created_at
		FROM invoice_events WHERE invoice_id=?
		ORDER BY created_at DESC, event_id DESC",
	)
	.bind(invoice_id)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(event_from_row))
}

// vim: ts=4
