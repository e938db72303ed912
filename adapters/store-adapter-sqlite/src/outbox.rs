//! Email outbox persistence
//!
//! The claim query is the single point of write contention in the schema:
//! concurrent drain passes must never pick up the same QUEUED entry, so
//! claiming is one atomic UPDATE that moves the batch out of QUEUED before
//! any send is attempted.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use fatura::prelude::*;
use fatura::store_adapter::{CreateOutboxEntry, EnqueueOutcome, OutboxEntry, OutboxPatch};

use crate::utils::*;

fn entry_from_row(row: &SqliteRow) -> Result<OutboxEntry, sqlx::Error> {
	Ok(OutboxEntry {
		outbox_id: row.try_get("outbox_id")?,
		tn_id: TnId(row.try_get("tn_id")?),
		recipient: row.try_get("recipient")?,
		subject: row.try_get("subject")?,
		body: row.try_get("body")?,
		status: decode_enum(row.try_get::<&str, _>("status")?)?,
		attempts: row.try_get("attempts")?,
		sent_at: row.try_get::<Option<i64>, _>("sent_at")?.map(Timestamp),
		last_error: row.try_get("last_error")?,
		dedup_key: row.try_get("dedup_key")?,
		created_at: row.try_get("created_at").map(Timestamp)?,
	})
}

const OUTBOX_COLUMNS: &str = "outbox_id, tn_id, recipient, subject, body, status,
	attempts, dedup_key, last_error, created_at, sent_at";

pub(crate) async fn create(
	db: &SqlitePool,
	data: &CreateOutboxEntry<'_>,
) -> FtResult<EnqueueOutcome> {
	let res = sqlx::query(
		"INSERT INTO email_outbox (tn_id, recipient, subject, body, dedup_key)
		VALUES (?, ?, ?, ?, ?) RETURNING outbox_id",
	)
	.bind(data.tn_id.0)
	.bind(data.recipient)
	.bind(data.subject)
	.bind(data.body)
	.bind(data.dedup_key)
	.fetch_one(db)
	.await;

	if let Err(sqlx::Error::Database(err)) = &res {
		if err.is_unique_violation() {
			return Ok(EnqueueOutcome::Duplicate);
		}
	}

	map_res(res, |row| row.try_get("outbox_id").map(EnqueueOutcome::Created))
}

/// Atomically claim up to `limit` QUEUED entries with fewer than
/// `max_attempts` attempts, oldest first. The claimed rows come back already
/// in SENDING with the attempt counted.
pub(crate) async fn claim_queued(
	db: &SqlitePool,
	limit: u32,
	max_attempts: u32,
) -> FtResult<Vec<OutboxEntry>> {
	let res = sqlx::query(&format!(
		"UPDATE email_outbox SET status='SENDING', attempts=attempts+1
		WHERE outbox_id IN (
			SELECT outbox_id FROM email_outbox
			WHERE status='QUEUED' AND attempts < ?
			ORDER BY created_at, outbox_id
			LIMIT ?
		)
		RETURNING {OUTBOX_COLUMNS}"
	))
	.bind(max_attempts)
	.bind(limit)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	let mut entries = collect_res(res.iter().map(entry_from_row))?;
	entries.sort_by_key(|entry| (entry.created_at.0, entry.outbox_id));
	Ok(entries)
}

pub(crate) async fn update(
	db: &SqlitePool,
	outbox_id: i64,
	patch: &OutboxPatch,
) -> FtResult<OutboxEntry> {
	let mut query = sqlx::QueryBuilder::new("UPDATE email_outbox SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "status", &patch.status, |v| v.as_str());
	has_updates = push_patch!(query, has_updates, "sent_at", &patch.sent_at, |v| v.0);
	has_updates = push_patch!(query, has_updates, "last_error", &patch.last_error, |v| v.as_ref());

	if !has_updates {
		return read(db, outbox_id).await;
	}

	query
		.push(" WHERE outbox_id=")
		.push_bind(outbox_id)
		.push(" RETURNING ")
		.push(OUTBOX_COLUMNS);
	let res = query.build().fetch_one(db).await;

	map_res(res, |row| entry_from_row(&row))
}

pub(crate) async fn read(db: &SqlitePool, outbox_id: i64) -> FtResult<OutboxEntry> {
	let res =
		sqlx::query(&format!("SELECT {OUTBOX_COLUMNS} FROM email_outbox WHERE outbox_id=?"))
			.bind(outbox_id)
			.fetch_one(db)
			.await;

	map_res(res, |row| entry_from_row(&row))
}

// vim: ts=4
