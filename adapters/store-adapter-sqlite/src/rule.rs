//! Reminder rule persistence

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use fatura::prelude::*;
use fatura::store_adapter::{CreateReminderRuleData, ReminderRule, ReminderRulePatch};

use crate::utils::*;

pub(crate) fn rule_from_row(row: &SqliteRow) -> Result<ReminderRule, sqlx::Error> {
	Ok(ReminderRule {
		rule_id: row.try_get("rule_id")?,
		tn_id: TnId(row.try_get("tn_id")?),
		name: row.try_get("name")?,
		active: row.try_get("active")?,
		days_before: row.try_get("days_before")?,
		days_after: row.try_get("days_after")?,
		email_subject: row.try_get("email_subject")?,
		email_body: row.try_get("email_body")?,
		created_at: row.try_get("created_at").map(Timestamp)?,
	})
}

const RULE_COLUMNS: &str = "rule_id, tn_id, name, days_before, days_after,
	email_subject, email_body, active, created_at";

pub(crate) async fn create(
	db: &SqlitePool,
	tn_id: TnId,
	data: &CreateReminderRuleData<'_>,
) -> FtResult<ReminderRule> {
	let res = sqlx::query(&format!(
		"INSERT INTO reminder_rules (tn_id, name, days_before, days_after, email_subject, email_body, active)
		VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {RULE_COLUMNS}"
	))
	.bind(tn_id.0)
	.bind(data.name)
	.bind(data.days_before)
	.bind(data.days_after)
	.bind(data.email_subject)
	.bind(data.email_body)
	.bind(data.active)
	.fetch_one(db)
	.await;

	map_res(res, |row| rule_from_row(&row))
}

pub(crate) async fn read(db: &SqlitePool, rule_id: i64) -> FtResult<ReminderRule> {
	let res = sqlx::query(&format!("SELECT {RULE_COLUMNS} FROM reminder_rules WHERE rule_id=?"))
		.bind(rule_id)
		.fetch_one(db)
		.await;

	map_res(res, |row| rule_from_row(&row))
}

pub(crate) async fn update(
	db: &SqlitePool,
	rule_id: i64,
	patch: &ReminderRulePatch,
) -> FtResult<ReminderRule> {
	if matches!(patch.name, Patch::Null)
		|| matches!(patch.email_subject, Patch::Null)
		|| matches!(patch.email_body, Patch::Null)
	{
		return Err(Error::ValidationError("required rule fields cannot be cleared".into()));
	}

	let mut query = sqlx::QueryBuilder::new("UPDATE reminder_rules SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "name", &patch.name, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "active", &patch.active);
	has_updates = push_patch!(query, has_updates, "days_before", &patch.days_before);
	has_updates = push_patch!(query, has_updates, "days_after", &patch.days_after);
	has_updates =
		push_patch!(query, has_updates, "email_subject", &patch.email_subject, |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "email_body", &patch.email_body, |v| v.as_ref());

	if !has_updates {
		return read(db, rule_id).await;
	}

	query
		.push(" WHERE rule_id=")
		.push_bind(rule_id)
		.push(" RETURNING ")
		.push(RULE_COLUMNS);
	let res = query.build().fetch_one(db).await;

	map_res(res, |row| rule_from_row(&row))
}

pub(crate) async fn list(db: &SqlitePool, tn_id: TnId) -> FtResult<Vec<ReminderRule>> {
	let res = sqlx::query(&format!(
		"SELECT {RULE_COLUMNS} FROM reminder_rules WHERE tn_id=? ORDER BY rule_id"
	))
	.bind(tn_id.0)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(rule_from_row))
}

// vim: ts=4
