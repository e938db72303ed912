//! Tenant persistence

use std::collections::HashMap;

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use fatura::prelude::*;
use fatura::store_adapter::{CreateTenantData, ReminderRule, Tenant, TenantWithRules};

use crate::rule::rule_from_row;
use crate::utils::*;

pub(crate) fn tenant_from_row(row: &SqliteRow) -> Result<Tenant, sqlx::Error> {
	Ok(Tenant {
		tn_id: TnId(row.try_get("tn_id")?),
		name: row.try_get("name")?,
		email: row.try_get("email")?,
		phone: row.try_get("phone")?,
		pix_key: row.try_get("pix_key")?,
		plan: decode_enum(row.try_get::<&str, _>("plan")?)?,
		active: row.try_get("active")?,
		created_at: row.try_get("created_at").map(Timestamp)?,
	})
}

pub(crate) async fn create(db: &SqlitePool, data: &CreateTenantData<'_>) -> FtResult<TnId> {
	let res = sqlx::query(
		"INSERT INTO tenants (name, email, phone, pix_key, plan)
		VALUES (?, ?, ?, ?, ?) RETURNING tn_id",
	)
	.bind(data.name)
	.bind(data.email)
	.bind(data.phone)
	.bind(data.pix_key)
	.bind(data.plan.as_str())
	.fetch_one(db)
	.await;

	map_res(res, |row| row.try_get("tn_id").map(TnId))
}

pub(crate) async fn read(db: &SqlitePool, tn_id: TnId) -> FtResult<Tenant> {
	let res = sqlx::query(
		"SELECT tn_id, name, email, phone, pix_key, plan, active, created_at
		FROM tenants WHERE tn_id=?",
	)
	.bind(tn_id.0)
	.fetch_one(db)
	.await;

	map_res(res, |row| tenant_from_row(&row))
}

pub(crate) async fn set_active(db: &SqlitePool, tn_id: TnId, active: bool) -> FtResult<()> {
	let res = sqlx::query("UPDATE tenants SET active=? WHERE tn_id=?")
		.bind(active)
		.bind(tn_id.0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Active tenants joined with their active reminder rules, in one pass
pub(crate) async fn list_active(db: &SqlitePool) -> FtResult<Vec<TenantWithRules>> {
	let res = sqlx::query(
		"SELECT tn_id, name, email, phone, pix_key, plan, active, created_at
		FROM tenants WHERE active ORDER BY tn_id",
	)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;
	let tenants = collect_res(res.iter().map(tenant_from_row))?;

	let res = sqlx::query(
		"SELECT r.rule_id, r.tn_id, r.name, r.days_before, r.days_after,
		r.email_subject, r.email_body, r.active, r.created_at
		FROM reminder_rules r
		JOIN tenants t ON t.tn_id=r.tn_id
		WHERE t.active AND r.active
		ORDER BY r.tn_id, r.rule_id",
	)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;
	let rules = collect_res(res.iter().map(rule_from_row))?;

	let mut by_tenant: HashMap<u32, Vec<ReminderRule>> = HashMap::new();
	for rule in rules {
		by_tenant.entry(rule.tn_id.0).or_default().push(rule);
	}

	Ok(tenants
		.into_iter()
		.map(|tenant| {
			let rules = by_tenant.remove(&tenant.tn_id.0).unwrap_or_default();
			TenantWithRules { tenant, rules }
		})
		.collect())
}

pub(crate) async fn count(db: &SqlitePool) -> FtResult<u32> {
	let res = sqlx::query("SELECT count(*) as count FROM tenants").fetch_one(db).await;

	map_res(res, |row| row.try_get("count"))
}

// vim: ts=4
