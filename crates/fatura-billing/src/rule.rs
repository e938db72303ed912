//! Reminder-rule management.

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::prelude::*;
use crate::validate::validate_name;
use fatura_core::extract::Auth;
use fatura_core::guard::assert_tenant;
use fatura_core::perm::{Permission, authorize};
use fatura_reminder::preset_for_offset;
use fatura_types::store_adapter::{CreateReminderRuleData, ReminderRule, ReminderRulePatch};

/// `GET /api/reminder-rules`
pub async fn list_rules(
	State(app): State<App>,
	Auth(auth): Auth,
) -> FtResult<(StatusCode, Json<Vec<ReminderRule>>)> {
	authorize(&auth, Permission::ManageSettings)?;
	let rules = app.store_adapter.list_reminder_rules(auth.tn_id).await?;
	Ok((StatusCode::OK, Json(rules)))
}

fn default_active() -> bool {
	true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
	pub name: Box<str>,
	#[serde(default = "default_active")]
	pub active: bool,
	pub days_before: Option<u32>,
	pub days_after: Option<u32>,
	pub email_subject: Option<Box<str>>,
	pub email_body: Option<Box<str>>,
}

/// `POST /api/reminder-rules`
///
/// Subject and body fall back to the built-in preset matching the rule's day
/// offset, so a rule created from a bare offset is immediately usable.
pub async fn post_rule(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateRuleRequest>,
) -> FtResult<(StatusCode, Json<ReminderRule>)> {
	authorize(&auth, Permission::ManageSettings)?;
	validate_name(&req.name)?;

	let preset = preset_for_offset(req.days_before, req.days_after);
	let email_subject = req.email_subject.as_deref().unwrap_or(preset.subject);
	let email_body = req.email_body.as_deref().unwrap_or(preset.body);

	let rule = app
		.store_adapter
		.create_reminder_rule(
			auth.tn_id,
			&CreateReminderRuleData {
				name: &req.name,
				active: req.active,
				days_before: req.days_before,
				days_after: req.days_after,
				email_subject,
				email_body,
			},
		)
		.await?;
	info!("Reminder rule {} ({}) created by {}", rule.rule_id, rule.name, auth.name);

	Ok((StatusCode::CREATED, Json(rule)))
}

/// `PATCH /api/reminder-rules/{id}`
pub async fn patch_rule(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(rule_id): Path<i64>,
	Json(patch): Json<ReminderRulePatch>,
) -> FtResult<(StatusCode, Json<ReminderRule>)> {
	authorize(&auth, Permission::ManageSettings)?;
	let rule = app.store_adapter.read_reminder_rule(rule_id).await?;
	assert_tenant(&auth, rule.tn_id)?;

	if let Patch::Value(name) = &patch.name {
		validate_name(name)?;
	}

	let updated = app.store_adapter.update_reminder_rule(rule_id, &patch).await?;
	Ok((StatusCode::OK, Json(updated)))
}

// vim: ts=4
