//! The three-phase reminder run: match & enqueue, drain, overdue sweep.
//!
//! Each phase completes fully before the next begins, so the drain operates
//! on the outbox as left by the matcher and the overdue sweep never changes
//! the status a rule was matched against. Per-item failures are counted and
//! the run continues; failures at listing level abort the run.

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use crate::matcher;
use crate::prelude::*;
use crate::template::{self, RenderVars};
use fatura_types::store_adapter::{
	CreateOutboxEntry, EnqueueOutcome, InvoiceEventType, InvoiceWithClient, OutboxPatch,
	OutboxStatus, ReminderRule, Tenant,
};
use fatura_types::utils::{format_brl, format_date_br};

/// Counters reported by one job invocation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
	pub success: bool,
	/// Fresh reminder enqueues (same-day duplicates are not counted)
	pub processed: u32,
	pub sent: u32,
	pub failed: u32,
	pub errors: Vec<String>,
	pub timestamp: String,
}

/// Runs the dispatch job as of today (UTC).
pub async fn run(app: &App) -> FtResult<RunSummary> {
	run_at(app, Utc::now().date_naive()).await
}

/// Runs the dispatch job against an explicit calendar date.
pub async fn run_at(app: &App, today: NaiveDate) -> FtResult<RunSummary> {
	let mut summary = RunSummary {
		success: true,
		processed: 0,
		sent: 0,
		failed: 0,
		errors: Vec::new(),
		timestamp: String::new(),
	};

	enqueue_due_reminders(app, today, &mut summary).await?;
	drain_outbox(app, &mut summary).await?;

	let overdue = app.store_adapter.mark_invoices_overdue(today).await?;
	if overdue > 0 {
		info!("Overdue sweep: {} invoices flipped to OVERDUE", overdue);
	}

	info!(
		"Reminder run finished: processed {}, sent {}, failed {}",
		summary.processed, summary.sent, summary.failed
	);
	summary.timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
	Ok(summary)
}

/// Phase A. Walks every active tenant's open invoices against its active
/// rules and enqueues one outbox entry plus one audit event per fire.
async fn enqueue_due_reminders(
	app: &App,
	today: NaiveDate,
	summary: &mut RunSummary,
) -> FtResult<()> {
	let tenants = app.store_adapter.list_active_tenants().await?;
	debug!("Matching reminder rules for {} active tenants", tenants.len());

	for tenant in &tenants {
		if tenant.rules.is_empty() {
			continue;
		}
		let invoices = match app.store_adapter.list_open_invoices(tenant.tenant.tn_id).await {
			Ok(invoices) => invoices,
			Err(err) => {
				summary.failed += 1;
				summary.errors.push(format!("tenant {}: {err}", tenant.tenant.tn_id));
				continue;
			}
		};

		for invoice in &invoices {
			let days_diff = matcher::days_until_due(invoice.invoice.due_date, today);
			for rule in &tenant.rules {
				if !matcher::rule_fires(rule, days_diff) {
					continue;
				}
				match enqueue_reminder(app, &tenant.tenant, invoice, rule, days_diff, today).await
				{
					Ok(EnqueueOutcome::Created(_)) => summary.processed += 1,
					Ok(EnqueueOutcome::Duplicate) => {
						debug!(
							"Reminder already queued today: invoice {} rule {}",
							invoice.invoice.invoice_id, rule.rule_id
						);
					}
					Err(err) => {
						summary.failed += 1;
						summary
							.errors
							.push(format!("invoice {}: {err}", invoice.invoice.invoice_id));
					}
				}
			}
		}
	}
	Ok(())
}

/// Renders one reminder and enqueues it with a per-day idempotency key.
/// `Duplicate` means this (invoice, rule) pair already fired today; no
/// second audit event is written.
async fn enqueue_reminder(
	app: &App,
	tenant: &Tenant,
	invoice: &InvoiceWithClient,
	rule: &ReminderRule,
	days_diff: i64,
	today: NaiveDate,
) -> FtResult<EnqueueOutcome> {
	let amount = format_brl(invoice.invoice.amount);
	let due_date = format_date_br(invoice.invoice.due_date);
	let payment_link = app
		.opts
		.payment_link_base
		.as_deref()
		.map(|base| format!("{base}/{}", invoice.invoice.invoice_id));
	let vars = RenderVars {
		client_name: &invoice.client.name,
		tenant_name: &tenant.name,
		description: &invoice.invoice.description,
		amount: &amount,
		due_date: &due_date,
		days: Some(days_diff.abs()),
		payment_link: payment_link.as_deref(),
		pix_code: tenant.pix_key.as_deref(),
		contact: Some(tenant.phone.as_deref().unwrap_or(&tenant.email)),
		signature: None,
	};
	let subject = template::render(&rule.email_subject, &vars);
	let body = template::render(&rule.email_body, &vars);
	let dedup_key = format!("rem:{}:{}:{}", invoice.invoice.invoice_id, rule.rule_id, today);

	let outcome = app
		.store_adapter
		.create_outbox_entry(&CreateOutboxEntry {
			tn_id: tenant.tn_id,
			recipient: &invoice.client.email,
			subject: &subject,
			body: &body,
			dedup_key: Some(&dedup_key),
		})
		.await?;

	if let EnqueueOutcome::Created(outbox_id) = outcome {
		debug!(
			"Reminder queued: invoice {} rule {} outbox {}",
			invoice.invoice.invoice_id, rule.rule_id, outbox_id
		);
		app.store_adapter
			.create_invoice_event(
				invoice.invoice.invoice_id,
				InvoiceEventType::ReminderSent,
				&format!("Lembrete agendado: {}", rule.name),
			)
			.await?;
	}
	Ok(outcome)
}

/// Phase B. Claims one batch of queued entries and attempts delivery.
/// Failed deliveries go back to QUEUED until the attempt cap is reached,
/// then turn terminal FAILED.
async fn drain_outbox(app: &App, summary: &mut RunSummary) -> FtResult<()> {
	let batch = app
		.store_adapter
		.claim_queued_outbox(app.opts.outbox_batch_size, app.opts.outbox_max_attempts)
		.await?;
	if batch.is_empty() {
		return Ok(());
	}
	debug!("Draining {} outbox entries", batch.len());

	for entry in batch {
		match app.mail_adapter.send(&entry.recipient, &entry.subject, &entry.body).await {
			Ok(()) => {
				let patch = OutboxPatch {
					status: Patch::Value(OutboxStatus::Sent),
					sent_at: Patch::Value(Timestamp::now()),
					..Default::default()
				};
				match app.store_adapter.update_outbox_entry(entry.outbox_id, &patch).await {
					Ok(_) => summary.sent += 1,
					Err(err) => {
						summary.failed += 1;
						summary.errors.push(format!("email {}: {err}", entry.outbox_id));
					}
				}
			}
			Err(err) => {
				summary.failed += 1;
				summary.errors.push(format!("email {}: {err}", entry.outbox_id));

				// The claim already counted this attempt
				let status = if entry.attempts < app.opts.outbox_max_attempts {
					OutboxStatus::Queued
				} else {
					OutboxStatus::Failed
				};
				let patch = OutboxPatch {
					status: Patch::Value(status),
					last_error: Patch::Value(err.to_string().into()),
					..Default::default()
				};
				if let Err(err) =
					app.store_adapter.update_outbox_entry(entry.outbox_id, &patch).await
				{
					warn!(
						"Failed to record delivery failure for outbox {}: {err}",
						entry.outbox_id
					);
				}
			}
		}
	}
	Ok(())
}

// vim: ts=4
