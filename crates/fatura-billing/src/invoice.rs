//! Invoice lifecycle: CRUD, status transitions, and the audit trail.
//!
//! Every state change appends an `InvoiceEvent`. Deletion is a soft cancel;
//! rows never disappear while events reference them.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use fatura_core::extract::Auth;
use fatura_core::guard::assert_tenant;
use fatura_core::perm::{Permission, authorize};
use fatura_types::store_adapter::{
	Client, ClientSummary, CreateInvoiceData, Invoice, InvoiceEvent, InvoiceEventType,
	InvoicePatch, InvoiceStatus, InvoiceWithClient, ListInvoicesOptions, Recurrence,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvoicesQuery {
	pub status: Option<InvoiceStatus>,
	pub client_id: Option<i64>,
}

/// `GET /api/invoices`
pub async fn list_invoices(
	State(app): State<App>,
	Auth(auth): Auth,
	Query(query): Query<ListInvoicesQuery>,
) -> FtResult<(StatusCode, Json<Vec<InvoiceWithClient>>)> {
	authorize(&auth, Permission::ViewInvoice)?;
	let opts = ListInvoicesOptions { status: query.status, client_id: query.client_id };
	let invoices = app.store_adapter.list_invoices(auth.tn_id, &opts).await?;
	Ok((StatusCode::OK, Json(invoices)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
	pub client_id: i64,
	pub amount: Decimal,
	pub due_date: NaiveDate,
	pub description: Box<str>,
	pub notes: Option<Box<str>>,
	#[serde(default)]
	pub recurrence: Recurrence,
}

/// `POST /api/invoices`
///
/// The referenced client must belong to the caller's tenant; another
/// tenant's client id answers `NotFound`, indistinguishable from an id that
/// does not exist.
pub async fn post_invoice(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateInvoiceRequest>,
) -> FtResult<(StatusCode, Json<InvoiceWithClient>)> {
	authorize(&auth, Permission::CreateInvoice)?;
	if req.amount <= Decimal::ZERO {
		return Err(Error::ValidationError("amount must be positive".into()));
	}
	if req.description.is_empty() {
		return Err(Error::ValidationError("description is required".into()));
	}

	let client = app.store_adapter.read_client(req.client_id).await?;
	if client.tn_id != auth.tn_id {
		return Err(Error::NotFound);
	}

	let next_run_at = req.recurrence.next_run_after(req.due_date);
	let invoice = app
		.store_adapter
		.create_invoice(
			auth.tn_id,
			&CreateInvoiceData {
				client_id: req.client_id,
				amount: req.amount,
				due_date: req.due_date,
				description: &req.description,
				notes: req.notes.as_deref(),
				recurrence: req.recurrence,
				next_run_at,
			},
		)
		.await?;
	app.store_adapter
		.create_invoice_event(
			invoice.invoice_id,
			InvoiceEventType::Created,
			&format!("Fatura criada por {}", auth.name),
		)
		.await?;
	info!("Invoice {} created by {}", invoice.invoice_id, auth.name);

	let client = ClientSummary {
		client_id: client.client_id,
		name: client.name,
		email: client.email,
		document: client.document,
	};
	Ok((StatusCode::CREATED, Json(InvoiceWithClient { invoice, client })))
}

/// Invoice detail with client contact data and the newest-first audit trail
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
	#[serde(flatten)]
	pub invoice: Invoice,
	pub client: Client,
	pub events: Vec<InvoiceEvent>,
}

/// `GET /api/invoices/{id}`
pub async fn get_invoice(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(invoice_id): Path<i64>,
) -> FtResult<(StatusCode, Json<InvoiceDetail>)> {
	authorize(&auth, Permission::ViewInvoice)?;
	let invoice = app.store_adapter.read_invoice(invoice_id).await?;
	assert_tenant(&auth, invoice.tn_id)?;

	let client = app.store_adapter.read_client(invoice.client_id).await?;
	let events = app.store_adapter.list_invoice_events(invoice_id).await?;
	Ok((StatusCode::OK, Json(InvoiceDetail { invoice, client, events })))
}

/// Field patch accepted by `PATCH /api/invoices/{id}`. There is no `paid_at`
/// field: the server stamps it when a patch moves the status to PAID.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
	#[serde(default)]
	pub amount: Patch<Decimal>,
	#[serde(default)]
	pub due_date: Patch<NaiveDate>,
	#[serde(default)]
	pub description: Patch<Box<str>>,
	#[serde(default)]
	pub notes: Patch<Box<str>>,
	#[serde(default)]
	pub status: Patch<InvoiceStatus>,
}

/// `PATCH /api/invoices/{id}`
///
/// Status changes are validated against the transition table before anything
/// is written. Appends an UPDATED event regardless of which fields changed.
pub async fn patch_invoice(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(invoice_id): Path<i64>,
	Json(req): Json<UpdateInvoiceRequest>,
) -> FtResult<(StatusCode, Json<Invoice>)> {
	authorize(&auth, Permission::UpdateInvoice)?;
	let invoice = app.store_adapter.read_invoice(invoice_id).await?;
	assert_tenant(&auth, invoice.tn_id)?;

	if let Patch::Value(amount) = &req.amount {
		if *amount <= Decimal::ZERO {
			return Err(Error::ValidationError("amount must be positive".into()));
		}
	}
	let mut paid_at = Patch::Undefined;
	if let Patch::Value(status) = &req.status {
		if !invoice.status.can_transition(*status) {
			return Err(Error::ValidationError(format!(
				"invalid status transition: {} -> {}",
				invoice.status.as_str(),
				status.as_str()
			)));
		}
		if *status == InvoiceStatus::Paid && invoice.paid_at.is_none() {
			paid_at = Patch::Value(Timestamp::now());
		}
	}

	let patch = InvoicePatch {
		amount: req.amount,
		due_date: req.due_date,
		description: req.description,
		notes: req.notes,
		status: req.status,
		paid_at,
	};
	let updated = app.store_adapter.update_invoice(invoice_id, &patch).await?;
	app.store_adapter
		.create_invoice_event(
			invoice_id,
			InvoiceEventType::Updated,
			&format!("Fatura atualizada por {}", auth.name),
		)
		.await?;

	Ok((StatusCode::OK, Json(updated)))
}

/// `POST /api/invoices/{id}/mark-paid`
///
/// Valid from any status except CANCELLED. Marking an already paid invoice
/// is well defined: the fields are re-asserted and another PAID event is
/// appended.
pub async fn mark_paid(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(invoice_id): Path<i64>,
) -> FtResult<(StatusCode, Json<Invoice>)> {
	authorize(&auth, Permission::UpdateInvoice)?;
	let invoice = app.store_adapter.read_invoice(invoice_id).await?;
	assert_tenant(&auth, invoice.tn_id)?;

	if invoice.status == InvoiceStatus::Cancelled {
		return Err(Error::ValidationError("cancelled invoices cannot be marked paid".into()));
	}

	let patch = InvoicePatch {
		status: Patch::Value(InvoiceStatus::Paid),
		paid_at: Patch::Value(Timestamp::now()),
		..Default::default()
	};
	let updated = app.store_adapter.update_invoice(invoice_id, &patch).await?;
	app.store_adapter
		.create_invoice_event(
			invoice_id,
			InvoiceEventType::Paid,
			&format!("Fatura marcada como paga por {}", auth.name),
		)
		.await?;
	info!("Invoice {} marked paid by {}", invoice_id, auth.name);

	Ok((StatusCode::OK, Json(updated)))
}

/// `DELETE /api/invoices/{id}`
///
/// Soft cancel, validated against the transition table; a PAID invoice
/// cannot be cancelled.
pub async fn delete_invoice(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(invoice_id): Path<i64>,
) -> FtResult<(StatusCode, Json<serde_json::Value>)> {
	authorize(&auth, Permission::DeleteInvoice)?;
	let invoice = app.store_adapter.read_invoice(invoice_id).await?;
	assert_tenant(&auth, invoice.tn_id)?;

	if !invoice.status.can_transition(InvoiceStatus::Cancelled) {
		return Err(Error::ValidationError(format!(
			"invalid status transition: {} -> CANCELLED",
			invoice.status.as_str()
		)));
	}

	let patch =
		InvoicePatch { status: Patch::Value(InvoiceStatus::Cancelled), ..Default::default() };
	app.store_adapter.update_invoice(invoice_id, &patch).await?;
	app.store_adapter
		.create_invoice_event(
			invoice_id,
			InvoiceEventType::Cancelled,
			&format!("Fatura cancelada por {}", auth.name),
		)
		.await?;
	info!("Invoice {} cancelled by {}", invoice_id, auth.name);

	Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))))
}

// vim: ts=4
