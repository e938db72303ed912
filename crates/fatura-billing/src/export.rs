//! CSV export of the tenant's invoices.

use axum::{
	extract::State,
	http::{StatusCode, header},
	response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::prelude::*;
use fatura_core::extract::Auth;
use fatura_core::perm::{Permission, authorize};
use fatura_types::store_adapter::{InvoiceWithClient, ListInvoicesOptions};
use fatura_types::utils::format_date_br;

const CSV_HEADER: &str = "ID,Cliente,Email,Documento,Valor,Vencimento,Status,Descrição,Pago em";

/// `GET /api/invoices/export`
///
/// Spreadsheet-oriented rendering: only the free-text description is quoted,
/// dates are `dd/MM/yyyy`, the amount keeps its raw decimal form.
pub async fn export_invoices(State(app): State<App>, Auth(auth): Auth) -> FtResult<Response> {
	authorize(&auth, Permission::ExportData)?;
	let invoices =
		app.store_adapter.list_invoices(auth.tn_id, &ListInvoicesOptions::default()).await?;
	let csv = render_csv(&invoices);
	info!("Exported {} invoices for tenant {}", invoices.len(), auth.tn_id);

	let filename = format!("faturas-{}.csv", Utc::now().date_naive());
	Ok((
		StatusCode::OK,
		[
			(header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
			(header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
		],
		csv,
	)
		.into_response())
}

fn render_csv(invoices: &[InvoiceWithClient]) -> String {
	let mut lines = Vec::with_capacity(invoices.len() + 1);
	lines.push(CSV_HEADER.to_string());
	for row in invoices {
		let invoice = &row.invoice;
		let paid_at = invoice.paid_at.and_then(format_paid_at).unwrap_or_default();
		lines.push(format!(
			"{},{},{},{},{},{},{},\"{}\",{}",
			invoice.invoice_id,
			row.client.name,
			row.client.email,
			row.client.document.as_deref().unwrap_or(""),
			invoice.amount,
			format_date_br(invoice.due_date),
			invoice.status.as_str(),
			invoice.description.replace('"', "\"\""),
			paid_at,
		));
	}
	lines.join("\n")
}

fn format_paid_at(ts: Timestamp) -> Option<String> {
	chrono::DateTime::from_timestamp(ts.0, 0).map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
}


// vim: ts=4
