//! First-start demo data.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use fatura_core::crypto;
use fatura_core::prelude::*;
use fatura_reminder::preset_for_offset;
use fatura_types::store_adapter::{
	CreateClientData, CreateInvoiceData, CreateReminderRuleData, CreateTenantData, CreateUserData,
	InvoicePatch, InvoiceStatus, Plan, Recurrence, Role,
};

/// Seeds a demo tenant with users, clients, invoices, and reminder rules.
/// Runs only when enabled and the store has no tenants yet, so it is safe
/// to call on every start.
pub async fn seed_demo_data(app: &App) -> FtResult<()> {
	if !app.opts.seed_demo {
		return Ok(());
	}
	if app.store_adapter.count_tenants().await? > 0 {
		debug!("Demo seed skipped: store already has tenants");
		return Ok(());
	}
	info!("Seeding demo data");

	let tn_id = app
		.store_adapter
		.create_tenant(&CreateTenantData {
			name: "Empresa Demo",
			email: "demo@fatura.app",
			phone: Some("(11) 99999-9999"),
			pix_key: None,
			plan: Plan::Pro,
		})
		.await?;

	let password_hash = crypto::generate_password_hash("admin123".into()).await?;
	app.store_adapter
		.create_user(
			tn_id,
			&CreateUserData {
				name: "Admin Demo",
				email: "admin@demo.com",
				password_hash: &password_hash,
				role: Role::Admin,
			},
		)
		.await?;
	app.store_adapter
		.create_user(
			tn_id,
			&CreateUserData {
				name: "Gerente Demo",
				email: "manager@demo.com",
				password_hash: &password_hash,
				role: Role::Manager,
			},
		)
		.await?;

	let joao = app
		.store_adapter
		.create_client(
			tn_id,
			&CreateClientData {
				name: "João Silva",
				email: "joao@example.com",
				phone: Some("(11) 98888-7777"),
				document: Some("123.456.789-00"),
				address: None,
				notes: None,
			},
		)
		.await?;
	let maria = app
		.store_adapter
		.create_client(
			tn_id,
			&CreateClientData {
				name: "Maria Santos",
				email: "maria@example.com",
				phone: Some("(11) 97777-6666"),
				document: Some("987.654.321-00"),
				address: None,
				notes: None,
			},
		)
		.await?;

	// One invoice due tomorrow on a monthly cycle, one due next week, and
	// last month's cycle already overdue.
	let today = Utc::now().date_naive();
	let due_tomorrow = today + Duration::days(1);
	app.store_adapter
		.create_invoice(
			tn_id,
			&CreateInvoiceData {
				client_id: joao.client_id,
				amount: Decimal::new(15000, 2),
				due_date: due_tomorrow,
				description: "Mensalidade de manutenção",
				notes: None,
				recurrence: Recurrence::Monthly,
				next_run_at: Recurrence::Monthly.next_run_after(due_tomorrow),
			},
		)
		.await?;
	app.store_adapter
		.create_invoice(
			tn_id,
			&CreateInvoiceData {
				client_id: maria.client_id,
				amount: Decimal::new(25000, 2),
				due_date: today + Duration::days(7),
				description: "Serviço de Consultoria",
				notes: None,
				recurrence: Recurrence::None,
				next_run_at: None,
			},
		)
		.await?;
	let overdue = app
		.store_adapter
		.create_invoice(
			tn_id,
			&CreateInvoiceData {
				client_id: joao.client_id,
				amount: Decimal::new(15000, 2),
				due_date: today - Duration::days(7),
				description: "Mensalidade de manutenção",
				notes: None,
				recurrence: Recurrence::None,
				next_run_at: None,
			},
		)
		.await?;
	app.store_adapter
		.update_invoice(
			overdue.invoice_id,
			&InvoicePatch { status: Patch::Value(InvoiceStatus::Overdue), ..Default::default() },
		)
		.await?;

	let rules = [
		("3 dias antes do vencimento", Some(3), None),
		("No dia do vencimento", Some(0), None),
		("3 dias após vencimento", None, Some(3)),
	];
	for (name, days_before, days_after) in rules {
		let preset = preset_for_offset(days_before, days_after);
		app.store_adapter
			.create_reminder_rule(
				tn_id,
				&CreateReminderRuleData {
					name,
					active: true,
					days_before,
					days_after,
					email_subject: preset.subject,
					email_body: preset.body,
				},
			)
			.await?;
	}

	info!("Demo tenant ready; log in as admin@demo.com / admin123");
	Ok(())
}

// vim: ts=4
