//! Handler-level billing flows over a real sqlite store.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;

use fatura_billing::{auth, client, export, invoice, rule, user};
use fatura_core::app::{App, AppOpts, AppState};
use fatura_core::extract::Auth;
use fatura_core::{crypto, token};
use fatura_store_adapter_sqlite::StoreAdapterSqlite;
use fatura_types::error::{Error, FtResult};
use fatura_types::mail_adapter::MailAdapter;
use fatura_types::store_adapter::{
	AuthCtx, ClientPatch, CreateClientData, CreateInvoiceData, CreateTenantData, CreateUserData,
	InvoiceEventType, InvoicePatch, InvoiceStatus, Plan, Recurrence, ReminderRulePatch, Role,
};
use fatura_types::types::{Patch, Timestamp, TnId};

/// Mail transport stub; the billing surface never sends anything.
#[derive(Debug)]
struct NoopMail;

#[async_trait]
impl MailAdapter for NoopMail {
	async fn send(&self, _to: &str, _subject: &str, _body: &str) -> FtResult<()> {
		Ok(())
	}
}

async fn create_test_app() -> (App, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = StoreAdapterSqlite::new(temp_dir.path().join("store.db"))
		.await
		.expect("Failed to create adapter");

	let app = Arc::new(AppState {
		opts: AppOpts {
			listen: "127.0.0.1:0".into(),
			token_secret: "test-secret".into(),
			token_expiry_secs: 3600,
			job_token: "job-secret".into(),
			payment_link_base: Some("https://pay.fatura.test".into()),
			seed_demo: false,
			outbox_batch_size: 50,
			outbox_max_attempts: 3,
		},
		store_adapter: Arc::new(store),
		mail_adapter: Arc::new(NoopMail),
	});
	(app, temp_dir)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(year, month, day).expect("Invalid date")
}

async fn seed_tenant(app: &App) -> TnId {
	app.store_adapter
		.create_tenant(&CreateTenantData {
			name: "Acme Cobranças",
			email: "contato@acme.com.br",
			phone: Some("(11) 98765-4321"),
			pix_key: None,
			plan: Plan::Pro,
		})
		.await
		.expect("Failed to create tenant")
}

async fn seed_second_tenant(app: &App) -> TnId {
	app.store_adapter
		.create_tenant(&CreateTenantData {
			name: "Beta Serviços",
			email: "contato@beta.com.br",
			phone: None,
			pix_key: None,
			plan: Plan::Free,
		})
		.await
		.expect("Failed to create tenant")
}

fn admin(tn_id: TnId) -> AuthCtx {
	AuthCtx { tn_id, user_id: 1, name: "Admin Demo".into(), role: Role::Admin }
}

fn manager(tn_id: TnId) -> AuthCtx {
	AuthCtx { tn_id, user_id: 2, name: "Gerente Demo".into(), role: Role::Manager }
}

async fn seed_client(app: &App, tn_id: TnId) -> i64 {
	app.store_adapter
		.create_client(
			tn_id,
			&CreateClientData {
				name: "João Silva",
				email: "joao@example.com",
				phone: None,
				document: Some("123.456.789-00"),
				address: None,
				notes: None,
			},
		)
		.await
		.expect("Failed to create client")
		.client_id
}

async fn seed_invoice(app: &App, tn_id: TnId, client_id: i64) -> i64 {
	app.store_adapter
		.create_invoice(
			tn_id,
			&CreateInvoiceData {
				client_id,
				amount: Decimal::new(15000, 2),
				due_date: date(2025, 6, 15),
				description: "Mensalidade de manutenção",
				notes: None,
				recurrence: Recurrence::None,
				next_run_at: None,
			},
		)
		.await
		.expect("Failed to create invoice")
		.invoice_id
}

// Auth //
//******//

#[tokio::test]
async fn test_login_issues_verifiable_token() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let hash = crypto::generate_password_hash("admin123".into())
		.await
		.expect("Failed to hash password");
	app.store_adapter
		.create_user(
			tn_id,
			&CreateUserData {
				name: "Admin Demo",
				email: "admin@demo.com",
				password_hash: &hash,
				role: Role::Admin,
			},
		)
		.await
		.expect("Failed to create user");

	let (status, Json(response)) = auth::post_login(
		State(app.clone()),
		Json(auth::LoginRequest { email: "admin@demo.com".into(), password: "admin123".into() }),
	)
	.await
	.expect("Login failed");

	assert_eq!(status, StatusCode::OK);
	assert_eq!(response.user.email.as_ref(), "admin@demo.com");
	assert_eq!(response.user.role, Role::Admin);

	let ctx = token::verify_access_token(&response.token, "test-secret")
		.expect("Token should verify against the app secret");
	assert_eq!(ctx.tn_id, tn_id);
	assert_eq!(ctx.name.as_ref(), "Admin Demo");
	assert_eq!(ctx.role, Role::Admin);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let hash = crypto::generate_password_hash("admin123".into())
		.await
		.expect("Failed to hash password");
	app.store_adapter
		.create_user(
			tn_id,
			&CreateUserData {
				name: "Admin Demo",
				email: "admin@demo.com",
				password_hash: &hash,
				role: Role::Admin,
			},
		)
		.await
		.expect("Failed to create user");

	let wrong_password = auth::post_login(
		State(app.clone()),
		Json(auth::LoginRequest { email: "admin@demo.com".into(), password: "wrong".into() }),
	)
	.await;
	assert!(matches!(wrong_password, Err(Error::Unauthorized)));

	// Unknown accounts answer exactly like wrong passwords
	let unknown_email = auth::post_login(
		State(app.clone()),
		Json(auth::LoginRequest { email: "nobody@demo.com".into(), password: "admin123".into() }),
	)
	.await;
	assert!(matches!(unknown_email, Err(Error::Unauthorized)));
}

// Users //
//*******//

#[tokio::test]
async fn test_user_creation_is_admin_only() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;

	let denied = user::post_user(
		State(app.clone()),
		Auth(manager(tn_id)),
		Json(user::CreateUserRequest {
			name: "Novo Usuário".into(),
			email: "novo@demo.com".into(),
			password: "senha123".into(),
			role: Role::Manager,
		}),
	)
	.await;
	assert!(matches!(denied, Err(Error::PermissionDenied)));

	let (status, Json(created)) = user::post_user(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(user::CreateUserRequest {
			name: "Novo Usuário".into(),
			email: "novo@demo.com".into(),
			password: "senha123".into(),
			role: Role::Manager,
		}),
	)
	.await
	.expect("Create user failed");
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(created.tn_id, tn_id);
	assert_eq!(created.role, Role::Manager);

	let (_, Json(users)) =
		user::list_users(State(app.clone()), Auth(admin(tn_id))).await.expect("List users failed");
	assert_eq!(users.len(), 1);

	let denied = user::list_users(State(app.clone()), Auth(manager(tn_id))).await;
	assert!(matches!(denied, Err(Error::PermissionDenied)));
}

// Clients //
//*********//

#[tokio::test]
async fn test_client_create_validates_fields() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;

	let no_name = client::post_client(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(client::CreateClientRequest {
			name: "".into(),
			email: "joao@example.com".into(),
			phone: None,
			document: None,
			address: None,
			notes: None,
		}),
	)
	.await;
	match no_name {
		Err(Error::ValidationError(msg)) => assert_eq!(msg, "Nome é obrigatório"),
		other => panic!("Expected validation error, got {other:?}"),
	}

	let bad_email = client::post_client(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(client::CreateClientRequest {
			name: "João Silva".into(),
			email: "not-an-email".into(),
			phone: None,
			document: None,
			address: None,
			notes: None,
		}),
	)
	.await;
	match bad_email {
		Err(Error::ValidationError(msg)) => assert_eq!(msg, "Email inválido"),
		other => panic!("Expected validation error, got {other:?}"),
	}
}

#[tokio::test]
async fn test_client_search_and_detail() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;

	let (status, Json(joao)) = client::post_client(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(client::CreateClientRequest {
			name: "João Silva".into(),
			email: "joao@example.com".into(),
			phone: None,
			document: Some("123.456.789-00".into()),
			address: None,
			notes: None,
		}),
	)
	.await
	.expect("Create client failed");
	assert_eq!(status, StatusCode::CREATED);

	client::post_client(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(client::CreateClientRequest {
			name: "Maria Santos".into(),
			email: "maria@example.com".into(),
			phone: None,
			document: None,
			address: None,
			notes: None,
		}),
	)
	.await
	.expect("Create client failed");

	let (_, Json(all)) = client::list_clients(
		State(app.clone()),
		Auth(admin(tn_id)),
		Query(client::ListClientsQuery::default()),
	)
	.await
	.expect("List clients failed");
	assert_eq!(all.len(), 2);
	assert_eq!(all[0].name.as_ref(), "João Silva");

	let (_, Json(by_name)) = client::list_clients(
		State(app.clone()),
		Auth(admin(tn_id)),
		Query(client::ListClientsQuery { search: Some("Silva".to_string()) }),
	)
	.await
	.expect("Search failed");
	assert_eq!(by_name.len(), 1);
	assert_eq!(by_name[0].email.as_ref(), "joao@example.com");

	let (_, Json(by_document)) = client::list_clients(
		State(app.clone()),
		Auth(admin(tn_id)),
		Query(client::ListClientsQuery { search: Some("789-00".to_string()) }),
	)
	.await
	.expect("Search failed");
	assert_eq!(by_document.len(), 1);

	seed_invoice(&app, tn_id, joao.client_id).await;
	let (status, Json(detail)) =
		client::get_client(State(app.clone()), Auth(admin(tn_id)), Path(joao.client_id))
			.await
			.expect("Client detail failed");
	assert_eq!(status, StatusCode::OK);
	assert_eq!(detail.client.client_id, joao.client_id);
	assert_eq!(detail.invoices.len(), 1);
	assert_eq!(detail.invoices[0].description.as_ref(), "Mensalidade de manutenção");
}

#[tokio::test]
async fn test_client_soft_delete() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;

	let denied =
		client::delete_client(State(app.clone()), Auth(manager(tn_id)), Path(client_id)).await;
	assert!(matches!(denied, Err(Error::PermissionDenied)));

	let (status, Json(body)) =
		client::delete_client(State(app.clone()), Auth(admin(tn_id)), Path(client_id))
			.await
			.expect("Delete failed");
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, serde_json::json!({ "success": true }));

	let (_, Json(listed)) = client::list_clients(
		State(app.clone()),
		Auth(admin(tn_id)),
		Query(client::ListClientsQuery::default()),
	)
	.await
	.expect("List clients failed");
	assert!(listed.is_empty());

	// The row survives for invoice and event history
	let row = app.store_adapter.read_client(client_id).await.expect("Client row should remain");
	assert!(!row.active);
}

// Tenant isolation //
//******************//

#[tokio::test]
async fn test_cross_tenant_access_is_rejected() {
	let (app, _dir) = create_test_app().await;
	let tn_a = seed_tenant(&app).await;
	let tn_b = seed_second_tenant(&app).await;
	let client_a = seed_client(&app, tn_a).await;
	let invoice_a = seed_invoice(&app, tn_a, client_a).await;

	let read =
		client::get_client(State(app.clone()), Auth(admin(tn_b)), Path(client_a)).await;
	assert!(matches!(read, Err(Error::PermissionDenied)));

	let patched = client::patch_client(
		State(app.clone()),
		Auth(admin(tn_b)),
		Path(client_a),
		Json(ClientPatch::default()),
	)
	.await;
	assert!(matches!(patched, Err(Error::PermissionDenied)));

	let read = invoice::get_invoice(State(app.clone()), Auth(admin(tn_b)), Path(invoice_a)).await;
	assert!(matches!(read, Err(Error::PermissionDenied)));

	let paid = invoice::mark_paid(State(app.clone()), Auth(admin(tn_b)), Path(invoice_a)).await;
	assert!(matches!(paid, Err(Error::PermissionDenied)));

	// Another tenant's client id looks like a missing client, not a forbidden one
	let created = invoice::post_invoice(
		State(app.clone()),
		Auth(admin(tn_b)),
		Json(invoice::CreateInvoiceRequest {
			client_id: client_a,
			amount: Decimal::new(10000, 2),
			due_date: date(2025, 7, 1),
			description: "Consultoria".into(),
			notes: None,
			recurrence: Recurrence::None,
		}),
	)
	.await;
	assert!(matches!(created, Err(Error::NotFound)));

	let (_, Json(invoices)) = invoice::list_invoices(
		State(app.clone()),
		Auth(admin(tn_b)),
		Query(invoice::ListInvoicesQuery::default()),
	)
	.await
	.expect("List invoices failed");
	assert!(invoices.is_empty());
}

// Invoices //
//**********//

#[tokio::test]
async fn test_invoice_create_happy_path() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;

	let (status, Json(created)) = invoice::post_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(invoice::CreateInvoiceRequest {
			client_id,
			amount: Decimal::new(15000, 2),
			due_date: date(2025, 1, 31),
			description: "Mensalidade de manutenção".into(),
			notes: None,
			recurrence: Recurrence::Monthly,
		}),
	)
	.await
	.expect("Create invoice failed");

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(created.invoice.status, InvoiceStatus::Pending);
	assert_eq!(created.invoice.amount, Decimal::new(15000, 2));
	// Month arithmetic clamps at month end
	assert_eq!(created.invoice.next_run_at, Some(date(2025, 2, 28)));
	assert_eq!(created.client.name.as_ref(), "João Silva");

	let events = app
		.store_adapter
		.list_invoice_events(created.invoice.invoice_id)
		.await
		.expect("List events failed");
	assert_eq!(events.len(), 1);
	assert_eq!(events[0].typ, InvoiceEventType::Created);
	assert_eq!(events[0].description.as_ref(), "Fatura criada por Admin Demo");
}

#[tokio::test]
async fn test_invoice_create_rejects_bad_input() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;

	let zero_amount = invoice::post_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(invoice::CreateInvoiceRequest {
			client_id,
			amount: Decimal::ZERO,
			due_date: date(2025, 7, 1),
			description: "Consultoria".into(),
			notes: None,
			recurrence: Recurrence::None,
		}),
	)
	.await;
	assert!(matches!(zero_amount, Err(Error::ValidationError(_))));

	let empty_description = invoice::post_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(invoice::CreateInvoiceRequest {
			client_id,
			amount: Decimal::new(10000, 2),
			due_date: date(2025, 7, 1),
			description: "".into(),
			notes: None,
			recurrence: Recurrence::None,
		}),
	)
	.await;
	assert!(matches!(empty_description, Err(Error::ValidationError(_))));

	let missing_client = invoice::post_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(invoice::CreateInvoiceRequest {
			client_id: 999,
			amount: Decimal::new(10000, 2),
			due_date: date(2025, 7, 1),
			description: "Consultoria".into(),
			notes: None,
			recurrence: Recurrence::None,
		}),
	)
	.await;
	assert!(matches!(missing_client, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_invoice_patch_validates_transitions() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;
	let invoice_id = seed_invoice(&app, tn_id, client_id).await;

	let (_, Json(updated)) = invoice::patch_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Path(invoice_id),
		Json(invoice::UpdateInvoiceRequest {
			status: Patch::Value(InvoiceStatus::Paid),
			..Default::default()
		}),
	)
	.await
	.expect("Patch failed");
	assert_eq!(updated.status, InvoiceStatus::Paid);
	assert!(updated.paid_at.is_some());

	let backward = invoice::patch_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Path(invoice_id),
		Json(invoice::UpdateInvoiceRequest {
			status: Patch::Value(InvoiceStatus::Pending),
			..Default::default()
		}),
	)
	.await;
	assert!(matches!(backward, Err(Error::ValidationError(_))));

	let negative_amount = invoice::patch_invoice(
		State(app.clone()),
		Auth(admin(tn_id)),
		Path(invoice_id),
		Json(invoice::UpdateInvoiceRequest {
			amount: Patch::Value(Decimal::new(-500, 2)),
			..Default::default()
		}),
	)
	.await;
	assert!(matches!(negative_amount, Err(Error::ValidationError(_))));

	let events =
		app.store_adapter.list_invoice_events(invoice_id).await.expect("List events failed");
	let updated_events = events.iter().filter(|event| event.typ == InvoiceEventType::Updated);
	assert_eq!(updated_events.count(), 1);
	assert_eq!(events[0].description.as_ref(), "Fatura atualizada por Admin Demo");
}

#[tokio::test]
async fn test_mark_paid_flow() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;
	let invoice_id = seed_invoice(&app, tn_id, client_id).await;

	let (status, Json(paid)) =
		invoice::mark_paid(State(app.clone()), Auth(admin(tn_id)), Path(invoice_id))
			.await
			.expect("Mark paid failed");
	assert_eq!(status, StatusCode::OK);
	assert_eq!(paid.status, InvoiceStatus::Paid);
	assert!(paid.paid_at.is_some());

	// Marking again is allowed and appends a second PAID event
	invoice::mark_paid(State(app.clone()), Auth(admin(tn_id)), Path(invoice_id))
		.await
		.expect("Repeated mark-paid failed");
	let events =
		app.store_adapter.list_invoice_events(invoice_id).await.expect("List events failed");
	let paid_events = events.iter().filter(|event| event.typ == InvoiceEventType::Paid).count();
	assert_eq!(paid_events, 2);
	assert_eq!(events[0].description.as_ref(), "Fatura marcada como paga por Admin Demo");

	let cancelled_id = seed_invoice(&app, tn_id, client_id).await;
	app.store_adapter
		.update_invoice(
			cancelled_id,
			&InvoicePatch {
				status: Patch::Value(InvoiceStatus::Cancelled),
				..Default::default()
			},
		)
		.await
		.expect("Cancel failed");
	let rejected =
		invoice::mark_paid(State(app.clone()), Auth(admin(tn_id)), Path(cancelled_id)).await;
	assert!(matches!(rejected, Err(Error::ValidationError(_))));
}

#[tokio::test]
async fn test_invoice_soft_cancel() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;
	let invoice_id = seed_invoice(&app, tn_id, client_id).await;

	let denied =
		invoice::delete_invoice(State(app.clone()), Auth(manager(tn_id)), Path(invoice_id)).await;
	assert!(matches!(denied, Err(Error::PermissionDenied)));

	let (status, Json(body)) =
		invoice::delete_invoice(State(app.clone()), Auth(admin(tn_id)), Path(invoice_id))
			.await
			.expect("Cancel failed");
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, serde_json::json!({ "success": true }));

	let row = app.store_adapter.read_invoice(invoice_id).await.expect("Read failed");
	assert_eq!(row.status, InvoiceStatus::Cancelled);
	let events =
		app.store_adapter.list_invoice_events(invoice_id).await.expect("List events failed");
	assert_eq!(events[0].typ, InvoiceEventType::Cancelled);
	assert_eq!(events[0].description.as_ref(), "Fatura cancelada por Admin Demo");

	// PAID is a dead end for cancellation
	let paid_id = seed_invoice(&app, tn_id, client_id).await;
	invoice::mark_paid(State(app.clone()), Auth(admin(tn_id)), Path(paid_id))
		.await
		.expect("Mark paid failed");
	let rejected =
		invoice::delete_invoice(State(app.clone()), Auth(admin(tn_id)), Path(paid_id)).await;
	assert!(matches!(rejected, Err(Error::ValidationError(_))));
}

// Export //
//********//

#[tokio::test]
async fn test_export_csv_endpoint() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;
	let client_id = seed_client(&app, tn_id).await;
	let open_id = seed_invoice(&app, tn_id, client_id).await;

	let paid_id = app
		.store_adapter
		.create_invoice(
			tn_id,
			&CreateInvoiceData {
				client_id,
				amount: Decimal::new(25000, 2),
				due_date: date(2025, 5, 1),
				description: "Serviço \"premium\" mensal",
				notes: None,
				recurrence: Recurrence::None,
				next_run_at: None,
			},
		)
		.await
		.expect("Failed to create invoice")
		.invoice_id;
	// 2023-11-14T22:13:20Z
	app.store_adapter
		.update_invoice(
			paid_id,
			&InvoicePatch {
				status: Patch::Value(InvoiceStatus::Paid),
				paid_at: Patch::Value(Timestamp(1700000000)),
				..Default::default()
			},
		)
		.await
		.expect("Mark paid failed");

	let response = export::export_invoices(State(app.clone()), Auth(admin(tn_id)))
		.await
		.expect("Export failed");
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		response.headers().get("content-type").and_then(|value| value.to_str().ok()),
		Some("text/csv; charset=utf-8")
	);
	let disposition = response
		.headers()
		.get("content-disposition")
		.and_then(|value| value.to_str().ok())
		.expect("Disposition header missing");
	assert!(disposition.starts_with("attachment; filename=\"faturas-"));
	assert!(disposition.ends_with(".csv\""));

	let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
		.await
		.expect("Failed to read body");
	let csv = String::from_utf8(body.to_vec()).expect("CSV should be UTF-8");
	let lines: Vec<&str> = csv.split('\n').collect();

	assert_eq!(lines.len(), 3);
	assert_eq!(lines[0], "ID,Cliente,Email,Documento,Valor,Vencimento,Status,Descrição,Pago em");
	// Listing orders by due date descending, so the open invoice comes first
	assert_eq!(
		lines[1],
		format!(
			"{open_id},João Silva,joao@example.com,123.456.789-00,150.00,15/06/2025,PENDING,\"Mensalidade de manutenção\","
		)
	);
	assert_eq!(
		lines[2],
		format!(
			"{paid_id},João Silva,joao@example.com,123.456.789-00,250.00,01/05/2025,PAID,\"Serviço \"\"premium\"\" mensal\",14/11/2023 22:13"
		)
	);
}

// Reminder rules //
//****************//

#[tokio::test]
async fn test_rule_create_defaults_and_patch() {
	let (app, _dir) = create_test_app().await;
	let tn_id = seed_tenant(&app).await;

	let (status, Json(created)) = rule::post_rule(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(rule::CreateRuleRequest {
			name: "Cobrança 5 dias após".into(),
			active: true,
			days_before: None,
			days_after: Some(5),
			email_subject: None,
			email_body: None,
		}),
	)
	.await
	.expect("Create rule failed");
	assert_eq!(status, StatusCode::CREATED);
	// Offset of 5 days past due falls back to the escalated preset
	assert_eq!(created.email_subject.as_ref(), "Aviso: regularização pendente – {DESCRICAO}");
	assert!(created.email_body.contains("{LINK_PAGAMENTO}"));

	let (_, Json(custom)) = rule::post_rule(
		State(app.clone()),
		Auth(admin(tn_id)),
		Json(rule::CreateRuleRequest {
			name: "Aviso personalizado".into(),
			active: true,
			days_before: Some(3),
			days_after: None,
			email_subject: Some("Olá {NOME_CLIENTE}".into()),
			email_body: Some("Corpo próprio".into()),
		}),
	)
	.await
	.expect("Create rule failed");
	assert_eq!(custom.email_subject.as_ref(), "Olá {NOME_CLIENTE}");
	assert_eq!(custom.email_body.as_ref(), "Corpo próprio");

	let (_, Json(updated)) = rule::patch_rule(
		State(app.clone()),
		Auth(admin(tn_id)),
		Path(created.rule_id),
		Json(ReminderRulePatch { active: Patch::Value(false), ..Default::default() }),
	)
	.await
	.expect("Patch rule failed");
	assert!(!updated.active);

	let denied = rule::list_rules(State(app.clone()), Auth(manager(tn_id))).await;
	assert!(matches!(denied, Err(Error::PermissionDenied)));

	let (_, Json(rules)) =
		rule::list_rules(State(app.clone()), Auth(admin(tn_id))).await.expect("List rules failed");
	assert_eq!(rules.len(), 2);
}

// vim: ts=4
