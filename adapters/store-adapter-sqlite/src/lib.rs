//! SQLite implementation of the Fatura store adapter
//!
//! One pool, WAL journal, schema created on first open. All row mapping and
//! query building lives in the per-domain modules; this file only wires the
//! trait surface to them.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use fatura::prelude::*;
use fatura::store_adapter::{
	Client, ClientPatch, CreateClientData, CreateInvoiceData, CreateOutboxEntry,
	CreateReminderRuleData, CreateTenantData, CreateUserData, EnqueueOutcome, Invoice,
	InvoiceEvent, InvoiceEventType, InvoicePatch, InvoiceWithClient, ListClientsOptions,
	ListInvoicesOptions, OutboxEntry, OutboxPatch, ReminderRule, ReminderRulePatch, StoreAdapter,
	Tenant, TenantWithRules, User, UserAuthRecord,
};

mod client;
mod invoice;
mod outbox;
mod rule;
mod schema;
mod tenant;
mod user;
mod utils;

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> FtResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DB open: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DB init: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	// Tenant management
	//*******************
	async fn create_tenant(&self, data: &CreateTenantData<'_>) -> FtResult<TnId> {
		tenant::create(&self.db, data).await
	}

	async fn read_tenant(&self, tn_id: TnId) -> FtResult<Tenant> {
		tenant::read(&self.db, tn_id).await
	}

	async fn set_tenant_active(&self, tn_id: TnId, active: bool) -> FtResult<()> {
		tenant::set_active(&self.db, tn_id, active).await
	}

	async fn list_active_tenants(&self) -> FtResult<Vec<TenantWithRules>> {
		tenant::list_active(&self.db).await
	}

	async fn count_tenants(&self) -> FtResult<u32> {
		tenant::count(&self.db).await
	}

	// User management
	//*****************
	async fn create_user(&self, tn_id: TnId, data: &CreateUserData<'_>) -> FtResult<User> {
		user::create(&self.db, tn_id, data).await
	}

	async fn read_user_auth(&self, email: &str) -> FtResult<UserAuthRecord> {
		user::read_auth(&self.db, email).await
	}

	async fn list_users(&self, tn_id: TnId) -> FtResult<Vec<User>> {
		user::list(&self.db, tn_id).await
	}

	// Client management
	//*******************
	async fn create_client(&self, tn_id: TnId, data: &CreateClientData<'_>) -> FtResult<Client> {
		client::create(&self.db, tn_id, data).await
	}

	async fn read_client(&self, client_id: i64) -> FtResult<Client> {
		client::read(&self.db, client_id).await
	}

	async fn update_client(&self, client_id: i64, patch: &ClientPatch) -> FtResult<Client> {
		client::update(&self.db, client_id, patch).await
	}

	async fn list_clients(
		&self,
		tn_id: TnId,
		opts: &ListClientsOptions<'_>,
	) -> FtResult<Vec<Client>> {
		client::list(&self.db, tn_id, opts).await
	}

	// Invoice management
	//********************
	async fn create_invoice(
		&self,
		tn_id: TnId,
		data: &CreateInvoiceData<'_>,
	) -> FtResult<Invoice> {
		invoice::create(&self.db, tn_id, data).await
	}

	async fn read_invoice(&self, invoice_id: i64) -> FtResult<Invoice> {
		invoice::read(&self.db, invoice_id).await
	}

	async fn update_invoice(&self, invoice_id: i64, patch: &InvoicePatch) -> FtResult<Invoice> {
		invoice::update(&self.db, invoice_id, patch).await
	}

	async fn list_invoices(
		&self,
		tn_id: TnId,
		opts: &ListInvoicesOptions,
	) -> FtResult<Vec<InvoiceWithClient>> {
		invoice::list(&self.db, tn_id, opts).await
	}

	async fn list_open_invoices(&self, tn_id: TnId) -> FtResult<Vec<InvoiceWithClient>> {
		invoice::list_open(&self.db, tn_id).await
	}

	async fn list_client_invoices(&self, client_id: i64, limit: u32) -> FtResult<Vec<Invoice>> {
		invoice::list_for_client(&self.db, client_id, limit).await
	}

	async fn mark_invoices_overdue(&self, today: NaiveDate) -> FtResult<u32> {
		invoice::mark_overdue(&self.db, today).await
	}

	// Invoice events
	//****************
	async fn create_invoice_event(
		&self,
		invoice_id: i64,
		typ: InvoiceEventType,
		description: &str,
	) -> FtResult<()> {
		invoice::create_event(&self.db, invoice_id, typ, description).await
	}

	async fn list_invoice_events(&self, invoice_id: i64) -> FtResult<Vec<InvoiceEvent>> {
		invoice::list_events(&self.db, invoice_id).await
	}

	// Reminder rules
	//****************
	async fn create_reminder_rule(
		&self,
		tn_id: TnId,
		data: &CreateReminderRuleData<'_>,
	) -> FtResult<ReminderRule> {
		rule::create(&self.db, tn_id, data).await
	}

	async fn read_reminder_rule(&self, rule_id: i64) -> FtResult<ReminderRule> {
		rule::read(&self.db, rule_id).await
	}

	async fn update_reminder_rule(
		&self,
		rule_id: i64,
		patch: &ReminderRulePatch,
	) -> FtResult<ReminderRule> {
		rule::update(&self.db, rule_id, patch).await
	}

	async fn list_reminder_rules(&self, tn_id: TnId) -> FtResult<Vec<ReminderRule>> {
		rule::list(&self.db, tn_id).await
	}

	// Email outbox
	//**************
	async fn create_outbox_entry(&self, data: &CreateOutboxEntry<'_>) -> FtResult<EnqueueOutcome> {
		outbox::create(&self.db, data).await
	}

	async fn claim_queued_outbox(
		&self,
		limit: u32,
		max_attempts: u32,
	) -> FtResult<Vec<OutboxEntry>> {
		outbox::claim_queued(&self.db, limit, max_attempts).await
	}

	async fn update_outbox_entry(&self, outbox_id: i64, patch: &OutboxPatch) -> FtResult<OutboxEntry> {
		outbox::update(&self.db, outbox_id, patch).await
	}

	async fn read_outbox_entry(&self, outbox_id: i64) -> FtResult<OutboxEntry> {
		outbox::read(&self.db, outbox_id).await
	}
}

// vim: ts=4
