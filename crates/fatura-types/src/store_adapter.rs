//! Adapter that manages the durable domain records: tenants, users, clients,
//! invoices, invoice events, reminder rules, and the email outbox.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::{
	prelude::*,
	types::{serialize_timestamp_iso, serialize_timestamp_iso_opt},
};

// Enums //
//*******//

/// Subscription plan of a tenant
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
	#[default]
	Free,
	Pro,
	Enterprise,
}

impl Plan {
	pub fn as_str(self) -> &'static str {
		match self {
			Plan::Free => "FREE",
			Plan::Pro => "PRO",
			Plan::Enterprise => "ENTERPRISE",
		}
	}
}

impl std::str::FromStr for Plan {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"FREE" => Ok(Plan::Free),
			"PRO" => Ok(Plan::Pro),
			"ENTERPRISE" => Ok(Plan::Enterprise),
			_ => Err(Error::ValidationError(format!("invalid plan: {s}"))),
		}
	}
}

/// Role of a user within its tenant
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	Admin,
	Manager,
}

impl Role {
	pub fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "ADMIN",
			Role::Manager => "MANAGER",
		}
	}
}

impl std::str::FromStr for Role {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ADMIN" => Ok(Role::Admin),
			"MANAGER" => Ok(Role::Manager),
			_ => Err(Error::ValidationError(format!("invalid role: {s}"))),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
	#[default]
	Pending,
	Paid,
	Overdue,
	Cancelled,
}

impl InvoiceStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			InvoiceStatus::Pending => "PENDING",
			InvoiceStatus::Paid => "PAID",
			InvoiceStatus::Overdue => "OVERDUE",
			InvoiceStatus::Cancelled => "CANCELLED",
		}
	}

	/// Forward-only status machine. Re-asserting the current status is
	/// allowed (mark-paid on a paid invoice appends another event).
	pub fn can_transition(self, to: InvoiceStatus) -> bool {
		use InvoiceStatus::{Cancelled, Overdue, Paid, Pending};
		match (self, to) {
			(from, to) if from == to => true,
			(Pending, Paid | Overdue | Cancelled) | (Overdue, Paid | Cancelled) => true,
			_ => false,
		}
	}
}

impl std::str::FromStr for InvoiceStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"PENDING" => Ok(InvoiceStatus::Pending),
			"PAID" => Ok(InvoiceStatus::Paid),
			"OVERDUE" => Ok(InvoiceStatus::Overdue),
			"CANCELLED" => Ok(InvoiceStatus::Cancelled),
			_ => Err(Error::ValidationError(format!("invalid invoice status: {s}"))),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
	#[default]
	None,
	Weekly,
	Monthly,
	Yearly,
}

impl Recurrence {
	pub fn as_str(self) -> &'static str {
		match self {
			Recurrence::None => "NONE",
			Recurrence::Weekly => "WEEKLY",
			Recurrence::Monthly => "MONTHLY",
			Recurrence::Yearly => "YEARLY",
		}
	}

	/// Due date advanced by one recurrence period (month arithmetic clamps
	/// at month end). `None` recurrence yields no next run.
	pub fn next_run_after(self, due_date: NaiveDate) -> Option<NaiveDate> {
		match self {
			Recurrence::None => None,
			Recurrence::Weekly => due_date.checked_add_days(chrono::Days::new(7)),
			Recurrence::Monthly => due_date.checked_add_months(chrono::Months::new(1)),
			Recurrence::Yearly => due_date.checked_add_months(chrono::Months::new(12)),
		}
	}
}

impl std::str::FromStr for Recurrence {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"NONE" => Ok(Recurrence::None),
			"WEEKLY" => Ok(Recurrence::Weekly),
			"MONTHLY" => Ok(Recurrence::Monthly),
			"YEARLY" => Ok(Recurrence::Yearly),
			_ => Err(Error::ValidationError(format!("invalid recurrence: {s}"))),
		}
	}
}

/// Type tag of an audit-trail entry
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceEventType {
	Created,
	Updated,
	Paid,
	Cancelled,
	ReminderSent,
}

impl InvoiceEventType {
	pub fn as_str(self) -> &'static str {
		match self {
			InvoiceEventType::Created => "CREATED",
			InvoiceEventType::Updated => "UPDATED",
			InvoiceEventType::Paid => "PAID",
			InvoiceEventType::Cancelled => "CANCELLED",
			InvoiceEventType::ReminderSent => "REMINDER_SENT",
		}
	}
}

impl std::str::FromStr for InvoiceEventType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"CREATED" => Ok(InvoiceEventType::Created),
			"UPDATED" => Ok(InvoiceEventType::Updated),
			"PAID" => Ok(InvoiceEventType::Paid),
			"CANCELLED" => Ok(InvoiceEventType::Cancelled),
			"REMINDER_SENT" => Ok(InvoiceEventType::ReminderSent),
			_ => Err(Error::ValidationError(format!("invalid event type: {s}"))),
		}
	}
}

/// Delivery state of an outbox entry.
///
/// `Sending` is the transient claimed state used by the atomic drain claim;
/// it never survives a completed drain pass.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboxStatus {
	#[default]
	Queued,
	Sending,
	Sent,
	Failed,
}

impl OutboxStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			OutboxStatus::Queued => "QUEUED",
			OutboxStatus::Sending => "SENDING",
			OutboxStatus::Sent => "SENT",
			OutboxStatus::Failed => "FAILED",
		}
	}
}

impl std::str::FromStr for OutboxStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"QUEUED" => Ok(OutboxStatus::Queued),
			"SENDING" => Ok(OutboxStatus::Sending),
			"SENT" => Ok(OutboxStatus::Sent),
			"FAILED" => Ok(OutboxStatus::Failed),
			_ => Err(Error::ValidationError(format!("invalid outbox status: {s}"))),
		}
	}
}

// Tenants //
//*********//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
	pub tn_id: TnId,
	pub name: Box<str>,
	pub email: Box<str>,
	pub phone: Option<Box<str>>,
	/// PIX "copia e cola" receiving code, appended to reminder mails when set
	pub pix_key: Option<Box<str>>,
	pub plan: Plan,
	pub active: bool,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// Tenant joined with its active reminder rules, as consumed by the
/// reminder dispatcher.
#[derive(Clone, Debug)]
pub struct TenantWithRules {
	pub tenant: Tenant,
	pub rules: Vec<ReminderRule>,
}

/// Data needed to create a new tenant
#[derive(Debug)]
pub struct CreateTenantData<'a> {
	pub name: &'a str,
	pub email: &'a str,
	pub phone: Option<&'a str>,
	pub pix_key: Option<&'a str>,
	pub plan: Plan,
}

// Users //
//*******//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub user_id: i64,
	pub tn_id: TnId,
	pub name: Box<str>,
	pub email: Box<str>,
	pub role: Role,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// User row plus password hash, for credential checks only. Never serialized.
#[derive(Debug)]
pub struct UserAuthRecord {
	pub user: User,
	pub password_hash: Box<str>,
}

/// Data needed to create a new user. The password arrives pre-hashed;
/// plaintext never crosses the adapter boundary.
#[derive(Debug)]
pub struct CreateUserData<'a> {
	pub name: &'a str,
	pub email: &'a str,
	pub password_hash: &'a str,
	pub role: Role,
}

/// Context struct for an authenticated user
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub tn_id: TnId,
	pub user_id: i64,
	pub name: Box<str>,
	pub role: Role,
}

// Clients //
//*********//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
	pub client_id: i64,
	pub tn_id: TnId,
	pub name: Box<str>,
	pub email: Box<str>,
	pub phone: Option<Box<str>>,
	pub document: Option<Box<str>>,
	pub address: Option<Box<str>>,
	pub notes: Option<Box<str>>,
	pub active: bool,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub updated_at: Timestamp,
}

/// Data needed to create a new client
#[derive(Debug)]
pub struct CreateClientData<'a> {
	pub name: &'a str,
	pub email: &'a str,
	pub phone: Option<&'a str>,
	pub document: Option<&'a str>,
	pub address: Option<&'a str>,
	pub notes: Option<&'a str>,
}

/// Partial update of a client. `Null` clears nullable fields; `Null` on a
/// required field is rejected by the adapter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
	#[serde(default)]
	pub name: Patch<Box<str>>,
	#[serde(default)]
	pub email: Patch<Box<str>>,
	#[serde(default)]
	pub phone: Patch<Box<str>>,
	#[serde(default)]
	pub document: Patch<Box<str>>,
	#[serde(default)]
	pub address: Patch<Box<str>>,
	#[serde(default)]
	pub notes: Patch<Box<str>>,
	#[serde(default)]
	pub active: Patch<bool>,
}

/// Options for listing clients
#[derive(Debug, Default)]
pub struct ListClientsOptions<'a> {
	/// Substring match against name, email or document
	pub search: Option<&'a str>,
	pub include_inactive: bool,
}

// Invoices //
//**********//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
	pub invoice_id: i64,
	pub tn_id: TnId,
	pub client_id: i64,
	pub amount: Decimal,
	pub due_date: NaiveDate,
	pub description: Box<str>,
	pub notes: Option<Box<str>>,
	pub status: InvoiceStatus,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub paid_at: Option<Timestamp>,
	pub recurrence: Recurrence,
	pub next_run_at: Option<NaiveDate>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub updated_at: Timestamp,
}

/// Client contact summary embedded in invoice listings
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
	pub client_id: i64,
	pub name: Box<str>,
	pub email: Box<str>,
	pub document: Option<Box<str>>,
}

/// Invoice joined with its client's contact summary
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InvoiceWithClient {
	#[serde(flatten)]
	pub invoice: Invoice,
	pub client: ClientSummary,
}

/// Data needed to create a new invoice. `next_run_at` is computed by the
/// caller from the recurrence at creation time.
#[derive(Debug)]
pub struct CreateInvoiceData<'a> {
	pub client_id: i64,
	pub amount: Decimal,
	pub due_date: NaiveDate,
	pub description: &'a str,
	pub notes: Option<&'a str>,
	pub recurrence: Recurrence,
	pub next_run_at: Option<NaiveDate>,
}

/// Partial update of an invoice
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
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
	#[serde(default)]
	pub paid_at: Patch<Timestamp>,
}

/// Options for listing invoices
#[derive(Debug, Default)]
pub struct ListInvoicesOptions {
	pub status: Option<InvoiceStatus>,
	pub client_id: Option<i64>,
}

// Invoice events //
//****************//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEvent {
	pub event_id: i64,
	pub invoice_id: i64,
	#[serde(rename = "type")]
	pub typ: InvoiceEventType,
	pub description: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

// Reminder rules //
//****************//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRule {
	pub rule_id: i64,
	pub tn_id: TnId,
	pub name: Box<str>,
	pub active: bool,
	/// Fires this many days before the due date
	pub days_before: Option<u32>,
	/// Fires this many days after the due date
	pub days_after: Option<u32>,
	pub email_subject: Box<str>,
	pub email_body: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// Data needed to create a new reminder rule
#[derive(Debug)]
pub struct CreateReminderRuleData<'a> {
	pub name: &'a str,
	pub active: bool,
	pub days_before: Option<u32>,
	pub days_after: Option<u32>,
	pub email_subject: &'a str,
	pub email_body: &'a str,
}

/// Partial update of a reminder rule
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRulePatch {
	#[serde(default)]
	pub name: Patch<Box<str>>,
	#[serde(default)]
	pub active: Patch<bool>,
	#[serde(default)]
	pub days_before: Patch<u32>,
	#[serde(default)]
	pub days_after: Patch<u32>,
	#[serde(default)]
	pub email_subject: Patch<Box<str>>,
	#[serde(default)]
	pub email_body: Patch<Box<str>>,
}

// Email outbox //
//**************//

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxEntry {
	pub outbox_id: i64,
	pub tn_id: TnId,
	pub recipient: Box<str>,
	pub subject: Box<str>,
	pub body: Box<str>,
	pub status: OutboxStatus,
	pub attempts: u32,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub sent_at: Option<Timestamp>,
	pub last_error: Option<Box<str>>,
	pub dedup_key: Option<Box<str>>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// Data needed to enqueue an email
#[derive(Debug)]
pub struct CreateOutboxEntry<'a> {
	pub tn_id: TnId,
	pub recipient: &'a str,
	pub subject: &'a str,
	pub body: &'a str,
	/// Idempotency key; a second enqueue with the same key is a no-op
	pub dedup_key: Option<&'a str>,
}

/// Outcome of an enqueue attempt
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnqueueOutcome {
	Created(i64),
	/// An entry with the same dedup key already exists
	Duplicate,
}

/// Partial update of an outbox entry, applied after a delivery attempt
#[derive(Debug, Default)]
pub struct OutboxPatch {
	pub status: Patch<OutboxStatus>,
	pub sent_at: Patch<Timestamp>,
	pub last_error: Patch<Box<str>>,
}

// StoreAdapter //
//**************//

/// A Fatura store adapter
///
/// Every `StoreAdapter` implementation is required to implement this trait.
/// A `StoreAdapter` is responsible for storing and managing the durable
/// domain records behind all tenant, billing, and reminder operations.
///
/// Single-row reads are tenant-unscoped; callers must assert tenant
/// ownership on the returned row. List reads always take the tenant id as a
/// mandatory predicate.
#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// # Tenants
	async fn create_tenant(&self, data: &CreateTenantData<'_>) -> FtResult<TnId>;
	async fn read_tenant(&self, tn_id: TnId) -> FtResult<Tenant>;
	/// Lifecycle toggle; inactive tenants are skipped by all processing
	async fn set_tenant_active(&self, tn_id: TnId, active: bool) -> FtResult<()>;
	/// Active tenants joined with their active reminder rules
	async fn list_active_tenants(&self) -> FtResult<Vec<TenantWithRules>>;
	async fn count_tenants(&self) -> FtResult<u32>;

	/// # Users
	async fn create_user(&self, tn_id: TnId, data: &CreateUserData<'_>) -> FtResult<User>;
	/// Credential lookup by email, including the password hash
	async fn read_user_auth(&self, email: &str) -> FtResult<UserAuthRecord>;
	async fn list_users(&self, tn_id: TnId) -> FtResult<Vec<User>>;

	/// # Clients
	async fn create_client(&self, tn_id: TnId, data: &CreateClientData<'_>) -> FtResult<Client>;
	async fn read_client(&self, client_id: i64) -> FtResult<Client>;
	async fn update_client(&self, client_id: i64, patch: &ClientPatch) -> FtResult<Client>;
	async fn list_clients(
		&self,
		tn_id: TnId,
		opts: &ListClientsOptions<'_>,
	) -> FtResult<Vec<Client>>;

	/// # Invoices
	async fn create_invoice(&self, tn_id: TnId, data: &CreateInvoiceData<'_>)
		-> FtResult<Invoice>;
	async fn read_invoice(&self, invoice_id: i64) -> FtResult<Invoice>;
	async fn update_invoice(&self, invoice_id: i64, patch: &InvoicePatch) -> FtResult<Invoice>;
	async fn list_invoices(
		&self,
		tn_id: TnId,
		opts: &ListInvoicesOptions,
	) -> FtResult<Vec<InvoiceWithClient>>;
	/// PENDING and OVERDUE invoices joined with client contact info
	async fn list_open_invoices(&self, tn_id: TnId) -> FtResult<Vec<InvoiceWithClient>>;
	/// Most recent invoices of one client
	async fn list_client_invoices(&self, client_id: i64, limit: u32) -> FtResult<Vec<Invoice>>;
	/// Bulk PENDING -> OVERDUE for invoices due strictly before `today`
	async fn mark_invoices_overdue(&self, today: NaiveDate) -> FtResult<u32>;

	/// # Invoice events
	async fn create_invoice_event(
		&self,
		invoice_id: i64,
		typ: InvoiceEventType,
		description: &str,
	) -> FtResult<()>;
	/// Events of one invoice, newest first
	async fn list_invoice_events(&self, invoice_id: i64) -> FtResult<Vec<InvoiceEvent>>;

	/// # Reminder rules
	async fn create_reminder_rule(
		&self,
		tn_id: TnId,
		data: &CreateReminderRuleData<'_>,
	) -> FtResult<ReminderRule>;
	async fn read_reminder_rule(&self, rule_id: i64) -> FtResult<ReminderRule>;
	async fn update_reminder_rule(
		&self,
		rule_id: i64,
		patch: &ReminderRulePatch,
	) -> FtResult<ReminderRule>;
	async fn list_reminder_rules(&self, tn_id: TnId) -> FtResult<Vec<ReminderRule>>;

	/// # Email outbox
	async fn create_outbox_entry(&self, data: &CreateOutboxEntry<'_>) -> FtResult<EnqueueOutcome>;
	/// Atomically claims up to `limit` QUEUED entries with fewer than
	/// `max_attempts` attempts, oldest first. Claimed entries transition to
	/// SENDING with the attempt counted, so no two concurrent drain passes
	/// can claim the same entry.
	async fn claim_queued_outbox(&self, limit: u32, max_attempts: u32)
		-> FtResult<Vec<OutboxEntry>>;
	async fn update_outbox_entry(&self, outbox_id: i64, patch: &OutboxPatch)
		-> FtResult<OutboxEntry>;
	async fn read_outbox_entry(&self, outbox_id: i64) -> FtResult<OutboxEntry>;
}


// vim: ts=4
