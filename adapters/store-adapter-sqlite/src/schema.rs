//! Database schema initialization
//!
//! Creates all tables and indexes on startup. Every statement is idempotent
//! so the adapter can be pointed at an existing database file.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Tenants
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS tenants (
		tn_id integer NOT NULL,
		name text NOT NULL,
		email text NOT NULL,
		phone text,
		pix_key text,
		plan text NOT NULL DEFAULT 'FREE',	-- 'FREE', 'PRO', 'ENTERPRISE'
		active boolean NOT NULL DEFAULT true,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(tn_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		user_id integer NOT NULL,
		tn_id integer NOT NULL,
		name text NOT NULL,
		email text NOT NULL,
		password_hash text NOT NULL,
		role text NOT NULL DEFAULT 'MANAGER',	-- 'ADMIN', 'MANAGER'
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email)")
		.execute(&mut *tx)
		.await?;

	// Clients
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS clients (
		client_id integer NOT NULL,
		tn_id integer NOT NULL,
		name text NOT NULL,
		email text NOT NULL,
		phone text,
		document text,
		address text,
		notes text,
		active boolean NOT NULL DEFAULT true,
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(client_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_clients_tnid ON clients(tn_id)")
		.execute(&mut *tx)
		.await?;

	// Invoices
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS invoices (
		invoice_id integer NOT NULL,
		tn_id integer NOT NULL,
		client_id integer NOT NULL,
		description text NOT NULL,
		notes text,
		amount text NOT NULL,			-- decimal, stored canonically
		due_date text NOT NULL,			-- 'YYYY-MM-DD'
		status text NOT NULL DEFAULT 'PENDING',	-- 'PENDING', 'PAID', 'OVERDUE', 'CANCELLED'
		recurrence text NOT NULL DEFAULT 'NONE',	-- 'NONE', 'WEEKLY', 'MONTHLY', 'YEARLY'
		paid_at datetime,
		next_run_at text,			-- 'YYYY-MM-DD', recurring invoices only
		created_at datetime DEFAULT (unixepoch()),
		updated_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(invoice_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_tnid ON invoices(tn_id)")
		.execute(&mut *tx)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_status_due ON invoices(status, due_date)")
		.execute(&mut *tx)
		.await?;

	// Invoice events
	//****************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS invoice_events (
		event_id integer NOT NULL,
		tn_id integer NOT NULL,
		invoice_id integer NOT NULL,
		type text NOT NULL,			-- 'CREATED', 'UPDATED', 'PAID', 'CANCELLED', 'REMINDER_SENT'
		description text NOT NULL,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(event_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_invoice_events_invoice ON invoice_events(tn_id, invoice_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Reminder rules
	//****************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS reminder_rules (
		rule_id integer NOT NULL,
		tn_id integer NOT NULL,
		name text NOT NULL,
		days_before integer,
		days_after integer,
		email_subject text NOT NULL,
		email_body text NOT NULL,
		active boolean NOT NULL DEFAULT true,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(rule_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_reminder_rules_tnid ON reminder_rules(tn_id)")
		.execute(&mut *tx)
		.await?;

	// Email outbox
	//**************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS email_outbox (
		outbox_id integer NOT NULL,
		tn_id integer NOT NULL,
		recipient text NOT NULL,
		subject text NOT NULL,
		body text NOT NULL,
		status text NOT NULL DEFAULT 'QUEUED',	-- 'QUEUED', 'SENDING', 'SENT', 'FAILED'
		attempts integer NOT NULL DEFAULT 0,
		dedup_key text,
		last_error text,
		created_at datetime DEFAULT (unixepoch()),
		sent_at datetime,
		PRIMARY KEY(outbox_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_email_outbox_status ON email_outbox(status, created_at)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_email_outbox_dedup ON email_outbox(dedup_key) WHERE dedup_key NOT NULL",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
