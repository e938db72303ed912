//! Fatura server binary. Configuration comes from `FATURA_*` environment
//! variables; everything else is explicit construction: adapters, app state,
//! routes, serve loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::{env, net};

use fatura_core::app::AppBuilder;
use fatura_core::prelude::*;
use fatura_mail_adapter_smtp::{MailAdapterSmtp, SmtpConfig};
use fatura_store_adapter_sqlite::StoreAdapterSqlite;

mod bootstrap;
mod routes;

/// Reads an environment variable, treating empty values as unset.
fn env_opt(name: &str) -> Option<String> {
	env::var(name).ok().filter(|value| !value.is_empty())
}

fn smtp_config_from_env() -> FtResult<SmtpConfig> {
	Ok(SmtpConfig {
		host: env_opt("FATURA_SMTP_HOST")
			.ok_or_else(|| Error::ConfigError("FATURA_SMTP_HOST is not set".into()))?,
		port: match env_opt("FATURA_SMTP_PORT") {
			Some(port) => port
				.parse()
				.map_err(|_| Error::ConfigError("invalid FATURA_SMTP_PORT".into()))?,
			None => 587,
		},
		username: env_opt("FATURA_SMTP_USER").unwrap_or_default(),
		password: env_opt("FATURA_SMTP_PASSWORD").unwrap_or_default(),
		from_address: env_opt("FATURA_SMTP_FROM")
			.ok_or_else(|| Error::ConfigError("FATURA_SMTP_FROM is not set".into()))?,
		from_name: env_opt("FATURA_SMTP_FROM_NAME").unwrap_or_else(|| "Fatura".to_string()),
		tls_mode: env_opt("FATURA_SMTP_TLS").unwrap_or_else(|| "starttls".to_string()),
		timeout_secs: 30,
	})
}

#[tokio::main]
async fn main() -> FtResult<()> {
	let data_dir =
		PathBuf::from(env_opt("FATURA_DATA_DIR").unwrap_or_else(|| "./data".to_string()));
	tokio::fs::create_dir_all(&data_dir).await?;

	let store_adapter = Arc::new(StoreAdapterSqlite::new(data_dir.join("store.db")).await?);
	let mail_adapter = Arc::new(MailAdapterSmtp::new(&smtp_config_from_env()?)?);

	let mut builder = AppBuilder::new();
	builder
		.listen(env_opt("FATURA_LISTEN").unwrap_or_else(|| "0.0.0.0:8080".to_string()))
		.token_secret(env_opt("FATURA_TOKEN_SECRET").unwrap_or_default())
		.job_token(env_opt("FATURA_JOB_TOKEN").unwrap_or_default())
		.seed_demo(
			env_opt("FATURA_SEED_DEMO").is_some_and(|value| value == "true" || value == "1"),
		)
		.store_adapter(store_adapter)
		.mail_adapter(mail_adapter);
	if let Some(expiry) = env_opt("FATURA_TOKEN_EXPIRY_SECS") {
		builder.token_expiry_secs(expiry.parse().map_err(|_| {
			Error::ConfigError("invalid FATURA_TOKEN_EXPIRY_SECS".into())
		})?);
	}
	if let Some(base) = env_opt("FATURA_PAYMENT_LINK_BASE") {
		builder.payment_link_base(base);
	}
	let app = builder.build()?;

	bootstrap::seed_demo_data(&app).await?;

	let listen: net::SocketAddr = app
		.opts
		.listen
		.parse()
		.map_err(|_| Error::ConfigError("invalid FATURA_LISTEN address".into()))?;
	let listener = tokio::net::TcpListener::bind(listen).await?;
	info!("Listening on {}", listen);
	axum::serve(listener, routes::init(app))
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if tokio::signal::ctrl_c().await.is_err() {
		error!("Failed to install the shutdown signal handler");
	}
}

// vim: ts=4
