//! SMTP implementation of the Fatura mail adapter
//!
//! One transport built at startup from process-wide configuration. Delivery
//! failure is a normal outcome here; it surfaces as `ServiceUnavailable` and
//! the caller decides what to record.

use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use fatura::mail_adapter::MailAdapter;
use fatura::prelude::*;

/// SMTP connection settings, read once at startup
#[derive(Clone, Debug)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: String,
	pub password: String,
	pub from_address: String,
	pub from_name: String,
	/// One of "none", "starttls", "tls"
	pub tls_mode: String,
	pub timeout_secs: u64,
}

pub struct MailAdapterSmtp {
	mailer: AsyncSmtpTransport<Tokio1Executor>,
	from: Mailbox,
}

impl std::fmt::Debug for MailAdapterSmtp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MailAdapterSmtp").field("from", &self.from).finish()
	}
}

impl MailAdapterSmtp {
	pub fn new(config: &SmtpConfig) -> FtResult<Self> {
		let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|_| Error::ConfigError("invalid SMTP from address".into()))?;

		let tls = match config.tls_mode.as_str() {
			"tls" => Tls::Wrapper(
				TlsParameters::builder(config.host.clone())
					.build()
					.map_err(|err| Error::ConfigError(format!("TLS configuration error: {err}")))?,
			),
			"starttls" => Tls::Opportunistic(
				TlsParameters::builder(config.host.clone())
					.build()
					.map_err(|err| Error::ConfigError(format!("TLS configuration error: {err}")))?,
			),
			"none" => Tls::None,
			mode => {
				return Err(Error::ConfigError(format!(
					"invalid TLS mode: {mode}. Must be 'none', 'starttls', or 'tls'"
				)));
			}
		};

		let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
			.port(config.port)
			.timeout(Some(Duration::from_secs(config.timeout_secs)))
			.tls(tls);
		// Local relays run without authentication
		if !config.username.is_empty() {
			builder = builder
				.credentials(Credentials::new(config.username.clone(), config.password.clone()));
		}

		Ok(Self { mailer: builder.build(), from })
	}
}

#[async_trait]
impl MailAdapter for MailAdapterSmtp {
	async fn send(&self, to: &str, subject: &str, body: &str) -> FtResult<()> {
		if !to.contains('@') {
			return Err(Error::ValidationError("invalid recipient email address".into()));
		}

		let email = Message::builder()
			.from(self.from.clone())
			.to(to
				.parse()
				.map_err(|_| Error::ValidationError("invalid recipient email format".into()))?)
			.subject(subject)
			.singlepart(SinglePart::plain(body.to_string()))
			.map_err(|err| Error::ValidationError(format!("failed to build email: {err}")))?;

		match self.mailer.send(email).await {
			Ok(_) => {
				info!("Email sent to {}", to);
				Ok(())
			}
			Err(err) => {
				warn!("Failed to send email to {}: {}", to, err);
				Err(Error::ServiceUnavailable(format!("SMTP send failed: {err}")))
			}
		}
	}
}


// vim: ts=4
