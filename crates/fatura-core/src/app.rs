//! App state type

use std::sync::Arc;

use crate::prelude::*;
use fatura_types::mail_adapter::MailAdapter;
use fatura_types::store_adapter::StoreAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide configuration, constructed explicitly at startup and
/// injected through the app state. Feature code never reads the
/// environment directly.
#[derive(Debug)]
pub struct AppOpts {
	pub listen: Box<str>,
	/// HS256 secret for user access tokens
	pub token_secret: Box<str>,
	pub token_expiry_secs: i64,
	/// Shared secret expected by the reminder job endpoint
	pub job_token: Box<str>,
	/// Base URL for payment links embedded in reminder mails
	pub payment_link_base: Option<Box<str>>,
	/// Create demo data on first start
	pub seed_demo: bool,
	/// Outbox entries drained per job invocation
	pub outbox_batch_size: u32,
	/// Delivery attempts before an outbox entry goes terminal
	pub outbox_max_attempts: u32,
}

pub struct AppState {
	pub opts: AppOpts,

	pub store_adapter: Arc<dyn StoreAdapter>,
	pub mail_adapter: Arc<dyn MailAdapter>,
}

pub type App = Arc<AppState>;

pub struct Adapters {
	pub store_adapter: Option<Arc<dyn StoreAdapter>>,
	pub mail_adapter: Option<Arc<dyn MailAdapter>>,
}

pub struct AppBuilder {
	opts: AppOpts,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppOpts {
				listen: "127.0.0.1:8080".into(),
				token_secret: "".into(),
				token_expiry_secs: 86400,
				job_token: "".into(),
				payment_link_base: None,
				seed_demo: false,
				outbox_batch_size: 50,
				outbox_max_attempts: 3,
			},
			adapters: Adapters { store_adapter: None, mail_adapter: None },
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn token_secret(&mut self, token_secret: impl Into<Box<str>>) -> &mut Self {
		self.opts.token_secret = token_secret.into();
		self
	}
	pub fn token_expiry_secs(&mut self, token_expiry_secs: i64) -> &mut Self {
		self.opts.token_expiry_secs = token_expiry_secs;
		self
	}
	pub fn job_token(&mut self, job_token: impl Into<Box<str>>) -> &mut Self {
		self.opts.job_token = job_token.into();
		self
	}
	pub fn payment_link_base(&mut self, payment_link_base: impl Into<Box<str>>) -> &mut Self {
		self.opts.payment_link_base = Some(payment_link_base.into());
		self
	}
	pub fn seed_demo(&mut self, seed_demo: bool) -> &mut Self {
		self.opts.seed_demo = seed_demo;
		self
	}
	pub fn outbox_batch_size(&mut self, outbox_batch_size: u32) -> &mut Self {
		self.opts.outbox_batch_size = outbox_batch_size;
		self
	}
	pub fn outbox_max_attempts(&mut self, outbox_max_attempts: u32) -> &mut Self {
		self.opts.outbox_max_attempts = outbox_max_attempts;
		self
	}

	// Adapters
	pub fn store_adapter(&mut self, store_adapter: Arc<dyn StoreAdapter>) -> &mut Self {
		self.adapters.store_adapter = Some(store_adapter);
		self
	}
	pub fn mail_adapter(&mut self, mail_adapter: Arc<dyn MailAdapter>) -> &mut Self {
		self.adapters.mail_adapter = Some(mail_adapter);
		self
	}

	/// Initializes logging and assembles the shared app state.
	pub fn build(self) -> FtResult<App> {
		tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env()
					.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
			)
			.with_target(false)
			.init();
		info!("Fatura server v{}", VERSION);

		if self.opts.token_secret.is_empty() {
			return Err(Error::ConfigError("token secret is not configured".into()));
		}
		if self.opts.job_token.is_empty() {
			return Err(Error::ConfigError("job token is not configured".into()));
		}
		let store_adapter = self
			.adapters
			.store_adapter
			.ok_or_else(|| Error::ConfigError("no store adapter configured".into()))?;
		let mail_adapter = self
			.adapters
			.mail_adapter
			.ok_or_else(|| Error::ConfigError("no mail adapter configured".into()))?;

		Ok(Arc::new(AppState { opts: self.opts, store_adapter, mail_adapter }))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
