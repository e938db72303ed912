//! Adapter that delivers one rendered email message.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

/// A Fatura mail adapter
///
/// Every `MailAdapter` implementation is required to implement this trait.
/// Delivery failure is a normal, expected outcome: the dispatcher records it
/// on the outbox entry and retries on a later run, up to the attempt cap.
#[async_trait]
pub trait MailAdapter: Debug + Send + Sync {
	async fn send(&self, to: &str, subject: &str, body: &str) -> FtResult<()>;
}

// vim: ts=4
