//! Shared types and adapter traits for the Fatura platform.
//!
//! Everything an adapter implementation needs lives here so that adapter
//! crates depend only on this crate, never on the server or on other
//! adapters. The [`store_adapter`] and [`mail_adapter`] modules define the
//! trait seams, [`types`] the small value types used across them.

pub mod error;
pub mod mail_adapter;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod utils;

// vim: ts=4
