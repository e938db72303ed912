//! Billing surface of the Fatura platform.
//!
//! HTTP handlers for session login, user administration, client and invoice
//! CRUD with their audit trail, CSV export, and reminder-rule management.
//! Every handler runs the role check through the permission table and asserts
//! tenant ownership after each unscoped fetch.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod export;
pub mod invoice;
pub mod rule;
pub mod user;

mod prelude;
mod validate;

// vim: ts=4
