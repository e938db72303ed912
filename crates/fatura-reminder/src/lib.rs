//! Reminder scheduling and outbox dispatch.
//!
//! This crate contains the batch job at the heart of the collections flow:
//! - Day-offset rule matching against open invoices
//! - Template rendering with a closed placeholder set
//! - The three-phase dispatch run (match & enqueue, drain, overdue sweep)
//! - The externally triggered job endpoint

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod dispatcher;
pub mod handler;
pub mod matcher;
pub mod template;

mod prelude;

pub use dispatcher::{RunSummary, run, run_at};
pub use template::{TemplateKind, TemplatePreset, preset_for_offset};

// vim: ts=4
