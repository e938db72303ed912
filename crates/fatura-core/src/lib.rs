//! Core infrastructure for the Fatura platform.
//!
//! This crate contains shared infrastructure modules that are used by the
//! server crate and by the feature crates. Extracting these into a separate
//! crate enables better build parallelism and clearer module boundaries.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod crypto;
pub mod extract;
pub mod guard;
pub mod middleware;
pub mod perm;
pub mod prelude;
pub mod token;

// Re-export commonly used types
pub use app::{App, AppBuilder, AppOpts, AppState};
pub use extract::Auth;
pub use guard::assert_tenant;
pub use perm::{Permission, authorize};

// vim: ts=4
