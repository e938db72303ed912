pub use fatura_core::prelude::*;

// vim: ts=4
