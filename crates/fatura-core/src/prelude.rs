pub use crate::app::App;
pub use fatura_types::prelude::*;

// vim: ts=4
