pub use crate::error::{Error, FtResult};
pub use crate::types::{Patch, Timestamp, TnId};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
