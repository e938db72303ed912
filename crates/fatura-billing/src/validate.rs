//! Request field checks shared by the billing handlers.

use crate::prelude::*;

/// Format check only: local part, `@`, domain containing a dot.
pub(crate) fn validate_email(email: &str) -> FtResult<()> {
	let ok = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
		.map(|re| re.is_match(email))
		.unwrap_or(false);
	if ok {
		Ok(())
	} else {
		Err(Error::ValidationError("Email inválido".into()))
	}
}

pub(crate) fn validate_name(name: &str) -> FtResult<()> {
	if name.is_empty() {
		Err(Error::ValidationError("Nome é obrigatório".into()))
	} else {
		Ok(())
	}
}


// vim: ts=4
