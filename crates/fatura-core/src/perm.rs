//! Role/permission table for the billing API.
//!
//! A static, enum-keyed mapping from operation to allowed-role set, checked
//! through the single `authorize` entry point. The match is exhaustive, so
//! an operation without a table entry cannot exist (fail closed).

use crate::prelude::*;
use fatura_types::store_adapter::{AuthCtx, Role};

/// Operation gated by the permission table
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Permission {
	ManageUsers,
	ViewUsers,
	CreateClient,
	ViewClient,
	UpdateClient,
	DeleteClient,
	CreateInvoice,
	ViewInvoice,
	UpdateInvoice,
	DeleteInvoice,
	ManageSettings,
	ManagePlan,
	ExportData,
}

impl Permission {
	pub fn allowed_roles(self) -> &'static [Role] {
		use Permission::{
			CreateClient, CreateInvoice, DeleteClient, DeleteInvoice, ExportData, ManagePlan,
			ManageSettings, ManageUsers, UpdateClient, UpdateInvoice, ViewClient, ViewInvoice,
			ViewUsers,
		};
		use Role::{Admin, Manager};

		match self {
			ManageUsers | ViewUsers => &[Admin],
			CreateClient | ViewClient | UpdateClient => &[Admin, Manager],
			DeleteClient => &[Admin],
			CreateInvoice | ViewInvoice | UpdateInvoice => &[Admin, Manager],
			DeleteInvoice => &[Admin],
			ManageSettings | ManagePlan => &[Admin],
			ExportData => &[Admin, Manager],
		}
	}
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
	permission.allowed_roles().contains(&role)
}

/// Single permission-check entry point used by all handlers.
pub fn authorize(auth: &AuthCtx, permission: Permission) -> FtResult<()> {
	if has_permission(auth.role, permission) {
		Ok(())
	} else {
		warn!("Permission denied: user {} lacks {:?}", auth.user_id, permission);
		Err(Error::PermissionDenied)
	}
}


// vim: ts=4
