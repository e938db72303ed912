//! Tenant-ownership assertions.

use crate::prelude::*;
use fatura_types::store_adapter::AuthCtx;

/// Asserts that a fetched resource belongs to the caller's tenant.
///
/// Single-row reads are tenant-unscoped, so every by-id path must call this
/// after the fetch and before acting on the row. Fetching by primary key
/// alone never implies tenant scoping.
pub fn assert_tenant(auth: &AuthCtx, resource_tn_id: TnId) -> FtResult<()> {
	if auth.tn_id == resource_tn_id {
		Ok(())
	} else {
		warn!(
			"Cross-tenant access rejected: caller tenant {}, resource tenant {}",
			auth.tn_id, resource_tn_id
		);
		Err(Error::PermissionDenied)
	}
}


// vim: ts=4
