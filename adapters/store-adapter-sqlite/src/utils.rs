//! Shared utilities for the SQLite adapter
//!
//! Helper functions, the `push_patch!` macro, and error mapping used
//! across all domain modules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;

use fatura::prelude::*;

/// Simple helper for Patch fields - applies field to query with proper binding
/// Returns true if field was added (for tracking has_updates)
macro_rules! push_patch {
	// For bindable values (strings, numbers, bools)
	($query:expr, $has_updates:expr, $field:literal, $patch:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value(v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind(v);
				true
			}
		}
	}};
	// For fields that need conversion before binding
	($query:expr, $has_updates:expr, $field:literal, $patch:expr, |$v:ident| $convert:expr) => {{
		match $patch {
			Patch::Undefined => $has_updates,
			Patch::Null => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=NULL"));
				true
			}
			Patch::Value($v) => {
				if $has_updates {
					$query.push(", ");
				}
				$query.push(concat!($field, "=")).push_bind($convert);
				true
			}
		}
	}};
}

// Re-export for use in other modules
pub(crate) use push_patch;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to FtResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> FtResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> FtResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Decode a decimal amount column stored as canonical text
pub(crate) fn decode_amount(s: &str) -> Result<Decimal, sqlx::Error> {
	Decimal::from_str(s).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Decode a 'YYYY-MM-DD' date column
pub(crate) fn decode_date(s: &str) -> Result<NaiveDate, sqlx::Error> {
	NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// Decode an enum column stored as its canonical text value
pub(crate) fn decode_enum<T>(s: &str) -> Result<T, sqlx::Error>
where
	T: FromStr<Err = Error>,
{
	s.parse().map_err(|err: Error| sqlx::Error::Decode(Box::new(err)))
}

// vim: ts=4
