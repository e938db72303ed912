//! Utility functions

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Formats a monetary amount the way it appears in mails and CSV exports.
///
/// # Examples
/// - `150` → `"R$ 150.00"`
/// - `1234.5` → `"R$ 1234.50"`
pub fn format_brl(amount: Decimal) -> String {
	format!("R$ {:.2}", amount)
}

/// Formats a date as `dd/MM/yyyy` (Brazilian convention).
pub fn format_date_br(date: NaiveDate) -> String {
	date.format("%d/%m/%Y").to_string()
}


// vim: ts=4
