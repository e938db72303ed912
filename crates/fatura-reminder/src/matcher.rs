//! Day-offset rule matching.
//!
//! All comparisons operate on whole calendar days; time-of-day never enters
//! the calculation.

use chrono::NaiveDate;

use fatura_types::store_adapter::ReminderRule;

/// Whole days from `today` until `due_date`, positive while the due date is
/// still in the future.
pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
	(due_date - today).num_days()
}

/// A rule fires on exactly one day per offset: `days_before` that many days
/// ahead of the due date, or `days_after` that many days past it. A rule
/// with neither offset set never fires.
pub fn rule_fires(rule: &ReminderRule, days_diff: i64) -> bool {
	if rule.days_before.is_some_and(|days| i64::from(days) == days_diff) {
		return true;
	}
	rule.days_after.is_some_and(|days| i64::from(days) == -days_diff)
}


// vim: ts=4
