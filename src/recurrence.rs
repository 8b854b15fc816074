// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};

use crate::error::{LedgerError, Result};
use crate::models::ExpenseKind;
use crate::utils::{first_of_month, step_months};

/// Whole months from `a` to `b`, counted on year and month only.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b.year() as i64 - a.year() as i64) * 12 + (b.month() as i64 - a.month() as i64)
}

/// Whether an obligation falls due in the month of `target_month`.
///
/// Monthly obligations are due every month regardless of start date. For
/// the other kinds both dates are normalized to the first of their month
/// and the obligation is due on every `interval_months`-th month from its
/// start. Months before the start are never due.
pub fn is_due(
    kind: ExpenseKind,
    interval_months: i64,
    start: NaiveDate,
    target_month: NaiveDate,
) -> Result<bool> {
    if interval_months <= 0 {
        return Err(LedgerError::InvalidInterval(interval_months));
    }
    if kind == ExpenseKind::Monthly {
        return Ok(true);
    }
    let start = first_of_month(start);
    let target = first_of_month(target_month);
    if target < start {
        return Ok(false);
    }
    Ok(months_between(start, target) % interval_months == 0)
}

/// The next date on or after `today` on which the obligation falls due.
///
/// Monthly obligations are due now. Otherwise the cursor walks
/// first-of-month steps of `interval_months` from the start, so the
/// returned month always satisfies `is_due`.
pub fn next_due_date(
    kind: ExpenseKind,
    interval_months: i64,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate> {
    if interval_months <= 0 {
        return Err(LedgerError::InvalidInterval(interval_months));
    }
    if kind == ExpenseKind::Monthly {
        return Ok(today);
    }
    let mut cursor = first_of_month(start);
    while cursor < today {
        cursor = step_months(cursor, interval_months as u32);
    }
    Ok(cursor)
}
