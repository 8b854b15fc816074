// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::RecurringIncome;
use crate::recurrence::months_between;
use crate::utils::{decode_amount, first_of_month, month_bounds};

/// Realized income for one month: one-time incomes dated inside it plus
/// every recurring income whose schedule lands on it.
pub fn monthly_income(conn: &Connection, owner_id: &str, year: i32, month: u32) -> Result<Decimal> {
    let (start, end) = month_bounds(year, month)?;
    let mut total = Decimal::ZERO;

    let mut stmt = conn.prepare(
        "SELECT amount FROM incomes WHERE user_id=?1 AND income_date>=?2 AND income_date<?3",
    )?;
    let mut rows = stmt.query(params![owner_id, start, end])?;
    while let Some(r) = rows.next()? {
        let raw: String = r.get(0)?;
        total += decode_amount("incomes.amount", &raw)?;
    }

    for r in recurring_incomes(conn, owner_id)? {
        if recurring_income_due(r.interval_months, r.start_date, start)? {
            total += r.amount;
        }
    }
    Ok(total)
}

/// Whether a recurring income lands on the month of `target_month`.
/// Interval 1 is a monthly income and always counts; other intervals
/// follow the same rolling-modulo rule as expenses, evaluated on
/// first-of-month dates.
pub fn recurring_income_due(
    interval_months: i64,
    start: NaiveDate,
    target_month: NaiveDate,
) -> Result<bool> {
    if interval_months <= 0 {
        return Err(LedgerError::InvalidInterval(interval_months));
    }
    if interval_months == 1 {
        return Ok(true);
    }
    let start = first_of_month(start);
    let target = first_of_month(target_month);
    if target < start {
        return Ok(false);
    }
    Ok(months_between(start, target) % interval_months == 0)
}

fn recurring_incomes(conn: &Connection, owner_id: &str) -> Result<Vec<RecurringIncome>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, interval_months, start_date
         FROM recurring_incomes WHERE user_id=?1",
    )?;
    let mut rows = stmt.query(params![owner_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let raw: String = r.get(2)?;
        out.push(RecurringIncome {
            id: r.get(0)?,
            description: r.get(1)?,
            amount: decode_amount("recurring_incomes.amount", &raw)?,
            interval_months: r.get(3)?,
            start_date: r.get(4)?,
        });
    }
    Ok(out)
}
