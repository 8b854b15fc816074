// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::models::ExpensePaymentKind;
use crate::utils::{month_bounds, month_start};

/// Whether an obligation's turn in the given month is already settled.
///
/// A period counts as settled when a payment record exists for it, or,
/// when a reserve account is bound, when an allocation dated in that month
/// exists. This is the single predicate every call site goes through.
pub fn is_settled(
    conn: &Connection,
    owner_id: &str,
    expense_id: i64,
    reserve_account_id: Option<i64>,
    year: i32,
    month: u32,
) -> Result<bool> {
    let paid: Option<i64> = conn
        .query_row(
            "SELECT id FROM expense_payments
             WHERE user_id=?1 AND expense_id=?2 AND period_year=?3 AND period_month=?4
             LIMIT 1",
            params![owner_id, expense_id, year, month],
            |r| r.get(0),
        )
        .optional()?;
    if paid.is_some() {
        return Ok(true);
    }
    let Some(account_id) = reserve_account_id else {
        return Ok(false);
    };
    let (start, end) = month_bounds(year, month)?;
    let allocated: Option<i64> = conn
        .query_row(
            "SELECT id FROM reserve_allocations
             WHERE user_id=?1 AND reserve_account_id=?2
               AND allocation_date>=?3 AND allocation_date<?4
             LIMIT 1",
            params![owner_id, account_id, start, end],
            |r| r.get(0),
        )
        .optional()?;
    Ok(allocated.is_some())
}

/// Record that an obligation's turn in the given period was paid, either
/// as a bill marked paid or as a chit contribution.
pub fn record_expense_payment(
    conn: &Connection,
    owner_id: &str,
    expense_id: i64,
    year: i32,
    month: u32,
    amount: Decimal,
    paid_date: NaiveDate,
    kind: ExpensePaymentKind,
    notes: Option<&str>,
) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    month_start(year, month)?;
    let owned: Option<i64> = conn
        .query_row(
            "SELECT id FROM expenses WHERE id=?1 AND user_id=?2",
            params![expense_id, owner_id],
            |r| r.get(0),
        )
        .optional()?;
    if owned.is_none() {
        return Err(LedgerError::NotFound);
    }
    conn.execute(
        "INSERT INTO expense_payments(expense_id, period_year, period_month, paid_date, amount, kind, notes, user_id)
         VALUES(?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            expense_id,
            year,
            month,
            paid_date,
            amount.to_string(),
            kind.as_str(),
            notes,
            owner_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(expense = expense_id, payment = id, %amount, "recorded expense payment");
    Ok(id)
}

/// Delete a settlement record, returning the expense it belonged to.
pub fn delete_expense_payment(conn: &Connection, owner_id: &str, payment_id: i64) -> Result<i64> {
    let expense: Option<i64> = conn
        .query_row(
            "SELECT expense_id FROM expense_payments WHERE id=?1 AND user_id=?2",
            params![payment_id, owner_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(expense_id) = expense else {
        return Err(LedgerError::NotFound);
    };
    conn.execute(
        "DELETE FROM expense_payments WHERE id=?1",
        params![payment_id],
    )?;
    info!(expense = expense_id, payment = payment_id, "deleted expense payment");
    Ok(expense_id)
}
