// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::models::{
    Expense, ExpenseKind, Installment, ReserveAccount, ReserveAccountView, ReserveAllocation,
    ReservePayment,
};
use crate::recurrence;
use crate::utils::{decode_amount, first_of_month, month_start, step_months};

/// Schedules never grow past this many entries, whatever the horizon.
const SCHEDULE_HARD_CAP: usize = 500;
/// Default schedule horizon when no tenure end is recorded.
const DEFAULT_HORIZON_MONTHS: u32 = 120;

/// Create a sinking-fund account for an expense. One reserve per expense
/// and owner; the expense must belong to the caller.
pub fn create_reserve_account(
    conn: &Connection,
    owner_id: &str,
    expense_id: i64,
    total_amount: Option<Decimal>,
    start_date: Option<NaiveDate>,
    tenure_end: Option<NaiveDate>,
    notes: Option<&str>,
) -> Result<i64> {
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
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM reserve_accounts WHERE expense_id=?1 AND user_id=?2",
            params![expense_id, owner_id],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(LedgerError::AlreadyExists(expense_id));
    }
    conn.execute(
        "INSERT INTO reserve_accounts(expense_id, start_date, tenure_end, total_amount, notes, user_id)
         VALUES(?1,?2,?3,?4,?5,?6)",
        params![
            expense_id,
            start_date,
            tenure_end,
            total_amount.map(|d| d.to_string()),
            notes,
            owner_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(account = id, expense = expense_id, "created reserve account");
    Ok(id)
}

/// Append a deposit. The date is normalized to the first of its month;
/// one allocation per month is the intent, but duplicates are accepted
/// since only the sum matters.
pub fn record_allocation(
    conn: &Connection,
    owner_id: &str,
    account_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    require_account(conn, owner_id, account_id)?;
    let month = first_of_month(date);
    conn.execute(
        "INSERT INTO reserve_allocations(reserve_account_id, amount, allocation_date, user_id)
         VALUES(?1,?2,?3,?4)",
        params![account_id, amount.to_string(), month, owner_id],
    )?;
    let id = conn.last_insert_rowid();
    debug!(account = account_id, allocation = id, %amount, "recorded allocation");
    Ok(id)
}

/// Append a withdrawal, optionally tagged to the installment due date it
/// settles. A payment may exceed the balance; the ledger records it as-is.
pub fn record_payment(
    conn: &Connection,
    owner_id: &str,
    account_id: i64,
    amount: Decimal,
    date: NaiveDate,
    installment_due_date: Option<NaiveDate>,
    notes: Option<&str>,
) -> Result<i64> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    require_account(conn, owner_id, account_id)?;
    conn.execute(
        "INSERT INTO reserve_payments(reserve_account_id, amount, payment_date, installment_due_date, notes, user_id)
         VALUES(?1,?2,?3,?4,?5,?6)",
        params![
            account_id,
            amount.to_string(),
            date,
            installment_due_date,
            notes,
            owner_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(account = account_id, payment = id, %amount, "recorded payment");
    Ok(id)
}

/// Delete a deposit, returning the account that owned it.
pub fn delete_allocation(conn: &Connection, owner_id: &str, allocation_id: i64) -> Result<i64> {
    let account: Option<i64> = conn
        .query_row(
            "SELECT reserve_account_id FROM reserve_allocations WHERE id=?1 AND user_id=?2",
            params![allocation_id, owner_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(account_id) = account else {
        return Err(LedgerError::NotFound);
    };
    conn.execute(
        "DELETE FROM reserve_allocations WHERE id=?1",
        params![allocation_id],
    )?;
    info!(account = account_id, allocation = allocation_id, "deleted allocation");
    Ok(account_id)
}

/// Delete a withdrawal, returning the account that owned it.
pub fn delete_payment(conn: &Connection, owner_id: &str, payment_id: i64) -> Result<i64> {
    let account: Option<i64> = conn
        .query_row(
            "SELECT reserve_account_id FROM reserve_payments WHERE id=?1 AND user_id=?2",
            params![payment_id, owner_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(account_id) = account else {
        return Err(LedgerError::NotFound);
    };
    conn.execute(
        "DELETE FROM reserve_payments WHERE id=?1",
        params![payment_id],
    )?;
    info!(account = account_id, payment = payment_id, "deleted payment");
    Ok(account_id)
}

/// All reserve accounts of an owner, with balances and due state for the
/// requested month. History and installments stay empty here; use the
/// detail call for one account's full ledger.
pub fn reserve_accounts(
    conn: &Connection,
    owner_id: &str,
    year: i32,
    month: u32,
) -> Result<Vec<ReserveAccountView>> {
    let as_of = month_start(year, month)?;
    load_accounts(conn, owner_id, None)?
        .into_iter()
        .map(|(account, expense)| build_view(conn, owner_id, account, expense, as_of, false))
        .collect()
}

/// Full ledger snapshot of one account, evaluated against the current
/// month. Returns `None` when the account is absent or foreign.
pub fn reserve_account_detail(
    conn: &Connection,
    owner_id: &str,
    account_id: i64,
) -> Result<Option<ReserveAccountView>> {
    let today = chrono::Local::now().date_naive();
    reserve_account_detail_as_of(conn, owner_id, account_id, today)
}

/// Deterministic variant of [`reserve_account_detail`] for callers that
/// control the clock.
pub fn reserve_account_detail_as_of(
    conn: &Connection,
    owner_id: &str,
    account_id: i64,
    today: NaiveDate,
) -> Result<Option<ReserveAccountView>> {
    let mut found = load_accounts(conn, owner_id, Some(account_id))?;
    let Some((account, expense)) = found.pop() else {
        return Ok(None);
    };
    Ok(Some(build_view(
        conn, owner_id, account, expense, today, true,
    )?))
}

fn require_account(conn: &Connection, owner_id: &str, account_id: i64) -> Result<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM reserve_accounts WHERE id=?1 AND user_id=?2",
            params![account_id, owner_id],
            |r| r.get(0),
        )
        .optional()?;
    if found.is_none() {
        return Err(LedgerError::NotFound);
    }
    Ok(())
}

fn build_view(
    conn: &Connection,
    owner_id: &str,
    account: ReserveAccount,
    expense: Expense,
    as_of: NaiveDate,
    with_history: bool,
) -> Result<ReserveAccountView> {
    let allocations = load_allocations(conn, owner_id, account.id)?;
    let payments = load_payments(conn, owner_id, account.id)?;
    let total_allocated: Decimal = allocations.iter().map(|a| a.amount).sum();
    let total_paid: Decimal = payments.iter().map(|p| p.amount).sum();
    let is_due_this_month = recurrence::is_due(
        expense.kind,
        expense.interval_months,
        expense.start_date,
        as_of,
    )?;
    let next_due_date = recurrence::next_due_date(
        expense.kind,
        expense.interval_months,
        expense.start_date,
        as_of,
    )?;
    let planned_monthly_allocation = if expense.kind == ExpenseKind::Monthly {
        expense.amount
    } else {
        expense.amount / Decimal::from(expense.interval_months)
    };
    let installments = if with_history {
        installment_schedule(&expense, &account, &payments)
    } else {
        Vec::new()
    };
    Ok(ReserveAccountView {
        id: account.id,
        expense_id: account.expense_id,
        description: expense.description,
        kind: expense.kind,
        interval_months: expense.interval_months,
        installment_amount: expense.amount,
        start_date: account.start_date,
        tenure_end: account.tenure_end,
        total_amount: account.total_amount,
        notes: account.notes,
        total_allocated,
        total_paid,
        balance: total_allocated - total_paid,
        planned_monthly_allocation,
        is_due_this_month,
        next_due_date,
        installments,
        allocations: if with_history { allocations } else { Vec::new() },
        payments: if with_history { payments } else { Vec::new() },
    })
}

/// The planned run of installments: first-of-month steps of the interval
/// from the account (or expense) start, up to the tenure end or a ten-year
/// horizon, capped hard at [`SCHEDULE_HARD_CAP`] entries. An entry is paid
/// when a recorded payment is tagged with its month.
fn installment_schedule(
    expense: &Expense,
    account: &ReserveAccount,
    payments: &[ReservePayment],
) -> Vec<Installment> {
    let interval = if expense.kind == ExpenseKind::Monthly {
        1
    } else {
        expense.interval_months.max(1) as u32
    };
    let start = first_of_month(account.start_date.unwrap_or(expense.start_date));
    let horizon = account
        .tenure_end
        .unwrap_or_else(|| step_months(start, DEFAULT_HORIZON_MONTHS));
    let mut out = Vec::new();
    let mut cursor = start;
    let mut index = 1u32;
    while cursor <= horizon && out.len() < SCHEDULE_HARD_CAP {
        let paid = payments.iter().find(|p| {
            p.installment_due_date
                .is_some_and(|d| d.year() == cursor.year() && d.month() == cursor.month())
        });
        out.push(Installment {
            index,
            due_date: cursor,
            amount: expense.amount,
            is_paid: paid.is_some(),
            payment_date: paid.map(|p| p.payment_date),
            payment_id: paid.map(|p| p.id),
            notes: paid.and_then(|p| p.notes.clone()),
        });
        cursor = step_months(cursor, interval);
        index += 1;
    }
    out
}

fn load_accounts(
    conn: &Connection,
    owner_id: &str,
    account_id: Option<i64>,
) -> Result<Vec<(ReserveAccount, Expense)>> {
    let sql = "SELECT r.id, r.expense_id, r.start_date, r.tenure_end, r.total_amount, r.notes,
                      e.description, e.amount, e.kind, e.interval_months, e.start_date, e.category_id
               FROM reserve_accounts r
               JOIN expenses e ON e.id = r.expense_id
               WHERE r.user_id = ?1 AND (?2 IS NULL OR r.id = ?2)
               ORDER BY e.description";
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params![owner_id, account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let raw_total: Option<String> = r.get(4)?;
        let raw_amount: String = r.get(7)?;
        let raw_kind: String = r.get(8)?;
        let expense_id: i64 = r.get(1)?;
        let account = ReserveAccount {
            id: r.get(0)?,
            expense_id,
            start_date: r.get(2)?,
            tenure_end: r.get(3)?,
            total_amount: raw_total
                .map(|s| decode_amount("reserve_accounts.total_amount", &s))
                .transpose()?,
            notes: r.get(5)?,
        };
        let expense = Expense {
            id: expense_id,
            description: r.get(6)?,
            amount: decode_amount("expenses.amount", &raw_amount)?,
            kind: ExpenseKind::parse(&raw_kind)?,
            interval_months: r.get(9)?,
            start_date: r.get(10)?,
            category_id: r.get(11)?,
        };
        out.push((account, expense));
    }
    Ok(out)
}

fn load_allocations(
    conn: &Connection,
    owner_id: &str,
    account_id: i64,
) -> Result<Vec<ReserveAllocation>> {
    let mut stmt = conn.prepare(
        "SELECT id, reserve_account_id, amount, allocation_date, notes
         FROM reserve_allocations WHERE user_id=?1 AND reserve_account_id=?2
         ORDER BY allocation_date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![owner_id, account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let raw: String = r.get(2)?;
        out.push(ReserveAllocation {
            id: r.get(0)?,
            reserve_account_id: r.get(1)?,
            amount: decode_amount("reserve_allocations.amount", &raw)?,
            allocation_date: r.get(3)?,
            notes: r.get(4)?,
        });
    }
    Ok(out)
}

fn load_payments(
    conn: &Connection,
    owner_id: &str,
    account_id: i64,
) -> Result<Vec<ReservePayment>> {
    let mut stmt = conn.prepare(
        "SELECT id, reserve_account_id, amount, payment_date, installment_due_date, notes
         FROM reserve_payments WHERE user_id=?1 AND reserve_account_id=?2
         ORDER BY payment_date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![owner_id, account_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let raw: String = r.get(2)?;
        out.push(ReservePayment {
            id: r.get(0)?,
            reserve_account_id: r.get(1)?,
            amount: decode_amount("reserve_payments.amount", &raw)?,
            payment_date: r.get(3)?,
            installment_due_date: r.get(4)?,
            notes: r.get(5)?,
        });
    }
    Ok(out)
}
