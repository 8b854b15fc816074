// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::income::monthly_income;
use crate::models::{
    Expense, ExpenseKind, MonthSummary, MonthlyBreakdown, MonthlyBreakdownItem, PaymentStrategy,
};
use crate::settle::is_settled;
use crate::strategy::classify;
use crate::utils::{decode_amount, month_bounds, month_name, month_start};

/// Line items and total for one month.
///
/// One-time expenses dated inside the month are always paid now at full
/// amount. Recurring obligations display their full amount in due months
/// and their monthly share while accumulating; the total sums what each
/// row displays, never both.
pub fn monthly_breakdown(
    conn: &Connection,
    owner_id: &str,
    year: i32,
    month: u32,
) -> Result<MonthlyBreakdown> {
    let target = month_start(year, month)?;
    let (start, end) = month_bounds(year, month)?;
    let mut items = Vec::new();
    let mut total = Decimal::ZERO;

    let mut stmt = conn.prepare(
        "SELECT id, description, amount, paid_date FROM one_time_expenses
         WHERE user_id=?1 AND expense_date>=?2 AND expense_date<?3",
    )?;
    let mut rows = stmt.query(params![owner_id, start, end])?;
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let description: String = r.get(1)?;
        let raw: String = r.get(2)?;
        let paid_date: Option<chrono::NaiveDate> = r.get(3)?;
        let amount = decode_amount("one_time_expenses.amount", &raw)?;
        items.push(MonthlyBreakdownItem {
            description,
            amount,
            contribution: amount,
            interval_months: 1,
            strategy: PaymentStrategy::PayNow,
            is_monthly_bill: true,
            is_chit_due: false,
            is_paid: paid_date.is_some(),
            expense_id: None,
            one_time_id: Some(id),
            reserve_account_id: None,
            notes: "One-time expense".to_string(),
        });
        total += amount;
    }

    // Reserve bindings resolved once for the whole month, not per row.
    let reserves = reserve_bindings(conn, owner_id)?;

    for exp in load_expenses(conn, owner_id)? {
        let strategy = classify(&exp, target)?;
        let yearly = exp.kind == ExpenseKind::EveryNMonths && exp.interval_months == 12;
        let reserve_account_id = reserves.get(&exp.id).copied();
        let share = if exp.kind == ExpenseKind::Monthly {
            exp.amount
        } else {
            exp.amount / Decimal::from(exp.interval_months)
        };
        let settled = is_settled(conn, owner_id, exp.id, reserve_account_id, year, month)?;

        match strategy {
            PaymentStrategy::PayNow => {
                let notes = if yearly {
                    "Pay this month (yearly bill)"
                } else if exp.kind == ExpenseKind::Monthly {
                    "Move to savings & pay"
                } else {
                    "Pay from bank account (chit due)"
                };
                items.push(MonthlyBreakdownItem {
                    description: exp.description.clone(),
                    amount: exp.amount,
                    contribution: share,
                    interval_months: exp.interval_months,
                    strategy,
                    is_monthly_bill: exp.kind == ExpenseKind::Monthly || yearly,
                    is_chit_due: !yearly
                        && (exp.kind == ExpenseKind::EveryNMonths || exp.kind == ExpenseKind::Chit),
                    is_paid: settled,
                    expense_id: Some(exp.id),
                    one_time_id: None,
                    reserve_account_id,
                    notes: notes.to_string(),
                });
                total += exp.amount;
            }
            PaymentStrategy::AccumulateInBank => {
                let notes = if exp.kind == ExpenseKind::Chit {
                    "Chit - keep in bank, accumulate, pay when turn comes"
                } else {
                    "Keep in bank account - accumulate (sinking fund)"
                };
                items.push(MonthlyBreakdownItem {
                    description: exp.description.clone(),
                    amount: share,
                    contribution: share,
                    interval_months: exp.interval_months,
                    strategy,
                    is_monthly_bill: false,
                    is_chit_due: false,
                    is_paid: settled,
                    expense_id: Some(exp.id),
                    one_time_id: None,
                    reserve_account_id,
                    notes: notes.to_string(),
                });
                total += share;
            }
        }
    }

    Ok(MonthlyBreakdown { total, items })
}

/// Dashboard roll-up: income against the breakdown, split into monthly
/// bills, chit payments due, and chit allocations still accumulating.
pub fn month_summary(
    conn: &Connection,
    owner_id: &str,
    year: i32,
    month: u32,
) -> Result<MonthSummary> {
    let total_income = monthly_income(conn, owner_id, year, month)?;
    let MonthlyBreakdown { total, items } = monthly_breakdown(conn, owner_id, year, month)?;
    let move_to_savings = items
        .iter()
        .filter(|i| i.is_monthly_bill)
        .map(|i| i.amount)
        .sum();
    let chit_payment = items
        .iter()
        .filter(|i| i.is_chit_due)
        .map(|i| i.amount)
        .sum();
    let chit_allocation = items
        .iter()
        .filter(|i| !i.is_monthly_bill && !i.is_chit_due)
        .map(|i| i.amount)
        .sum();
    Ok(MonthSummary {
        year,
        month,
        month_name: month_name(month).to_string(),
        total_income,
        total_expenses: total,
        net_balance: total_income - total,
        move_to_savings,
        chit_payment,
        chit_allocation,
        items,
    })
}

fn reserve_bindings(conn: &Connection, owner_id: &str) -> Result<HashMap<i64, i64>> {
    let mut stmt = conn.prepare("SELECT expense_id, id FROM reserve_accounts WHERE user_id=?1")?;
    let mut rows = stmt.query(params![owner_id])?;
    let mut map = HashMap::new();
    while let Some(r) = rows.next()? {
        map.insert(r.get::<_, i64>(0)?, r.get::<_, i64>(1)?);
    }
    Ok(map)
}

fn load_expenses(conn: &Connection, owner_id: &str) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, kind, interval_months, start_date, category_id
         FROM expenses WHERE user_id=?1",
    )?;
    let mut rows = stmt.query(params![owner_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let raw_amount: String = r.get(2)?;
        let raw_kind: String = r.get(3)?;
        out.push(Expense {
            id: r.get(0)?,
            description: r.get(1)?,
            amount: decode_amount("expenses.amount", &raw_amount)?,
            kind: ExpenseKind::parse(&raw_kind)?,
            interval_months: r.get(4)?,
            start_date: r.get(5)?,
            category_id: r.get(6)?,
        });
    }
    Ok(out)
}
