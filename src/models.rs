// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// How a recurring obligation falls due.
/// Monthly bills are due every month regardless of start date; interval
/// obligations and chits fall due every `interval_months` from their start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    Monthly,
    EveryNMonths,
    Chit,
}

impl ExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseKind::Monthly => "monthly",
            ExpenseKind::EveryNMonths => "interval",
            ExpenseKind::Chit => "chit",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "monthly" => Ok(ExpenseKind::Monthly),
            "interval" => Ok(ExpenseKind::EveryNMonths),
            "chit" => Ok(ExpenseKind::Chit),
            _ => Err(LedgerError::Malformed {
                field: "expenses.kind",
                value: raw.to_string(),
            }),
        }
    }
}

/// PayNow settles the full amount this month; AccumulateInBank saves the
/// monthly share toward a later due month. There is no third strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStrategy {
    PayNow,
    AccumulateInBank,
}

/// A recurring obligation. Invariant: `interval_months == 1` when `kind`
/// is `Monthly` (the schema CHECKs the lower bound, the CRUD layer
/// normalizes monthly rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub kind: ExpenseKind,
    pub interval_months: i64,
    pub start_date: NaiveDate,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneTimeExpense {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub category_id: Option<i64>,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub income_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringIncome {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub interval_months: i64,
    pub start_date: NaiveDate,
}

/// Settlement tag: a bill marked paid, or a chit contribution moved from
/// the salary account. Kept as data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpensePaymentKind {
    BillPaid,
    ChitContribution,
}

impl ExpensePaymentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpensePaymentKind::BillPaid => "bill_paid",
            ExpensePaymentKind::ChitContribution => "chit_contribution",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "bill_paid" => Ok(ExpensePaymentKind::BillPaid),
            "chit_contribution" => Ok(ExpensePaymentKind::ChitContribution),
            _ => Err(LedgerError::Malformed {
                field: "expense_payments.kind",
                value: raw.to_string(),
            }),
        }
    }
}

/// Sinking-fund bucket bound to exactly one expense per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveAccount {
    pub id: i64,
    pub expense_id: i64,
    pub start_date: Option<NaiveDate>,
    pub tenure_end: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
}

/// A deposit into a reserve account, dated first-of-month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveAllocation {
    pub id: i64,
    pub reserve_account_id: i64,
    pub amount: Decimal,
    pub allocation_date: NaiveDate,
    pub notes: Option<String>,
}

/// A withdrawal from a reserve account, optionally tagged to the
/// installment it settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservePayment {
    pub id: i64,
    pub reserve_account_id: i64,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub installment_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// One row of the monthly breakdown. `amount` is what the month displays
/// and totals (full amount when due, monthly share when accumulating);
/// `contribution` is always the period's accrual share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBreakdownItem {
    pub description: String,
    pub amount: Decimal,
    pub contribution: Decimal,
    pub interval_months: i64,
    pub strategy: PaymentStrategy,
    pub is_monthly_bill: bool,
    pub is_chit_due: bool,
    pub is_paid: bool,
    pub expense_id: Option<i64>,
    pub one_time_id: Option<i64>,
    pub reserve_account_id: Option<i64>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub total: Decimal,
    pub items: Vec<MonthlyBreakdownItem>,
}

/// Dashboard roll-up for one month: income against expenses, split into
/// the three strategy buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub move_to_savings: Decimal,
    pub chit_payment: Decimal,
    pub chit_allocation: Decimal,
    pub items: Vec<MonthlyBreakdownItem>,
}

/// One entry of an installment schedule, 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub index: u32,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub is_paid: bool,
    pub payment_date: Option<NaiveDate>,
    pub payment_id: Option<i64>,
    pub notes: Option<String>,
}

/// Ledger snapshot of one reserve account. List views leave the history
/// and installment vectors empty; the detail view fills them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveAccountView {
    pub id: i64,
    pub expense_id: i64,
    pub description: String,
    pub kind: ExpenseKind,
    pub interval_months: i64,
    pub installment_amount: Decimal,
    pub start_date: Option<NaiveDate>,
    pub tenure_end: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub total_allocated: Decimal,
    pub total_paid: Decimal,
    pub balance: Decimal,
    pub planned_monthly_allocation: Decimal,
    pub is_due_this_month: bool,
    pub next_due_date: NaiveDate,
    pub installments: Vec<Installment>,
    pub allocations: Vec<ReserveAllocation>,
    pub payments: Vec<ReservePayment>,
}
