// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chitbook::error::LedgerError;
use chitbook::models::{Expense, ExpenseKind, PaymentStrategy};
use chitbook::recurrence::{is_due, months_between, next_due_date};
use chitbook::strategy::classify;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(kind: ExpenseKind, amount: i64, interval: i64, start: NaiveDate) -> Expense {
    Expense {
        id: 1,
        description: "Family chit".to_string(),
        amount: Decimal::from(amount),
        kind,
        interval_months: interval,
        start_date: start,
        category_id: None,
    }
}

#[test]
fn months_between_counts_year_and_month_only() {
    assert_eq!(months_between(d(2024, 1, 1), d(2024, 5, 1)), 4);
    assert_eq!(months_between(d(2023, 11, 30), d(2024, 2, 1)), 3);
    assert_eq!(months_between(d(2024, 5, 1), d(2024, 1, 31)), -4);
}

#[test]
fn monthly_is_always_due() {
    // Including months before the start date.
    assert!(is_due(ExpenseKind::Monthly, 1, d(2024, 3, 15), d(2020, 1, 1)).unwrap());
    assert!(is_due(ExpenseKind::Monthly, 1, d(2024, 3, 15), d(2024, 3, 1)).unwrap());
    assert!(is_due(ExpenseKind::Monthly, 1, d(2024, 3, 15), d(2031, 12, 31)).unwrap());
}

#[test]
fn interval_start_month_is_due() {
    assert!(is_due(ExpenseKind::EveryNMonths, 4, d(2024, 1, 10), d(2024, 1, 31)).unwrap());
    assert!(is_due(ExpenseKind::Chit, 6, d(2024, 2, 28), d(2024, 2, 1)).unwrap());
}

#[test]
fn interval_months_before_start_are_not_due() {
    assert!(!is_due(ExpenseKind::EveryNMonths, 4, d(2024, 1, 10), d(2023, 12, 31)).unwrap());
    assert!(!is_due(ExpenseKind::Chit, 3, d(2024, 6, 1), d(2024, 5, 1)).unwrap());
}

#[test]
fn interval_periodicity_holds() {
    let start = d(2024, 1, 15);
    for (month, due) in [(1, true), (2, false), (3, false), (4, false), (5, true)] {
        assert_eq!(
            is_due(ExpenseKind::Chit, 4, start, d(2024, month, 1)).unwrap(),
            due,
            "month {}",
            month
        );
    }
    assert!(is_due(ExpenseKind::Chit, 4, start, d(2024, 9, 1)).unwrap());
    assert!(is_due(ExpenseKind::Chit, 4, start, d(2025, 1, 1)).unwrap());
}

#[test]
fn non_positive_interval_fails_fast() {
    assert!(matches!(
        is_due(ExpenseKind::Chit, 0, d(2024, 1, 1), d(2024, 5, 1)),
        Err(LedgerError::InvalidInterval(0))
    ));
    assert!(matches!(
        is_due(ExpenseKind::EveryNMonths, -3, d(2024, 1, 1), d(2024, 5, 1)),
        Err(LedgerError::InvalidInterval(-3))
    ));
    assert!(matches!(
        next_due_date(ExpenseKind::Chit, 0, d(2024, 1, 1), d(2024, 5, 1)),
        Err(LedgerError::InvalidInterval(0))
    ));
}

#[test]
fn next_due_for_monthly_is_today() {
    let today = d(2024, 6, 15);
    assert_eq!(
        next_due_date(ExpenseKind::Monthly, 1, d(2020, 1, 1), today).unwrap(),
        today
    );
}

#[test]
fn next_due_steps_from_start_and_agrees_with_is_due() {
    let start = d(2024, 1, 15);
    let next = next_due_date(ExpenseKind::Chit, 4, start, d(2024, 6, 15)).unwrap();
    assert_eq!(next, d(2024, 9, 1));
    assert!(is_due(ExpenseKind::Chit, 4, start, next).unwrap());
}

#[test]
fn next_due_for_future_start_is_the_start_month() {
    let next = next_due_date(ExpenseKind::EveryNMonths, 6, d(2025, 3, 10), d(2024, 6, 1)).unwrap();
    assert_eq!(next, d(2025, 3, 1));
}

#[test]
fn next_due_on_first_of_due_month_is_that_month() {
    let next = next_due_date(ExpenseKind::Chit, 4, d(2024, 1, 15), d(2024, 5, 1)).unwrap();
    assert_eq!(next, d(2024, 5, 1));
}

#[test]
fn monthly_obligations_always_classify_pay_now() {
    let rent = expense(ExpenseKind::Monthly, 1000, 1, d(2024, 3, 1));
    for month in 1..=12 {
        assert_eq!(
            classify(&rent, d(2025, month, 1)).unwrap(),
            PaymentStrategy::PayNow
        );
    }
}

#[test]
fn chit_classifies_by_due_month() {
    // 120000 over 4 months from January 2024: May is a turn, June is not.
    let chit = expense(ExpenseKind::Chit, 120000, 4, d(2024, 1, 15));
    assert_eq!(
        classify(&chit, d(2024, 5, 1)).unwrap(),
        PaymentStrategy::PayNow
    );
    assert_eq!(
        classify(&chit, d(2024, 6, 1)).unwrap(),
        PaymentStrategy::AccumulateInBank
    );
}
