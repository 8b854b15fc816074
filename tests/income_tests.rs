// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chitbook::error::LedgerError;
use chitbook::income::{monthly_income, recurring_income_due};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE incomes(id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT NOT NULL, amount TEXT NOT NULL, income_date TEXT NOT NULL, user_id TEXT NOT NULL);
        CREATE TABLE recurring_incomes(id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT NOT NULL, amount TEXT NOT NULL, interval_months INTEGER NOT NULL DEFAULT 1, start_date TEXT NOT NULL, user_id TEXT NOT NULL);
    "#,
    )
    .unwrap();
    conn
}

fn add_income(conn: &Connection, owner: &str, amount: &str, date: &str) {
    conn.execute(
        "INSERT INTO incomes(description, amount, income_date, user_id) VALUES('income', ?1, ?2, ?3)",
        params![amount, date, owner],
    )
    .unwrap();
}

fn add_recurring(conn: &Connection, owner: &str, amount: &str, interval: i64, start: &str) {
    conn.execute(
        "INSERT INTO recurring_incomes(description, amount, interval_months, start_date, user_id) VALUES('salary', ?1, ?2, ?3, ?4)",
        params![amount, interval, start, owner],
    )
    .unwrap();
}

#[test]
fn one_time_income_is_scoped_to_its_month() {
    let conn = setup();
    add_income(&conn, "u1", "1000", "2024-05-10");
    add_income(&conn, "u1", "500", "2024-06-01");
    assert_eq!(
        monthly_income(&conn, "u1", 2024, 5).unwrap(),
        Decimal::from(1000)
    );
    assert_eq!(
        monthly_income(&conn, "u1", 2024, 6).unwrap(),
        Decimal::from(500)
    );
}

#[test]
fn monthly_recurring_income_counts_every_month() {
    let conn = setup();
    add_recurring(&conn, "u1", "50000", 1, "2023-01-05");
    for month in [1, 6, 12] {
        assert_eq!(
            monthly_income(&conn, "u1", 2024, month).unwrap(),
            Decimal::from(50000)
        );
    }
}

#[test]
fn yearly_recurring_income_lands_on_anniversary_months() {
    // 50000 every 12 months from March 2023.
    let conn = setup();
    add_recurring(&conn, "u1", "50000", 12, "2023-03-20");
    assert_eq!(
        monthly_income(&conn, "u1", 2024, 3).unwrap(),
        Decimal::from(50000)
    );
    assert_eq!(
        monthly_income(&conn, "u1", 2025, 3).unwrap(),
        Decimal::from(50000)
    );
    assert_eq!(monthly_income(&conn, "u1", 2024, 4).unwrap(), Decimal::ZERO);
}

#[test]
fn one_time_and_recurring_sum_together() {
    let conn = setup();
    add_income(&conn, "u1", "1200.50", "2024-05-02");
    add_recurring(&conn, "u1", "50000", 1, "2023-01-01");
    assert_eq!(
        monthly_income(&conn, "u1", 2024, 5).unwrap(),
        "51200.50".parse::<Decimal>().unwrap()
    );
}

#[test]
fn foreign_owner_rows_are_ignored() {
    let conn = setup();
    add_income(&conn, "u2", "9999", "2024-05-10");
    add_recurring(&conn, "u2", "50000", 1, "2023-01-01");
    assert_eq!(monthly_income(&conn, "u1", 2024, 5).unwrap(), Decimal::ZERO);
}

#[test]
fn invalid_month_is_rejected() {
    let conn = setup();
    assert!(matches!(
        monthly_income(&conn, "u1", 2024, 13),
        Err(LedgerError::InvalidMonth {
            year: 2024,
            month: 13
        })
    ));
}

#[test]
fn recurring_income_due_follows_rolling_modulo() {
    let start = NaiveDate::from_ymd_opt(2023, 3, 20).unwrap();
    let target = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
    assert!(recurring_income_due(1, start, target(2020, 1)).unwrap());
    assert!(recurring_income_due(12, start, target(2023, 3)).unwrap());
    assert!(recurring_income_due(12, start, target(2024, 3)).unwrap());
    assert!(!recurring_income_due(12, start, target(2024, 4)).unwrap());
    assert!(!recurring_income_due(12, start, target(2022, 3)).unwrap());
    assert!(matches!(
        recurring_income_due(0, start, target(2024, 3)),
        Err(LedgerError::InvalidInterval(0))
    ));
}
