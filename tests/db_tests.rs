// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chitbook::db::open_at;
use rusqlite::params;

#[test]
fn open_at_bootstraps_the_schema_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    {
        let conn = open_at(&path).unwrap();
        conn.execute(
            "INSERT INTO expenses(description, amount, kind, interval_months, start_date, user_id)
             VALUES('Rent','1000','monthly',1,'2023-01-01','u1')",
            [],
        )
        .unwrap();
    }
    let conn = open_at(&path).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn deleting_an_expense_cascades_through_its_reserve() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_at(&dir.path().join("ledger.sqlite")).unwrap();
    conn.execute(
        "INSERT INTO expenses(description, amount, kind, interval_months, start_date, user_id)
         VALUES('Chit','120000','chit',4,'2024-01-15','u1')",
        [],
    )
    .unwrap();
    let expense = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO reserve_accounts(expense_id, user_id) VALUES(?1,'u1')",
        params![expense],
    )
    .unwrap();
    let account = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO reserve_allocations(reserve_account_id, amount, allocation_date, user_id)
         VALUES(?1,'30000','2024-02-01','u1')",
        params![account],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO reserve_payments(reserve_account_id, amount, payment_date, user_id)
         VALUES(?1,'1500','2024-02-20','u1')",
        params![account],
    )
    .unwrap();

    conn.execute("DELETE FROM expenses WHERE id=?1", params![expense])
        .unwrap();
    for table in ["reserve_accounts", "reserve_allocations", "reserve_payments"] {
        let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0, "{} not cascaded", table);
    }
}

#[test]
fn duplicate_reserve_binding_is_rejected_by_the_schema() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_at(&dir.path().join("ledger.sqlite")).unwrap();
    conn.execute(
        "INSERT INTO expenses(description, amount, kind, interval_months, start_date, user_id)
         VALUES('Chit','120000','chit',4,'2024-01-15','u1')",
        [],
    )
    .unwrap();
    let expense = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO reserve_accounts(expense_id, user_id) VALUES(?1,'u1')",
        params![expense],
    )
    .unwrap();
    let dup = conn.execute(
        "INSERT INTO reserve_accounts(expense_id, user_id) VALUES(?1,'u1')",
        params![expense],
    );
    assert!(dup.is_err());
}
