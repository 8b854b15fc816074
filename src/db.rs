// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("dev.chitbook", "Chitbook", "chitbook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("chitbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

/// Open (or create) the ledger store at an explicit path. Collaborators
/// that manage their own storage location use this instead of
/// `open_or_init`.
pub fn open_at(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        user_id TEXT NOT NULL,
        UNIQUE(user_id, name)
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('monthly','interval','chit')),
        interval_months INTEGER NOT NULL DEFAULT 1 CHECK(interval_months >= 1),
        start_date TEXT NOT NULL,
        category_id INTEGER,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id);

    CREATE TABLE IF NOT EXISTS one_time_expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        expense_date TEXT NOT NULL,
        paid_date TEXT,
        category_id INTEGER,
        user_id TEXT NOT NULL,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_one_time_expenses_date ON one_time_expenses(expense_date);

    CREATE TABLE IF NOT EXISTS incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        income_date TEXT NOT NULL,
        user_id TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_incomes_date ON incomes(income_date);

    CREATE TABLE IF NOT EXISTS recurring_incomes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        interval_months INTEGER NOT NULL DEFAULT 1 CHECK(interval_months >= 1),
        start_date TEXT NOT NULL,
        user_id TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS expense_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        expense_id INTEGER NOT NULL,
        period_year INTEGER NOT NULL,
        period_month INTEGER NOT NULL,
        paid_date TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('bill_paid','chit_contribution')),
        notes TEXT,
        user_id TEXT NOT NULL,
        FOREIGN KEY(expense_id) REFERENCES expenses(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_expense_payments_period
        ON expense_payments(expense_id, period_year, period_month);

    CREATE TABLE IF NOT EXISTS reserve_accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        expense_id INTEGER NOT NULL,
        start_date TEXT,
        tenure_end TEXT,
        total_amount TEXT,
        notes TEXT,
        user_id TEXT NOT NULL,
        UNIQUE(user_id, expense_id),
        FOREIGN KEY(expense_id) REFERENCES expenses(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS reserve_allocations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reserve_account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        allocation_date TEXT NOT NULL,
        notes TEXT,
        user_id TEXT NOT NULL,
        FOREIGN KEY(reserve_account_id) REFERENCES reserve_accounts(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_reserve_allocations_account
        ON reserve_allocations(reserve_account_id);

    CREATE TABLE IF NOT EXISTS reserve_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reserve_account_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        payment_date TEXT NOT NULL,
        installment_due_date TEXT,
        notes TEXT,
        user_id TEXT NOT NULL,
        FOREIGN KEY(reserve_account_id) REFERENCES reserve_accounts(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_reserve_payments_account
        ON reserve_payments(reserve_account_id);
    "#,
    )?;
    Ok(())
}
