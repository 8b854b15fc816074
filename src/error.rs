// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure taxonomy for every ledger operation. None of these are fatal to
/// the process; the caller decides how to surface them.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("record not found or not owned by caller")]
    NotFound,
    #[error("amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("interval months must be positive, got {0}")]
    InvalidInterval(i64),
    #[error("a reserve account already exists for expense {0}")]
    AlreadyExists(i64),
    #[error("invalid calendar month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("malformed {field} '{value}' in stored record")]
    Malformed { field: &'static str, value: String },
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
