// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// First day of the given calendar month, or `InvalidMonth` for values no
/// calendar has (month 0, month 13).
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(LedgerError::InvalidMonth { year, month })
}

/// Half-open range `[first of month, first of next month)`.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = month_start(year, month)?;
    Ok((start, step_months(start, 1)))
}

pub fn step_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap()
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

/// Amounts are persisted as decimal strings; an undecodable value is store
/// corruption and surfaces as a typed failure rather than a panic.
pub(crate) fn decode_amount(field: &'static str, raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>().map_err(|_| LedgerError::Malformed {
        field,
        value: raw.to_string(),
    })
}
