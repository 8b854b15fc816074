// Copyright (c) 2026 Chitbook.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Expense, PaymentStrategy};
use crate::recurrence;

/// PayNow iff the obligation is due in the target month, else
/// AccumulateInBank. Pure; same inputs always classify the same way.
pub fn classify(expense: &Expense, target_month: NaiveDate) -> Result<PaymentStrategy> {
    let due = recurrence::is_due(
        expense.kind,
        expense.interval_months,
        expense.start_date,
        target_month,
    )?;
    Ok(if due {
        PaymentStrategy::PayNow
    } else {
        PaymentStrategy::AccumulateInBank
    })
}
