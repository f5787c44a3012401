// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::range::whole_calendar_months_between;
use crate::models::Subscription;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Renewal<'a> {
    pub subscription: &'a Subscription,
    pub date: NaiveDate,
    pub days_until: i64,
    /// Literal charge for one cycle.
    pub amount: Decimal,
}

/// First charge date on or after `reference`.
///
/// Each candidate is computed from the start date, so a subscription started
/// on the 31st is billed on the last day of shorter months without drifting.
/// `None` only when the date would overflow the calendar.
pub fn next_billing_date(sub: &Subscription, reference: NaiveDate) -> Option<NaiveDate> {
    if sub.start_date >= reference {
        return Some(sub.start_date);
    }
    let step = sub.cycle.months();
    let elapsed = whole_calendar_months_between(sub.start_date, reference).max(0) as u32;
    let mut cycles = (elapsed / step).max(1);
    loop {
        let candidate = sub
            .start_date
            .checked_add_months(Months::new(cycles.checked_mul(step)?))?;
        if candidate >= reference {
            return Some(candidate);
        }
        cycles += 1;
    }
}

/// Renewals due within `days` of `reference` (inclusive), soonest first.
/// Same-day renewals keep input order.
pub fn upcoming_renewals(
    subscriptions: &[Subscription],
    reference: NaiveDate,
    days: u32,
) -> Vec<Renewal<'_>> {
    let Some(horizon) = reference.checked_add_days(Days::new(u64::from(days))) else {
        return Vec::new();
    };
    let mut due: Vec<Renewal<'_>> = subscriptions
        .iter()
        .filter_map(|subscription| {
            let date = next_billing_date(subscription, reference)?;
            (date <= horizon).then(|| Renewal {
                subscription,
                date,
                days_until: (date - reference).num_days(),
                amount: subscription.price,
            })
        })
        .collect();
    due.sort_by_key(|r| r.date);
    due
}
