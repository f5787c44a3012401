// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::range::whole_calendar_months_between;
use crate::models::{BillingCycle, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LifetimeSpend {
    pub total_spent: Decimal,
    pub months_active: u32,
}

/// Price normalised to one month. Not rounded.
pub fn monthly_equivalent(sub: &Subscription) -> Decimal {
    debug_assert!(
        !sub.price.is_sign_negative(),
        "negative price on subscription {}",
        sub.id
    );
    match sub.cycle {
        BillingCycle::Monthly => sub.price,
        BillingCycle::Yearly => sub.price / Decimal::from(12),
    }
}

/// Months charged between `from` and `to`. Any touched month counts in full.
fn months_charged(from: NaiveDate, to: NaiveDate) -> u32 {
    let span = whole_calendar_months_between(from, to) + 1;
    span.max(1) as u32
}

/// Spend attributed to `sub` inside the inclusive window `[start, end]`.
///
/// Billing is whole-month: a subscription active for a single day of a month
/// is charged that month's full monthly equivalent. There is no day-level
/// proration.
pub fn windowed_spend(sub: &Subscription, start: NaiveDate, end: NaiveDate) -> Decimal {
    if sub.start_date > end {
        return Decimal::ZERO;
    }
    let effective_start = sub.start_date.max(start);
    monthly_equivalent(sub) * Decimal::from(months_charged(effective_start, end))
}

/// Cumulative spend from the subscription's start through `reference`.
pub fn lifetime_spend(sub: &Subscription, reference: NaiveDate) -> LifetimeSpend {
    if sub.start_date > reference {
        return LifetimeSpend::default();
    }
    let months_active = months_charged(sub.start_date, reference);
    LifetimeSpend {
        total_spent: monthly_equivalent(sub) * Decimal::from(months_active),
        months_active,
    }
}
