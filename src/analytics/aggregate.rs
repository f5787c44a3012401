// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use super::proration::{lifetime_spend, monthly_equivalent, windowed_spend};
use super::range::{
    DateWindow, month_end, month_start, resolve_window, shift_months_back,
    whole_calendar_months_between, TimeRange,
};
use crate::models::{Category, Subscription};

pub const DEFAULT_TREND_MONTHS: usize = 24;

pub const DEFAULT_CATEGORY_COLOR: &str = "#95A5A6";

static CATEGORY_COLORS: Lazy<HashMap<Category, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (Category::Entertainment, "#FF6B6B"),
        (Category::Music, "#4ECDC4"),
        (Category::Productivity, "#45B7D1"),
        (Category::Utilities, "#96CEB4"),
        (Category::Shopping, "#FFEAA7"),
    ])
});

/// Display colour for a category. `Other` has no palette entry and gets the neutral default.
pub fn category_color(category: Category) -> &'static str {
    CATEGORY_COLORS
        .get(&category)
        .copied()
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: Category,
    pub amount: Decimal,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingTrendPoint {
    /// First day of the month this point covers.
    pub month: NaiveDate,
    pub amount: Decimal,
}

impl SpendingTrendPoint {
    pub fn label(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingExtreme<'a> {
    pub subscription: &'a Subscription,
    pub total_spent: Decimal,
    pub months_active: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpendingExtremes<'a> {
    pub most: Option<SpendingExtreme<'a>>,
    pub least: Option<SpendingExtreme<'a>>,
}

impl SpendingExtremes<'_> {
    /// True when `most` and `least` are the same subscription (single-item input).
    pub fn is_single(&self) -> bool {
        match (&self.most, &self.least) {
            (Some(m), Some(l)) => m.subscription.id == l.subscription.id,
            _ => false,
        }
    }
}

/// Every aggregate for one range, computed against a single reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary<'a> {
    pub range: TimeRange,
    pub reference: NaiveDate,
    pub window: DateWindow,
    pub total: Decimal,
    pub percentage_change: Option<Decimal>,
    pub categories: Vec<CategorySpending>,
    pub trend: Vec<SpendingTrendPoint>,
    pub extremes: SpendingExtremes<'a>,
}

/// Windowed spend grouped by category, largest first.
///
/// Subscriptions with no spend in the window are left out. Equal amounts keep
/// the order in which their category was first met in `subscriptions`; no
/// secondary key is applied.
#[instrument(level = "debug", skip(subscriptions), fields(count = subscriptions.len()))]
pub fn category_spending(
    subscriptions: &[Subscription],
    range: TimeRange,
    reference: NaiveDate,
) -> Vec<CategorySpending> {
    let window = resolve_window(range, reference);
    let mut groups: Vec<CategorySpending> = Vec::new();

    for sub in subscriptions {
        let amount = windowed_spend(sub, window.start, window.end);
        if amount <= Decimal::ZERO {
            continue;
        }
        match groups.iter_mut().find(|g| g.category == sub.category) {
            Some(group) => {
                group.amount += amount;
                group.count += 1;
            }
            None => groups.push(CategorySpending {
                category: sub.category,
                amount,
                count: 1,
                color: category_color(sub.category),
            }),
        }
    }

    // stable: ties keep first-encounter order
    groups.sort_by(|a, b| b.amount.cmp(&a.amount));
    debug!(categories = groups.len(), "category spending computed");
    groups
}

/// Monthly run-rate series, oldest month first, ending at `reference`'s month.
///
/// A month's value is the sum of monthly equivalents of every subscription
/// that started on or before that month's last day. This is a commitment
/// figure and deliberately differs from [`windowed_spend`].
#[instrument(level = "debug", skip(subscriptions), fields(count = subscriptions.len()))]
pub fn spending_trend(
    subscriptions: &[Subscription],
    reference: NaiveDate,
    max_months: usize,
    limit_to_range: Option<TimeRange>,
) -> Vec<SpendingTrendPoint> {
    let Some(earliest) = subscriptions.iter().map(|s| s.start_date).min() else {
        return Vec::new();
    };
    let start = match limit_to_range {
        Some(range) => earliest.max(resolve_window(range, reference).start),
        None => earliest,
    };
    let span = whole_calendar_months_between(start, reference) + 1;
    let count = usize::try_from(span).unwrap_or(0).min(max_months);
    let current = month_start(reference);

    (0..count)
        .rev()
        .filter_map(|back| {
            let month = current.checked_sub_months(Months::new(u32::try_from(back).ok()?))?;
            let last_day = month_end(month);
            let amount: Decimal = subscriptions
                .iter()
                .filter(|s| s.start_date <= last_day)
                .map(monthly_equivalent)
                .sum();
            Some(SpendingTrendPoint { month, amount })
        })
        .collect()
}

/// Highest and lowest lifetime spenders.
///
/// Ranking is a stable descending sort on total spend, so equal totals keep
/// input order. A single subscription is returned as both `most` and `least`.
pub fn spending_extremes(
    subscriptions: &[Subscription],
    reference: NaiveDate,
) -> SpendingExtremes<'_> {
    let mut ranked: Vec<SpendingExtreme<'_>> = subscriptions
        .iter()
        .map(|subscription| {
            let spend = lifetime_spend(subscription, reference);
            SpendingExtreme {
                subscription,
                total_spent: spend.total_spent,
                months_active: spend.months_active,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));

    SpendingExtremes {
        least: ranked.last().cloned(),
        most: ranked.into_iter().next(),
    }
}

pub fn total_spending(
    subscriptions: &[Subscription],
    range: TimeRange,
    reference: NaiveDate,
) -> Decimal {
    let window = resolve_window(range, reference);
    subscriptions
        .iter()
        .map(|s| windowed_spend(s, window.start, window.end))
        .sum()
}

/// Change against the same range evaluated one period earlier, in percent.
///
/// The previous total re-resolves the same range at a reference shifted back
/// by the range width, so multi-month windows are trailing windows rather than
/// strictly back-to-back calendar blocks.
///
/// Returns `None` for lifetime, and when both totals are zero. A zero previous
/// total with positive current spend reports `100`.
pub fn percentage_change(
    subscriptions: &[Subscription],
    range: TimeRange,
    reference: NaiveDate,
) -> Option<Decimal> {
    let months = range.period_months()?;
    let current = total_spending(subscriptions, range, reference);
    let previous = total_spending(subscriptions, range, shift_months_back(reference, months));
    debug!(%range, %current, %previous, "percentage change inputs");

    if previous.is_zero() {
        return (current > Decimal::ZERO).then_some(Decimal::ONE_HUNDRED);
    }
    Some((current - previous) / previous * Decimal::ONE_HUNDRED)
}

pub fn summarize(
    subscriptions: &[Subscription],
    range: TimeRange,
    reference: NaiveDate,
    trend_months: usize,
) -> SpendingSummary<'_> {
    SpendingSummary {
        range,
        reference,
        window: resolve_window(range, reference),
        total: total_spending(subscriptions, range, reference),
        percentage_change: percentage_change(subscriptions, range, reference),
        categories: category_spending(subscriptions, range, reference),
        trend: spending_trend(subscriptions, reference, trend_months, Some(range)),
        extremes: spending_extremes(subscriptions, reference),
    }
}
