// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending analytics over subscription records.
//!
//! Everything here is pure: callers pass the subscriptions and a reference
//! date, and get freshly computed aggregates back. Hold the reference date
//! constant across calls whose results are shown together.

pub mod aggregate;
pub mod proration;
pub mod range;

pub use aggregate::{
    category_color, category_spending, percentage_change, spending_extremes, spending_trend,
    summarize, total_spending, CategorySpending, SpendingExtreme, SpendingExtremes,
    SpendingSummary, SpendingTrendPoint, DEFAULT_CATEGORY_COLOR, DEFAULT_TREND_MONTHS,
};
pub use proration::{lifetime_spend, monthly_equivalent, windowed_spend, LifetimeSpend};
pub use range::{resolve_window, DateWindow, TimeRange};
