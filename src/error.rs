// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the store, settings and input parsing layers.
///
/// The analytics functions never fail and do not use this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid timestamp '{0}', expected RFC 3339")]
    InvalidTimestamp(String),

    #[error("Invalid decimal '{0}'")]
    InvalidDecimal(String),

    #[error("Invalid billing cycle '{0}', expected monthly|yearly")]
    InvalidCycle(String),

    #[error("Invalid time range '{0}', expected current_month|last_3_months|last_year|lifetime")]
    InvalidRange(String),

    #[error("Price must be non-negative, got {0}")]
    NegativePrice(Decimal),

    #[error("Subscription name must not be empty")]
    EmptyName,

    #[error("Subscription '{0}' not found")]
    NotFound(String),

    #[error("{0} requires Subtally Pro (enable with `subtally config set-pro --enabled true`)")]
    ProRequired(String),
}

pub type Result<T> = std::result::Result<T, Error>;
