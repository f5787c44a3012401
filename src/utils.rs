// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Local, NaiveDate, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

use crate::error::{Error, Result};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| Error::InvalidDecimal(s.to_string()))
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(s.to_string()))
}

/// `--as-of` when given, otherwise today's local date. Resolve once per command.
pub fn reference_date(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("as_of") {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    format!("{}{:.2}", symbol, d.round_dp(2))
}

pub fn fmt_percent(p: Option<Decimal>) -> String {
    match p.map(|v| v.round_dp(1)) {
        Some(v) if v.is_sign_negative() && !v.is_zero() => format!("{:.1}%", v),
        Some(v) => format!("+{:.1}%", v.abs()),
        None => "n/a".to_string(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_and_percent_round_for_display_only() {
        let d: Decimal = "25.98999".parse().unwrap();
        assert_eq!(fmt_money(&d, "$"), "$25.99");
        assert_eq!(fmt_percent(Some("62.539".parse().unwrap())), "+62.5%");
        assert_eq!(fmt_percent(Some("-12.04".parse().unwrap())), "-12.0%");
        assert_eq!(fmt_percent(None), "n/a");
    }

    #[test]
    fn percent_sign_follows_rounded_value() {
        assert_eq!(fmt_percent(Some("-0.04".parse().unwrap())), "+0.0%");
        assert_eq!(fmt_percent(Some("0.04".parse().unwrap())), "+0.0%");
        assert_eq!(fmt_percent(Some("-0.06".parse().unwrap())), "-0.1%");
    }

    #[test]
    fn parse_errors_name_the_input() {
        let err = parse_date("2024-02-30").unwrap_err();
        assert!(err.to_string().contains("2024-02-30"));
        assert!(parse_decimal(" 12.50 ").is_ok());
    }
}
