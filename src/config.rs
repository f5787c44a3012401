// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::warn;

use crate::analytics::DEFAULT_TREND_MONTHS;
use crate::error::{Error, Result};

pub const PRO_ENV: &str = "SUBTALLY_PRO";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Display symbol for new subscriptions and report output.
    pub currency: String,
    /// Entitlement flag; gates the multi-period analytics.
    pub pro: bool,
    pub trend_months: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
            pro: false,
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }
}

impl Settings {
    pub fn require_pro(&self, feature: &str) -> Result<()> {
        if self.pro {
            Ok(())
        } else {
            Err(Error::ProRequired(feature.to_string()))
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn put_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Stored settings with defaults filled in, then `SUBTALLY_PRO` applied on top.
pub fn load(conn: &Connection) -> Result<Settings> {
    let mut settings = Settings::default();
    if let Some(c) = get_setting(conn, "currency")? {
        settings.currency = c;
    }
    if let Some(p) = get_setting(conn, "pro")? {
        settings.pro = parse_flag(&p).unwrap_or(false);
    }
    if let Some(n) = get_setting(conn, "trend_months")? {
        match n.parse::<usize>() {
            Ok(v) => settings.trend_months = v,
            Err(_) => warn!(value = %n, "ignoring unparseable trend_months setting"),
        }
    }
    if let Ok(raw) = std::env::var(PRO_ENV) {
        match parse_flag(&raw) {
            Some(flag) => settings.pro = flag,
            None => warn!(value = %raw, "ignoring unparseable {}", PRO_ENV),
        }
    }
    Ok(settings)
}

pub fn set_currency(conn: &Connection, symbol: &str) -> Result<()> {
    put_setting(conn, "currency", symbol.trim())
}

pub fn set_pro(conn: &Connection, enabled: bool) -> Result<()> {
    put_setting(conn, "pro", if enabled { "true" } else { "false" })
}

pub fn set_trend_months(conn: &Connection, months: usize) -> Result<()> {
    put_setting(conn, "trend_months", &months.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn defaults_when_nothing_stored() {
        let c = conn();
        let s = load(&c).unwrap();
        assert_eq!(s.currency, "$");
        assert_eq!(s.trend_months, 24);
    }

    #[test]
    fn stored_values_round_trip() {
        let c = conn();
        set_currency(&c, " € ").unwrap();
        set_trend_months(&c, 12).unwrap();
        let s = load(&c).unwrap();
        assert_eq!(s.currency, "€");
        assert_eq!(s.trend_months, 12);
    }

    #[test]
    fn pro_gate() {
        let s = Settings::default();
        let err = s.require_pro("report trend").unwrap_err();
        assert!(matches!(err, Error::ProRequired(_)));
        let pro = Settings { pro: true, ..Settings::default() };
        assert!(pro.require_pro("report trend").is_ok());
    }

    #[test]
    fn flag_spellings() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
