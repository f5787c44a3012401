// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = config::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["currency".to_string(), s.currency.clone()],
                    vec!["pro".to_string(), s.pro.to_string()],
                    vec!["trend_months".to_string(), s.trend_months.to_string()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set-currency", sub)) => {
            let symbol = sub.get_one::<String>("symbol").unwrap();
            config::set_currency(conn, symbol)?;
            println!("Currency symbol set to {}", symbol.trim());
        }
        Some(("set-pro", sub)) => {
            let enabled = *sub.get_one::<bool>("enabled").unwrap();
            config::set_pro(conn, enabled)?;
            println!("Pro {}", if enabled { "enabled" } else { "disabled" });
        }
        Some(("set-trend-months", sub)) => {
            let months = *sub.get_one::<usize>("months").unwrap();
            config::set_trend_months(conn, months)?;
            println!("Trend length set to {} months", months);
        }
        _ => {}
    }
    Ok(())
}
