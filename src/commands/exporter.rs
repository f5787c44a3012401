// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("subscriptions", sub)) => export_subscriptions(conn, sub),
        _ => Ok(()),
    }
}

fn export_subscriptions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let subs = store::list(conn)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "name", "price", "cycle", "start_date", "category", "currency", "color",
            ])?;
            for s in &subs {
                wtr.write_record([
                    s.name.clone(),
                    s.price.to_string(),
                    s.cycle.to_string(),
                    s.start_date.to_string(),
                    s.category.to_string(),
                    s.currency.clone(),
                    s.color.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&subs)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} subscriptions to {}", subs.len(), out);
    Ok(())
}
