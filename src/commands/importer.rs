// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config;
use crate::models::{BillingCycle, Category};
use crate::store::{self, NewSubscription};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use tracing::debug;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("subscriptions", sub)) => import_subscriptions(conn, sub),
        _ => Ok(()),
    }
}

/// Columns: name, price, cycle, start_date, category, currency, color.
/// Only the first four are required; the whole file is rejected on any bad row.
fn import_subscriptions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let default_ccy = config::load(conn)?.currency;
    let tx = conn.transaction()?;
    let mut count = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let name = rec.get(0).context("name missing")?.trim().to_string();
        let price_raw = rec.get(1).context("price missing")?.trim();
        let cycle_raw = rec.get(2).context("cycle missing")?.trim();
        let start_raw = rec.get(3).context("start_date missing")?.trim();
        let category = rec.get(4).map(Category::parse_lenient).unwrap_or(Category::Other);
        let currency = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| default_ccy.clone());
        let color = rec
            .get(6)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let new = NewSubscription {
            price: parse_decimal(price_raw)
                .with_context(|| format!("Invalid price '{}' on row {}", price_raw, row))?,
            cycle: cycle_raw
                .parse::<BillingCycle>()
                .with_context(|| format!("Invalid cycle on row {}", row))?,
            start_date: parse_date(start_raw)
                .with_context(|| format!("Invalid start date on row {}", row))?,
            name,
            currency,
            category,
            color,
        };
        store::add(&tx, new).with_context(|| format!("Rejected row {}", row))?;
        count += 1;
    }
    tx.commit()?;
    debug!(count, path, "csv import committed");
    println!("Imported {} subscriptions from {}", count, path);
    Ok(())
}
