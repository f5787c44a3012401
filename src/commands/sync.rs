// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{self, SyncRecord};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("push", sub)) => push(conn, sub.get_one::<String>("out").unwrap().trim()),
        Some(("pull", sub)) => pull(conn, sub.get_one::<String>("file").unwrap().trim()),
        _ => Ok(()),
    }
}

fn push(conn: &Connection, out: &str) -> Result<()> {
    let records = store::list_records(conn)?;
    std::fs::write(out, serde_json::to_string_pretty(&records)?)
        .with_context(|| format!("Write snapshot {}", out))?;
    println!("Wrote {} subscriptions to {}", records.len(), out);
    Ok(())
}

fn pull(conn: &mut Connection, file: &str) -> Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("Read snapshot {}", file))?;
    let remote: Vec<SyncRecord> =
        serde_json::from_str(&raw).with_context(|| format!("Parse snapshot {}", file))?;
    let outcome = store::merge_remote(conn, &remote)?;
    println!(
        "Pulled {}: {} new, {} updated, {} kept local",
        file, outcome.inserted, outcome.updated, outcome.kept
    );
    Ok(())
}
