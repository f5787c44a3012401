// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::range::lifetime_start;
use crate::models::Subscription;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::collections::HashMap;

/// Data-integrity findings as `(issue, detail)` pairs.
pub fn diagnose(subs: &[Subscription], today: NaiveDate) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    let mut seen: HashMap<String, &str> = HashMap::new();

    for s in subs {
        if s.start_date > today {
            rows.push(("starts_in_future".into(), format!("{} {}", s.name, s.start_date)));
        }
        // lifetime windows are clamped to this date
        if s.start_date < lifetime_start() {
            rows.push(("start_before_lifetime_window".into(), format!("{} {}", s.name, s.start_date)));
        }
        if s.price.is_zero() {
            rows.push(("zero_price".into(), s.name.clone()));
        }
        let key = s.name.trim().to_lowercase();
        if let Some(first) = seen.get(&key) {
            rows.push(("duplicate_name".into(), format!("{} ({} / {})", s.name, first, s.id)));
        } else {
            seen.insert(key, &s.id);
        }
    }
    rows
}

pub fn handle(conn: &Connection) -> Result<()> {
    let subs = store::list(conn)?;
    let rows: Vec<Vec<String>> = diagnose(&subs, Local::now().date_naive())
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
