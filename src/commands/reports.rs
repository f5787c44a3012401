// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, TimeRange};
use crate::config::{self, Settings};
use crate::store;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table, reference_date};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let settings = config::load(conn)?;
    match m.subcommand() {
        Some(("categories", sub)) => categories(conn, &settings, sub)?,
        Some(("total", sub)) => total(conn, &settings, sub)?,
        Some(("change", sub)) => change(conn, &settings, sub)?,
        Some(("trend", sub)) => trend(conn, &settings, sub)?,
        Some(("extremes", sub)) => extremes(conn, &settings, sub)?,
        Some(("summary", sub)) => summary(conn, &settings, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_range(sub: &clap::ArgMatches) -> Result<Option<TimeRange>> {
    sub.get_one::<String>("range")
        .map(|s| s.parse::<TimeRange>())
        .transpose()
        .context("Invalid --range")
}

/// Free tier sees the current month only.
fn gate_range(settings: &Settings, range: TimeRange, what: &str) -> Result<()> {
    if range != TimeRange::CurrentMonth {
        settings.require_pro(&format!("{} for {}", what, range))?;
    }
    Ok(())
}

fn categories(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let range = parse_range(sub)?.unwrap_or(TimeRange::CurrentMonth);
    gate_range(settings, range, "report categories")?;
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let cats = analytics::category_spending(&subs, range, reference);
    debug!(%range, %reference, rows = cats.len(), "report categories");

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        let rows = cats
            .iter()
            .map(|c| {
                vec![
                    c.category.to_string(),
                    fmt_money(&c.amount, &settings.currency),
                    c.count.to_string(),
                    c.color.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Subscriptions", "Color"], rows)
        );
    }
    Ok(())
}

fn total(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let range = parse_range(sub)?.unwrap_or(TimeRange::CurrentMonth);
    gate_range(settings, range, "report total")?;
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let window = analytics::resolve_window(range, reference);
    let amount = analytics::total_spending(&subs, range, reference);

    let out = json!({
        "range": range,
        "start": window.start,
        "end": window.end,
        "total": amount,
    });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!(
            "{} ({} .. {}): {}",
            range,
            window.start,
            window.end,
            fmt_money(&amount, &settings.currency)
        );
    }
    Ok(())
}

fn change(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    settings.require_pro("report change")?;
    let range = parse_range(sub)?.unwrap_or(TimeRange::CurrentMonth);
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let pct = analytics::percentage_change(&subs, range, reference);

    let out = json!({ "range": range, "reference": reference, "percentage_change": pct });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!("{} change: {}", range, fmt_percent(pct));
    }
    Ok(())
}

fn trend(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    settings.require_pro("report trend")?;
    let limit = parse_range(sub)?;
    let months = sub
        .get_one::<usize>("months")
        .copied()
        .unwrap_or(settings.trend_months);
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let points = analytics::spending_trend(&subs, reference, months, limit);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let rows = points
            .iter()
            .map(|p| vec![p.label(), fmt_money(&p.amount, &settings.currency)])
            .collect();
        println!("{}", pretty_table(&["Month", "Monthly run-rate"], rows));
    }
    Ok(())
}

fn extremes(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    settings.require_pro("report extremes")?;
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let ex = analytics::spending_extremes(&subs, reference);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ex)? {
        let mut rows = Vec::new();
        let labelled = [("Most", ex.most.as_ref()), ("Least", ex.least.as_ref())];
        for (label, entry) in labelled {
            // single subscription: don't show it twice
            if label == "Least" && ex.is_single() {
                continue;
            }
            if let Some(e) = entry {
                rows.push(vec![
                    label.to_string(),
                    e.subscription.name.clone(),
                    fmt_money(&e.total_spent, &settings.currency),
                    e.months_active.to_string(),
                ]);
            }
        }
        println!(
            "{}",
            pretty_table(&["", "Subscription", "Lifetime spend", "Months"], rows)
        );
    }
    Ok(())
}

fn summary(conn: &Connection, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    settings.require_pro("report summary")?;
    let range = parse_range(sub)?.unwrap_or(TimeRange::CurrentMonth);
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let s = analytics::summarize(&subs, range, reference, settings.trend_months);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let cur = &settings.currency;
        println!(
            "{} ({} .. {}), as of {}",
            s.range, s.window.start, s.window.end, s.reference
        );
        println!(
            "Total: {}  Change: {}",
            fmt_money(&s.total, cur),
            fmt_percent(s.percentage_change)
        );
        let rows = s
            .categories
            .iter()
            .map(|c| vec![c.category.to_string(), fmt_money(&c.amount, cur), c.count.to_string()])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Subscriptions"], rows));
        let rows = s
            .trend
            .iter()
            .map(|p| vec![p.label(), fmt_money(&p.amount, cur)])
            .collect();
        println!("{}", pretty_table(&["Month", "Monthly run-rate"], rows));
        if let Some(most) = &s.extremes.most {
            println!("Most spent: {} ({})", most.subscription.name, fmt_money(&most.total_spent, cur));
        }
        if let Some(least) = s.extremes.least.as_ref().filter(|_| !s.extremes.is_single()) {
            println!("Least spent: {} ({})", least.subscription.name, fmt_money(&least.total_spent, cur));
        }
    }
    Ok(())
}
