// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::billing::upcoming_renewals;
use crate::config;
use crate::models::{BillingCycle, Category};
use crate::store::{self, NewSubscription, SubscriptionPatch};
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, reference_date,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            store::remove(conn, id)?;
            println!("Removed subscription {}", id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("upcoming", sub)) => upcoming(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn trimmed<'a>(sub: &'a clap::ArgMatches, key: &str) -> Option<&'a str> {
    sub.get_one::<String>(key).map(|s| s.trim())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = config::load(conn)?;
    let new = NewSubscription {
        name: trimmed(sub, "name").unwrap().to_string(),
        price: parse_decimal(trimmed(sub, "price").unwrap())?,
        currency: trimmed(sub, "currency")
            .map(str::to_string)
            .unwrap_or(settings.currency),
        cycle: trimmed(sub, "cycle").unwrap().parse::<BillingCycle>()?,
        start_date: parse_date(trimmed(sub, "start").unwrap())?,
        category: Category::parse_lenient(trimmed(sub, "category").unwrap()),
        color: trimmed(sub, "color").map(str::to_string),
    };
    let created = store::add(conn, new)?;
    println!(
        "Added '{}' ({} {} {}, {}) as {}",
        created.name,
        created.currency,
        created.price,
        created.cycle,
        created.category,
        created.id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = trimmed(sub, "id").unwrap();
    let patch = SubscriptionPatch {
        name: trimmed(sub, "name").map(str::to_string),
        price: trimmed(sub, "price").map(parse_decimal).transpose()?,
        currency: trimmed(sub, "currency").map(str::to_string),
        cycle: trimmed(sub, "cycle")
            .map(|s| s.parse::<BillingCycle>())
            .transpose()?,
        start_date: trimmed(sub, "start").map(parse_date).transpose()?,
        category: trimmed(sub, "category").map(Category::parse_lenient),
        color: trimmed(sub, "color").map(str::to_string),
    };
    let updated = store::update(conn, id, patch)?;
    println!("Updated '{}' ({})", updated.name, updated.id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let subs = store::list(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &subs)? {
        let rows = subs
            .iter()
            .map(|s| {
                vec![
                    s.id.clone(),
                    s.name.clone(),
                    fmt_money(&s.price, &s.currency),
                    s.cycle.to_string(),
                    s.start_date.to_string(),
                    s.category.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Price", "Cycle", "Start", "Category"], rows)
        );
    }
    Ok(())
}

fn upcoming(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let days = *sub.get_one::<u32>("days").unwrap_or(&7);
    let reference = reference_date(sub)?;
    let subs = store::list(conn)?;
    let due = upcoming_renewals(&subs, reference, days);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &due)? {
        let rows = due
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    r.subscription.name.clone(),
                    fmt_money(&r.amount, &r.subscription.currency),
                    format!("in {} days", r.days_until),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Subscription", "Amount", "Due"], rows));
    }
    Ok(())
}
