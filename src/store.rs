// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed subscription records and last-write-wins sync merging.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{BillingCycle, Category, Subscription};
use crate::utils::{parse_date, parse_decimal, parse_timestamp};

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub name: String,
    pub price: Decimal,
    pub currency: String,
    pub cycle: BillingCycle,
    pub start_date: NaiveDate,
    pub category: Category,
    pub color: Option<String>,
}

/// Fields to change on an existing record; `None` leaves a field as is.
/// `color: Some("")` clears the colour.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub cycle: Option<BillingCycle>,
    pub start_date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub color: Option<String>,
}

/// A record as exchanged with the sync peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub subscription: Subscription,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub kept: usize,
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, price, currency, cycle, start_date, category, color, updated_at FROM subscriptions";

struct RawRow {
    id: String,
    name: String,
    price: String,
    currency: String,
    cycle: String,
    start_date: String,
    category: String,
    color: Option<String>,
    updated_at: String,
}

impl RawRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            name: r.get(1)?,
            price: r.get(2)?,
            currency: r.get(3)?,
            cycle: r.get(4)?,
            start_date: r.get(5)?,
            category: r.get(6)?,
            color: r.get(7)?,
            updated_at: r.get(8)?,
        })
    }
}

impl TryFrom<RawRow> for SyncRecord {
    type Error = Error;

    fn try_from(raw: RawRow) -> Result<Self> {
        Ok(SyncRecord {
            subscription: Subscription {
                id: raw.id,
                name: raw.name,
                price: parse_decimal(&raw.price)?,
                currency: raw.currency,
                cycle: raw.cycle.parse()?,
                start_date: parse_date(&raw.start_date)?,
                category: Category::parse_lenient(&raw.category),
                color: raw.color,
            },
            updated_at: parse_timestamp(&raw.updated_at)?,
        })
    }
}

fn stamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn validate(sub: &Subscription) -> Result<()> {
    if sub.name.trim().is_empty() {
        return Err(Error::EmptyName);
    }
    if sub.price.is_sign_negative() && !sub.price.is_zero() {
        return Err(Error::NegativePrice(sub.price));
    }
    Ok(())
}

fn next_id(conn: &Connection) -> Result<String> {
    let seq: i64 = conn.query_row(
        "SELECT IFNULL(MAX(seq), 0) + 1 FROM subscriptions",
        [],
        |r| r.get(0),
    )?;
    Ok(format!("sub_{:x}_{}", Utc::now().timestamp_millis(), seq))
}

fn upsert(conn: &Connection, sub: &Subscription, updated_at: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO subscriptions(id, name, price, currency, cycle, start_date, category, color, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)
         ON CONFLICT(id) DO UPDATE SET
            name=excluded.name, price=excluded.price, currency=excluded.currency,
            cycle=excluded.cycle, start_date=excluded.start_date, category=excluded.category,
            color=excluded.color, updated_at=excluded.updated_at",
        params![
            sub.id,
            sub.name.trim(),
            sub.price.to_string(),
            sub.currency,
            sub.cycle.as_str(),
            sub.start_date.to_string(),
            sub.category.as_str(),
            sub.color,
            stamp(updated_at)
        ],
    )?;
    Ok(())
}

pub fn add(conn: &Connection, new: NewSubscription) -> Result<Subscription> {
    let sub = Subscription {
        id: next_id(conn)?,
        name: new.name.trim().to_string(),
        price: new.price,
        currency: new.currency,
        cycle: new.cycle,
        start_date: new.start_date,
        category: new.category,
        color: new.color.filter(|c| !c.trim().is_empty()),
    };
    validate(&sub)?;
    upsert(conn, &sub, &Utc::now())?;
    info!(id = %sub.id, name = %sub.name, "subscription added");
    Ok(sub)
}

pub fn find_record(conn: &Connection, id: &str) -> Result<Option<SyncRecord>> {
    let raw = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id=?1"),
            params![id],
            RawRow::from_row,
        )
        .optional()?;
    raw.map(SyncRecord::try_from).transpose()
}

pub fn get(conn: &Connection, id: &str) -> Result<Subscription> {
    find_record(conn, id)?
        .map(|r| r.subscription)
        .ok_or_else(|| Error::NotFound(id.to_string()))
}

pub fn update(conn: &Connection, id: &str, patch: SubscriptionPatch) -> Result<Subscription> {
    let mut sub = get(conn, id)?;
    if let Some(name) = patch.name {
        sub.name = name.trim().to_string();
    }
    if let Some(price) = patch.price {
        sub.price = price;
    }
    if let Some(currency) = patch.currency {
        sub.currency = currency;
    }
    if let Some(cycle) = patch.cycle {
        sub.cycle = cycle;
    }
    if let Some(start_date) = patch.start_date {
        sub.start_date = start_date;
    }
    if let Some(category) = patch.category {
        sub.category = category;
    }
    if let Some(color) = patch.color {
        sub.color = Some(color).filter(|c| !c.trim().is_empty());
    }
    validate(&sub)?;
    upsert(conn, &sub, &Utc::now())?;
    info!(id = %sub.id, "subscription updated");
    Ok(sub)
}

pub fn remove(conn: &Connection, id: &str) -> Result<()> {
    let n = conn.execute("DELETE FROM subscriptions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(Error::NotFound(id.to_string()));
    }
    info!(id, "subscription removed");
    Ok(())
}

/// All records in insertion order.
pub fn list_records(conn: &Connection) -> Result<Vec<SyncRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY seq"))?;
    let rows = stmt.query_map([], RawRow::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(SyncRecord::try_from(row?)?);
    }
    Ok(out)
}

/// All subscriptions in insertion order. This order is what the analytics
/// functions treat as input order for tie-breaking.
pub fn list(conn: &Connection) -> Result<Vec<Subscription>> {
    Ok(list_records(conn)?
        .into_iter()
        .map(|r| r.subscription)
        .collect())
}

/// Merge records pulled from a sync peer. The newer `updated_at` wins; on a
/// tie the local copy is kept. Records only present locally are untouched.
pub fn merge_remote(conn: &mut Connection, remote: &[SyncRecord]) -> Result<MergeOutcome> {
    let tx = conn.transaction()?;
    let mut outcome = MergeOutcome::default();
    for record in remote {
        validate(&record.subscription)?;
        match find_record(&tx, &record.subscription.id)? {
            None => {
                upsert(&tx, &record.subscription, &record.updated_at)?;
                outcome.inserted += 1;
            }
            Some(local) if record.updated_at > local.updated_at => {
                upsert(&tx, &record.subscription, &record.updated_at)?;
                outcome.updated += 1;
            }
            Some(_) => {
                debug!(id = %record.subscription.id, "local copy is newer, keeping");
                outcome.kept += 1;
            }
        }
    }
    tx.commit()?;
    info!(
        inserted = outcome.inserted,
        updated = outcome.updated,
        kept = outcome.kept,
        "sync merge finished"
    );
    Ok(outcome)
}
