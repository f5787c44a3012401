// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use subtally::models::{BillingCycle, Category, Subscription};
use subtally::store::{self, SyncRecord};
use subtally::{cli, commands::sync, db};
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn record(id: &str, name: &str, price: &str, updated_at: &str) -> SyncRecord {
    SyncRecord {
        subscription: Subscription {
            id: id.to_string(),
            name: name.to_string(),
            price: price.parse().unwrap(),
            currency: "$".to_string(),
            cycle: BillingCycle::Monthly,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            category: Category::Utilities,
            color: None,
        },
        updated_at: ts(updated_at),
    }
}

#[test]
fn last_write_wins_on_pull() {
    let mut conn = setup();
    store::merge_remote(
        &mut conn,
        &[
            record("a", "Local A", "5", "2024-07-01T10:00:00Z"),
            record("b", "Local B", "6", "2024-07-05T10:00:00Z"),
            record("c", "Local only", "7", "2024-07-01T10:00:00Z"),
        ],
    )
    .unwrap();

    let outcome = store::merge_remote(
        &mut conn,
        &[
            record("a", "Remote A", "9", "2024-07-02T10:00:00Z"),
            record("b", "Remote B", "1", "2024-07-04T10:00:00Z"),
            record("d", "Remote D", "3", "2024-07-03T10:00:00Z"),
        ],
    )
    .unwrap();
    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.kept, 1);

    let names: Vec<String> = store::list(&conn)
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    // updates keep their original position
    assert_eq!(names, vec!["Remote A", "Local B", "Local only", "Remote D"]);
}

#[test]
fn equal_timestamps_keep_local() {
    let mut conn = setup();
    store::merge_remote(&mut conn, &[record("a", "Local", "5", "2024-07-01T10:00:00Z")]).unwrap();
    let outcome =
        store::merge_remote(&mut conn, &[record("a", "Remote", "5", "2024-07-01T10:00:00Z")])
            .unwrap();
    assert_eq!(outcome.kept, 1);
    assert_eq!(store::get(&conn, "a").unwrap().name, "Local");
}

#[test]
fn invalid_remote_record_aborts_the_merge() {
    let mut conn = setup();
    let result = store::merge_remote(
        &mut conn,
        &[
            record("a", "Fine", "5", "2024-07-01T10:00:00Z"),
            record("b", "Broken", "-1", "2024-07-01T10:00:00Z"),
        ],
    );
    assert!(result.is_err());
    assert!(store::list(&conn).unwrap().is_empty());
}

#[test]
fn push_then_pull_into_another_store() {
    let mut source = setup();
    store::merge_remote(&mut source, &[record("a", "Spotify", "10.99", "2024-07-01T10:00:00Z")])
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let path_str = path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from(["subtally", "sync", "push", "--out", &path_str]);
    if let Some(("sync", sync_m)) = matches.subcommand() {
        sync::handle(&mut source, sync_m).unwrap();
    } else {
        panic!("sync command not parsed");
    }

    let mut target = setup();
    let matches =
        cli::build_cli().get_matches_from(["subtally", "sync", "pull", "--file", &path_str]);
    if let Some(("sync", sync_m)) = matches.subcommand() {
        sync::handle(&mut target, sync_m).unwrap();
    } else {
        panic!("sync command not parsed");
    }

    assert_eq!(store::list(&target).unwrap(), store::list(&source).unwrap());
    assert_eq!(
        store::list_records(&target).unwrap()[0].updated_at,
        ts("2024-07-01T10:00:00Z")
    );
}

#[test]
fn pull_maps_unknown_categories_to_other() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let path_str = path.to_string_lossy().to_string();
    std::fs::write(
        &path,
        r#"[
          {"subscription": {"id": "g1", "name": "Steam", "price": "4.99", "currency": "$",
            "cycle": "monthly", "start_date": "2024-02-01", "category": "Gaming"},
           "updated_at": "2024-07-01T10:00:00Z"},
          {"subscription": {"id": "m1", "name": "Spotify", "price": "10.99", "currency": "$",
            "cycle": "monthly", "start_date": "2024-02-01", "category": "Music"},
           "updated_at": "2024-07-01T10:00:00Z"}
        ]"#,
    )
    .unwrap();

    let matches =
        cli::build_cli().get_matches_from(["subtally", "sync", "pull", "--file", &path_str]);
    if let Some(("sync", sync_m)) = matches.subcommand() {
        sync::handle(&mut conn, sync_m).unwrap();
    } else {
        panic!("sync command not parsed");
    }

    let subs = store::list(&conn).unwrap();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].category, Category::Other);
    assert_eq!(subs[1].category, Category::Music);
}
