// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::fs;
use subtally::models::{BillingCycle, Category};
use subtally::{cli, commands::exporter, commands::importer, db, store};
use tempfile::{NamedTempFile, tempdir};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches =
        cli::build_cli().get_matches_from(["subtally", "import", "subscriptions", "--path", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("import command not parsed");
    }
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "subtally",
        "export",
        "subscriptions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("export command not parsed");
    }
}

#[test]
fn import_reads_optional_columns() {
    let mut conn = setup();
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "name,price,cycle,start_date,category,currency,color\n\
         Netflix,15.99,monthly,2024-01-01,Entertainment,,#E50914\n\
         Costco,120,yearly,2024-06-01,shopping,€,\n\
         Notion,8,monthly,2023-09-15\n",
    )
    .unwrap();

    import(&mut conn, &file.path().to_string_lossy()).unwrap();
    let subs = store::list(&conn).unwrap();
    assert_eq!(subs.len(), 3);
    assert_eq!(subs[0].color.as_deref(), Some("#E50914"));
    assert_eq!(subs[0].currency, "$");
    assert_eq!(subs[1].cycle, BillingCycle::Yearly);
    assert_eq!(subs[1].currency, "€");
    assert_eq!(subs[1].category, Category::Shopping);
    assert_eq!(subs[2].category, Category::Other);
}

#[test]
fn import_is_all_or_nothing() {
    let mut conn = setup();
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "name,price,cycle,start_date\n\
         Netflix,15.99,monthly,2024-01-01\n\
         Broken,abc,monthly,2024-01-01\n",
    )
    .unwrap();

    let err = import(&mut conn, &file.path().to_string_lossy()).unwrap_err();
    assert!(format!("{:#}", err).contains("row 3"));
    assert!(store::list(&conn).unwrap().is_empty());
}

#[test]
fn export_csv_can_be_imported_again() {
    let mut conn = setup();
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "name,price,cycle,start_date,category\nSpotify,10.99,monthly,2024-03-05,Music\n",
    )
    .unwrap();
    import(&mut conn, &file.path().to_string_lossy()).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("subs.csv");
    let out_str = out.to_string_lossy().to_string();
    export(&conn, "csv", &out_str).unwrap();

    let mut other = setup();
    import(&mut other, &out_str).unwrap();
    let a = &store::list(&conn).unwrap()[0];
    let b = &store::list(&other).unwrap()[0];
    assert_eq!((a.name.as_str(), a.price, a.start_date), (b.name.as_str(), b.price, b.start_date));
    assert_eq!(b.category, Category::Music);
}

#[test]
fn export_json_lists_records() {
    let mut conn = setup();
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "name,price,cycle,start_date\nHBO,9.99,monthly,2024-03-05\n").unwrap();
    import(&mut conn, &file.path().to_string_lossy()).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("subs.json");
    export(&conn, "json", &out.to_string_lossy()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed[0]["name"], "HBO");
    assert_eq!(parsed[0]["price"], "9.99");
    assert_eq!(parsed[0]["cycle"], "monthly");
    assert_eq!(parsed[0]["category"], "Other");
}

#[test]
fn export_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("subs.xml");
    assert!(export(&conn, "xml", &out.to_string_lossy()).is_err());
    assert!(!out.exists());
}
