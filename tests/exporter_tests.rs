// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["pocketbook", "export", "transactions"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_statement_as_pretty_json() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO transactions(user_id,kind,amount,category,occurred_at,description) VALUES \
        ('local','expense','12.34','Grocery','2025-01-02 00:00:00','Weekly run'), \
        ('local','income','100','Salary','2025-01-01 00:00:00',NULL)",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();
    export(
        &conn,
        &["--format", "json", "--out", &out_str, "--window", "all", "--order", "asc"],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["window"], json!("all time"));
    assert_eq!(parsed["total_income"], json!("100"));
    assert_eq!(parsed["total_expense"], json!("12.34"));
    assert_eq!(parsed["balance"], json!("87.66"));
    assert_eq!(
        parsed["transactions"][1],
        json!({
            "id": 1,
            "date": "2025-01-02 00:00:00",
            "type": "expense",
            "category": "Grocery",
            "amount": "12.34",
            "description": "Weekly run"
        })
    );
}

#[test]
fn export_csv_has_header_and_rows() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO transactions(user_id,kind,amount,category,occurred_at) VALUES \
        ('local','expense','5','Food','2025-03-01 08:00:00')",
        [],
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();
    export(&conn, &["--out", &out_str, "--window", "all"]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,type,category,amount,description"));
    assert_eq!(lines.next(), Some("2025-03-01 08:00:00,expense,Food,5,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(export(&conn, &["--format", "xml", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}
