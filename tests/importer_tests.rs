// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::{cli, commands::importer, commands::transactions, db, models::TxKind};
use rusqlite::Connection;
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run_import(conn: &mut Connection, user: &str, path: &str) {
    let matches = cli::build_cli().get_matches_from([
        "pocketbook",
        "--user",
        user,
        "import",
        "transactions",
        "--path",
        path,
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,description\n2025-02-03,expense,5.00,Food,"
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    run_import(&mut conn, "local", &padded);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn json_export_is_coerced_not_rejected() {
    let mut conn = base_conn();
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"uid":"alice","type":"income","amount":52000,"category":"Salary","createdAt":"2025-02-01T09:30:00"}},
            {{"uid":"alice","type":"expense","amount":"-120.75","createdAt":"2025-02-02"}},
            {{"uid":"alice","type":"gift","category":"Family","createdAt":"2025-02-03"}},
            {{"uid":"mallory","type":"income","amount":1,"createdAt":"2025-02-03"}}
        ]"#
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    run_import(&mut conn, "alice", &path);

    let rows = transactions::load_transactions(&conn, "alice").unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].kind, TxKind::Income);
    assert_eq!(rows[0].amount, Decimal::from(52000));

    assert_eq!(rows[1].category, "Uncategorized");
    assert_eq!(rows[1].amount, "120.75".parse::<Decimal>().unwrap());

    assert_eq!(rows[2].kind, TxKind::Expense);
    assert_eq!(rows[2].amount, Decimal::ZERO);

    assert!(transactions::load_transactions(&conn, "mallory").unwrap().is_empty());
}

#[test]
fn json_fields_of_the_wrong_type_are_coerced() {
    let mut conn = base_conn();
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"uid":"alice","type":"income","amount":52000,"category":"Salary","createdAt":"2025-02-01T09:30:00"}},
            {{"uid":"alice","type":"expense","amount":300,"category":"Food","createdAt":{{"seconds":1738368000,"nanoseconds":0}}}},
            {{"uid":"alice","type":7,"amount":{{"value":5}},"category":12,"createdAt":true}},
            42
        ]"#
    )
    .unwrap();
    file.flush().unwrap();

    let before = Local::now().naive_local();
    let path = file.path().to_str().unwrap().to_string();
    run_import(&mut conn, "alice", &path);

    let rows = transactions::load_transactions(&conn, "alice").unwrap();
    assert_eq!(rows.len(), 3);

    let food = rows.iter().find(|t| t.category == "Food").unwrap();
    let expected = DateTime::from_timestamp(1_738_368_000, 0)
        .unwrap()
        .with_timezone(&Local)
        .naive_local();
    assert_eq!(food.occurred_at, expected);

    let broken = rows.iter().find(|t| t.category == "Uncategorized").unwrap();
    assert_eq!(broken.kind, TxKind::Expense);
    assert_eq!(broken.amount, Decimal::ZERO);
    assert!(broken.occurred_at >= before - chrono::Duration::seconds(1));
}

#[test]
fn csv_fields_are_trimmed() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,type,amount,category,description\n 2025-02-03 , Income ,  1200.00 ,  Bonus  ,  memo text  "
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    run_import(&mut conn, "local", &path);

    let rows = transactions::load_transactions(&conn, "local").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, TxKind::Income);
    assert_eq!(rows[0].category, "Bonus");
    assert_eq!(rows[0].description.as_deref(), Some("memo text"));
    assert_eq!(rows[0].amount, "1200.00".parse::<Decimal>().unwrap());
}

#[test]
fn broken_json_leaves_store_untouched() {
    let mut conn = base_conn();
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "[{{\"type\":\"income\"").unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "pocketbook",
        "import",
        "transactions",
        "--path",
        &path,
    ]);
    let Some(("import", import_m)) = matches.subcommand() else {
        panic!("no import subcommand");
    };
    assert!(importer::handle(&mut conn, import_m).is_err());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
