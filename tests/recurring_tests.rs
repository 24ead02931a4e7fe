// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::{cli, commands::recurring, commands::transactions, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["pocketbook", "recurring"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("recurring", m)) = matches.subcommand() else {
        panic!("no recurring subcommand");
    };
    recurring::handle(conn, m)
}

#[test]
fn run_records_each_missed_occurrence_once() {
    let conn = setup();
    run(
        &conn,
        &[
            "add", "--kind", "expense", "--amount", "15000", "--category", "House Rent",
            "--frequency", "monthly", "--start", "2024-01-05",
        ],
    )
    .unwrap();

    run(&conn, &["run", "--as-of", "2024-03-10"]).unwrap();
    let rows = transactions::load_transactions(&conn, "local").unwrap();
    let dates: Vec<String> = rows.iter().map(|t| t.date().to_string()).collect();
    assert_eq!(dates, vec!["2024-01-05", "2024-02-05", "2024-03-05"]);
    assert!(rows.iter().all(|t| t.amount == Decimal::from(15000)));

    // second run on the same day finds nothing new
    run(&conn, &["run", "--as-of", "2024-03-10"]).unwrap();
    assert_eq!(transactions::load_transactions(&conn, "local").unwrap().len(), 3);

    let rules = recurring::load_rules(&conn, "local").unwrap();
    assert_eq!(rules[0].next_date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
}

#[test]
fn future_schedule_writes_nothing() {
    let conn = setup();
    run(
        &conn,
        &[
            "add", "--kind", "income", "--amount", "500", "--category", "Bonus",
            "--frequency", "weekly", "--start", "2024-06-01",
        ],
    )
    .unwrap();
    let n = recurring::run_due(&conn, "local", NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn schedules_are_per_user() {
    let conn = setup();
    run(
        &conn,
        &[
            "add", "--kind", "expense", "--amount", "99", "--category", "Internet",
            "--start", "2024-01-01",
        ],
    )
    .unwrap();
    let n = recurring::run_due(&conn, "other", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        .unwrap();
    assert_eq!(n, 0);
    assert!(run(&conn, &["rm", "--id", "42"]).is_err());
    run(&conn, &["rm", "--id", "1"]).unwrap();
    assert!(recurring::load_rules(&conn, "local").unwrap().is_empty());
}
