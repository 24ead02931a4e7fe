// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::{cli, commands::invoices, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["pocketbook", "invoice"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("invoice", m)) = matches.subcommand() else {
        panic!("no invoice subcommand");
    };
    invoices::handle(conn, m)
}

#[test]
fn new_invoice_round_trips_with_totals() {
    let conn = setup();
    run(
        &conn,
        &[
            "new", "--number", "INV-7", "--date", "2024-03-15", "--client", "Acme Pvt Ltd",
            "--client-gstin", "27ABCDE1234F1Z5", "--sender", "Studio", "--gst-rate", "18",
            "--item", "Logo design:2:250", "--item", "Consulting: 10:30 min:1:500",
        ],
    )
    .unwrap();

    let inv = invoices::load_invoice(&conn, "local", "INV-7").unwrap().unwrap();
    assert_eq!(inv.items.len(), 2);
    assert_eq!(inv.items[1].description, "Consulting: 10:30 min");
    assert_eq!(inv.client.gstin.as_deref(), Some("27ABCDE1234F1Z5"));

    let t = inv.totals();
    assert_eq!(t.subtotal, Decimal::from(1000));
    assert_eq!(t.cgst, Decimal::from(90));
    assert_eq!(t.total, Decimal::from(1180));

    run(&conn, &["show", "--number", "INV-7"]).unwrap();
    assert!(invoices::load_invoice(&conn, "someone", "INV-7").unwrap().is_none());
}

#[test]
fn malformed_item_is_rejected() {
    assert!(invoices::parse_item("just text").is_err());
    assert!(invoices::parse_item(":1:100").is_err());
    assert!(invoices::parse_item("Thing:x:100").is_err());
    let ok = invoices::parse_item("Thing:1.5:100").unwrap();
    assert_eq!(ok.line_total(), Decimal::from(150));
}

#[test]
fn duplicate_number_fails() {
    let conn = setup();
    let args = [
        "new", "--number", "INV-1", "--client", "A", "--sender", "B", "--item", "X:1:1",
    ];
    run(&conn, &args).unwrap();
    assert!(run(&conn, &args).is_err());
}
