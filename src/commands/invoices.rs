// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::current_user;
use crate::models::{Invoice, InvoiceItem, Party};
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, parse_amount, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => new(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// `DESCRIPTION:QTY:PRICE`; the description itself may contain colons.
pub fn parse_item(s: &str) -> Result<InvoiceItem> {
    let mut parts = s.rsplitn(3, ':');
    let price = parts.next();
    let qty = parts.next();
    let desc = parts.next();
    let (Some(desc), Some(qty), Some(price)) = (desc, qty, price) else {
        return Err(anyhow!("Invalid item '{}', expected DESCRIPTION:QTY:PRICE", s));
    };
    let desc = desc.trim();
    if desc.is_empty() {
        return Err(anyhow!("Invalid item '{}': description is empty", s));
    }
    Ok(InvoiceItem {
        description: desc.to_string(),
        quantity: parse_amount(qty).with_context(|| format!("Invalid quantity in '{}'", s))?,
        unit_price: parse_amount(price).with_context(|| format!("Invalid price in '{}'", s))?,
    })
}

fn opt(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn new(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub);
    let issued_on = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let number = opt(sub, "number")
        .unwrap_or_else(|| format!("INV-{}", Local::now().timestamp_millis()));
    let gst_rate = parse_amount(sub.get_one::<String>("gst-rate").unwrap())?;
    let items = sub
        .get_many::<String>("item")
        .into_iter()
        .flatten()
        .map(|s| parse_item(s))
        .collect::<Result<Vec<_>>>()?;

    let invoice = Invoice {
        id: 0,
        user_id: user,
        number,
        issued_on,
        client: Party {
            name: opt(sub, "client").context("Client name is required")?,
            email: opt(sub, "client-email"),
            address: opt(sub, "client-address"),
            gstin: opt(sub, "client-gstin"),
        },
        sender: Party {
            name: opt(sub, "sender").context("Sender name is required")?,
            email: None,
            address: opt(sub, "sender-address"),
            gstin: opt(sub, "sender-gstin"),
        },
        gst_rate,
        items,
    };
    let id = save_invoice(conn, &invoice)?;
    let totals = invoice.totals();
    println!(
        "Saved invoice {} [id {}] total {}",
        invoice.number,
        id,
        fmt_money(&totals.total, &get_currency(conn)?)
    );
    Ok(())
}

pub fn save_invoice(conn: &Connection, inv: &Invoice) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO invoices(user_id, number, issued_on, client_name, client_email, client_address,
            client_gstin, sender_name, sender_address, sender_gstin, gst_rate)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            inv.user_id,
            inv.number,
            inv.issued_on.to_string(),
            inv.client.name,
            inv.client.email,
            inv.client.address,
            inv.client.gstin,
            inv.sender.name,
            inv.sender.address,
            inv.sender.gstin,
            inv.gst_rate.to_string()
        ],
    )
    .with_context(|| format!("Save invoice {}", inv.number))?;
    let id = tx.last_insert_rowid();
    for item in &inv.items {
        tx.execute(
            "INSERT INTO invoice_items(invoice_id, description, quantity, unit_price)
             VALUES (?1,?2,?3,?4)",
            params![
                id,
                item.description,
                item.quantity.to_string(),
                item.unit_price.to_string()
            ],
        )?;
    }
    tx.commit()?;
    tracing::info!(id, number = %inv.number, items = inv.items.len(), "invoice saved");
    Ok(id)
}

pub fn load_invoice(conn: &Connection, user: &str, number: &str) -> Result<Option<Invoice>> {
    let head = conn
        .query_row(
            "SELECT id, issued_on, client_name, client_email, client_address, client_gstin,
                sender_name, sender_address, sender_gstin, gst_rate
             FROM invoices WHERE user_id=?1 AND number=?2",
            params![user, number],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    Party {
                        name: r.get(2)?,
                        email: r.get(3)?,
                        address: r.get(4)?,
                        gstin: r.get(5)?,
                    },
                    Party {
                        name: r.get(6)?,
                        email: None,
                        address: r.get(7)?,
                        gstin: r.get(8)?,
                    },
                    r.get::<_, String>(9)?,
                ))
            },
        )
        .optional()?;
    let Some((id, issued_on, client, sender, rate)) = head else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT description, quantity, unit_price FROM invoice_items WHERE invoice_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut items = Vec::new();
    for row in rows {
        let (description, qty, price) = row?;
        items.push(InvoiceItem {
            description,
            quantity: parse_decimal(&qty)?,
            unit_price: parse_decimal(&price)?,
        });
    }
    Ok(Some(Invoice {
        id,
        user_id: user.to_string(),
        number: number.to_string(),
        issued_on: NaiveDate::parse_from_str(&issued_on, "%Y-%m-%d")
            .with_context(|| format!("Invoice {} has a bad date '{}'", number, issued_on))?,
        client,
        sender,
        gst_rate: parse_decimal(&rate)?,
        items,
    }))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub);
    let mut stmt = conn.prepare(
        "SELECT number FROM invoices WHERE user_id=?1 ORDER BY issued_on DESC, id DESC",
    )?;
    let numbers = stmt
        .query_map(params![user], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let mut invoices = Vec::new();
    for n in numbers {
        if let Some(inv) = load_invoice(conn, &user, &n)? {
            invoices.push(inv);
        }
    }
    let summary: Vec<_> = invoices
        .iter()
        .map(|inv| {
            json!({
                "number": inv.number,
                "issued_on": inv.issued_on,
                "client": inv.client.name,
                "total": inv.totals().total,
            })
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let ccy = get_currency(conn)?;
        let data = invoices
            .iter()
            .map(|inv| {
                vec![
                    inv.number.clone(),
                    inv.issued_on.to_string(),
                    inv.client.name.clone(),
                    fmt_money(&inv.totals().total, &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Number", "Date", "Client", "Total"], data));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub);
    let number = sub.get_one::<String>("number").unwrap().trim();
    let inv = load_invoice(conn, &user, number)?
        .ok_or_else(|| anyhow!("Invoice '{}' not found", number))?;
    let totals = inv.totals();
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({ "invoice": inv, "totals": totals }),
    )? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    println!("Invoice {}  ({})", inv.number, inv.issued_on);
    println!(
        "From: {}{}",
        inv.sender.name,
        inv.sender.gstin.as_deref().map(|g| format!(" GSTIN {}", g)).unwrap_or_default()
    );
    println!(
        "To:   {}{}",
        inv.client.name,
        inv.client.gstin.as_deref().map(|g| format!(" GSTIN {}", g)).unwrap_or_default()
    );
    let rows = inv
        .items
        .iter()
        .map(|i| {
            vec![
                i.description.clone(),
                i.quantity.to_string(),
                fmt_money(&i.unit_price, &ccy),
                fmt_money(&i.line_total(), &ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Item", "Qty", "Price", "Amount"], rows));
    let half = inv.gst_rate / rust_decimal::Decimal::TWO;
    println!(
        "{}",
        pretty_table(
            &["", ""],
            vec![
                vec!["Subtotal".into(), fmt_money(&totals.subtotal, &ccy)],
                vec![format!("CGST ({}%)", half), fmt_money(&totals.cgst, &ccy)],
                vec![format!("SGST ({}%)", half), fmt_money(&totals.sgst, &ccy)],
                vec!["Total".into(), fmt_money(&totals.total, &ccy)],
            ],
        )
    );
    Ok(())
}
