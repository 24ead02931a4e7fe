// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::dashboard::compute;
use crate::utils::{fmt_timestamp, window_from_matches};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let window = window_from_matches(sub)?;
    let r = compute(conn, sub)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "category", "amount", "description"])?;
            for t in &r.transactions {
                wtr.write_record([
                    fmt_timestamp(&t.occurred_at),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = r
                .transactions
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": fmt_timestamp(&t.occurred_at),
                        "type": t.kind,
                        "category": t.category,
                        "amount": t.amount,
                        "description": t.description,
                    })
                })
                .collect();
            let statement = json!({
                "window": window.to_string(),
                "total_income": r.total_income,
                "total_expense": r.total_expense,
                "balance": r.net,
                "transactions": items,
            });
            std::fs::write(out, serde_json::to_string_pretty(&statement)?)?;
        }
    }
    tracing::info!(count = r.transactions.len(), %out, "statement exported");
    println!("Exported {} transactions to {}", r.transactions.len(), out);
    Ok(())
}
