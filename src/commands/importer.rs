// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::current_user;
use crate::commands::transactions::insert_transaction;
use crate::models::{RawAmount, RawTransaction};
use anyhow::{Context, Result};
use chrono::Local;
use csv::ReaderBuilder;
use rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, &current_user(sub), Path::new(path))?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "occurred_at")]
    date: Option<String>,
    #[serde(default, rename = "type", alias = "kind")]
    kind: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "note")]
    description: Option<String>,
}

impl From<CsvRow> for RawTransaction {
    fn from(r: CsvRow) -> Self {
        let blank_to_none = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        RawTransaction {
            id: None,
            user_id: None,
            kind: blank_to_none(r.kind),
            amount: blank_to_none(r.amount).map(RawAmount::Text),
            category: r.category,
            occurred_at: blank_to_none(r.date),
            description: r.description,
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<RawTransaction>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Open {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        || text.trim_start().starts_with('[');
    if is_json {
        let docs: Vec<serde_json::Value> = serde_json::from_str(&text)
            .with_context(|| format!("Parse JSON array in {}", path.display()))?;
        let mut out = Vec::with_capacity(docs.len());
        for (i, doc) in docs.into_iter().enumerate() {
            match serde_json::from_value::<RawTransaction>(doc) {
                Ok(raw) => out.push(raw),
                Err(e) => tracing::warn!(index = i, error = %e, "skipping non-object JSON record"),
            }
        }
        return Ok(out);
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = rec.with_context(|| format!("CSV row {} in {}", i + 1, path.display()))?;
        out.push(row.into());
    }
    Ok(out)
}

/// Load raw records from a store export and write them for `user`. Records
/// are coerced, never rejected; the whole file lands in one transaction.
pub fn import_transactions(conn: &mut Connection, user: &str, path: &Path) -> Result<usize> {
    let records = read_records(path)?;
    let now = Local::now().naive_local();
    let tx = conn.transaction()?;
    let mut n = 0;
    for raw in records {
        if let Some(owner) = raw.user_id.as_deref().filter(|o| *o != user) {
            tracing::warn!(%owner, %user, "skipping record owned by another user");
            continue;
        }
        let t = raw.coerce(user, now);
        insert_transaction(&tx, &t)?;
        n += 1;
    }
    tx.commit()?;
    tracing::info!(count = n, path = %path.display(), "import finished");
    Ok(n)
}
