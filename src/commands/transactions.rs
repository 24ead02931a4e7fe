// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::filter_sorted;
use crate::commands::current_user;
use crate::models::{RawAmount, RawTransaction, Transaction, TxKind, UNCATEGORIZED};
use crate::utils::{
    fmt_timestamp, maybe_print_json, order_from_matches, parse_amount, parse_date, parse_time,
    pretty_table, window_from_matches,
};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveTime};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub);
    let kind: TxKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNCATEGORIZED.to_string());
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let time = match sub.get_one::<String>("time") {
        Some(t) => parse_time(t)?,
        None => NaiveTime::MIN,
    };
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let t = Transaction {
        id: 0,
        user_id: user,
        kind,
        amount,
        category,
        occurred_at: date.and_time(time),
        description,
    };
    let id = insert_transaction(conn, &t)?;
    println!(
        "Recorded {} {} on {} ({}) [id {}]",
        t.kind, t.amount, date, t.category, id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    fmt_timestamp(&t.occurred_at),
                    t.kind.to_string(),
                    t.category.clone(),
                    format!("{:.2}", t.amount),
                    t.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Amount", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub);
    let raw = sub.get_one::<String>("id").unwrap().trim();
    let id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid transaction id '{}'", raw))?;
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    tracing::info!(id, %user, "deleted transaction");
    println!("Removed transaction {}", id);
    Ok(())
}

/// Filtered, sorted and limited transactions for `tx list`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let user = current_user(sub);
    let window = window_from_matches(sub)?;
    let order = order_from_matches(sub)?;
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| k.parse::<TxKind>())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|c| c.trim().to_string());

    let all = load_transactions(conn, &user)?;
    let mut data = filter_sorted(&all, window, order, Local::now().naive_local());
    data.retain(|t| {
        kind.is_none_or(|k| t.kind == k)
            && category
                .as_deref()
                .is_none_or(|c| t.category.eq_ignore_ascii_case(c))
    });
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, kind, amount, category, occurred_at, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.user_id,
            t.kind.as_str(),
            t.amount.to_string(),
            t.category,
            fmt_timestamp(&t.occurred_at),
            t.description
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, user = %t.user_id, kind = %t.kind, "inserted transaction");
    Ok(id)
}

/// All of one user's transactions, coerced into well-formed records.
pub fn load_transactions(conn: &Connection, user: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, amount, category, occurred_at, description
         FROM transactions WHERE user_id=?1 ORDER BY occurred_at, id",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok(RawTransaction {
            id: Some(r.get(0)?),
            user_id: Some(user.to_string()),
            kind: r.get(1)?,
            amount: r.get::<_, Option<String>>(2)?.map(RawAmount::Text),
            category: r.get(3)?,
            occurred_at: r.get(4)?,
            description: r.get(5)?,
        })
    })?;
    let now = Local::now().naive_local();
    let mut data = Vec::new();
    for row in rows {
        data.push(row?.coerce(user, now));
    }
    Ok(data)
}
