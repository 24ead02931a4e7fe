// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::current_user;
use crate::commands::transactions::insert_transaction;
use crate::models::{Frequency, RecurringRule, Transaction, TxKind};
use crate::utils::{maybe_print_json, parse_amount, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("run", sub)) => {
            let today = match sub.get_one::<String>("as-of") {
                Some(d) => parse_date(d)?,
                None => Local::now().date_naive(),
            };
            let n = run_due(conn, &current_user(sub), today)?;
            println!("Recorded {} recurring transaction(s) up to {}", n, today);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub);
    let kind: TxKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if category.is_empty() {
        return Err(anyhow!("Category must not be empty"));
    }
    let frequency: Frequency = sub.get_one::<String>("frequency").unwrap().parse()?;
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    conn.execute(
        "INSERT INTO recurring(user_id, kind, category, amount, description, next_date, frequency)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            user,
            kind.as_str(),
            category,
            amount.to_string(),
            description,
            start.to_string(),
            frequency.as_str()
        ],
    )?;
    println!(
        "Scheduled {} {} {} ({}) from {}",
        frequency, kind, amount, category, start
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rules = load_rules(conn, &current_user(sub))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rules)? {
        let data = rules
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.kind.to_string(),
                    r.category.clone(),
                    format!("{:.2}", r.amount),
                    r.frequency.to_string(),
                    r.next_date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Type", "Category", "Amount", "Every", "Next"], data)
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("id").unwrap().trim();
    let id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid schedule id '{}'", raw))?;
    let n = conn.execute(
        "DELETE FROM recurring WHERE id=?1 AND user_id=?2",
        params![id, current_user(sub)],
    )?;
    if n == 0 {
        return Err(anyhow!("Recurring schedule {} not found", id));
    }
    println!("Removed recurring schedule {}", id);
    Ok(())
}

pub fn load_rules(conn: &Connection, user: &str) -> Result<Vec<RecurringRule>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, category, amount, description, next_date, frequency
         FROM recurring WHERE user_id=?1 ORDER BY next_date, id",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, kind, category, amount, description, next, freq) = row?;
        out.push(RecurringRule {
            id,
            user_id: user.to_string(),
            kind: kind.parse()?,
            category,
            amount: parse_decimal(&amount)
                .with_context(|| format!("Recurring schedule {} has a bad amount", id))?,
            description,
            next_date: NaiveDate::parse_from_str(&next, "%Y-%m-%d")
                .with_context(|| format!("Recurring schedule {} has a bad date '{}'", id, next))?,
            frequency: freq.parse()?,
        });
    }
    Ok(out)
}

/// Record every occurrence scheduled on or before `today`, each dated on its
/// own scheduled day, and move the schedules past `today`. Returns the number
/// of transactions written.
pub fn run_due(conn: &Connection, user: &str, today: NaiveDate) -> Result<usize> {
    let rules = load_rules(conn, user)?;
    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    for rule in &rules {
        let (due, next) = rule.due_dates(today);
        if due.is_empty() {
            continue;
        }
        for date in &due {
            insert_transaction(
                &tx,
                &Transaction {
                    id: 0,
                    user_id: user.to_string(),
                    kind: rule.kind,
                    amount: rule.amount,
                    category: rule.category.clone(),
                    occurred_at: date.and_time(NaiveTime::MIN),
                    description: rule.description.clone(),
                },
            )?;
        }
        tx.execute(
            "UPDATE recurring SET next_date=?1 WHERE id=?2",
            params![next.to_string(), rule.id],
        )?;
        tracing::info!(rule = rule.id, occurrences = due.len(), %next, "recurring schedule advanced");
        written += due.len();
    }
    tx.commit()?;
    Ok(written)
}
