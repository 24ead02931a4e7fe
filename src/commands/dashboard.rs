// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{AggregationResult, aggregate};
use crate::commands::current_user;
use crate::commands::transactions::load_transactions;
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, order_from_matches, pretty_table,
    window_from_matches,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("balance", sub)) => balance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Run the aggregator over the user's stored transactions.
pub fn compute(conn: &Connection, sub: &clap::ArgMatches) -> Result<AggregationResult> {
    let user = current_user(sub);
    let window = window_from_matches(sub)?;
    let order = order_from_matches(sub)?;
    let all = load_transactions(conn, &user)?;
    Ok(aggregate(&all, window, order))
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let r = compute(conn, sub)?;
    let ccy = get_currency(conn)?;
    let out = json!({
        "window": window_from_matches(sub)?.to_string(),
        "transactions": r.transactions.len(),
        "total_income": r.total_income,
        "total_expense": r.total_expense,
        "net": r.net,
        "currency": ccy,
    });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!(
            "{}",
            pretty_table(
                &["Transactions", "Income", "Expense", "Balance"],
                vec![vec![
                    r.transactions.len().to_string(),
                    fmt_money(&r.total_income, &ccy),
                    fmt_money(&r.total_expense, &ccy),
                    fmt_money(&r.net, &ccy),
                ]],
            )
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let r = compute(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &r.category_breakdown)? {
        let ccy = get_currency(conn)?;
        let total = r.total_expense;
        let data = r
            .category_breakdown
            .iter()
            .map(|c| {
                let share = crate::calc::percentage_difference(
                    c.amount.to_f64().unwrap_or(0.0),
                    total.to_f64().unwrap_or(0.0),
                );
                vec![
                    c.category.clone(),
                    fmt_money(&c.amount, &ccy),
                    format!("{:.1}%", share),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    }
    Ok(())
}

fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let r = compute(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &r.daily_balance)? {
        let ccy = get_currency(conn)?;
        let data = r
            .daily_balance
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    fmt_money(&p.net, &ccy),
                    fmt_money(&p.balance, &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Net", "Balance"], data));
    }
    Ok(())
}
