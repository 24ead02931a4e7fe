// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::{self, GstMode};
use crate::utils::{fmt_num, maybe_print_json, parse_f64, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let rows = match name {
        "emi" => {
            let r = calc::emi(num(sub, "principal")?, num(sub, "rate")?, num(sub, "years")?);
            render(sub, &r, vec![
                ("Monthly EMI", r.emi),
                ("Months", r.months),
                ("Total interest", r.total_interest),
                ("Total payment", r.total_payment),
            ])?
        }
        "sip" => {
            let r = calc::sip(num(sub, "monthly")?, num(sub, "rate")?, num(sub, "years")?);
            render(sub, &r, vec![
                ("Invested", r.total_invested),
                ("Estimated returns", r.gain),
                ("Maturity value", r.future_value),
            ])?
        }
        "goal" => {
            let r = calc::goal(num(sub, "target")?, num(sub, "monthly")?, num(sub, "rate")?);
            render(sub, &r, vec![
                ("Months", r.months as f64),
                ("Years", r.years),
                ("Invested", r.total_invested),
            ])?
        }
        "gst" => {
            let mode: GstMode = sub.get_one::<String>("mode").unwrap().parse()?;
            let r = calc::gst(num(sub, "amount")?, num(sub, "rate")?, mode);
            render(sub, &r, vec![
                ("Base amount", r.base),
                ("GST", r.gst),
                ("CGST", r.cgst),
                ("SGST", r.sgst),
                ("Total", r.total),
            ])?
        }
        "fd" => {
            let r = calc::fixed_deposit(num(sub, "principal")?, num(sub, "rate")?, num(sub, "years")?);
            render(sub, &r, vec![("Interest", r.interest), ("Maturity", r.maturity)])?
        }
        "inflation" => {
            let r = calc::inflation_adjusted(
                num(sub, "principal")?,
                num(sub, "rate")?,
                num(sub, "inflation")?,
                num(sub, "years")?,
            );
            render(sub, &r, vec![
                ("Real rate %", r.real_rate * 100.0),
                ("Nominal value", r.nominal_value),
                ("Inflation-adjusted value", r.adjusted_value),
                ("Purchasing power loss", r.purchasing_power_loss),
            ])?
        }
        "percent" => {
            let r = calc::percentage_of(num(sub, "amount")?, num(sub, "percent")?);
            render(sub, &r, vec![
                ("Result", r.result),
                ("Amount + result", r.increased),
                ("Amount - result", r.decreased),
            ])?
        }
        "percent-diff" => {
            let pct = calc::percentage_difference(num(sub, "part")?, num(sub, "whole")?);
            render(sub, &serde_json::json!({ "percent": pct }), vec![("Percent", pct)])?
        }
        _ => None,
    };
    if let Some(rows) = rows {
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn num(sub: &clap::ArgMatches, name: &str) -> Result<f64> {
    parse_f64(name, sub.get_one::<String>(name).unwrap())
}

/// JSON output when requested, table rows otherwise.
fn render<T: Serialize>(
    sub: &clap::ArgMatches,
    result: &T,
    metrics: Vec<(&str, f64)>,
) -> Result<Option<Vec<Vec<String>>>> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), result)? {
        return Ok(None);
    }
    Ok(Some(
        metrics
            .into_iter()
            .map(|(k, v)| vec![k.to_string(), fmt_num(v)])
            .collect(),
    ))
}
