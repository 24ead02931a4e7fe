// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::{calc, cli, commands::calculators};

fn run(args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["pocketbook", "calc"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("calc", m)) = matches.subcommand() else {
        panic!("no calc subcommand");
    };
    calculators::handle(m)
}

#[test]
fn every_calculator_runs_from_the_cli() {
    run(&["emi", "--principal", "500000", "--rate", "12", "--years", "15"]).unwrap();
    run(&["sip", "--monthly", "1000", "--rate", "12", "--years", "5", "--json"]).unwrap();
    run(&["goal", "--target", "100000", "--monthly", "5000", "--rate", "7"]).unwrap();
    run(&["gst", "--amount", "1180", "--rate", "18", "--mode", "inclusive"]).unwrap();
    run(&["fd", "--principal", "100000", "--rate", "7", "--years", "5"]).unwrap();
    run(&[
        "inflation", "--principal", "100000", "--rate", "8", "--inflation", "3", "--years", "5",
    ])
    .unwrap();
    run(&["percent", "--amount", "1000", "--percent", "10", "--jsonl"]).unwrap();
    run(&["percent-diff", "--part", "5", "--whole", "0"]).unwrap();
}

#[test]
fn transient_slider_values_do_not_fail() {
    run(&["emi", "--principal", "0", "--rate", "12", "--years", "15"]).unwrap();
    run(&["sip", "--monthly", "-100", "--rate", "12", "--years", "5"]).unwrap();
    run(&["goal", "--target", "100000", "--monthly", "0", "--rate", "7"]).unwrap();
}

#[test]
fn non_numeric_input_is_a_user_error() {
    let err = run(&["fd", "--principal", "lots", "--rate", "7", "--years", "5"]).unwrap_err();
    assert!(err.to_string().contains("principal"));
}

#[test]
fn gst_inclusive_of_exclusive_total_recovers_base() {
    let total = calc::gst(1000.0, 18.0, calc::GstMode::Exclusive).total;
    let back = calc::gst(total, 18.0, calc::GstMode::Inclusive);
    assert!((back.base - 1000.0).abs() < 1e-9);
    assert!((back.gst - 180.0).abs() < 1e-9);
}
