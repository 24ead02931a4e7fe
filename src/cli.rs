// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("window")
            .long("window")
            .short('w')
            .value_parser(["this-week", "this-month", "last-30-days", "custom", "all"])
            .default_value("this-month")
            .help("Time window to include"),
    )
    .arg(
        Arg::new("from")
            .long("from")
            .help("First day of a custom window (YYYY-MM-DD)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("Last day of a custom window (YYYY-MM-DD)"),
    )
    .arg(
        Arg::new("order")
            .long("order")
            .value_parser(["asc", "desc"])
            .default_value("desc")
            .help("Sort by date"),
    )
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("kind")
        .long("kind")
        .short('k')
        .value_parser(["income", "expense"])
        .required(required)
}

fn num_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .allow_negative_numbers(true)
        .help(help)
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand(
            Command::new("add")
                .about("Record an income or expense")
                .arg(kind_arg(true))
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(Arg::new("category").long("category").short('c').required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .short('d')
                        .required(true)
                        .help("YYYY-MM-DD"),
                )
                .arg(Arg::new("time").long("time").help("HH:MM, defaults to midnight"))
                .arg(Arg::new("description").long("description").alias("note")),
        )
        .subcommand(json_args(window_args(
            Command::new("list")
                .about("List transactions in a window")
                .arg(kind_arg(false))
                .arg(Arg::new("category").long("category").short('c'))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        )))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").long("id").required(true)),
        )
}

fn dashboard_cmd() -> Command {
    Command::new("dashboard")
        .about("Totals, category breakdown and balance over time")
        .subcommand(json_args(window_args(
            Command::new("summary").about("Income, expense and net"),
        )))
        .subcommand(json_args(window_args(
            Command::new("categories").about("Expense per category"),
        )))
        .subcommand(json_args(window_args(
            Command::new("balance").about("Cumulative daily balance"),
        )))
}

fn calc_cmd() -> Command {
    Command::new("calc")
        .about("Financial calculators")
        .subcommand(json_args(
            Command::new("emi")
                .about("Loan EMI")
                .arg(num_arg("principal", "Loan amount"))
                .arg(num_arg("rate", "Annual interest rate, percent"))
                .arg(num_arg("years", "Tenure in years")),
        ))
        .subcommand(json_args(
            Command::new("sip")
                .about("SIP maturity value")
                .arg(num_arg("monthly", "Monthly contribution"))
                .arg(num_arg("rate", "Expected annual return, percent"))
                .arg(num_arg("years", "Duration in years")),
        ))
        .subcommand(json_args(
            Command::new("goal")
                .about("Months needed to reach a savings goal")
                .arg(num_arg("target", "Goal amount"))
                .arg(num_arg("monthly", "Monthly saving"))
                .arg(num_arg("rate", "Annual return, percent")),
        ))
        .subcommand(json_args(
            Command::new("gst")
                .about("GST on an amount")
                .arg(num_arg("amount", "Amount"))
                .arg(num_arg("rate", "GST rate, percent"))
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_parser(["exclusive", "inclusive"])
                        .default_value("exclusive"),
                ),
        ))
        .subcommand(json_args(
            Command::new("fd")
                .about("Fixed deposit maturity (simple interest)")
                .arg(num_arg("principal", "Deposit amount"))
                .arg(num_arg("rate", "Annual rate, percent"))
                .arg(num_arg("years", "Term in years")),
        ))
        .subcommand(json_args(
            Command::new("inflation")
                .about("Inflation-adjusted future value")
                .arg(num_arg("principal", "Amount invested"))
                .arg(num_arg("rate", "Nominal annual return, percent"))
                .arg(num_arg("inflation", "Annual inflation, percent"))
                .arg(num_arg("years", "Years")),
        ))
        .subcommand(json_args(
            Command::new("percent")
                .about("Percent of an amount")
                .arg(num_arg("amount", "Amount"))
                .arg(num_arg("percent", "Percent")),
        ))
        .subcommand(json_args(
            Command::new("percent-diff")
                .about("Part as a percentage of whole")
                .arg(num_arg("part", "Part"))
                .arg(num_arg("whole", "Whole")),
        ))
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Recurring income and expenses")
        .subcommand(
            Command::new("add")
                .about("Schedule a recurring transaction")
                .arg(kind_arg(true))
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(Arg::new("category").long("category").short('c').required(true))
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .short('f')
                        .value_parser(["daily", "weekly", "monthly"])
                        .default_value("monthly"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .required(true)
                        .help("First occurrence (YYYY-MM-DD)"),
                )
                .arg(Arg::new("description").long("description").alias("note")),
        )
        .subcommand(json_args(Command::new("list").about("List schedules")))
        .subcommand(
            Command::new("rm")
                .about("Remove a schedule")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("run")
                .about("Record every occurrence due up to a date")
                .arg(Arg::new("as-of").long("as-of").help("YYYY-MM-DD, defaults to today")),
        )
}

fn invoice_cmd() -> Command {
    Command::new("invoice")
        .about("Create and view GST invoices")
        .subcommand(
            Command::new("new")
                .about("Create an invoice")
                .arg(
                    Arg::new("number")
                        .long("number")
                        .help("Invoice number, generated when omitted"),
                )
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                .arg(Arg::new("client").long("client").required(true))
                .arg(Arg::new("client-email").long("client-email"))
                .arg(Arg::new("client-address").long("client-address"))
                .arg(Arg::new("client-gstin").long("client-gstin"))
                .arg(Arg::new("sender").long("sender").required(true))
                .arg(Arg::new("sender-address").long("sender-address"))
                .arg(Arg::new("sender-gstin").long("sender-gstin"))
                .arg(Arg::new("gst-rate").long("gst-rate").default_value("18"))
                .arg(
                    Arg::new("item")
                        .long("item")
                        .action(ArgAction::Append)
                        .required(true)
                        .help("DESCRIPTION:QTY:PRICE, repeatable"),
                ),
        )
        .subcommand(json_args(Command::new("list").about("List invoices")))
        .subcommand(json_args(
            Command::new("show")
                .about("Show one invoice")
                .arg(Arg::new("number").long("number").required(true)),
        ))
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .about("Personal income/expense tracker, dashboards, invoices and calculators")
        .version(clap::crate_version!())
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .env("POCKETBOOK_USER")
                .default_value("local")
                .help("User id whose records are read and written"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx_cmd())
        .subcommand(dashboard_cmd())
        .subcommand(
            Command::new("categories")
                .about("Suggested categories")
                .arg(kind_arg(false)),
        )
        .subcommand(calc_cmd())
        .subcommand(recurring_cmd())
        .subcommand(invoice_cmd())
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("Import a JSON export or CSV of transactions")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(window_args(
                Command::new("transactions")
                    .about("Write a statement of transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv or json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            )),
        )
        .subcommand(
            Command::new("config")
                .about("Persisted settings")
                .subcommand(
                    Command::new("get").arg(Arg::new("key").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
