// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod dashboard;
pub mod categories;
pub mod calculators;
pub mod recurring;
pub mod invoices;
pub mod importer;
pub mod exporter;
pub mod config;

/// The `--user` global argument, visible from every subcommand.
pub fn current_user(m: &clap::ArgMatches) -> String {
    m.get_one::<String>("user")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "local".to_string())
}
