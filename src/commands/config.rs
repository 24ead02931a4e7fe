// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{DEFAULT_CURRENCY, get_setting, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

const KEYS: &[&str] = &["currency"];

fn check_key(key: &str) -> Result<String> {
    let key = key.trim().to_ascii_lowercase();
    if !KEYS.contains(&key.as_str()) {
        return Err(anyhow!("Unknown setting '{}' (known: {})", key, KEYS.join(", ")));
    }
    Ok(key)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = check_key(sub.get_one::<String>("key").unwrap())?;
            let v = get_setting(conn, &key)?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
            println!("{}", v);
        }
        Some(("set", sub)) => {
            let key = check_key(sub.get_one::<String>("key").unwrap())?;
            let value = sub.get_one::<String>("value").unwrap().trim().to_uppercase();
            if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Currency must be a 3-letter code, got '{}'", value));
            }
            set_setting(conn, &key, &value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
