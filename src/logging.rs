// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub ansi: bool,
}

impl LoggingConfig {
    /// `POCKETBOOK_LOG`, then `RUST_LOG`, then `warn`.
    pub fn from_env() -> Self {
        let filter = std::env::var("POCKETBOOK_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());
        Self {
            filter,
            ansi: std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            ansi: true,
        }
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// tables and JSON.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", config.filter, e))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;
    Ok(())
}
