// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::DEFAULT_RATES_URL;
use std::path::PathBuf;

pub const DEFAULT_RATES_TTL_SECS: u64 = 600;

/// Runtime settings resolved from global CLI flags and their env fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db: Option<PathBuf>,
    pub api_key: Option<String>,
    pub rates_url: String,
    pub rates_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db: None,
            api_key: None,
            rates_url: DEFAULT_RATES_URL.to_string(),
            rates_ttl_secs: DEFAULT_RATES_TTL_SECS,
        }
    }
}

impl Config {
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        let defaults = Config::default();
        Config {
            db: m.get_one::<PathBuf>("db").cloned(),
            api_key: m
                .get_one::<String>("api-key")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            rates_url: m
                .get_one::<String>("rates-url")
                .cloned()
                .unwrap_or(defaults.rates_url),
            rates_ttl_secs: m
                .get_one::<u64>("rates-ttl")
                .copied()
                .unwrap_or(defaults.rates_ttl_secs),
        }
    }

    pub fn rates_ttl(&self) -> chrono::Duration {
        // Capped at a year to stay inside chrono's range.
        chrono::Duration::seconds(self.rates_ttl_secs.min(365 * 24 * 3600) as i64)
    }
}
