// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::RateConverter;
use crate::models::CATEGORIES;
use crate::store::{KvBackend, try_load};
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::HashSet;

/// Problems found in the stored operations and the rate service.
pub fn check(kv: &dyn KvBackend, rates: &mut RateConverter) -> Vec<(String, String)> {
    let mut issues = Vec::new();

    match try_load(kv) {
        Ok(ops) => {
            let mut seen = HashSet::new();
            for op in &ops {
                if !seen.insert(op.id.as_str()) {
                    issues.push(("duplicate_id".to_string(), op.id.clone()));
                }
                if op.amount.is_sign_negative() && !op.amount.is_zero() {
                    issues.push(("negative_amount".to_string(), format!("{} {}", op.id, op.amount)));
                }
                if !CATEGORIES.contains(&op.category.as_str()) {
                    issues.push(("unknown_category".to_string(), format!("{} {}", op.id, op.category)));
                }
            }
        }
        Err(e) => issues.push(("unreadable_operations".to_string(), e.to_string())),
    }

    if let Err(e) = rates.fetch_rates() {
        issues.push(("rates_unavailable".to_string(), e.to_string()));
    }
    issues
}

pub fn handle(kv: &dyn KvBackend, rates: &mut RateConverter) -> Result<()> {
    let rows: Vec<Vec<String>> = check(kv, rates)
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
