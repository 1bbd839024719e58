// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Session;
use crate::models::Operation;
use crate::utils::arg;
use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn handle(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;
    export_operations(session.store.operations(), &fmt, Path::new(out))?;
    println!("Exported {} operations to {}", session.store.len(), out);
    Ok(())
}

pub fn export_operations(ops: &[Operation], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out.display()))?;
            wtr.write_record(["id", "amount", "category", "type"])?;
            for op in ops {
                wtr.write_record([
                    op.id.clone(),
                    op.amount.to_string(),
                    op.category.clone(),
                    op.r#type.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(ops)?)
                .with_context(|| format!("Cannot write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
