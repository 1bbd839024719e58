// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Session, effective_currency};
use crate::fx::{convert_between, round2};
use crate::models::Currency;
use crate::utils::{arg, parse_amount, parse_currency, pretty_table};
use anyhow::Result;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("rates", _)) => show_rates(session),
        Some(("convert", sub)) => convert_amount(session, sub),
        _ => Ok(()),
    }
}

fn show_rates(session: &mut Session) -> Result<()> {
    let Some(snapshot) = session.rates.snapshot().cloned() else {
        println!("Exchange rates unavailable; amounts are shown in {}", Currency::BASE);
        return Ok(());
    };
    let data: Vec<Vec<String>> = snapshot
        .iter()
        .map(|(ccy, factor)| {
            vec![
                format!("1 {}", ccy),
                format!("{:.4} {}", factor, Currency::BASE),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Unit", "Rate"], data));
    if let Some(at) = session.rates.fetched_at() {
        println!("Fetched at {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

fn convert_amount(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(arg(sub, "amount")?)?;
    let from = parse_currency(arg(sub, "from")?)?;
    let to = parse_currency(arg(sub, "to")?)?;
    let snapshot = super::snapshot_for(&mut session.rates, &[from, to]);
    if effective_currency(from, snapshot.as_ref()) != from
        || effective_currency(to, snapshot.as_ref()) != to
    {
        println!("Exchange rates unavailable; amount left unconverted");
        println!("{:.2} {}", round2(amount), from);
        return Ok(());
    }
    let res = convert_between(amount, from, to, snapshot.as_ref())?;
    println!("{} {} -> {:.2} {}", amount, from, round2(res), to);
    Ok(())
}
