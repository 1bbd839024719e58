// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Session, effective_currency, snapshot_for, warn_unconverted};
use crate::fx::RateSnapshot;
use crate::models::Currency;
use crate::summary::{StatsPayload, Totals};
use crate::utils::{currency_arg, fmt_money, maybe_print_json, parse_currency, pretty_table};
use anyhow::Result;

fn totals_table(payload: &StatsPayload) -> Vec<Vec<String>> {
    let t = &payload.totals;
    vec![
        vec!["Income".into(), fmt_money(&t.income, payload.currency)],
        vec!["Expenses".into(), fmt_money(&t.expenses, payload.currency)],
        vec!["Balance".into(), fmt_money(&t.balance, payload.currency)],
    ]
}

/// Home view totals in `requested`, or in the base currency when rates are
/// unavailable.
pub fn summary_payload(session: &mut Session, requested: Currency) -> StatsPayload {
    let snapshot = snapshot_for(&mut session.rates, &[requested]);
    home_payload(session, requested, snapshot.as_ref())
}

fn home_payload(session: &Session, requested: Currency, snapshot: Option<&RateSnapshot>) -> StatsPayload {
    let totals = Totals::from_operations(session.store.operations());
    let currency = effective_currency(requested, snapshot);
    StatsPayload::new(&totals, currency, snapshot)
}

/// The statistics view: receives the home view's payload and shows it in
/// `display`. Both steps use the same snapshot.
pub fn stats_payload(session: &mut Session, requested: Currency, display: Currency) -> StatsPayload {
    let snapshot = snapshot_for(&mut session.rates, &[requested, display]);
    let payload = home_payload(session, requested, snapshot.as_ref());
    let display = effective_currency(display, snapshot.as_ref());
    payload.view(display, snapshot.as_ref())
}

pub fn summary(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let requested = currency_arg(sub, "currency")?;
    let payload = summary_payload(session, requested);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &payload)? {
        return Ok(());
    }
    warn_unconverted(requested, payload.currency);
    println!("{}", pretty_table(&["", "Total"], totals_table(&payload)));
    Ok(())
}

pub fn stats(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let requested = currency_arg(sub, "currency")?;
    let display = match sub.get_one::<String>("display") {
        Some(s) => parse_currency(s)?,
        None => requested,
    };
    let payload = stats_payload(session, requested, display);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &payload)? {
        return Ok(());
    }
    warn_unconverted(display, payload.currency);
    println!("Statistics ({})", payload.currency);
    println!("{}", pretty_table(&["", "Total"], totals_table(&payload)));
    Ok(())
}
