// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Session, effective_currency, snapshot_for, warn_unconverted};
use crate::fx::{checked_to_base, convert};
use crate::models::{Currency, Operation, OperationType};
use crate::utils::{arg, currency_arg, fmt_money, fmt_signed, maybe_print_json, parse_amount, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

/// Records an operation entered in any supported currency. The stored
/// amount is always in the base currency.
pub fn add(session: &mut Session, sub: &clap::ArgMatches) -> Result<Operation> {
    let amount = parse_amount(arg(sub, "amount")?)?;
    let currency = currency_arg(sub, "currency")?;
    let category = arg(sub, "category")?;
    let kind = if sub.get_flag("expense") {
        OperationType::Expense
    } else {
        OperationType::Income
    };

    let snapshot = snapshot_for(&mut session.rates, &[currency]);
    if effective_currency(currency, snapshot.as_ref()) != currency {
        log::warn!(
            "No rate for {}; recording {} as {}",
            currency,
            amount,
            Currency::BASE
        );
        println!(
            "Exchange rates unavailable; {} recorded as {} without conversion",
            fmt_money(&amount, currency),
            Currency::BASE
        );
    }
    let amount_in_base = checked_to_base(amount, currency, snapshot.as_ref())?;

    let op = session.store.add(amount_in_base, category, kind);
    println!(
        "Recorded {} {} ({}) [{}]",
        kind,
        fmt_money(&amount_in_base, Currency::BASE),
        op.category,
        op.id
    );
    Ok(op)
}

pub fn rm(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    if session.store.remove(id) {
        println!("Removed operation {}", id);
    } else {
        println!("No operation with id {}", id);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRow {
    pub id: String,
    pub r#type: OperationType,
    pub category: String,
    pub amount: Decimal,
    pub currency: Currency,
}

/// Operations in insertion order, amounts shown in `requested` when rates
/// allow it.
pub fn rows(session: &mut Session, requested: Currency) -> Vec<OperationRow> {
    let snapshot = snapshot_for(&mut session.rates, &[requested]);
    let currency = effective_currency(requested, snapshot.as_ref());
    session
        .store
        .operations()
        .iter()
        .map(|op| OperationRow {
            id: op.id.clone(),
            r#type: op.r#type,
            category: op.category.clone(),
            amount: convert(op.amount, currency, snapshot.as_ref()),
            currency,
        })
        .collect()
}

pub fn list(session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let requested = currency_arg(sub, "currency")?;
    let data = rows(session, requested);
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if let Some(first) = data.first() {
        warn_unconverted(requested, first.currency);
    }
    let table_rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                fmt_signed(&r.amount, r.currency, r.r#type),
                r.category.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Amount", "Category"], table_rows));
    Ok(())
}
