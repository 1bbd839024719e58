// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::InputValidationError;
use crate::fx::round2;
use crate::models::{Currency, OperationType};
use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::str::FromStr;

const UA: &str = concat!(
    "kopilka/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/kopilka)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// Largest amount accepted from input; keeps totals and conversions well
/// inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0); // 1_000_000_000_000_000

/// Parses a user-entered amount. Comma decimal separators are accepted.
pub fn parse_amount(s: &str) -> Result<Decimal, InputValidationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(InputValidationError::EmptyAmount);
    }
    let normalized = s.replace(',', ".");
    let d = Decimal::from_str(&normalized)
        .map_err(|_| InputValidationError::NotANumber(s.to_string()))?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(InputValidationError::Negative(s.to_string()));
    }
    if d > MAX_AMOUNT {
        return Err(InputValidationError::OutOfRange(s.to_string()));
    }
    Ok(d)
}

pub fn parse_currency(s: &str) -> Result<Currency, InputValidationError> {
    s.parse()
}

/// Required clap argument as a string slice.
pub fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing argument '{}'", name))
}

/// Optional currency argument, defaulting to the base currency.
pub fn currency_arg(m: &clap::ArgMatches, name: &str) -> Result<Currency> {
    match m.get_one::<String>(name) {
        Some(s) => Ok(parse_currency(s)?),
        None => Ok(Currency::BASE),
    }
}

pub fn fmt_money(d: &Decimal, ccy: Currency) -> String {
    format!("{:.2} {}", round2(*d), ccy)
}

pub fn fmt_signed(d: &Decimal, ccy: Currency, kind: OperationType) -> String {
    match kind {
        OperationType::Income => format!("+{:.2} {}", round2(*d), ccy),
        OperationType::Expense => format!("-{:.2} {}", round2(*d), ccy),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_rejects_bad_input() {
        assert_eq!(parse_amount(""), Err(InputValidationError::EmptyAmount));
        assert_eq!(parse_amount("   "), Err(InputValidationError::EmptyAmount));
        assert_eq!(
            parse_amount("ten"),
            Err(InputValidationError::NotANumber("ten".into()))
        );
        assert_eq!(
            parse_amount("-5"),
            Err(InputValidationError::Negative("-5".into()))
        );
    }

    #[test]
    fn parse_amount_accepts_comma_and_zero() {
        assert_eq!(parse_amount("12,5").unwrap(), Decimal::new(125, 1));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_caps_the_range() {
        assert_eq!(parse_amount("1000000000000000").unwrap(), MAX_AMOUNT);
        assert_eq!(
            parse_amount("1000000000000000.01"),
            Err(InputValidationError::OutOfRange("1000000000000000.01".into()))
        );
        assert_eq!(
            parse_amount("79228162514264337593543950335"),
            Err(InputValidationError::OutOfRange("79228162514264337593543950335".into()))
        );
    }

    #[test]
    fn money_is_rounded_not_truncated() {
        assert_eq!(fmt_money(&Decimal::new(2999, 3), Currency::UAH), "3.00 UAH");
        assert_eq!(fmt_money(&Decimal::new(3015, 3), Currency::UAH), "3.02 UAH");
        assert_eq!(
            fmt_signed(&Decimal::new(12345, 4), Currency::EUR, OperationType::Expense),
            "-1.23 EUR"
        );
    }

    #[test]
    fn signed_amounts_show_two_places() {
        let d = Decimal::new(10, 0);
        assert_eq!(fmt_signed(&d, Currency::USD, OperationType::Income), "+10.00 USD");
        assert_eq!(fmt_signed(&d, Currency::UAH, OperationType::Expense), "-10.00 UAH");
    }
}
