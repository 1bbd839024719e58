// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::InputValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CATEGORIES: [&str; 3] = ["Salary", "Food", "Transport"];

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    UAH,
    USD,
    EUR,
    PLN,
}

impl Currency {
    /// Every amount at rest is denominated in this currency.
    pub const BASE: Currency = Currency::UAH;
    pub const FOREIGN: [Currency; 3] = [Currency::USD, Currency::EUR, Currency::PLN];
    pub const ALL: [Currency; 4] = [Currency::UAH, Currency::USD, Currency::EUR, Currency::PLN];

    pub fn code(self) -> &'static str {
        match self {
            Currency::UAH => "UAH",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::PLN => "PLN",
        }
    }

    pub fn is_base(self) -> bool {
        self == Currency::BASE
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = InputValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "UAH" => Ok(Currency::UAH),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "PLN" => Ok(Currency::PLN),
            _ => Err(InputValidationError::UnknownCurrency(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Income,
    Expense,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Income => f.write_str("Income"),
            OperationType::Expense => f.write_str("Expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal, // base currency
    pub category: String,
    pub r#type: OperationType,
}
