// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Reading or writing the persisted operation list failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("corrupt operations blob: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// The rate service could not produce a usable snapshot.
#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("rate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate service answered with status {0}")]
    Status(u16),
    #[error("malformed rate response: {0}")]
    Malformed(String),
    #[error("no API key configured for the rate service")]
    MissingApiKey,
}

/// User input rejected at the input boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputValidationError {
    #[error("amount is empty")]
    EmptyAmount,
    #[error("amount '{0}' is not a number")]
    NotANumber(String),
    #[error("amount '{0}' is negative")]
    Negative(String),
    #[error("amount '{0}' is too large")]
    OutOfRange(String),
    #[error("unknown currency '{0}' (use UAH, USD, EUR or PLN)")]
    UnknownCurrency(String),
}
