// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Exchange rates against the base currency.
//!
//! A [`RateSnapshot`] holds one factor per foreign currency, expressed as
//! base units per one foreign unit. Conversions fall back to identity
//! whenever no factor is known, so missing rates only degrade display.

use crate::error::{InputValidationError, RateFetchError};
use crate::models::Currency;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

pub const DEFAULT_RATES_URL: &str = "https://api.currencyfreaks.com/latest";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSnapshot {
    factors: BTreeMap<Currency, Decimal>,
}

impl RateSnapshot {
    /// Builds a snapshot from explicit factors. The base currency and
    /// non-positive factors are ignored.
    pub fn from_factors<I>(factors: I) -> Self
    where
        I: IntoIterator<Item = (Currency, Decimal)>,
    {
        let factors = factors
            .into_iter()
            .filter(|(c, f)| !c.is_base() && *f > Decimal::ZERO)
            .collect();
        RateSnapshot { factors }
    }

    /// Computes factors from quotes relative to the service's reference
    /// currency: `quote(base) / quote(foreign)`.
    pub fn from_quotes(quotes: &HashMap<String, String>) -> Result<Self, RateFetchError> {
        let base = quote_for(quotes, Currency::BASE.code())?;
        let mut factors = BTreeMap::new();
        for ccy in Currency::FOREIGN {
            let foreign = quote_for(quotes, ccy.code())?;
            let factor = base.checked_div(foreign).ok_or_else(|| {
                RateFetchError::Malformed(format!("cannot derive factor for {}", ccy))
            })?;
            factors.insert(ccy, factor);
        }
        Ok(RateSnapshot { factors })
    }

    pub fn factor(&self, ccy: Currency) -> Option<Decimal> {
        self.factors.get(&ccy).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        self.factors.iter().map(|(c, f)| (*c, *f))
    }

    pub fn is_complete(&self) -> bool {
        Currency::FOREIGN.iter().all(|c| self.factors.contains_key(c))
    }
}

fn quote_for(quotes: &HashMap<String, String>, code: &str) -> Result<Decimal, RateFetchError> {
    let raw = quotes
        .get(code)
        .ok_or_else(|| RateFetchError::Malformed(format!("missing quote for {}", code)))?;
    let raw = raw.trim();
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| RateFetchError::Malformed(format!("quote for {} is not numeric: '{}'", code, raw)))?;
    if value <= Decimal::ZERO {
        return Err(RateFetchError::Malformed(format!(
            "quote for {} must be positive, got {}",
            code, value
        )));
    }
    Ok(value)
}

/// Two decimal places, midpoints away from zero.
pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Expresses a base-currency amount in `target`, rounded to 2 dp. Identity
/// for the base currency or when no factor is available.
pub fn convert(amount_in_base: Decimal, target: Currency, snapshot: Option<&RateSnapshot>) -> Decimal {
    if target.is_base() {
        return amount_in_base;
    }
    snapshot
        .and_then(|s| s.factor(target))
        .and_then(|f| amount_in_base.checked_div(f))
        .map(round2)
        .unwrap_or(amount_in_base)
}

/// Inverse of [`convert`], unrounded. Without a factor the amount is taken
/// as if it were already in the base currency.
pub fn to_base(amount: Decimal, source: Currency, snapshot: Option<&RateSnapshot>) -> Decimal {
    if source.is_base() {
        return amount;
    }
    snapshot
        .and_then(|s| s.factor(source))
        .and_then(|f| amount.checked_mul(f))
        .unwrap_or(amount)
}

/// Like [`to_base`], but a conversion that leaves the `Decimal` range is an
/// input error instead of a silent passthrough.
pub fn checked_to_base(
    amount: Decimal,
    source: Currency,
    snapshot: Option<&RateSnapshot>,
) -> Result<Decimal, InputValidationError> {
    match snapshot.and_then(|s| s.factor(source)) {
        Some(f) if !source.is_base() => amount
            .checked_mul(f)
            .ok_or_else(|| InputValidationError::OutOfRange(format!("{} {}", amount, source))),
        _ => Ok(amount),
    }
}

pub fn convert_between(
    amount: Decimal,
    from: Currency,
    to: Currency,
    snapshot: Option<&RateSnapshot>,
) -> Result<Decimal, InputValidationError> {
    if from == to {
        return Ok(amount);
    }
    Ok(convert(checked_to_base(amount, from, snapshot)?, to, snapshot))
}

/// Anything able to produce a fresh snapshot.
pub trait RateSource {
    fn fetch(&self) -> Result<RateSnapshot, RateFetchError>;
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, String>,
}

/// Parses a `{ "rates": { CODE: "<numeric string>" } }` body.
pub fn parse_latest(body: &str) -> Result<RateSnapshot, RateFetchError> {
    let parsed: LatestResponse =
        serde_json::from_str(body).map_err(|e| RateFetchError::Malformed(e.to_string()))?;
    RateSnapshot::from_quotes(&parsed.rates)
}

pub fn symbols_param() -> String {
    let codes: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
    codes.join(",")
}

/// The CurrencyFreaks `latest` endpoint.
pub struct CurrencyFreaks {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CurrencyFreaks {
    pub fn new(endpoint: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        Ok(CurrencyFreaks {
            client: crate::utils::http_client()?,
            endpoint: endpoint.to_string(),
            api_key,
        })
    }
}

impl RateSource for CurrencyFreaks {
    fn fetch(&self) -> Result<RateSnapshot, RateFetchError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(RateFetchError::MissingApiKey)?;
        let symbols = symbols_param();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("apikey", key), ("symbols", symbols.as_str())])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RateFetchError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        let snapshot = parse_latest(&body)?;
        log::debug!("Fetched rates for {} currencies", Currency::FOREIGN.len());
        Ok(snapshot)
    }
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: RateSnapshot,
    fetched_at: DateTime<Utc>,
}

/// One shared source of rates for every view, with a time-bounded cache.
pub struct RateConverter {
    source: Box<dyn RateSource>,
    ttl: Duration,
    retry_after: Duration,
    cached: Option<CachedSnapshot>,
    last_failure: Option<DateTime<Utc>>,
}

impl RateConverter {
    pub fn new(source: Box<dyn RateSource>, ttl: Duration) -> Self {
        RateConverter {
            source,
            ttl,
            retry_after: Duration::seconds(30),
            cached: None,
            last_failure: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Fetches unconditionally and caches the result on success.
    pub fn fetch_rates(&mut self) -> Result<RateSnapshot, RateFetchError> {
        self.fetch_at(Utc::now())
    }

    /// The cached snapshot while it is fresh, otherwise a new fetch. `None`
    /// means conversion is unavailable.
    pub fn snapshot(&mut self) -> Option<&RateSnapshot> {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&mut self, now: DateTime<Utc>) -> Option<&RateSnapshot> {
        let fresh = self
            .cached
            .as_ref()
            .is_some_and(|c| now.signed_duration_since(c.fetched_at) < self.ttl);
        if !fresh {
            self.cached = None;
            let backing_off = self
                .last_failure
                .is_some_and(|t| now.signed_duration_since(t) < self.retry_after);
            if !backing_off {
                if let Err(e) = self.fetch_at(now) {
                    log::warn!(
                        "Exchange rates unavailable, amounts stay in {}: {}",
                        Currency::BASE,
                        e
                    );
                }
            }
        }
        self.cached.as_ref().map(|c| &c.snapshot)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cached.as_ref().map(|c| c.fetched_at)
    }

    /// Base amount shown in `target`. Never touches the network for the
    /// base currency.
    pub fn convert(&mut self, amount_in_base: Decimal, target: Currency) -> Decimal {
        if target.is_base() {
            return amount_in_base;
        }
        convert(amount_in_base, target, self.snapshot())
    }

    pub fn to_base(&mut self, amount: Decimal, source: Currency) -> Decimal {
        if source.is_base() {
            return amount;
        }
        to_base(amount, source, self.snapshot())
    }

    fn fetch_at(&mut self, now: DateTime<Utc>) -> Result<RateSnapshot, RateFetchError> {
        match self.source.fetch() {
            Ok(snapshot) => {
                self.cached = Some(CachedSnapshot {
                    snapshot: snapshot.clone(),
                    fetched_at: now,
                });
                self.last_failure = None;
                Ok(snapshot)
            }
            Err(e) => {
                self.last_failure = Some(now);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn factors_are_base_units_per_foreign_unit() {
        let q = quotes(&[("UAH", "41.5"), ("USD", "1"), ("EUR", "0.83"), ("PLN", "4.15")]);
        let snap = RateSnapshot::from_quotes(&q).unwrap();
        assert_eq!(snap.factor(Currency::USD), Some(Decimal::new(415, 1)));
        assert_eq!(snap.factor(Currency::EUR), Some(Decimal::new(50, 0)));
        assert_eq!(snap.factor(Currency::PLN), Some(Decimal::new(10, 0)));
        assert!(snap.is_complete());
    }

    #[test]
    fn missing_or_bad_quotes_are_malformed() {
        let missing = quotes(&[("UAH", "41.5"), ("USD", "1"), ("EUR", "0.83")]);
        assert!(matches!(
            RateSnapshot::from_quotes(&missing),
            Err(RateFetchError::Malformed(_))
        ));
        let zero = quotes(&[("UAH", "41.5"), ("USD", "0"), ("EUR", "0.83"), ("PLN", "4")]);
        assert!(RateSnapshot::from_quotes(&zero).is_err());
        let text = quotes(&[("UAH", "lots"), ("USD", "1"), ("EUR", "0.83"), ("PLN", "4")]);
        assert!(RateSnapshot::from_quotes(&text).is_err());
    }

    #[test]
    fn parse_latest_rejects_other_shapes() {
        assert!(parse_latest(r#"{"date":"2025-01-01"}"#).is_err());
        assert!(parse_latest(r#"{"rates":{"UAH":41.5,"USD":1,"EUR":0.8,"PLN":4}}"#).is_err());
        assert!(parse_latest("<html>").is_err());
        let ok = parse_latest(
            r#"{"date":"2025-01-01","base":"USD","rates":{"UAH":"40","USD":"1","EUR":"0.8","PLN":"4"}}"#,
        )
        .unwrap();
        assert_eq!(ok.factor(Currency::PLN), Some(Decimal::new(10, 0)));
    }

    #[test]
    fn round2_rounds_midpoints_away_from_zero() {
        assert_eq!(round2(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round2(Decimal::new(1015, 3)), Decimal::new(102, 2));
        assert_eq!(round2(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
    }

    #[test]
    fn checked_to_base_reports_overflow() {
        let snap = RateSnapshot::from_factors([(Currency::USD, Decimal::new(40, 0))]);
        assert_eq!(
            checked_to_base(Decimal::new(10, 0), Currency::USD, Some(&snap)),
            Ok(Decimal::new(400, 0))
        );
        assert_eq!(
            checked_to_base(Decimal::MAX, Currency::UAH, Some(&snap)),
            Ok(Decimal::MAX)
        );
        assert_eq!(
            checked_to_base(Decimal::new(10, 0), Currency::EUR, None),
            Ok(Decimal::new(10, 0))
        );
        assert!(matches!(
            checked_to_base(Decimal::MAX, Currency::USD, Some(&snap)),
            Err(InputValidationError::OutOfRange(_))
        ));
    }

    #[test]
    fn symbols_include_reference_and_foreign_codes() {
        assert_eq!(symbols_param(), "UAH,USD,EUR,PLN");
    }
}
