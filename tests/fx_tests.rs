// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, TimeZone, Utc};
use kopilka::error::RateFetchError;
use kopilka::fx::{RateConverter, RateSnapshot, RateSource, convert, convert_between, to_base};
use kopilka::models::Currency;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::Cell;
use std::rc::Rc;

struct CountingSource {
    calls: Rc<Cell<usize>>,
    snapshot: Option<RateSnapshot>,
}

impl RateSource for CountingSource {
    fn fetch(&self) -> Result<RateSnapshot, RateFetchError> {
        self.calls.set(self.calls.get() + 1);
        self.snapshot
            .clone()
            .ok_or_else(|| RateFetchError::Malformed("offline".into()))
    }
}

fn full_snapshot() -> RateSnapshot {
    RateSnapshot::from_factors([
        (Currency::USD, dec!(41.2345)),
        (Currency::EUR, dec!(44.87)),
        (Currency::PLN, dec!(10.3333333)),
    ])
}

fn converter(snapshot: Option<RateSnapshot>) -> (RateConverter, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let source = CountingSource {
        calls: calls.clone(),
        snapshot,
    };
    (
        RateConverter::new(Box::new(source), Duration::minutes(10)),
        calls,
    )
}

#[test]
fn base_currency_is_always_identity() {
    let snap = full_snapshot();
    for amount in [dec!(0), dec!(1000), dec!(12.345678)] {
        assert_eq!(convert(amount, Currency::UAH, Some(&snap)), amount);
        assert_eq!(convert(amount, Currency::UAH, None), amount);
        assert_eq!(to_base(amount, Currency::UAH, Some(&snap)), amount);
    }
}

#[test]
fn convert_undoes_to_base_for_every_foreign_currency() {
    let snap = full_snapshot();
    for ccy in Currency::FOREIGN {
        for x in [dec!(0.01), dec!(10), dec!(99.99), dec!(12345.67)] {
            let stored = to_base(x, ccy, Some(&snap));
            assert_eq!(convert(stored, ccy, Some(&snap)), x, "{} {}", x, ccy);
        }
    }
}

#[test]
fn forty_base_units_per_dollar() {
    let snap = RateSnapshot::from_factors([(Currency::USD, dec!(40))]);
    let stored = to_base(dec!(10), Currency::USD, Some(&snap));
    assert_eq!(stored, dec!(400));
    let shown = convert(stored, Currency::USD, Some(&snap));
    assert_eq!(format!("{:.2}", shown), "10.00");
}

#[test]
fn no_snapshot_or_missing_factor_passes_amounts_through() {
    assert_eq!(to_base(dec!(10), Currency::USD, None), dec!(10));
    assert_eq!(convert(dec!(10), Currency::EUR, None), dec!(10));
    let usd_only = RateSnapshot::from_factors([(Currency::USD, dec!(40))]);
    assert_eq!(convert(dec!(500), Currency::PLN, Some(&usd_only)), dec!(500));
    assert!(!usd_only.is_complete());
}

#[test]
fn conversion_rounds_only_on_the_way_out() {
    let snap = RateSnapshot::from_factors([(Currency::EUR, dec!(3))]);
    assert_eq!(convert(dec!(10), Currency::EUR, Some(&snap)), dec!(3.33));
    assert_eq!(to_base(dec!(1.005), Currency::EUR, Some(&snap)), dec!(3.015));
}

#[test]
fn cross_currency_goes_through_base() {
    let snap = RateSnapshot::from_factors([(Currency::USD, dec!(40)), (Currency::EUR, dec!(50))]);
    assert_eq!(
        convert_between(dec!(100), Currency::EUR, Currency::USD, Some(&snap)),
        Ok(dec!(125))
    );
    assert_eq!(
        convert_between(dec!(7), Currency::PLN, Currency::PLN, Some(&snap)),
        Ok(dec!(7))
    );
    assert!(convert_between(Decimal::MAX, Currency::EUR, Currency::USD, Some(&snap)).is_err());
}

#[test]
fn hand_built_snapshots_drop_unusable_factors() {
    let snap = RateSnapshot::from_factors([
        (Currency::UAH, dec!(1)),
        (Currency::USD, dec!(0)),
        (Currency::EUR, dec!(-3)),
        (Currency::PLN, dec!(10)),
    ]);
    let factors: Vec<(Currency, Decimal)> = snap.iter().collect();
    assert_eq!(factors, vec![(Currency::PLN, dec!(10))]);
}

#[test]
fn cached_snapshot_is_reused_until_it_expires() {
    let (mut rates, calls) = converter(Some(full_snapshot()));
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    assert!(rates.snapshot_at(t0).is_some());
    assert_eq!(calls.get(), 1);
    assert!(rates.snapshot_at(t0 + Duration::minutes(5)).is_some());
    assert_eq!(calls.get(), 1);
    assert_eq!(rates.fetched_at(), Some(t0));

    assert!(rates.snapshot_at(t0 + Duration::minutes(11)).is_some());
    assert_eq!(calls.get(), 2);
    assert_eq!(rates.fetched_at(), Some(t0 + Duration::minutes(11)));
}

#[test]
fn failed_fetch_backs_off_before_retrying() {
    let (mut rates, calls) = converter(None);
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    assert!(rates.snapshot_at(t0).is_none());
    assert_eq!(calls.get(), 1);
    assert!(rates.snapshot_at(t0 + Duration::seconds(10)).is_none());
    assert_eq!(calls.get(), 1);
    assert!(rates.snapshot_at(t0 + Duration::seconds(31)).is_none());
    assert_eq!(calls.get(), 2);
    assert!(rates.fetched_at().is_none());
}

#[test]
fn base_conversions_never_fetch() {
    let (mut rates, calls) = converter(Some(full_snapshot()));
    assert_eq!(rates.convert(dec!(100), Currency::UAH), dec!(100));
    assert_eq!(rates.to_base(dec!(100), Currency::UAH), dec!(100));
    assert_eq!(calls.get(), 0);

    assert_eq!(rates.to_base(dec!(2), Currency::EUR), dec!(89.74));
    assert_eq!(calls.get(), 1);
}

#[test]
fn unavailable_rates_degrade_to_identity() {
    let (mut rates, _) = converter(None);
    assert_eq!(rates.convert(dec!(400), Currency::USD), dec!(400));
    assert_eq!(rates.to_base(dec!(10), Currency::USD), dec!(10));
    assert!(rates.fetch_rates().is_err());
}

#[test]
fn explicit_fetch_refreshes_the_cache() {
    let (mut rates, calls) = converter(Some(full_snapshot()));
    let snap = rates.fetch_rates().unwrap();
    assert!(snap.is_complete());
    assert!(rates.snapshot().is_some());
    assert_eq!(calls.get(), 1);
}
