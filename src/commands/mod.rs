// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod doctor;
pub mod exporter;
pub mod fx;
pub mod operations;
pub mod reports;
pub mod shell;

use crate::config::Config;
use crate::db;
use crate::fx::{CurrencyFreaks, RateConverter, RateSnapshot};
use crate::models::Currency;
use crate::store::{KvBackend, OperationStore};
use anyhow::{Result, bail};

pub type Backend = Box<dyn KvBackend + Send>;

/// One store and one rate converter shared by every command of a run.
pub struct Session {
    pub store: OperationStore<Backend>,
    pub rates: RateConverter,
}

impl Session {
    pub fn new(store: OperationStore<Backend>, rates: RateConverter) -> Self {
        Session { store, rates }
    }

    pub fn open(config: &Config) -> Result<Self> {
        let kv = db::open_or_init(config.db.as_deref())?;
        log::debug!("Using database at {}", kv.path().display());
        let store = OperationStore::open(Box::new(kv) as Backend);
        Ok(Session::new(store, rate_converter(config)?))
    }

    /// Waits for pending saves.
    pub fn close(self) {
        self.store.close();
    }
}

pub fn rate_converter(config: &Config) -> Result<RateConverter> {
    let source = CurrencyFreaks::new(&config.rates_url, config.api_key.clone())?;
    Ok(RateConverter::new(Box::new(source), config.rates_ttl()))
}

pub fn dispatch(session: &mut Session, name: &str, sub: &clap::ArgMatches) -> Result<()> {
    match name {
        "add" => operations::add(session, sub).map(|_| ()),
        "rm" => operations::rm(session, sub),
        "list" => operations::list(session, sub),
        "summary" => reports::summary(session, sub),
        "stats" => reports::stats(session, sub),
        "fx" => fx::handle(session, sub),
        "export" => exporter::handle(session, sub),
        other => bail!("Unknown command '{}'", other),
    }
}

/// A snapshot only when one of `currencies` needs it, so base-only views
/// never wait on the network.
pub(crate) fn snapshot_for(rates: &mut RateConverter, currencies: &[Currency]) -> Option<RateSnapshot> {
    if currencies.iter().all(|c| c.is_base()) {
        return None;
    }
    rates.snapshot().cloned()
}

/// The currency amounts really end up in: `requested` when it can be
/// converted to, the base currency otherwise.
pub(crate) fn effective_currency(requested: Currency, snapshot: Option<&RateSnapshot>) -> Currency {
    if requested.is_base() || snapshot.and_then(|s| s.factor(requested)).is_some() {
        requested
    } else {
        Currency::BASE
    }
}

pub(crate) fn warn_unconverted(requested: Currency, effective: Currency) {
    if requested != effective {
        println!(
            "Exchange rates unavailable; showing amounts in {} instead of {}",
            effective, requested
        );
    }
}
