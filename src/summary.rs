// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx::{RateSnapshot, convert, to_base};
use crate::models::{Currency, Operation, OperationType};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

impl Totals {
    /// Sums never panic: a total leaving the `Decimal` range is clamped
    /// to the nearest bound and logged.
    pub fn from_operations(ops: &[Operation]) -> Self {
        let mut t = Totals::default();
        for op in ops {
            match op.r#type {
                OperationType::Income => t.income = add_clamped(t.income, op.amount),
                OperationType::Expense => t.expenses = add_clamped(t.expenses, op.amount),
            }
        }
        t.balance = t.income.checked_sub(t.expenses).unwrap_or_else(|| {
            log::warn!("Balance is out of range; clamping");
            if t.income > t.expenses { Decimal::MAX } else { Decimal::MIN }
        });
        t
    }

    /// Base-currency totals expressed in `target`.
    pub fn convert(&self, target: Currency, snapshot: Option<&RateSnapshot>) -> Self {
        Totals {
            income: convert(self.income, target, snapshot),
            expenses: convert(self.expenses, target, snapshot),
            balance: convert(self.balance, target, snapshot),
        }
    }

    fn to_base(self, source: Currency, snapshot: Option<&RateSnapshot>) -> Self {
        Totals {
            income: to_base(self.income, source, snapshot),
            expenses: to_base(self.expenses, source, snapshot),
            balance: to_base(self.balance, source, snapshot),
        }
    }
}

fn add_clamped(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        log::warn!("Total is out of range; clamping");
        if amount.is_sign_negative() { Decimal::MIN } else { Decimal::MAX }
    })
}

/// What the home view hands to the statistics view: totals already
/// converted into `currency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsPayload {
    pub totals: Totals,
    pub currency: Currency,
}

impl StatsPayload {
    pub fn new(totals_in_base: &Totals, currency: Currency, snapshot: Option<&RateSnapshot>) -> Self {
        StatsPayload {
            totals: totals_in_base.convert(currency, snapshot),
            currency,
        }
    }

    /// Re-expresses the payload in another display currency with the
    /// statistics view's own snapshot.
    pub fn view(&self, display: Currency, snapshot: Option<&RateSnapshot>) -> StatsPayload {
        if display == self.currency {
            return *self;
        }
        let base = self.totals.to_base(self.currency, snapshot);
        StatsPayload {
            totals: base.convert(display, snapshot),
            currency: display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(id: &str, amount: i64, kind: OperationType) -> Operation {
        Operation {
            id: id.into(),
            amount: Decimal::new(amount, 0),
            category: "Food".into(),
            r#type: kind,
        }
    }

    #[test]
    fn totals_split_by_type() {
        let ops = vec![
            op("a", 1000, OperationType::Income),
            op("b", 300, OperationType::Expense),
            op("c", 50, OperationType::Expense),
        ];
        let t = Totals::from_operations(&ops);
        assert_eq!(t.income, Decimal::new(1000, 0));
        assert_eq!(t.expenses, Decimal::new(350, 0));
        assert_eq!(t.balance, Decimal::new(650, 0));
    }

    #[test]
    fn huge_totals_clamp_instead_of_overflowing() {
        let big = |id: &str, kind| Operation {
            id: id.into(),
            amount: Decimal::MAX,
            category: "Salary".into(),
            r#type: kind,
        };
        let t = Totals::from_operations(&[
            big("a", OperationType::Income),
            big("b", OperationType::Income),
        ]);
        assert_eq!(t.income, Decimal::MAX);
        assert_eq!(t.balance, Decimal::MAX);

        let t = Totals::from_operations(&[
            op("a", 10, OperationType::Income),
            big("b", OperationType::Expense),
            big("c", OperationType::Expense),
        ]);
        assert_eq!(t.expenses, Decimal::MAX);
        assert_eq!(t.balance, Decimal::new(10, 0) - Decimal::MAX);
    }

    #[test]
    fn empty_history_has_zero_totals() {
        assert_eq!(Totals::from_operations(&[]), Totals::default());
    }
}
