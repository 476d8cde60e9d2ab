//! # Line Items
//!
//! A line item is an amount, a flag saying whether that amount already
//! contains tax, and the template that taxes it.
//!
//! ## Posting Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItem { amount, inclusive, template }                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inclusive? ──yes──► resolve_exclusive() ──► NEW LineItem (exclusive)  │
//! │       │                                           │                     │
//! │       no ◄────────────────────────────────────────┘                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_tax(amount, template)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LinePosting { amount, tax, [Tax Asset, Supplier, Inventory] }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items are never mutated: the caller's inclusive item is left as it was.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taxchain_core::{compute_tax, CoreResult, InclusiveSolver, Money, TaxTemplate};
use tracing::debug;

use crate::ledger::LedgerEntry;

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text label.
    #[serde(default)]
    pub name: String,
    amount: Money,
    #[serde(default)]
    inclusive: bool,
    template: Arc<TaxTemplate>,
}

/// The taxed result of one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePosting {
    /// Exclusive amount the tax was computed on.
    pub amount: Money,
    pub tax: Money,
    pub entries: [LedgerEntry; 3],
}

impl LineItem {
    pub fn new(amount: Money, inclusive: bool, template: Arc<TaxTemplate>) -> Self {
        LineItem {
            name: String::new(),
            amount,
            inclusive,
            template,
        }
    }

    /// An item whose amount excludes tax.
    pub fn exclusive(amount: Money, template: Arc<TaxTemplate>) -> Self {
        Self::new(amount, false, template)
    }

    /// An item whose amount already includes tax.
    pub fn inclusive(amount: Money, template: Arc<TaxTemplate>) -> Self {
        Self::new(amount, true, template)
    }

    /// Sets the label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn template(&self) -> &Arc<TaxTemplate> {
        &self.template
    }

    /// Returns an exclusive copy of this item.
    ///
    /// Inclusive items have their amount replaced by the solver's exclusive
    /// base; exclusive items are returned unchanged. The template is shared,
    /// not copied.
    pub fn resolve_exclusive(&self, solver: &InclusiveSolver) -> CoreResult<LineItem> {
        if !self.inclusive {
            return Ok(self.clone());
        }

        let split = solver.solve(self.amount, &self.template)?;
        debug!(
            item = %self.name,
            inclusive = %self.amount,
            exclusive = %split.exclusive_base,
            "Resolved inclusive line item"
        );

        Ok(LineItem {
            name: self.name.clone(),
            amount: split.exclusive_base,
            inclusive: false,
            template: Arc::clone(&self.template),
        })
    }

    /// Taxes the item and builds its three ledger postings.
    ///
    /// Tax is recomputed on the resolved exclusive amount. When the solver
    /// left a one-cent residual, the Supplier credit therefore differs from
    /// the original inclusive amount by that cent.
    pub fn post(&self, solver: &InclusiveSolver) -> CoreResult<LinePosting> {
        let resolved = self.resolve_exclusive(solver)?;
        let tax = compute_tax(resolved.amount, &resolved.template)?;

        Ok(LinePosting {
            amount: resolved.amount,
            tax,
            entries: LedgerEntry::for_line(resolved.amount, tax),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxchain_core::{ApplyOn, CoreError, TaxRate};

    use crate::ledger::LedgerAccount;

    fn ten_percent() -> Arc<TaxTemplate> {
        Arc::new(
            TaxTemplate::builder("Simple")
                .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
                .build(),
        )
    }

    #[test]
    fn test_exclusive_item_posting() {
        let item = LineItem::exclusive(Money::from_cents(10000), ten_percent());
        let posting = item.post(&InclusiveSolver::default()).unwrap();

        assert_eq!(posting.amount.cents(), 10000);
        assert_eq!(posting.tax.cents(), 1000);
        assert_eq!(posting.entries[0].account, LedgerAccount::TaxAsset);
        assert_eq!(posting.entries[1].credit.cents(), 11000);
        assert_eq!(posting.entries[2].debit.cents(), 10000);
    }

    #[test]
    fn test_inclusive_item_resolves_to_new_value() {
        let item = LineItem::inclusive(Money::from_cents(11000), ten_percent()).named("Widget");
        let resolved = item.resolve_exclusive(&InclusiveSolver::default()).unwrap();

        assert_eq!(resolved.amount().cents(), 10000);
        assert!(!resolved.is_inclusive());
        assert_eq!(resolved.name, "Widget");
        assert!(Arc::ptr_eq(resolved.template(), item.template()));

        // original untouched
        assert_eq!(item.amount().cents(), 11000);
        assert!(item.is_inclusive());
    }

    #[test]
    fn test_exclusive_item_resolves_to_itself() {
        let item = LineItem::exclusive(Money::from_cents(500), ten_percent());
        let resolved = item.resolve_exclusive(&InclusiveSolver::default()).unwrap();
        assert_eq!(resolved, item);
    }

    #[test]
    fn test_inclusive_zero_amount_fails() {
        let item = LineItem::inclusive(Money::zero(), ten_percent());
        let err = item.post(&InclusiveSolver::default()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_exclusive_zero_amount_is_allowed() {
        let item = LineItem::exclusive(Money::zero(), ten_percent());
        let posting = item.post(&InclusiveSolver::default()).unwrap();
        assert!(posting.tax.is_zero());
    }

    #[test]
    fn test_inclusive_posting_credits_inclusive_amount() {
        let vat = TaxTemplate::builder("VAT")
            .percent(TaxRate::from_bps(750), ApplyOn::ReferenceValue)
            .build();
        let item = LineItem::inclusive(Money::from_cents(10000), Arc::new(vat));
        let posting = item.post(&InclusiveSolver::default()).unwrap();

        assert_eq!(posting.amount.cents(), 9302);
        assert_eq!(posting.tax.cents(), 698);
        assert_eq!(posting.entries[1].credit.cents(), 10000);
    }
}
