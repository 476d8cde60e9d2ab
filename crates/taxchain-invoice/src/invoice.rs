//! # Invoices
//!
//! An invoice is an ordered list of line items. Processing posts every item
//! in order and sums the results.
//!
//! ## Invariants
//! - Entries appear in item order, three per item
//! - The first failing item aborts the whole invoice
//! - Total debits equal total credits

use serde::{Deserialize, Serialize};
use taxchain_core::{CoreError, InclusiveSolver, Money};
use tracing::debug;

use crate::error::{InvoiceError, InvoiceResult};
use crate::ledger::LedgerEntry;
use crate::line_item::LineItem;

/// An ordered collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    items: Vec<LineItem>,
}

/// Aggregated result of processing an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Sum of exclusive line amounts.
    pub cost: Money,
    /// Sum of line taxes.
    pub tax: Money,
    /// Every posting, in item order.
    pub entries: Vec<LedgerEntry>,
}

impl Invoice {
    pub fn new(items: Vec<LineItem>) -> Self {
        Invoice { items }
    }

    /// Appends a line item.
    pub fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Processes the invoice with the default solver configuration.
    pub fn process(&self) -> InvoiceResult<InvoiceSummary> {
        self.process_with(&InclusiveSolver::default())
    }

    /// Posts every line item in order.
    ///
    /// ## Errors
    /// [`InvoiceError::LineItem`] for the first item that fails; nothing
    /// from earlier items is returned. Totals that leave the i64 cent range
    /// fail the item that pushed them over.
    pub fn process_with(&self, solver: &InclusiveSolver) -> InvoiceResult<InvoiceSummary> {
        let mut summary = InvoiceSummary {
            entries: Vec::with_capacity(self.items.len() * 3),
            ..InvoiceSummary::default()
        };

        for (index, item) in self.items.iter().enumerate() {
            let posting = item
                .post(solver)
                .map_err(|source| InvoiceError::LineItem { index, source })?;

            debug!(
                index,
                item = %item.name,
                amount = %posting.amount,
                tax = %posting.tax,
                "Posted line item"
            );

            let overflow = || InvoiceError::LineItem {
                index,
                source: CoreError::Overflow {
                    operation: "invoice totals",
                },
            };
            let cost = summary.cost.checked_add(posting.amount).ok_or_else(overflow)?;
            let tax = summary.tax.checked_add(posting.tax).ok_or_else(overflow)?;
            // debit and credit totals both come to cost + tax
            cost.checked_add(tax).ok_or_else(overflow)?;

            summary.cost = cost;
            summary.tax = tax;
            summary.entries.extend(posting.entries);
        }

        Ok(summary)
    }
}

impl FromIterator<LineItem> for Invoice {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Invoice::new(iter.into_iter().collect())
    }
}

impl InvoiceSummary {
    pub fn total_debits(&self) -> Money {
        self.entries.iter().map(|entry| entry.debit).sum()
    }

    pub fn total_credits(&self) -> Money {
        self.entries.iter().map(|entry| entry.credit).sum()
    }

    /// Trial balance check.
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}
