//! # Ledger Entries
//!
//! Double-entry postings produced by line items.
//!
//! ## Posting Shape (per line item, in this order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Account        Debit              Credit                               │
//! │  ─────────────  ─────────────────  ─────────────────                    │
//! │  Tax Asset      tax                                                     │
//! │  Supplier                          amount + tax                         │
//! │  Inventory      amount                                                  │
//! │                                                                         │
//! │  Debits always equal credits.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use taxchain_core::Money;

/// Ledger accounts a line item posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerAccount {
    #[serde(rename = "Tax Asset")]
    TaxAsset,
    Supplier,
    Inventory,
}

impl LedgerAccount {
    /// Account name as it appears on a ledger.
    pub const fn name(&self) -> &'static str {
        match self {
            LedgerAccount::TaxAsset => "Tax Asset",
            LedgerAccount::Supplier => "Supplier",
            LedgerAccount::Inventory => "Inventory",
        }
    }
}

impl fmt::Display for LedgerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single posting. Unused sides are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account: LedgerAccount,
    pub debit: Money,
    pub credit: Money,
}

impl LedgerEntry {
    /// Debit posting.
    pub const fn debit(account: LedgerAccount, amount: Money) -> Self {
        LedgerEntry {
            account,
            debit: amount,
            credit: Money::zero(),
        }
    }

    /// Credit posting.
    pub const fn credit(account: LedgerAccount, amount: Money) -> Self {
        LedgerEntry {
            account,
            debit: Money::zero(),
            credit: amount,
        }
    }

    /// The three postings for one taxed line item.
    pub fn for_line(amount: Money, tax: Money) -> [LedgerEntry; 3] {
        [
            LedgerEntry::debit(LedgerAccount::TaxAsset, tax),
            LedgerEntry::credit(LedgerAccount::Supplier, amount + tax),
            LedgerEntry::debit(LedgerAccount::Inventory, amount),
        ]
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account: {}, Debit: {}, Credit: {}",
            self.account, self.debit, self.credit
        )
    }
}
