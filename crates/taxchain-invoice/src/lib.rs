//! # taxchain-invoice: Invoice Orchestration
//!
//! Turns line items into tax amounts and double-entry ledger postings using
//! the calculation kernel in `taxchain-core`.
//!
//! ## Modules
//!
//! - [`line_item`] - Line items and their postings
//! - [`invoice`] - Invoice processing and totals
//! - [`ledger`] - Ledger accounts and entries
//! - [`document`] - JSON invoice documents with shared templates
//! - [`error`] - Invoice error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use taxchain_core::{ApplyOn, Money, TaxRate, TaxTemplate};
//! use taxchain_invoice::{Invoice, LineItem};
//!
//! let simple = Arc::new(
//!     TaxTemplate::builder("Simple")
//!         .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
//!         .build(),
//! );
//!
//! let invoice = Invoice::new(vec![
//!     LineItem::exclusive(Money::from_cents(10000), Arc::clone(&simple)),
//!     LineItem::inclusive(Money::from_cents(11000), simple),
//! ]);
//!
//! let summary = invoice.process().unwrap();
//! assert_eq!(summary.cost.to_string(), "200.00");
//! assert_eq!(summary.tax.to_string(), "20.00");
//! assert!(summary.is_balanced());
//! ```

pub mod document;
pub mod error;
pub mod invoice;
pub mod ledger;
pub mod line_item;

pub use document::{InvoiceDocument, LineItemRef};
pub use error::{InvoiceError, InvoiceResult};
pub use invoice::{Invoice, InvoiceSummary};
pub use ledger::{LedgerAccount, LedgerEntry};
pub use line_item::{LineItem, LinePosting};
