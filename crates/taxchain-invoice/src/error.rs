//! # Invoice Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  taxchain-core                    taxchain-invoice                      │
//! │  ─────────────                    ────────────────                      │
//! │  ValidationError ──► CoreError ──► InvoiceError::LineItem { index }     │
//! │                                                                         │
//! │  serde_json::Error ─────────────► InvoiceError::Json                    │
//! │  unknown / broken template ─────► InvoiceError::UnknownTemplate, ...    │
//! │                                                                         │
//! │  The first failing item aborts the invoice: no partial ledger.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use taxchain_core::{CoreError, ValidationError};
use thiserror::Error;

/// Invoice processing errors.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// A line item could not be taxed.
    ///
    /// ## When This Occurs
    /// - Inclusive amount is zero or negative
    /// - Template contains an unspecified rule
    /// - The inclusive solver failed or did not converge
    #[error("line item {index} failed: {source}")]
    LineItem {
        index: usize,
        #[source]
        source: CoreError,
    },

    /// A line item names a template the document does not define.
    #[error("line item {index} references unknown template '{template}'")]
    UnknownTemplate { index: usize, template: String },

    /// Two templates in one document share an id.
    #[error("template '{template}' is defined more than once")]
    DuplicateTemplate { template: String },

    /// A template failed validation when the document was loaded.
    #[error("template '{template}' is invalid: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: ValidationError,
    },

    /// The invoice document is not valid JSON for this schema.
    #[error("Invoice document parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with InvoiceError.
pub type InvoiceResult<T> = Result<T, InvoiceError>;
