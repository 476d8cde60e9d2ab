//! # Error Types
//!
//! Domain-specific error types for taxchain-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  taxchain-core errors (this file)                                      │
//! │  ├── CoreError        - Calculation and config failures                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  taxchain-invoice errors (separate crate)                              │
//! │  └── InvoiceError     - Which line item aborted the invoice            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → InvoiceError                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending amount or rule index in the message
//! 3. A failed calculation never returns a partial amount

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Calculation errors raised by the applicator and the inclusive solver.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The solver's corrective probe could not be evaluated.
    ///
    /// ## When This Occurs
    /// The iteration settled within one cent, but computing tax on the
    /// corrected estimate failed (e.g. the estimate went negative).
    #[error("final tax calculation failed: {source}")]
    FinalTaxCalculation {
        #[source]
        source: Box<CoreError>,
    },

    /// The solver ran out of iterations before settling within one cent.
    ///
    /// ## When This Occurs
    /// The estimate alternates around the target instead of closing in.
    /// Rates above 50% can do this, and so can rule combinations whose
    /// taxed total steps by two cents between adjacent bases.
    #[error("inclusive amount {inclusive} did not converge after {iterations} iterations")]
    SolverDidNotConverge { inclusive: Money, iterations: u32 },

    /// An intermediate amount left the i64 cent range.
    ///
    /// ## When This Occurs
    /// Huge fixed amounts, or rates above 100% on huge bases.
    #[error("amount overflowed during {operation}")]
    Overflow { operation: &'static str },

    /// Configuration text could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any arithmetic runs, so a calculation either
/// completes or leaves nothing behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Tax cannot be computed on a negative base.
    #[error("cannot calculate tax for a negative base amount ({amount})")]
    NegativeBaseAmount { amount: Money },

    /// The inclusive solver needs a strictly positive target.
    #[error("cannot calculate tax for a zero or negative inclusive amount ({amount})")]
    NonPositiveInclusiveAmount { amount: Money },

    /// A template rule has no application type.
    #[error("application type not defined on template rule {index}")]
    UndefinedApplicationType { index: usize },

    /// A rate percentage could not be turned into basis points.
    #[error("invalid tax rate: {reason}")]
    InvalidRate { reason: String },

    /// A configuration value is out of range.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
