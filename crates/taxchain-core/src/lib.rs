//! # taxchain-core: Sequential Tax Calculation Kernel
//!
//! This crate computes tax under ordered rule chains and recovers exclusive
//! bases from tax-inclusive amounts. Everything here is a pure function over
//! integer cents.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Taxchain Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 taxchain-invoice                                │   │
//! │  │    LineItem ──► Invoice ──► LedgerEntry postings               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ taxchain-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  money    │  │  template  │  │ applicator│  │  solver   │  │   │
//! │  │   │  Money    │  │ TaxTemplate│  │ compute_  │  │ Inclusive │  │   │
//! │  │   │  TaxRate  │  │ ApplyOn    │  │   tax     │  │  Solver   │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FLOATING POINT MONEY • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic and the rounding rule
//! - [`rate`] - Tax rates in basis points
//! - [`template`] - Tax rules and templates
//! - [`applicator`] - Sequential rule evaluation
//! - [`solver`] - Inclusive → exclusive base search
//! - [`config`] - Solver configuration
//! - [`error`] - Domain error types
//! - [`validation`] - Input guards
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no shared state
//! 2. **Integer Money**: all monetary values are cents (i64)
//! 3. **One Rounding Rule**: half-up at the cent, in `Money::percent_of`
//! 4. **Explicit Errors**: typed, never partial results
//!
//! ## Example Usage
//!
//! ```rust
//! use taxchain_core::{compute_tax, solve_exclusive_base, ApplyOn, Money, TaxRate, TaxTemplate};
//!
//! let template = TaxTemplate::builder("VAT")
//!     .percent(TaxRate::from_percentage(7.5).unwrap(), ApplyOn::ReferenceValue)
//!     .build();
//!
//! let tax = compute_tax(Money::from_cents(9302), &template).unwrap();
//! assert_eq!(tax.cents(), 698);
//!
//! let split = solve_exclusive_base(Money::from_cents(10000), &template).unwrap();
//! assert_eq!(split.exclusive_base.cents(), 9302);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod applicator;
pub mod config;
pub mod error;
pub mod money;
pub mod rate;
pub mod solver;
pub mod template;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use taxchain_core::Money` instead of
// `use taxchain_core::money::Money`

pub use applicator::{apply_template, compute_tax, AppliedStep, TaxComputation};
pub use config::{SolverConfig, TaxchainConfig};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rate::TaxRate;
pub use solver::{solve_exclusive_base, InclusiveSolver, InclusiveSplit};
pub use template::{ApplyOn, TaxApplication, TaxTemplate, TaxTemplateBuilder};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default bound on solver iterations.
///
/// Monotonic templates settle in a handful of steps; the bound only trips
/// on templates that oscillate.
pub const DEFAULT_MAX_SOLVER_ITERATIONS: u32 = 64;
