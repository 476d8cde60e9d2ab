//! # Inclusive-Base Solver
//!
//! Recovers the exclusive (pre-tax) base from a tax-inclusive amount.
//!
//! Rule chains with `RunningGross` and `PreviousTaxAmount` bases have no
//! closed-form inverse, so the solver searches: guess a base, apply the
//! template, shift the guess by the signed error, repeat.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inclusive = 100.00, template = [7.5% Ref]                              │
//! │                                                                         │
//! │  seed:  100.00 - 7.5% of 100.00                       = 92.50          │
//! │                                                                         │
//! │  iter   estimate   tax     estimate + tax   diff                        │
//! │  ────   ────────   ─────   ──────────────   ─────                       │
//! │   1      92.50     6.94        99.44        -0.56   → estimate += 0.56  │
//! │   2      93.06     6.98       100.04        +0.04   → estimate -= 0.04  │
//! │   3      93.02     6.98       100.00         0.00   → within ±1 cent    │
//! │                                                                         │
//! │  probe: estimate - diff, adopted only if it lands EXACTLY on target    │
//! │  result: base 93.02, tax 6.98                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! When the probe misses, the leftover cent (the residual) is folded into
//! the reported tax so that `exclusive_base + tax == inclusive` always holds.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::applicator::compute_tax;
use crate::config::SolverConfig;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::template::TaxTemplate;
use crate::validation::{validate_inclusive_amount, ValidationResult};

/// Largest `|diff|` at which the solver stops iterating and probes.
const ROUNDING_TOLERANCE: Money = Money::from_cents(1);

// =============================================================================
// Result
// =============================================================================

/// An inclusive amount split into exclusive base and tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusiveSplit {
    /// Pre-tax amount.
    pub exclusive_base: Money,
    /// Tax, including any residual.
    pub tax: Money,
    /// Rounding mismatch the probe could not remove (-1, 0 or +1 cent).
    pub residual: Money,
    /// Tax evaluations spent in the search loop.
    pub iterations: u32,
}

impl InclusiveSplit {
    /// Returns true when the base alone reproduces the inclusive amount.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.residual.is_zero()
    }
}

// =============================================================================
// Solver
// =============================================================================

/// Iterative solver for exclusive bases.
#[derive(Debug, Clone, Copy, Default)]
pub struct InclusiveSolver {
    config: SolverConfig,
}

impl InclusiveSolver {
    /// Creates a solver, rejecting a zero iteration budget.
    pub fn new(config: SolverConfig) -> ValidationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Finds the exclusive base whose taxed total equals `inclusive`.
    ///
    /// ## Errors
    /// - [`ValidationError::NonPositiveInclusiveAmount`](crate::error::ValidationError::NonPositiveInclusiveAmount)
    ///   if `inclusive <= 0`
    /// - any applicator error raised while iterating, unchanged
    /// - [`CoreError::FinalTaxCalculation`] if the corrective probe fails
    /// - [`CoreError::SolverDidNotConverge`] once `max_iterations` is spent
    /// - [`CoreError::Overflow`] if an estimate leaves the i64 cent range
    ///
    /// Convergence is not guaranteed even for templates of only
    /// `ReferenceValue` and `Fixed` rules: when the taxed total jumps by two
    /// cents across adjacent bases, or a rate exceeds 50%, the estimate can
    /// alternate around the target until the iteration budget runs out.
    pub fn solve(&self, inclusive: Money, template: &TaxTemplate) -> CoreResult<InclusiveSplit> {
        validate_inclusive_amount(inclusive)?;

        let mut estimate = Self::seed(inclusive, template)?;
        debug!(
            template = %template.id(),
            inclusive = %inclusive,
            estimate = %estimate,
            "Seeded exclusive estimate"
        );

        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            iterations += 1;

            let tax = compute_tax(estimate, template)?;
            let diff = estimate
                .checked_add(tax)
                .and_then(|total| total.checked_sub(inclusive))
                .ok_or(CoreError::Overflow {
                    operation: "solver step",
                })?;
            debug!(iteration = iterations, estimate = %estimate, diff = %diff, "Solver step");

            if diff.abs() <= ROUNDING_TOLERANCE {
                return Self::settle(inclusive, template, estimate, tax, diff, iterations);
            }

            estimate = estimate.checked_sub(diff).ok_or(CoreError::Overflow {
                operation: "solver step",
            })?;
        }

        Err(CoreError::SolverDidNotConverge {
            inclusive,
            iterations,
        })
    }

    /// Single-rate linear approximation of the exclusive base.
    ///
    /// Every `Percent` rate is summed regardless of basis; the loop corrects
    /// whatever this gets wrong.
    fn seed(inclusive: Money, template: &TaxTemplate) -> CoreResult<Money> {
        let overflow = || CoreError::Overflow {
            operation: "solver seed",
        };
        let (total_rate, total_fixed) = template.seed_totals().ok_or_else(overflow)?;
        let taxable = inclusive.checked_sub(total_fixed).ok_or_else(overflow)?;
        let seed_tax = taxable.percent_of(total_rate).ok_or_else(overflow)?;

        inclusive
            .checked_sub(seed_tax)
            .and_then(|estimate| estimate.checked_sub(total_fixed))
            .ok_or_else(overflow)
    }

    /// Probes `estimate - diff` once and builds the final split.
    fn settle(
        inclusive: Money,
        template: &TaxTemplate,
        estimate: Money,
        tax: Money,
        diff: Money,
        iterations: u32,
    ) -> CoreResult<InclusiveSplit> {
        let overflow = || CoreError::Overflow {
            operation: "solver probe",
        };
        let probe = estimate.checked_sub(diff).ok_or_else(overflow)?;
        let probe_tax = compute_tax(probe, template).map_err(|source| {
            CoreError::FinalTaxCalculation {
                source: Box::new(source),
            }
        })?;

        if probe.checked_add(probe_tax) == Some(inclusive) {
            return Ok(InclusiveSplit {
                exclusive_base: probe,
                tax: probe_tax,
                residual: Money::zero(),
                iterations,
            });
        }

        warn!(
            template = %template.id(),
            inclusive = %inclusive,
            residual = %diff,
            "No exact exclusive base; residual folded into tax"
        );

        Ok(InclusiveSplit {
            exclusive_base: estimate,
            tax: tax.checked_sub(diff).ok_or_else(overflow)?,
            residual: diff,
            iterations,
        })
    }
}

/// Solves with the default [`SolverConfig`].
///
/// ## Example
/// ```rust
/// use taxchain_core::money::Money;
/// use taxchain_core::rate::TaxRate;
/// use taxchain_core::solver::solve_exclusive_base;
/// use taxchain_core::template::{ApplyOn, TaxTemplate};
///
/// let template = TaxTemplate::builder("Simple")
///     .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
///     .build();
///
/// let split = solve_exclusive_base(Money::from_cents(11000), &template).unwrap();
/// assert_eq!(split.exclusive_base.cents(), 10000);
/// assert_eq!(split.tax.cents(), 1000);
/// ```
pub fn solve_exclusive_base(inclusive: Money, template: &TaxTemplate) -> CoreResult<InclusiveSplit> {
    InclusiveSolver::default().solve(inclusive, template)
}

// =============================================================================
// Unit Tests
// =============================================================================
