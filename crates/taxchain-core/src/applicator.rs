//! # Sequential Tax Applicator
//!
//! Evaluates a [`TaxTemplate`] against a base amount, rule by rule.
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base = 100.00, template = [10% Ref, 10% Prev, 10% Gross, Fixed 100]   │
//! │                                                                         │
//! │  rule            basis          tax      prev_tax   running_gross      │
//! │  ─────────────   ────────────   ──────   ────────   ─────────────      │
//! │  (start)                                    0.00        100.00         │
//! │  10% Ref         100.00 base     10.00     10.00        110.00         │
//! │  10% Prev         10.00 prev      1.00      1.00        111.00         │
//! │  10% Gross       111.00 gross    11.10     11.10        122.10         │
//! │  Fixed 100.00    -              100.00     11.10        222.10         │
//! │                                                                         │
//! │  tax = running_gross - base = 122.10                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Fixed` rules never update `prev_tax`: a `PreviousTaxAmount` rule after a
//! fixed amount still sees the last `Percent` rule's tax.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::template::{ApplyOn, TaxApplication, TaxTemplate};
use crate::validation::validate_base_amount;

// =============================================================================
// Results
// =============================================================================

/// The record of one rule applied to a base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedStep {
    /// Position of the rule in its template.
    pub index: usize,
    /// The rule that produced this step.
    pub application: TaxApplication,
    /// The amount the rate was applied to. `None` for fixed rules.
    pub basis: Option<Money>,
    /// Tax added by this rule.
    pub amount: Money,
    /// Gross after this rule.
    pub running_gross: Money,
}

/// Full result of applying a template: every step plus the final gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    pub base_amount: Money,
    pub gross: Money,
    pub steps: Vec<AppliedStep>,
}

impl TaxComputation {
    /// Total tax across all rules.
    #[inline]
    pub fn tax(&self) -> Money {
        self.gross - self.base_amount
    }
}

// =============================================================================
// Applicator
// =============================================================================

/// Applies every rule of `template` to `base_amount` and records each step.
///
/// ## Errors
/// - [`ValidationError::NegativeBaseAmount`] if `base_amount < 0`
/// - [`ValidationError::UndefinedApplicationType`] at the first
///   `Unspecified` rule
/// - [`CoreError::Overflow`] if a rule's tax or the running gross leaves
///   the i64 cent range
pub fn apply_template(base_amount: Money, template: &TaxTemplate) -> CoreResult<TaxComputation> {
    validate_base_amount(base_amount)?;

    let mut running_gross = base_amount;
    let mut prev_tax = Money::zero();
    let mut steps = Vec::with_capacity(template.applications().len());

    for (index, application) in template.applications().iter().enumerate() {
        let (basis, amount) = match *application {
            TaxApplication::Percent { rate, apply_on } => {
                let basis = match apply_on {
                    ApplyOn::ReferenceValue => base_amount,
                    ApplyOn::PreviousTaxAmount => prev_tax,
                    ApplyOn::RunningGross => running_gross,
                };
                let tax = basis.percent_of(rate).ok_or(CoreError::Overflow {
                    operation: "percentage rule",
                })?;
                prev_tax = tax;
                (Some(basis), tax)
            }
            TaxApplication::Fixed { amount } => (None, amount),
            TaxApplication::Unspecified => {
                return Err(ValidationError::UndefinedApplicationType { index }.into());
            }
        };

        running_gross = running_gross
            .checked_add(amount)
            .ok_or(CoreError::Overflow {
                operation: "running gross",
            })?;

        trace!(
            template = %template.id(),
            index,
            amount = %amount,
            running_gross = %running_gross,
            "Applied tax rule"
        );

        steps.push(AppliedStep {
            index,
            application: *application,
            basis,
            amount,
            running_gross,
        });
    }

    // tax() subtracts the base back out
    running_gross
        .checked_sub(base_amount)
        .ok_or(CoreError::Overflow {
            operation: "total tax",
        })?;

    Ok(TaxComputation {
        base_amount,
        gross: running_gross,
        steps,
    })
}

/// Computes the total tax `template` adds to `base_amount`.
///
/// ## Example
/// ```rust
/// use taxchain_core::applicator::compute_tax;
/// use taxchain_core::money::Money;
/// use taxchain_core::rate::TaxRate;
/// use taxchain_core::template::{ApplyOn, TaxTemplate};
///
/// let template = TaxTemplate::builder("Cascade")
///     .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
///     .percent(TaxRate::from_bps(500), ApplyOn::RunningGross)
///     .build();
///
/// let tax = compute_tax(Money::from_cents(10000), &template).unwrap();
/// assert_eq!(tax.cents(), 1550);
/// ```
pub fn compute_tax(base_amount: Money, template: &TaxTemplate) -> CoreResult<Money> {
    apply_template(base_amount, template).map(|computation| computation.tax())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::TaxRate;
    use proptest::prelude::*;

    fn pct(bps: u32, apply_on: ApplyOn) -> TaxApplication {
        TaxApplication::percent(TaxRate::from_bps(bps), apply_on)
    }

    fn fixed(cents: i64) -> TaxApplication {
        TaxApplication::fixed(Money::from_cents(cents))
    }

    fn tax_of(base: i64, apps: Vec<TaxApplication>) -> i64 {
        let template = TaxTemplate::new("test", apps);
        compute_tax(Money::from_cents(base), &template).unwrap().cents()
    }

    #[test]
    fn test_simple_reference_value() {
        assert_eq!(tax_of(10000, vec![pct(1000, ApplyOn::ReferenceValue)]), 1000);
    }

    #[test]
    fn test_simple_fixed_amount() {
        assert_eq!(tax_of(10000, vec![fixed(2500)]), 2500);
    }

    #[test]
    fn test_cascade_on_running_gross() {
        // 1000 on the base, then 5% of 11000
        let tax = tax_of(
            10000,
            vec![
                pct(1000, ApplyOn::ReferenceValue),
                pct(500, ApplyOn::RunningGross),
            ],
        );
        assert_eq!(tax, 1550);
    }

    #[test]
    fn test_full_chain() {
        let tax = tax_of(
            10000,
            vec![
                pct(1000, ApplyOn::ReferenceValue),
                pct(1000, ApplyOn::PreviousTaxAmount),
                pct(1000, ApplyOn::RunningGross),
                fixed(10000),
            ],
        );
        assert_eq!(tax, 12210);
    }

    #[test]
    fn test_fixed_rule_does_not_become_previous_tax() {
        let template = TaxTemplate::new(
            "FixedThenPrev",
            vec![
                pct(1000, ApplyOn::ReferenceValue),
                fixed(500),
                pct(1000, ApplyOn::PreviousTaxAmount),
            ],
        );

        let computation = apply_template(Money::from_cents(10000), &template).unwrap();
        let last = computation.steps[2];
        assert_eq!(last.basis, Some(Money::from_cents(1000)));
        assert_eq!(last.amount.cents(), 100);
        assert_eq!(computation.tax().cents(), 1600);
    }

    #[test]
    fn test_reference_value_ignores_position() {
        // A reference rule after a fixed amount still uses the original base
        let tax = tax_of(10000, vec![fixed(5000), pct(1000, ApplyOn::ReferenceValue)]);
        assert_eq!(tax, 6000);
    }

    #[test]
    fn test_running_gross_includes_fixed() {
        let tax = tax_of(10000, vec![fixed(5000), pct(1000, ApplyOn::RunningGross)]);
        assert_eq!(tax, 5000 + 1500);
    }

    #[test]
    fn test_previous_tax_before_any_percent_is_zero() {
        let tax = tax_of(10000, vec![pct(5000, ApplyOn::PreviousTaxAmount)]);
        assert_eq!(tax, 0);
    }

    #[test]
    fn test_zero_base_and_empty_template() {
        assert_eq!(tax_of(0, vec![pct(1000, ApplyOn::ReferenceValue)]), 0);
        assert_eq!(tax_of(0, vec![fixed(300)]), 300);
        assert_eq!(tax_of(10000, vec![]), 0);
    }

    #[test]
    fn test_steps_record_running_gross() {
        let template = TaxTemplate::new(
            "Steps",
            vec![
                pct(1000, ApplyOn::ReferenceValue),
                pct(1000, ApplyOn::PreviousTaxAmount),
                pct(1000, ApplyOn::RunningGross),
                fixed(10000),
            ],
        );

        let computation = apply_template(Money::from_cents(10000), &template).unwrap();
        let gross: Vec<i64> = computation
            .steps
            .iter()
            .map(|step| step.running_gross.cents())
            .collect();
        assert_eq!(gross, vec![11000, 11100, 12210, 22210]);
        assert_eq!(computation.steps[3].basis, None);
        assert_eq!(computation.gross.cents(), 22210);
    }

    #[test]
    fn test_negative_base_amount_fails() {
        let template = TaxTemplate::default();
        let err = compute_tax(Money::from_cents(-100), &template).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NegativeBaseAmount { .. })
        ));
    }

    #[test]
    fn test_unspecified_rule_fails_without_partial_result() {
        let template = TaxTemplate::new(
            "Broken",
            vec![pct(1000, ApplyOn::ReferenceValue), TaxApplication::Unspecified],
        );

        let err = apply_template(Money::from_cents(10000), &template).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UndefinedApplicationType { index: 1 })
        ));
    }

    #[test]
    fn test_huge_fixed_amount_overflows() {
        let template = TaxTemplate::new("Huge", vec![fixed(i64::MAX)]);
        let err = compute_tax(Money::from_cents(10), &template).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Overflow {
                operation: "running gross"
            }
        ));
    }

    #[test]
    fn test_huge_percentage_overflows() {
        let template = TaxTemplate::new("Triple", vec![pct(30000, ApplyOn::ReferenceValue)]);
        let err = compute_tax(Money::from_cents(i64::MAX / 2), &template).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Overflow {
                operation: "percentage rule"
            }
        ));
    }

    proptest! {
        #[test]
        fn prop_compute_tax_is_deterministic(
            base in 0i64..1_000_000_000,
            rate in 0u32..5000,
            fixed_cents in 0i64..100_000,
        ) {
            let template = TaxTemplate::new(
                "prop",
                vec![
                    pct(rate, ApplyOn::ReferenceValue),
                    fixed(fixed_cents),
                    pct(rate, ApplyOn::RunningGross),
                    pct(rate, ApplyOn::PreviousTaxAmount),
                ],
            );
            let base = Money::from_cents(base);

            let first = compute_tax(base, &template).unwrap();
            let second = compute_tax(base, &template).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_negative_base_always_fails(base in i64::MIN / 2..0i64) {
            let template = TaxTemplate::new("prop", vec![pct(1000, ApplyOn::ReferenceValue)]);
            prop_assert!(compute_tax(Money::from_cents(base), &template).is_err());
        }
    }
}
