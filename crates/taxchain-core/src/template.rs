//! # Tax Templates
//!
//! A template is an ordered, named chain of tax rules. Order matters: a rule
//! can be computed against the running gross or the previous rule's tax, so
//! moving a rule changes the result.
//!
//! ## Rule Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TaxApplication variants                            │
//! │                                                                         │
//! │  Percent { rate, apply_on }                                            │
//! │  ├── ReferenceValue     rate × original base amount                    │
//! │  ├── PreviousTaxAmount  rate × tax of the last Percent rule            │
//! │  └── RunningGross       rate × base + every tax applied so far         │
//! │                                                                         │
//! │  Fixed { amount }       flat amount, does NOT become "previous tax"    │
//! │                                                                         │
//! │  Unspecified            rule kind was never set → validation error     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON Shape
//! ```json
//! {
//!   "id": "GST",
//!   "applications": [
//!     { "type": "percent", "rate": 10.0, "apply_on": "reference_value" },
//!     { "type": "fixed", "amount": 500 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::rate::TaxRate;
use crate::validation::{validate_application, ValidationResult};

// =============================================================================
// Apply-On Basis
// =============================================================================

/// Which running value a `Percent` rule is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOn {
    /// The original base amount, wherever the rule sits in the chain.
    ReferenceValue,
    /// The tax produced by the most recent `Percent` rule.
    PreviousTaxAmount,
    /// The base plus every tax and fixed amount applied before this rule.
    RunningGross,
}

// =============================================================================
// Tax Application
// =============================================================================

/// One step of a tax template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxApplication {
    /// The rule kind was left unset. Rejected when the template is applied.
    #[default]
    Unspecified,

    /// A percentage of the chosen basis.
    Percent { rate: TaxRate, apply_on: ApplyOn },

    /// A flat amount added to the gross.
    Fixed { amount: Money },
}

impl TaxApplication {
    /// Shorthand for a `Percent` rule.
    pub const fn percent(rate: TaxRate, apply_on: ApplyOn) -> Self {
        TaxApplication::Percent { rate, apply_on }
    }

    /// Shorthand for a `Fixed` rule.
    pub const fn fixed(amount: Money) -> Self {
        TaxApplication::Fixed { amount }
    }
}

// =============================================================================
// Tax Template
// =============================================================================

/// An ordered, named sequence of tax rules.
///
/// Templates have no mutators once built: share them with `Arc` rather than
/// copying when several line items use the same one.
///
/// ## Example
/// ```rust
/// use taxchain_core::money::Money;
/// use taxchain_core::rate::TaxRate;
/// use taxchain_core::template::{ApplyOn, TaxTemplate};
///
/// let template = TaxTemplate::builder("Complex")
///     .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
///     .fixed(Money::from_cents(500))
///     .percent(TaxRate::from_bps(500), ApplyOn::RunningGross)
///     .build();
///
/// assert_eq!(template.id(), "Complex");
/// assert_eq!(template.applications().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxTemplate {
    id: String,
    #[serde(default)]
    applications: Vec<TaxApplication>,
}

impl TaxTemplate {
    /// Creates a template from an already ordered list of rules.
    pub fn new(id: impl Into<String>, applications: Vec<TaxApplication>) -> Self {
        TaxTemplate {
            id: id.into(),
            applications,
        }
    }

    /// Starts building a template rule by rule.
    pub fn builder(id: impl Into<String>) -> TaxTemplateBuilder {
        TaxTemplateBuilder {
            id: id.into(),
            applications: Vec::new(),
        }
    }

    /// Template name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rules in application order.
    pub fn applications(&self) -> &[TaxApplication] {
        &self.applications
    }

    /// Rejects templates containing a rule with no kind.
    ///
    /// The applicator performs the same check; calling this up front lets a
    /// caller reject a template when it is loaded rather than on first use.
    pub fn validate(&self) -> ValidationResult<()> {
        self.applications
            .iter()
            .enumerate()
            .try_for_each(|(index, app)| validate_application(index, app))
    }

    /// Sum of every `Percent` rate (basis ignored) and every `Fixed` amount.
    ///
    /// Only the solver's first estimate uses this. Rates are summed in whole
    /// basis points, each already truncated when it was parsed, so two
    /// 0.005% rules contribute nothing. Returns `None` if the fixed amounts
    /// overflow.
    pub fn seed_totals(&self) -> Option<(TaxRate, Money)> {
        self.applications.iter().try_fold(
            (TaxRate::zero(), Money::zero()),
            |(rate, fixed), app| match *app {
                TaxApplication::Percent { rate: r, .. } => Some((rate + r, fixed)),
                TaxApplication::Fixed { amount } => Some((rate, fixed.checked_add(amount)?)),
                TaxApplication::Unspecified => Some((rate, fixed)),
            },
        )
    }
}

/// Builder for [`TaxTemplate`].
#[derive(Debug, Clone)]
pub struct TaxTemplateBuilder {
    id: String,
    applications: Vec<TaxApplication>,
}

impl TaxTemplateBuilder {
    /// Appends a percentage rule.
    pub fn percent(mut self, rate: TaxRate, apply_on: ApplyOn) -> Self {
        self.applications.push(TaxApplication::percent(rate, apply_on));
        self
    }

    /// Appends a fixed-amount rule.
    pub fn fixed(mut self, amount: Money) -> Self {
        self.applications.push(TaxApplication::fixed(amount));
        self
    }

    /// Appends any rule, including `Unspecified`.
    pub fn application(mut self, app: TaxApplication) -> Self {
        self.applications.push(app);
        self
    }

    pub fn build(self) -> TaxTemplate {
        TaxTemplate {
            id: self.id,
            applications: self.applications,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_builder_preserves_order() {
        let template = TaxTemplate::builder("Chain")
            .fixed(Money::from_cents(100))
            .percent(TaxRate::from_bps(1000), ApplyOn::RunningGross)
            .build();

        assert_eq!(
            template.applications(),
            &[
                TaxApplication::fixed(Money::from_cents(100)),
                TaxApplication::percent(TaxRate::from_bps(1000), ApplyOn::RunningGross),
            ]
        );
    }

    #[test]
    fn test_seed_totals() {
        let template = TaxTemplate::builder("Mixed")
            .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
            .fixed(Money::from_cents(500))
            .percent(TaxRate::from_bps(500), ApplyOn::RunningGross)
            .fixed(Money::from_cents(250))
            .build();

        let (rate, fixed) = template.seed_totals().unwrap();
        assert_eq!(rate.bps(), 1500);
        assert_eq!(fixed.cents(), 750);
    }

    #[test]
    fn test_seed_totals_sum_truncated_rates() {
        let tiny = TaxRate::from_percentage(0.005).unwrap();
        let template = TaxTemplate::builder("Tiny")
            .percent(tiny, ApplyOn::ReferenceValue)
            .percent(tiny, ApplyOn::RunningGross)
            .build();

        let (rate, fixed) = template.seed_totals().unwrap();
        assert_eq!(rate.bps(), 0);
        assert!(fixed.is_zero());
    }

    #[test]
    fn test_seed_totals_fixed_overflow() {
        let template = TaxTemplate::builder("Huge")
            .fixed(Money::from_cents(i64::MAX))
            .fixed(Money::from_cents(1))
            .build();
        assert!(template.seed_totals().is_none());
    }

    #[test]
    fn test_validate_reports_first_unspecified_index() {
        let template = TaxTemplate::builder("Broken")
            .percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
            .application(TaxApplication::Unspecified)
            .application(TaxApplication::Unspecified)
            .build();

        let err = template.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UndefinedApplicationType { index: 1 }
        ));

        assert!(TaxTemplate::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "id": "Complex",
            "applications": [
                { "type": "percent", "rate": 10.0, "apply_on": "reference_value" },
                { "type": "fixed", "amount": 500 },
                { "type": "percent", "rate": 5, "apply_on": "running_gross" },
                { "type": "unspecified" }
            ]
        }"#;

        let template: TaxTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.id(), "Complex");
        assert_eq!(
            template.applications()[0],
            TaxApplication::percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue)
        );
        assert_eq!(
            template.applications()[1],
            TaxApplication::fixed(Money::from_cents(500))
        );
        assert_eq!(template.applications()[3], TaxApplication::Unspecified);
    }

    #[test]
    fn test_deserialize_rejects_unknown_kind() {
        let json = r#"{ "id": "Bad", "applications": [ { "type": "discount" } ] }"#;
        assert!(serde_json::from_str::<TaxTemplate>(json).is_err());
    }

    #[test]
    fn test_missing_applications_is_empty_template() {
        let template: TaxTemplate = serde_json::from_str(r#"{ "id": "Empty" }"#).unwrap();
        assert!(template.applications().is_empty());
    }
}
