//! # Validation Module
//!
//! Guards that run before any arithmetic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Inputs Are Checked                           │
//! │                                                                         │
//! │  Construction                                                          │
//! │  ├── TaxRate::from_percentage  finite, non-negative percentage         │
//! │  └── serde                     unknown rule kinds never deserialize    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Calculation (THIS MODULE)                                             │
//! │  ├── base amount >= 0          (applicator)                            │
//! │  ├── inclusive amount > 0      (solver)                                │
//! │  └── rule kind is set          (applicator, per rule)                  │
//! │                                                                         │
//! │  A failed check aborts the calculation: no partial tax is returned.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::template::TaxApplication;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a base amount for tax computation.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (tax on nothing is just the fixed rules)
///
/// ## Example
/// ```rust
/// use taxchain_core::money::Money;
/// use taxchain_core::validation::validate_base_amount;
///
/// assert!(validate_base_amount(Money::from_cents(0)).is_ok());
/// assert!(validate_base_amount(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_base_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeBaseAmount { amount });
    }

    Ok(())
}

/// Validates an inclusive amount for the solver.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_inclusive_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveInclusiveAmount { amount });
    }

    Ok(())
}

// =============================================================================
// Rule Validators
// =============================================================================

/// Validates that a template rule has a kind.
pub fn validate_application(index: usize, app: &TaxApplication) -> ValidationResult<()> {
    if matches!(app, TaxApplication::Unspecified) {
        return Err(ValidationError::UndefinedApplicationType { index });
    }

    Ok(())
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates the solver iteration bound.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_max_iterations(max_iterations: u32) -> ValidationResult<()> {
    if max_iterations == 0 {
        return Err(ValidationError::InvalidConfig {
            field: "solver.max_iterations".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::TaxRate;
    use crate::template::ApplyOn;

    #[test]
    fn test_validate_base_amount() {
        assert!(validate_base_amount(Money::from_cents(0)).is_ok());
        assert!(validate_base_amount(Money::from_cents(10000)).is_ok());
        assert!(validate_base_amount(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_inclusive_amount() {
        assert!(validate_inclusive_amount(Money::from_cents(1)).is_ok());
        assert!(validate_inclusive_amount(Money::from_cents(0)).is_err());
        assert!(validate_inclusive_amount(Money::from_cents(-500)).is_err());
    }

    #[test]
    fn test_validate_application() {
        let percent = TaxApplication::percent(TaxRate::from_bps(1000), ApplyOn::ReferenceValue);
        assert!(validate_application(0, &percent).is_ok());
        assert!(validate_application(0, &TaxApplication::fixed(Money::from_cents(1))).is_ok());

        let err = validate_application(3, &TaxApplication::Unspecified).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UndefinedApplicationType { index: 3 }
        ));
    }

    #[test]
    fn test_validate_max_iterations() {
        assert!(validate_max_iterations(1).is_ok());
        assert!(validate_max_iterations(64).is_ok());
        assert!(validate_max_iterations(0).is_err());
    }
}
