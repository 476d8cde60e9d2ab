//! # Tax Rates
//!
//! Tax rates are the only fractional input to the kernel. They arrive as a
//! percentage (`7.5` means 7.5%) and are converted once, at construction,
//! into whole basis points.
//!
//! ## Conversion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  percentage ──► trunc to 2 decimals ──► × 100 ──► round ──► bps (u32)   │
//! │                                                                         │
//! │     7.5      ──►        7.50         ──►  750.0  ──►  750               │
//! │     7.559    ──►        7.55         ──►  755.0  ──►  755               │
//! │    10.0      ──►       10.00         ──► 1000.0  ──► 1000               │
//! │                                                                         │
//! │  Truncation drops sub-hundredth precision; the final round only        │
//! │  absorbs float representation error.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 750 bps = 7.5%
///
/// Serialized as the percentage number so templates read naturally in JSON
/// (`"rate": 7.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage, truncated to two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use taxchain_core::rate::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_percentage(7.5).unwrap().bps(), 750);
    /// assert_eq!(TaxRate::from_percentage(7.559).unwrap().bps(), 755);
    /// assert!(TaxRate::from_percentage(-1.0).is_err());
    /// ```
    pub fn from_percentage(pct: f64) -> ValidationResult<Self> {
        if !pct.is_finite() {
            return Err(ValidationError::InvalidRate {
                reason: format!("{pct} is not a finite percentage"),
            });
        }

        if pct < 0.0 {
            return Err(ValidationError::InvalidRate {
                reason: format!("{pct}% is negative"),
            });
        }

        let truncated = (pct * 100.0).trunc() / 100.0;
        let bps = (truncated * 100.0).round();

        if bps > u32::MAX as f64 {
            return Err(ValidationError::InvalidRate {
                reason: format!("{pct}% is too large"),
            });
        }

        Ok(TaxRate(bps as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Combines rates for the solver's single-rate seed.
impl Add for TaxRate {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        TaxRate(self.0.saturating_add(other.0))
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = ValidationError;

    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        TaxRate::from_percentage(pct)
    }
}

impl From<TaxRate> for f64 {
    fn from(rate: TaxRate) -> Self {
        rate.percentage()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_from_percentage_truncates() {
        assert_eq!(TaxRate::from_percentage(10.0).unwrap().bps(), 1000);
        assert_eq!(TaxRate::from_percentage(7.5).unwrap().bps(), 750);
        assert_eq!(TaxRate::from_percentage(8.25).unwrap().bps(), 825);
        // third decimal is dropped, never rounded up
        assert_eq!(TaxRate::from_percentage(7.559).unwrap().bps(), 755);
        assert_eq!(TaxRate::from_percentage(0.009).unwrap().bps(), 0);
        assert_eq!(TaxRate::from_percentage(0.0).unwrap(), TaxRate::zero());
    }

    #[test]
    fn test_from_percentage_rejects_bad_input() {
        assert!(TaxRate::from_percentage(-0.5).is_err());
        assert!(TaxRate::from_percentage(f64::NAN).is_err());
        assert!(TaxRate::from_percentage(f64::INFINITY).is_err());
        assert!(TaxRate::from_percentage(1e12).is_err());
    }

    #[test]
    fn test_add_rates() {
        let total = TaxRate::from_bps(1000) + TaxRate::from_bps(500);
        assert_eq!(total.bps(), 1500);

        let saturated = TaxRate::from_bps(u32::MAX) + TaxRate::from_bps(1);
        assert_eq!(saturated.bps(), u32::MAX);
    }

    #[test]
    fn test_serde_as_percentage() {
        let rate: TaxRate = serde_json::from_str("7.5").unwrap();
        assert_eq!(rate.bps(), 750);
        assert_eq!(serde_json::to_string(&rate).unwrap(), "7.5");

        assert!(serde_json::from_str::<TaxRate>("-3").is_err());
    }

    #[test]
    fn test_tax_rate_default() {
        assert_eq!(TaxRate::default(), TaxRate::zero());
        assert_eq!(TaxRate::default().bps(), 0);
    }
}
