//! # Calculation Configuration
//!
//! Settings for the inclusive-base solver.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TAXCHAIN_SOLVER_MAX_ITERATIONS=128                                 │
//! │                                                                         │
//! │  2. TOML text supplied by the embedding application                    │
//! │     (this crate never reads files itself)                              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     max_iterations = 64                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [solver]
//! max_iterations = 64
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreResult;
use crate::validation::{validate_max_iterations, ValidationResult};
use crate::DEFAULT_MAX_SOLVER_ITERATIONS;

/// Environment variable overriding [`SolverConfig::max_iterations`].
pub const ENV_SOLVER_MAX_ITERATIONS: &str = "TAXCHAIN_SOLVER_MAX_ITERATIONS";

// =============================================================================
// Solver Configuration
// =============================================================================

/// Settings for [`InclusiveSolver`](crate::solver::InclusiveSolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Iterations allowed before the solver gives up with
    /// [`CoreError::SolverDidNotConverge`](crate::error::CoreError::SolverDidNotConverge).
    ///
    /// Well-behaved templates settle in three or four.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_SOLVER_ITERATIONS
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_max_iterations(self.max_iterations)
    }
}

// =============================================================================
// Root Configuration
// =============================================================================

/// Root configuration document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxchainConfig {
    #[serde(default)]
    pub solver: SolverConfig,
}

impl TaxchainConfig {
    /// Parses and validates a TOML document.
    ///
    /// ## Example
    /// ```rust
    /// use taxchain_core::config::TaxchainConfig;
    ///
    /// let config = TaxchainConfig::from_toml_str("[solver]\nmax_iterations = 16").unwrap();
    /// assert_eq!(config.solver.max_iterations, 16);
    /// ```
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: TaxchainConfig = toml::from_str(contents)?;
        config.solver.validate()?;
        debug!(
            max_iterations = config.solver.max_iterations,
            "Loaded taxchain config"
        );
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup.
    ///
    /// Unparseable or out-of-range values are logged and ignored so a typo
    /// in the environment never disables the iteration bound.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SOLVER_MAX_ITERATIONS) {
            match raw.trim().parse::<u32>() {
                Ok(value) if validate_max_iterations(value).is_ok() => {
                    debug!(max_iterations = value, "Overriding solver iterations from environment");
                    self.solver.max_iterations = value;
                }
                _ => warn!(
                    value = %raw,
                    "Ignoring invalid {} override", ENV_SOLVER_MAX_ITERATIONS
                ),
            }
        }

        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_default_config() {
        let config = TaxchainConfig::default();
        assert_eq!(config.solver.max_iterations, DEFAULT_MAX_SOLVER_ITERATIONS);
        assert!(config.solver.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = TaxchainConfig::from_toml_str("[solver]\nmax_iterations = 8\n").unwrap();
        assert_eq!(config.solver.max_iterations, 8);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TaxchainConfig::from_toml_str("").unwrap();
        assert_eq!(config, TaxchainConfig::default());

        let config = TaxchainConfig::from_toml_str("[solver]\n").unwrap();
        assert_eq!(config.solver.max_iterations, DEFAULT_MAX_SOLVER_ITERATIONS);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = TaxchainConfig::from_toml_str("[solver]\nmax_iterations = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = TaxchainConfig::from_toml_str("[solver\nmax_iterations = ").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = TaxchainConfig::default().with_overrides(|key| {
            (key == ENV_SOLVER_MAX_ITERATIONS).then(|| "12".to_string())
        });
        assert_eq!(config.solver.max_iterations, 12);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        for raw in ["zero", "0", "-4", ""] {
            let config = TaxchainConfig::default().with_overrides(|_| Some(raw.to_string()));
            assert_eq!(config.solver.max_iterations, DEFAULT_MAX_SOLVER_ITERATIONS);
        }
    }
}
