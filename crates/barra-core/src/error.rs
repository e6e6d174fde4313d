//! # Error Types
//!
//! Domain-specific error types for barra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  barra-core errors (this file)                                         │
//! │  └── CoreError        - Rate table and input parsing failures          │
//! │                                                                         │
//! │  barra-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - Config, database, output                       │
//! │                                                                         │
//! │  Flow: CoreError → DbError / CliError → user message                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! An event that cannot be estimated (no option enabled, zero guests) is a
//! normal outcome: `estimate()` returns `None`. Missing fallback constants
//! are not errors either; the hardcoded default is used.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rate table value would make the estimator divide by zero or
    /// produce negative quantities.
    ///
    /// ## When This Occurs
    /// - A TOML config sets `drinks_per_bottle = 0`
    /// - A weight or ratio is negative
    #[error("Invalid rate {field}: {reason}")]
    InvalidRate { field: String, reason: String },

    /// Climate string is not one of the known climates.
    #[error("Unknown climate: '{0}'. Valid options: hot, cool, extreme")]
    UnknownClimate(String),

    /// A stored decimal value could not be parsed.
    #[error("Invalid decimal for {field}: '{value}'")]
    InvalidDecimal { field: String, value: String },
}

impl CoreError {
    /// Creates an InvalidRate error.
    pub fn invalid_rate(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidRate {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_rate("drinks_per_bottle", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid rate drinks_per_bottle: must be positive"
        );

        let err = CoreError::UnknownClimate("tropical".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown climate: 'tropical'. Valid options: hot, cool, extreme"
        );
    }
}
