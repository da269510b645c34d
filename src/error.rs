//! Errors raised when an indicator is configured with values it cannot render.

use thiserror::Error;

/// A configuration that would make rendering meaningless (e.g. a division by zero).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A bar's total must be a positive, finite number.
    #[error("bar total must be a positive finite number, got {0}")]
    InvalidTotal(f64),

    /// The rendered field must be at least one column wide.
    #[error("indicator width must be positive")]
    ZeroWidth,
}
