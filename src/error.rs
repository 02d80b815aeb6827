//! Custom error types for the position list generator.
//!
//! This module defines the primary error type, `PosListError`, for the whole crate.
//! Using the `thiserror` crate, it provides a single place where everything that can
//! abort a generation is described, from configuration loading to Z reconciliation.
//!
//! ## Error Hierarchy
//!
//! - **`DimensionMismatch`**: A Z array was given in non-stack mode but its length does
//!   not match the number of generated (x, y) positions.
//! - **`MissingZForStack`**: A Z-stack was requested without a Z sequence.
//! - **`Config`**: Wraps errors from `figment`, typically a malformed settings file or an
//!   environment override that does not fit the schema.
//! - **`Configuration`**: Semantic errors in settings that parsed correctly but make no
//!   sense (e.g. a linspace with zero points).
//! - **`Io`**: Wraps `std::io::Error` from reading settings or writing the `.pos` file.
//!
//! Generation is all-or-nothing: any of these errors means no output is produced.
//! Non-fatal conditions are reported through [`Advisory`] instead.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type AppResult<T> = std::result::Result<T, PosListError>;

/// Errors that abort a generation.
#[derive(Error, Debug)]
pub enum PosListError {
    /// A Z list cannot be matched to the number of XY positions.
    #[error("Z dimension mismatch: expected a scalar or {expected} values, got {found}")]
    DimensionMismatch {
        /// Number of XY positions
        expected: usize,
        /// Length of the Z list
        found: usize,
    },

    /// `z_stack` is set but Z is absent or a single value.
    #[error("Z-stack requested without a Z sequence")]
    MissingZForStack,

    /// Settings could not be loaded or extracted.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Settings parsed but hold invalid values.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Reading settings or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for PosListError {
    fn from(err: figment::Error) -> Self {
        PosListError::Config(Box::new(err))
    }
}

/// Non-fatal conditions surfaced to the caller after a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Two options were requested together that cannot both apply; one was dropped.
    IncompatibleOptions(String),
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::IncompatibleOptions(msg) => write!(f, "Incompatible options: {}", msg),
        }
    }
}
