//! Error types for spherical calculations.
//!
//! Core routines fail only on numeric input outside the domain of the
//! operation: non-finite values, out-of-range latitudes, non-positive radii.
//! [`MathErrorKind`] tells which.
//!
//! ```
//! use celestial_core::{AstroError, MathErrorKind};
//!
//! fn checked_radius(r: f64) -> Result<f64, AstroError> {
//!     if r <= 0.0 {
//!         return Err(AstroError::math_error(
//!             "checked_radius",
//!             MathErrorKind::OutOfRange,
//!             "radius must be positive",
//!         ));
//!     }
//!     Ok(r)
//! }
//! assert!(checked_radius(-1.0).is_err());
//! ```

use thiserror::Error;

/// Classification of mathematical errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathErrorKind {
    /// Input value is invalid for the operation.
    InvalidInput,
    /// Result or input is NaN or infinity.
    NotFinite,
    /// Value outside valid domain (e.g., latitude > 90°).
    OutOfRange,
}

/// Unified error type for core spherical calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    /// Numerical input outside the domain of the operation.
    #[error("Math error in {operation} ({kind:?}): {message}")]
    MathError {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },
}

/// Convenience alias for `Result<T, AstroError>`.
pub type AstroResult<T> = Result<T, AstroError>;

impl AstroError {
    /// Creates a [`MathError`](Self::MathError) with the given kind.
    pub fn math_error(operation: &str, kind: MathErrorKind, reason: &str) -> Self {
        Self::MathError {
            operation: operation.to_string(),
            kind,
            message: reason.to_string(),
        }
    }

    pub fn kind(&self) -> MathErrorKind {
        match self {
            Self::MathError { kind, .. } => *kind,
        }
    }
}
