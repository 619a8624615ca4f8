//! Error types for implied volatility estimation.

use super::types::SolveMethod;
use std::fmt;

/// Why an iterative solver phase gave up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailureReason {
    /// Iteration cap reached before the tolerance was met.
    MaxIterations,
    /// Vega fell below the configured floor, so a Newton step was not taken.
    DegenerateVega {
        /// Vega at the last iterate.
        vega: f64,
    },
    /// The iterate or its residual stopped being a finite number.
    NonFinite,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MaxIterations => write!(f, "iteration limit reached"),
            FailureReason::DegenerateVega { vega } => {
                write!(f, "vega {vega:.3e} too small for a Newton step")
            }
            FailureReason::NonFinite => write!(f, "non-finite iterate"),
        }
    }
}

/// Errors raised while estimating implied volatility.
#[derive(Debug, Clone, PartialEq)]
pub enum VolatilityError {
    /// Contract cannot be priced (non-positive spot, strike, expiry or price).
    InvalidContract {
        /// Description of the invalid field.
        message: String,
    },

    /// The residual has no sign change on the search bracket, or its only
    /// root there is not a positive volatility.
    BracketingFailure {
        /// Lower end of the bracket.
        lower: f64,
        /// Upper end of the bracket.
        upper: f64,
        /// Residual at the lower end.
        residual_lower: f64,
        /// Residual at the upper end.
        residual_upper: f64,
    },

    /// An iterative phase did not converge.
    SolverFailure {
        /// Phase that failed.
        method: SolveMethod,
        /// Iterations attempted.
        iterations: u32,
        /// Last volatility estimate before giving up.
        last_sigma: f64,
        /// Cause of the failure.
        reason: FailureReason,
    },
}

impl fmt::Display for VolatilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityError::InvalidContract { message } => {
                write!(f, "invalid contract: {message}")
            }
            VolatilityError::BracketingFailure {
                lower,
                upper,
                residual_lower,
                residual_upper,
            } => {
                write!(
                    f,
                    "no sign change on [{lower:.2}, {upper:.2}]: residuals {residual_lower:.6} and {residual_upper:.6}"
                )
            }
            VolatilityError::SolverFailure {
                method,
                iterations,
                last_sigma,
                reason,
            } => {
                write!(
                    f,
                    "{method:?} solver failed after {iterations} iterations ({reason}), last sigma: {last_sigma:.6}"
                )
            }
        }
    }
}

impl std::error::Error for VolatilityError {}
