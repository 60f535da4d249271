//! Error types for engine operations
//!
//! Every failure is a recoverable business-rule signal. Callers surface the
//! message next to the form input that produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_PERIODS;
use crate::tvm::SolveFor;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, TvmError>;

/// Failures raised by the rate, loan, growth, TVM and goal computations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TvmError {
    /// Negative or non-finite rate, or a non-positive compounding frequency
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// Loan inputs that cannot produce a positive, finite payment
    #[error("degenerate loan: {0}")]
    DegenerateLoan(String),

    /// Projection horizon of zero periods or beyond [`MAX_PERIODS`]
    #[error("invalid horizon: {0} periods (must be between 1 and {max})", max = MAX_PERIODS)]
    InvalidHorizon(u32),

    /// No period count exists for the given cash flows
    #[error("no real solution: {0}")]
    NoRealSolution(String),

    /// The requested unknown has no closed-form solution
    #[error("solving for {0} is not supported in closed form")]
    NotSupported(SolveFor),

    /// Savings goal with a non-positive target or horizon
    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    /// A known TVM variable was not supplied
    #[error("missing parameter: {0}")]
    MissingParameter(SolveFor),

    /// A supplied TVM variable is out of range or non-finite
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Iterative rate search exhausted its budget
    #[error("rate search did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },
}

/// Stable, serializable classification of a [`TvmError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRate,
    DegenerateLoan,
    InvalidHorizon,
    NoRealSolution,
    NotSupported,
    InvalidGoal,
    MissingParameter,
    InvalidParameter,
    NoConvergence,
}

impl TvmError {
    /// Classification used by response envelopes
    pub fn kind(&self) -> ErrorKind {
        match self {
            TvmError::InvalidRate(_) => ErrorKind::InvalidRate,
            TvmError::DegenerateLoan(_) => ErrorKind::DegenerateLoan,
            TvmError::InvalidHorizon(_) => ErrorKind::InvalidHorizon,
            TvmError::NoRealSolution(_) => ErrorKind::NoRealSolution,
            TvmError::NotSupported(_) => ErrorKind::NotSupported,
            TvmError::InvalidGoal(_) => ErrorKind::InvalidGoal,
            TvmError::MissingParameter(_) => ErrorKind::MissingParameter,
            TvmError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            TvmError::NoConvergence { .. } => ErrorKind::NoConvergence,
        }
    }
}
