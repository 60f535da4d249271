//! TVM Engine - Time-value-of-money computations for financial calculators
//!
//! This library provides:
//! - Rate normalization across compounding conventions (via the effective annual rate)
//! - Fixed-payment loan amortization schedules
//! - Growth projection with escalating contributions and interest tax
//! - Closed-form TVM solving for pv, fv, pmt and nper (iterative for rate)
//! - Savings goal contribution solving
//! - A JSON request layer with parallel batch evaluation

pub mod error;
pub mod config;
pub mod rates;
pub mod amortization;
pub mod growth;
pub mod tvm;
pub mod goal;
pub mod request;

// Re-export commonly used types
pub use error::{ErrorKind, Result, TvmError};
pub use config::{RateSolverConfig, MAX_PERIODS};
pub use rates::{CompoundingFrequency, RateSpec, normalize};
pub use amortization::{amortize, Amortization, AmortizationRow, LoanInput, LoanTerms};
pub use growth::{project, ContributionSchedule, GrowthPlan, GrowthProjection};
pub use tvm::{solve, solve_rate, SolveFor, SolveResult, TvmParameters};
pub use goal::{required_contribution, SavingsGoal};
pub use request::{EngineRequest, EngineResponse, Evaluator};
