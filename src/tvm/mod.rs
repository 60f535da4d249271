//! Time-value-of-money solver over {pv, fv, pmt, nper, rate}

mod params;
mod rate;
mod solver;

pub use params::{PaymentTiming, SolveBreakdown, SolveFor, SolveResult, TvmParameters, TvmValues};
pub use rate::solve_rate;
pub use solver::{future_value, number_of_periods, payment, present_value, solve};
