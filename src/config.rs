//! Tunables for the iterative rate search
//!
//! Defaults can be overridden through environment variables:
//!   TVM_RATE_MAX_ITERATIONS, TVM_RATE_TOLERANCE, TVM_RATE_INITIAL_GUESS

use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Upper bound on payment counts and projection horizons (100 years of
/// daily periods). Larger counts are rejected before any schedule is built.
pub const MAX_PERIODS: u32 = 100 * 365;

/// Newton-Raphson / bisection settings for solving the per-period rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSolverConfig {
    /// Iteration budget for each of the Newton and bisection phases
    pub max_iterations: u32,

    /// Convergence tolerance on the rate step and on the balance residual
    pub tolerance: f64,

    /// Starting point for Newton-Raphson (per period)
    pub initial_guess: f64,

    /// Bisection bracket (per period)
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for RateSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-10,
            initial_guess: 0.05 / 12.0, // 5% annual, monthly
            lower_bound: -0.99,
            upper_bound: 10.0,
        }
    }
}

impl RateSolverConfig {
    /// Defaults overlaid with any `TVM_RATE_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_iterations: env_or("TVM_RATE_MAX_ITERATIONS", defaults.max_iterations),
            tolerance: env_or("TVM_RATE_TOLERANCE", defaults.tolerance),
            initial_guess: env_or("TVM_RATE_INITIAL_GUESS", defaults.initial_guess),
            ..defaults
        }
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RateSolverConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert!(config.lower_bound < 0.0 && config.upper_bound > 1.0);
    }

    #[test]
    fn test_env_override_and_fallback() {
        env::set_var("TVM_RATE_MAX_ITERATIONS", "25");
        env::set_var("TVM_RATE_TOLERANCE", "not-a-number");
        let config = RateSolverConfig::from_env();
        env::remove_var("TVM_RATE_MAX_ITERATIONS");
        env::remove_var("TVM_RATE_TOLERANCE");

        assert_eq!(config.max_iterations, 25);
        assert_eq!(config.tolerance, RateSolverConfig::default().tolerance);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RateSolverConfig = serde_json::from_str(r#"{"max_iterations":50}"#).unwrap();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.upper_bound, 10.0);
    }
}
