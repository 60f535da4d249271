//! Iterative solve for the per-period rate
//!
//! The rate has no closed form, so this runs Newton-Raphson on the TVM
//! balance equation and falls back to bisection when the derivative vanishes
//! or Newton fails to settle.

use log::{debug, warn};

use super::params::{PaymentTiming, SolveFor, SolveResult, TvmParameters, TvmValues};
use crate::config::RateSolverConfig;
use crate::error::{Result, TvmError};

/// Rates closer to zero than this use the zero-rate limits
const ZERO_RATE_EPS: f64 = 1e-12;

/// Largest residual Newton may accept, relative to the size of the balance terms
const RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Solve for the per-period rate that balances pv, pmt, nper and fv
pub fn solve_rate(params: &TvmParameters, config: &RateSolverConfig) -> Result<SolveResult> {
    let pv = params.require(SolveFor::Pv)?;
    let fv = params.require(SolveFor::Fv)?;
    let pmt = params.require(SolveFor::Pmt)?;
    let nper = params.require(SolveFor::Nper)?;
    let timing = params.timing;

    // Same-signed cash flows can never balance
    let flows = [pv, pmt, fv];
    let has_positive = flows.iter().any(|&cf| cf > 0.0);
    let has_negative = flows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return Err(TvmError::NoRealSolution(
            "cash flows need at least one inflow and one outflow".to_string(),
        ));
    }

    debug!("Searching rate for pv={} fv={} pmt={} nper={}", pv, fv, pmt, nper);

    let rate = newton(pv, fv, pmt, nper, timing, config).map_or_else(
        || bisection(pv, fv, pmt, nper, timing, config),
        Ok,
    )?;

    Ok(SolveResult::new(
        SolveFor::Rate,
        TvmValues { pv, fv, pmt, nper, rate },
    ))
}

/// Balance residual and its derivative with respect to the rate
fn residual_and_derivative(pv: f64, fv: f64, pmt: f64, n: f64, t: f64, rate: f64) -> (f64, f64) {
    if rate.abs() < ZERO_RATE_EPS {
        let residual = pv + pmt * n + fv;
        let derivative = pv * n + pmt * (n * (n - 1.0) / 2.0 + t * n);
        return (residual, derivative);
    }

    let g_m1 = (n * rate.ln_1p()).exp_m1();
    let g = 1.0 + g_m1;
    let dg = n * g / (1.0 + rate);
    let due = 1.0 + rate * t;

    let annuity = due * g_m1 / rate;
    let d_annuity = t * g_m1 / rate + due * (dg * rate - g_m1) / (rate * rate);

    (pv * g + pmt * annuity + fv, pv * dg + pmt * d_annuity)
}

fn residual(pv: f64, fv: f64, pmt: f64, n: f64, t: f64, rate: f64) -> f64 {
    residual_and_derivative(pv, fv, pmt, n, t, rate).0
}

/// Magnitude of the terms summed into the residual
fn residual_scale(pv: f64, fv: f64, pmt: f64, n: f64, t: f64, rate: f64) -> f64 {
    let (g, annuity) = if rate.abs() < ZERO_RATE_EPS {
        (1.0, n)
    } else {
        let g_m1 = (n * rate.ln_1p()).exp_m1();
        (1.0 + g_m1, (1.0 + rate * t) * g_m1 / rate)
    };
    (pv.abs() * g + pmt.abs() * annuity.abs() + fv.abs()).max(1.0)
}

fn newton(
    pv: f64,
    fv: f64,
    pmt: f64,
    nper: f64,
    timing: PaymentTiming,
    config: &RateSolverConfig,
) -> Option<f64> {
    let t = timing.factor();
    let mut rate = config.initial_guess;

    for _ in 0..config.max_iterations {
        let (f, df) = residual_and_derivative(pv, fv, pmt, nper, t, rate);

        if df.abs() < 1e-20 || !df.is_finite() {
            // Derivative too small, let bisection take over
            return None;
        }

        let next = rate - f / df;
        if !next.is_finite() || next < config.lower_bound || next > config.upper_bound {
            // Stepped out of the search bracket, let bisection decide
            debug!("Newton step to {} left the bracket", next);
            return None;
        }

        if (next - rate).abs() < config.tolerance {
            let settled = residual(pv, fv, pmt, nper, t, next).abs();
            if settled <= RESIDUAL_TOLERANCE * residual_scale(pv, fv, pmt, nper, t, next) {
                return Some(next);
            }
            debug!("Newton stalled at {} with residual {}", next, settled);
            return None;
        }
        rate = next;
    }

    None
}

fn bisection(
    pv: f64,
    fv: f64,
    pmt: f64,
    nper: f64,
    timing: PaymentTiming,
    config: &RateSolverConfig,
) -> Result<f64> {
    let t = timing.factor();
    let mut low = config.lower_bound;
    let mut high = config.upper_bound;
    let mut f_low = residual(pv, fv, pmt, nper, t, low);
    let f_high = residual(pv, fv, pmt, nper, t, high);

    if f_low * f_high > 0.0 {
        return Err(TvmError::NoRealSolution(format!(
            "no rate between {} and {} per period balances the cash flows",
            low, high
        )));
    }

    for _ in 0..config.max_iterations {
        let mid = (low + high) / 2.0;
        let f_mid = residual(pv, fv, pmt, nper, t, mid);

        if f_mid.abs() < config.tolerance || (high - low) / 2.0 < config.tolerance {
            return Ok(mid);
        }

        if f_mid * f_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }

    warn!("Rate bisection exhausted {} iterations", config.max_iterations);
    Err(TvmError::NoConvergence {
        iterations: config.max_iterations,
    })
}
