//! Closed-form TVM solver
//!
//! Standard annuity identities with `g = (1 + r)^n` and the timing factor
//! `t` (0 ordinary annuity, 1 annuity due):
//!
//! ```text
//! fv  = -(pv*g + pmt*(1 + r*t)*(g - 1)/r)
//! pmt = -(fv + pv*g) * r / ((1 + r*t)*(g - 1))
//! pv  = -(pmt*(1 + r*t)*(g - 1)/r + fv) / g
//! n   = ln((pmt*(1 + r*t) - fv*r) / (pmt*(1 + r*t) + pv*r)) / ln(1 + r)
//! ```
//!
//! With `r = 0` the growth terms collapse to simple sums.

use log::{debug, warn};

use super::params::{PaymentTiming, SolveFor, SolveResult, TvmParameters, TvmValues};
use crate::error::{Result, TvmError};

/// Solve for the variable tagged by `params.solve_for`
///
/// Rate has no closed form and reports `NotSupported`; see
/// [`solve_rate`](super::solve_rate) for the iterative search.
pub fn solve(params: &TvmParameters) -> Result<SolveResult> {
    debug!("Solving for {} with {:?}", params.solve_for, params);

    let values = match params.solve_for {
        SolveFor::Fv => {
            let (pv, pmt, nper, rate) = (
                params.require(SolveFor::Pv)?,
                params.require(SolveFor::Pmt)?,
                params.require(SolveFor::Nper)?,
                params.require(SolveFor::Rate)?,
            );
            let fv = future_value(pv, pmt, nper, rate, params.timing);
            TvmValues { pv, fv, pmt, nper, rate }
        }
        SolveFor::Pmt => {
            let (pv, fv, nper, rate) = (
                params.require(SolveFor::Pv)?,
                params.require(SolveFor::Fv)?,
                params.require(SolveFor::Nper)?,
                params.require(SolveFor::Rate)?,
            );
            let pmt = payment(pv, fv, nper, rate, params.timing);
            TvmValues { pv, fv, pmt, nper, rate }
        }
        SolveFor::Pv => {
            let (fv, pmt, nper, rate) = (
                params.require(SolveFor::Fv)?,
                params.require(SolveFor::Pmt)?,
                params.require(SolveFor::Nper)?,
                params.require(SolveFor::Rate)?,
            );
            let pv = present_value(fv, pmt, nper, rate, params.timing);
            TvmValues { pv, fv, pmt, nper, rate }
        }
        SolveFor::Nper => {
            let (pv, fv, pmt, rate) = (
                params.require(SolveFor::Pv)?,
                params.require(SolveFor::Fv)?,
                params.require(SolveFor::Pmt)?,
                params.require(SolveFor::Rate)?,
            );
            let nper = number_of_periods(pv, fv, pmt, rate, params.timing)?;
            TvmValues { pv, fv, pmt, nper, rate }
        }
        SolveFor::Rate => return Err(TvmError::NotSupported(SolveFor::Rate)),
    };

    let result = SolveResult::new(params.solve_for, values);
    if !result.value.is_finite() {
        warn!("Non-finite {} from {:?}", params.solve_for, params);
        return Err(TvmError::InvalidParameter(format!(
            "inputs produce a non-finite {}",
            params.solve_for
        )));
    }
    Ok(result)
}

/// `(1 + r)^n` and `(1 + r)^n - 1`, the latter without cancellation for tiny `r`
fn growth(rate: f64, nper: f64) -> (f64, f64) {
    let growth_m1 = (nper * rate.ln_1p()).exp_m1();
    (1.0 + growth_m1, growth_m1)
}

/// Future value of `pv` plus `nper` payments of `pmt`
pub fn future_value(pv: f64, pmt: f64, nper: f64, rate: f64, timing: PaymentTiming) -> f64 {
    if rate == 0.0 {
        return -(pv + pmt * nper);
    }
    let (g, g_m1) = growth(rate, nper);
    let due = 1.0 + rate * timing.factor();
    -(pv * g + pmt * due * g_m1 / rate)
}

/// Level payment that moves `pv` to `fv` over `nper` periods
pub fn payment(pv: f64, fv: f64, nper: f64, rate: f64, timing: PaymentTiming) -> f64 {
    if rate == 0.0 {
        return -(pv + fv) / nper;
    }
    let (g, g_m1) = growth(rate, nper);
    let due = 1.0 + rate * timing.factor();
    -(fv + pv * g) * rate / (due * g_m1)
}

/// Present value of `fv` plus `nper` payments of `pmt`
pub fn present_value(fv: f64, pmt: f64, nper: f64, rate: f64, timing: PaymentTiming) -> f64 {
    if rate == 0.0 {
        return -(fv + pmt * nper);
    }
    let (g, g_m1) = growth(rate, nper);
    let due = 1.0 + rate * timing.factor();
    -((pmt * due * g_m1 / rate + fv) / g)
}

/// Number of periods needed to move `pv` to `fv` with payments of `pmt`
///
/// Fails with `NoRealSolution` when the cash flows can never reach `fv`.
pub fn number_of_periods(pv: f64, fv: f64, pmt: f64, rate: f64, timing: PaymentTiming) -> Result<f64> {
    let nper = if rate == 0.0 {
        if pmt == 0.0 {
            return Err(TvmError::NoRealSolution(
                "with zero rate and zero payment the balance never changes".to_string(),
            ));
        }
        -(pv + fv) / pmt
    } else {
        let adjusted_pmt = pmt * (1.0 + rate * timing.factor());
        let denominator = adjusted_pmt + pv * rate;
        // numerator / denominator - 1, kept small so ln_1p stays exact
        let ratio_m1 = -(fv + pv) * rate / denominator;

        if denominator == 0.0 || !ratio_m1.is_finite() || ratio_m1 <= -1.0 {
            return Err(TvmError::NoRealSolution(format!(
                "log argument {} is not positive; these values are not achievable",
                1.0 + ratio_m1
            )));
        }
        ratio_m1.ln_1p() / rate.ln_1p()
    };

    if !nper.is_finite() || nper <= 0.0 {
        return Err(TvmError::NoRealSolution(format!(
            "no positive period count reaches the target (got {})",
            nper
        )));
    }
    Ok(nper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    #[test]
    fn test_future_value_of_lump_sum() {
        let params = TvmParameters::solving(SolveFor::Fv)
            .pv(-1000.0)
            .pmt(0.0)
            .nper(120.0)
            .rate(0.07 / 12.0);
        let result = solve(&params).unwrap();

        assert_eq!(result.solve_for, SolveFor::Fv);
        assert_abs_diff_eq!(result.value, 2009.66, epsilon = 0.01);
        assert_abs_diff_eq!(result.breakdown.total_interest, 1009.66, epsilon = 0.01);
    }

    #[test]
    fn test_payment_for_savings_target() {
        let params = TvmParameters::solving(SolveFor::Pmt)
            .pv(0.0)
            .fv(25_000.0)
            .nper(60.0)
            .rate(0.05 / 12.0);
        let result = solve(&params).unwrap();

        assert!(result.value < 0.0);
        assert_abs_diff_eq!(result.magnitude(), 367.61, epsilon = 0.01);
        assert_abs_diff_eq!(result.breakdown.total_contributions, 22_056.85, epsilon = 0.5);
    }

    #[test]
    fn test_loan_payment_matches_amortization() {
        let result = solve(
            &TvmParameters::solving(SolveFor::Pmt)
                .pv(10_000.0)
                .fv(0.0)
                .nper(60.0)
                .rate(0.05 / 12.0),
        )
        .unwrap();
        assert_abs_diff_eq!(result.value, -188.71, epsilon = 0.005);
    }

    #[test]
    fn test_present_value_of_annuity() {
        // $100/month for 12 months at 6% annual
        let result = solve(
            &TvmParameters::solving(SolveFor::Pv)
                .fv(0.0)
                .pmt(-100.0)
                .nper(12.0)
                .rate(0.005),
        )
        .unwrap();
        assert_abs_diff_eq!(result.value, 1161.89, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_identities() {
        let fv = future_value(-1000.0, -100.0, 10.0, 0.0, PaymentTiming::End);
        assert_relative_eq!(fv, 2000.0);
        let pmt = payment(-1000.0, 2000.0, 10.0, 0.0, PaymentTiming::End);
        assert_relative_eq!(pmt, -100.0);
        let pv = present_value(2000.0, -100.0, 10.0, 0.0, PaymentTiming::End);
        assert_relative_eq!(pv, -1000.0);
        let n = number_of_periods(-1000.0, 2000.0, -100.0, 0.0, PaymentTiming::End).unwrap();
        assert_relative_eq!(n, 10.0);
    }

    #[test]
    fn test_tiny_rates_approach_zero_rate_limit() {
        for rate in [1e-17, 1e-15] {
            let fv = future_value(0.0, -100.0, 12.0, rate, PaymentTiming::End);
            assert_relative_eq!(fv, 1200.0, max_relative = 1e-9);
            let pv = present_value(0.0, -100.0, 12.0, rate, PaymentTiming::End);
            assert_relative_eq!(pv, 1200.0, max_relative = 1e-9);
            let pmt = payment(0.0, 1200.0, 12.0, rate, PaymentTiming::End);
            assert_relative_eq!(pmt, -100.0, max_relative = 1e-9);
            let n = number_of_periods(0.0, 1200.0, -100.0, rate, PaymentTiming::End).unwrap();
            assert_relative_eq!(n, 12.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_nper_for_loan_payoff() {
        let n = number_of_periods(10_000.0, 0.0, -188.712336, 0.05 / 12.0, PaymentTiming::End).unwrap();
        assert_abs_diff_eq!(n, 60.0, epsilon = 1e-4);
    }

    #[test]
    fn test_nper_without_real_solution() {
        let params = TvmParameters::solving(SolveFor::Nper)
            .pv(1000.0)
            .fv(1000.0)
            .pmt(0.0)
            .rate(0.05);
        let err = solve(&params).unwrap_err();
        assert!(matches!(err, TvmError::NoRealSolution(_)));
    }

    #[test]
    fn test_nper_payment_too_small_for_loan() {
        // Payment below the interest charge never retires the loan
        let err = number_of_periods(10_000.0, 0.0, -10.0, 0.01, PaymentTiming::End).unwrap_err();
        assert!(matches!(err, TvmError::NoRealSolution(_)));
    }

    #[test]
    fn test_nper_zero_rate_zero_payment() {
        let err = number_of_periods(-100.0, 200.0, 0.0, 0.0, PaymentTiming::End).unwrap_err();
        assert!(matches!(err, TvmError::NoRealSolution(_)));
    }

    #[test]
    fn test_rate_not_supported_in_closed_form() {
        let params = TvmParameters::solving(SolveFor::Rate)
            .pv(-1000.0)
            .fv(2000.0)
            .pmt(0.0)
            .nper(10.0);
        assert_eq!(solve(&params).unwrap_err(), TvmError::NotSupported(SolveFor::Rate));
    }

    #[test]
    fn test_missing_parameter() {
        let params = TvmParameters::solving(SolveFor::Fv).pv(-1000.0).nper(10.0).rate(0.01);
        assert_eq!(solve(&params).unwrap_err(), TvmError::MissingParameter(SolveFor::Pmt));
    }

    #[test]
    fn test_annuity_due_grows_more() {
        let ordinary = future_value(0.0, -100.0, 12.0, 0.01, PaymentTiming::End);
        let due = future_value(0.0, -100.0, 12.0, 0.01, PaymentTiming::Beginning);
        assert_relative_eq!(due, ordinary * 1.01, max_relative = 1e-12);

        let pmt = payment(0.0, due, 12.0, 0.01, PaymentTiming::Beginning);
        assert_relative_eq!(pmt, -100.0, max_relative = 1e-12);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_pmt_fv_round_trip(
            pv in -1_000_000.0f64..1_000_000.0,
            pmt_magnitude in 1.0f64..10_000.0,
            pmt_negative in proptest::bool::ANY,
            nper in 1u32..=480,
            rate in 0.0f64..=0.05,
            zero_rate in proptest::bool::ANY
        ) {
            let rate = if zero_rate { 0.0 } else { rate };
            let pmt = if pmt_negative { -pmt_magnitude } else { pmt_magnitude };
            let nper = nper as f64;

            let fv = solve(
                &TvmParameters::solving(SolveFor::Fv).pv(pv).pmt(pmt).nper(nper).rate(rate),
            )
            .unwrap()
            .value;
            prop_assume!(fv.is_finite());

            let back = solve(
                &TvmParameters::solving(SolveFor::Pmt).pv(pv).fv(fv).nper(nper).rate(rate),
            )
            .unwrap()
            .value;

            prop_assert!(((back - pmt) / pmt).abs() <= 1e-6, "pmt {} came back as {}", pmt, back);
        }
    }
}
