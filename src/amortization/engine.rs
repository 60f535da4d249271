//! Fixed-payment loan amortization

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::schedule::{Amortization, AmortizationRow};
use crate::config::MAX_PERIODS;
use crate::error::{Result, TvmError};
use crate::rates::RateSpec;

/// Final-row drift above this is logged before being absorbed
const DRIFT_WARN_THRESHOLD: f64 = 1e-6;

/// Validated loan inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoanInput")]
pub struct LoanTerms {
    principal: f64,
    period_rate: f64,
    number_of_payments: u32,
}

/// Loan fields as submitted, before validation
///
/// Request envelopes carry this so a degenerate loan is reported as an
/// engine failure rather than a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: f64,
    pub period_rate: f64,
    pub number_of_payments: u32,
}

impl TryFrom<LoanInput> for LoanTerms {
    type Error = TvmError;

    fn try_from(input: LoanInput) -> Result<Self> {
        LoanTerms::new(input.principal, input.period_rate, input.number_of_payments)
    }
}

impl LoanTerms {
    /// Create loan terms
    ///
    /// `period_rate` is a decimal rate per payment period.
    pub fn new(principal: f64, period_rate: f64, number_of_payments: u32) -> Result<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(TvmError::DegenerateLoan(format!(
                "principal must be positive, got {:.2}",
                principal
            )));
        }
        if number_of_payments == 0 {
            return Err(TvmError::DegenerateLoan(
                "number of payments must be at least 1".to_string(),
            ));
        }
        if number_of_payments > MAX_PERIODS {
            return Err(TvmError::InvalidParameter(format!(
                "{} payments exceeds the limit of {}",
                number_of_payments, MAX_PERIODS
            )));
        }
        if !period_rate.is_finite() || period_rate < 0.0 {
            return Err(TvmError::InvalidRate(format!(
                "period rate must be finite and non-negative, got {}",
                period_rate
            )));
        }

        Ok(Self {
            principal,
            period_rate,
            number_of_payments,
        })
    }

    /// Loan terms for a purchase financed after a down payment and trade-in
    ///
    /// The term is in years; the payment cadence follows the rate's
    /// compounding frequency.
    pub fn from_purchase(
        price: f64,
        down_payment: f64,
        trade_in: f64,
        rate: RateSpec,
        term_years: u32,
    ) -> Result<Self> {
        let financed = price - down_payment - trade_in;
        if financed <= 0.0 {
            warn!(
                "Purchase of {:.2} fully offset by down payment {:.2} and trade-in {:.2}",
                price, down_payment, trade_in
            );
            return Err(TvmError::DegenerateLoan(format!(
                "down payment and trade-in cover the full price; financed amount is {:.2}",
                financed
            )));
        }

        Self::new(financed, rate.period_rate()?, rate.periods_for_years(term_years)?)
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn period_rate(&self) -> f64 {
        self.period_rate
    }

    pub fn number_of_payments(&self) -> u32 {
        self.number_of_payments
    }
}

/// Fixed periodic payment that retires the loan in exactly `n` payments
pub fn payment_for(loan: &LoanTerms) -> Result<f64> {
    let principal = loan.principal;
    let r = loan.period_rate;
    let n = loan.number_of_payments;

    if principal <= 0.0 || n == 0 {
        return Err(TvmError::DegenerateLoan(format!(
            "principal {:.2} over {} payments",
            principal, n
        )));
    }

    let payment = if r == 0.0 {
        principal / n as f64
    } else {
        // (1+r)^n - 1 through exp_m1 keeps precision for tiny rates
        let growth_m1 = (n as f64 * r.ln_1p()).exp_m1();
        principal * r * (1.0 + growth_m1) / growth_m1
    };

    if !payment.is_finite() || payment <= 0.0 {
        warn!("Rejected loan: principal={} rate={} n={} payment={}", principal, r, n, payment);
        return Err(TvmError::DegenerateLoan(format!(
            "computed payment {} is not a positive finite amount",
            payment
        )));
    }

    Ok(payment)
}

/// Compute the fixed payment and the full period-by-period schedule
pub fn amortize(loan: &LoanTerms) -> Result<Amortization> {
    let payment = payment_for(loan)?;
    let r = loan.period_rate;
    let n = loan.number_of_payments;

    debug!(
        "Amortizing principal={:.2} rate={} n={} payment={:.6}",
        loan.principal, r, n, payment
    );

    let mut result = Amortization::with_capacity(payment, n as usize);
    let mut balance = loan.principal;

    for period in 1..=n {
        let interest = balance * r;

        let row = if period == n {
            // Last payment retires whatever rounding left behind
            let drift = balance - (payment - interest);
            if drift.abs() > DRIFT_WARN_THRESHOLD {
                warn!("Absorbing final-period drift of {:e}", drift);
            }
            AmortizationRow {
                period,
                payment: interest + balance,
                interest,
                principal: balance,
                ending_balance: 0.0,
            }
        } else {
            let principal = payment - interest;
            balance -= principal;
            AmortizationRow {
                period,
                payment,
                interest,
                principal,
                ending_balance: balance.max(0.0),
            }
        };

        trace!("Period {}: interest={:.6} balance={:.6}", period, row.interest, row.ending_balance);
        result.add_row(row);
    }

    Ok(result)
}
