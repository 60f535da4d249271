//! The five time-value-of-money variables and solve results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TvmError};

/// Which TVM variable is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveFor {
    Pv,
    Fv,
    Pmt,
    Nper,
    Rate,
}

impl fmt::Display for SolveFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveFor::Pv => "pv",
            SolveFor::Fv => "fv",
            SolveFor::Pmt => "pmt",
            SolveFor::Nper => "nper",
            SolveFor::Rate => "rate",
        };
        f.write_str(name)
    }
}

/// Whether payments fall at the end (ordinary annuity) or start (annuity due)
/// of each period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    #[default]
    End,
    Beginning,
}

impl PaymentTiming {
    /// 0 for end-of-period, 1 for beginning-of-period
    pub(crate) fn factor(self) -> f64 {
        match self {
            PaymentTiming::End => 0.0,
            PaymentTiming::Beginning => 1.0,
        }
    }
}

/// Inputs to the TVM solver
///
/// Cash outflows are negative. `rate` is per period as a decimal. The value
/// named by `solve_for` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TvmParameters {
    pub solve_for: SolveFor,
    #[serde(default)]
    pub pv: Option<f64>,
    #[serde(default)]
    pub fv: Option<f64>,
    #[serde(default)]
    pub pmt: Option<f64>,
    #[serde(default)]
    pub nper: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub timing: PaymentTiming,
}

impl TvmParameters {
    /// Start a parameter set that solves for `solve_for`
    pub fn solving(solve_for: SolveFor) -> Self {
        Self {
            solve_for,
            pv: None,
            fv: None,
            pmt: None,
            nper: None,
            rate: None,
            timing: PaymentTiming::End,
        }
    }

    pub fn pv(mut self, pv: f64) -> Self {
        self.pv = Some(pv);
        self
    }

    pub fn fv(mut self, fv: f64) -> Self {
        self.fv = Some(fv);
        self
    }

    pub fn pmt(mut self, pmt: f64) -> Self {
        self.pmt = Some(pmt);
        self
    }

    pub fn nper(mut self, nper: f64) -> Self {
        self.nper = Some(nper);
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn timing(mut self, timing: PaymentTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Fetch a known variable, rejecting absent or non-finite values
    pub(crate) fn require(&self, which: SolveFor) -> Result<f64> {
        let value = match which {
            SolveFor::Pv => self.pv,
            SolveFor::Fv => self.fv,
            SolveFor::Pmt => self.pmt,
            SolveFor::Nper => self.nper,
            SolveFor::Rate => self.rate,
        }
        .ok_or(TvmError::MissingParameter(which))?;

        if !value.is_finite() {
            return Err(TvmError::InvalidParameter(format!("{} must be finite, got {}", which, value)));
        }
        match which {
            SolveFor::Nper if value <= 0.0 => Err(TvmError::InvalidParameter(format!(
                "nper must be positive, got {}",
                value
            ))),
            SolveFor::Rate if value <= -1.0 => Err(TvmError::InvalidParameter(format!(
                "rate must be above -100% per period, got {}",
                value
            ))),
            _ => Ok(value),
        }
    }
}

/// All five variables once the unknown has been solved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TvmValues {
    pub pv: f64,
    pub fv: f64,
    pub pmt: f64,
    pub nper: f64,
    pub rate: f64,
}

/// Display totals derived from a solved parameter set
///
/// Amounts are from the account holder's side: money put in is positive, so
/// a loan shows a negative starting balance and negative interest (interest
/// paid).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveBreakdown {
    pub starting_balance: f64,
    pub ending_balance: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
}

impl SolveBreakdown {
    pub fn from_values(values: &TvmValues) -> Self {
        let starting_balance = -values.pv;
        let total_contributions = -values.pmt * values.nper;
        let ending_balance = values.fv;

        Self {
            starting_balance,
            ending_balance,
            total_contributions,
            total_interest: ending_balance - starting_balance - total_contributions,
        }
    }
}

/// Solved scalar tagged by the variable it answers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub solve_for: SolveFor,
    pub value: f64,
    pub values: TvmValues,
    pub breakdown: SolveBreakdown,
}

impl SolveResult {
    pub(crate) fn new(solve_for: SolveFor, values: TvmValues) -> Self {
        let value = match solve_for {
            SolveFor::Pv => values.pv,
            SolveFor::Fv => values.fv,
            SolveFor::Pmt => values.pmt,
            SolveFor::Nper => values.nper,
            SolveFor::Rate => values.rate,
        };

        Self {
            solve_for,
            value,
            values,
            breakdown: SolveBreakdown::from_values(&values),
        }
    }

    /// Unsigned answer for display
    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }
}
