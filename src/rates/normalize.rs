//! Conversion of nominal annual rates into per-period rates
//!
//! Conversions between two compounding conventions always route through the
//! effective annual rate (EAR). Continuous compounding uses `exp`/`ln` at the
//! boundary.

use log::debug;
use serde::{Deserialize, Serialize};

use super::frequency::CompoundingFrequency;
use crate::error::{Result, TvmError};

/// Nominal annual rate paired with its compounding convention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSpec {
    /// Nominal annual rate in percent (5.0 for 5%)
    pub nominal_rate_percent: f64,

    /// Compounding convention
    #[serde(default)]
    pub frequency: CompoundingFrequency,
}

impl RateSpec {
    /// Create a validated rate spec
    pub fn new(nominal_rate_percent: f64, frequency: CompoundingFrequency) -> Result<Self> {
        validate_nominal(nominal_rate_percent)?;
        Ok(Self {
            nominal_rate_percent,
            frequency,
        })
    }

    /// Shorthand for a monthly-compounded rate
    pub fn monthly(nominal_rate_percent: f64) -> Result<Self> {
        Self::new(nominal_rate_percent, CompoundingFrequency::Monthly)
    }

    /// Rate per compounding period
    pub fn period_rate(&self) -> Result<f64> {
        normalize(self.nominal_rate_percent, self.frequency)
    }

    /// Effective annual rate as a decimal
    pub fn effective_annual_rate(&self) -> Result<f64> {
        effective_annual_rate(self.nominal_rate_percent, self.frequency)
    }

    /// Rate per period for a cadence of `periods_per_year` that accrues the
    /// same effective annual rate as this spec
    pub fn equivalent_period_rate(&self, periods_per_year: u32) -> Result<f64> {
        if periods_per_year == 0 {
            return Err(TvmError::InvalidRate(
                "frequency must be at least one period per year".to_string(),
            ));
        }
        if self.frequency.periods_per_year() == Some(periods_per_year) {
            return self.period_rate();
        }
        let ear = self.effective_annual_rate()?;
        Ok((ear.ln_1p() / periods_per_year as f64).exp_m1())
    }

    /// Number of compounding periods in a horizon of whole years
    ///
    /// Continuous compounding counts one period per year.
    pub fn periods_for_years(&self, years: u32) -> Result<u32> {
        years
            .checked_mul(self.frequency.periods_per_year().unwrap_or(1))
            .ok_or_else(|| {
                TvmError::InvalidParameter(format!(
                    "{} years of {} periods overflows the period count",
                    years, self.frequency
                ))
            })
    }
}

/// Result of converting a nominal rate between compounding conventions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConversion {
    pub from: CompoundingFrequency,
    pub to: CompoundingFrequency,
    /// Shared effective annual rate, in percent
    pub effective_annual_rate_percent: f64,
    /// Nominal annual rate under the target convention, in percent
    pub nominal_rate_percent: f64,
    /// Rate per target compounding period (decimal)
    pub period_rate: f64,
}

fn validate_nominal(nominal_rate_percent: f64) -> Result<()> {
    if !nominal_rate_percent.is_finite() {
        return Err(TvmError::InvalidRate(format!(
            "nominal rate must be finite, got {}",
            nominal_rate_percent
        )));
    }
    if nominal_rate_percent < 0.0 {
        return Err(TvmError::InvalidRate(format!(
            "nominal rate must not be negative, got {}%",
            nominal_rate_percent
        )));
    }
    Ok(())
}

/// Per-period rate for a nominal annual percentage under `frequency`
///
/// Discrete: `(nominal / 100) / frequency`. Continuous compounding has no
/// sub-annual period of its own, so it reports one period per year whose
/// rate is the EAR `exp(nominal / 100) - 1`.
pub fn normalize(nominal_rate_percent: f64, frequency: CompoundingFrequency) -> Result<f64> {
    validate_nominal(nominal_rate_percent)?;
    let nominal = nominal_rate_percent / 100.0;
    match frequency.periods_per_year() {
        Some(n) => Ok(nominal / n as f64),
        None => Ok(nominal.exp_m1()),
    }
}

/// Effective annual rate (decimal) of a nominal annual percentage
pub fn effective_annual_rate(nominal_rate_percent: f64, frequency: CompoundingFrequency) -> Result<f64> {
    validate_nominal(nominal_rate_percent)?;
    let nominal = nominal_rate_percent / 100.0;
    match frequency.periods_per_year() {
        Some(n) => Ok((n as f64 * (nominal / n as f64).ln_1p()).exp_m1()),
        None => Ok(nominal.exp_m1()),
    }
}

/// Per-period rate under `frequency` that yields the effective annual rate `ear`
///
/// For continuous compounding this is the continuous nominal rate `ln(1 + ear)`.
pub fn period_rate_from_effective(ear: f64, frequency: CompoundingFrequency) -> Result<f64> {
    if !ear.is_finite() || ear <= -1.0 {
        return Err(TvmError::InvalidRate(format!(
            "effective annual rate must be finite and above -100%, got {}",
            ear
        )));
    }
    match frequency.periods_per_year() {
        Some(n) => Ok((ear.ln_1p() / n as f64).exp_m1()),
        None => Ok(ear.ln_1p()),
    }
}

/// Convert a nominal annual rate from one compounding convention to another
pub fn convert_nominal(
    nominal_rate_percent: f64,
    from: CompoundingFrequency,
    to: CompoundingFrequency,
) -> Result<RateConversion> {
    debug!("Converting {}% from {} to {} compounding", nominal_rate_percent, from, to);

    let ear = effective_annual_rate(nominal_rate_percent, from)?;
    let period_rate = period_rate_from_effective(ear, to)?;
    let nominal = match to.periods_per_year() {
        Some(n) => period_rate * n as f64,
        // ln(1 + EAR) is already the annual continuous rate
        None => period_rate,
    };

    Ok(RateConversion {
        from,
        to,
        effective_annual_rate_percent: ear * 100.0,
        nominal_rate_percent: nominal * 100.0,
        period_rate,
    })
}
