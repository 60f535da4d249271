//! Inputs and outputs of a growth projection

use serde::{Deserialize, Serialize};

use crate::rates::RateSpec;

/// When a contribution posts relative to that period's interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTiming {
    /// Deposit, then accrue
    #[default]
    BeginningOfPeriod,
    /// Accrue, then deposit
    EndOfPeriod,
}

/// Recurring contribution stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    /// Contribution per period in the first year
    pub amount: f64,

    /// Annual increase in percent, applied once per full year elapsed
    #[serde(default)]
    pub escalation_rate_percent: f64,

    #[serde(default)]
    pub timing: ContributionTiming,
}

impl ContributionSchedule {
    /// Level contributions posted at the start of each period
    pub fn level(amount: f64) -> Self {
        Self {
            amount,
            escalation_rate_percent: 0.0,
            timing: ContributionTiming::BeginningOfPeriod,
        }
    }

    /// No contributions at all
    pub fn none() -> Self {
        Self::level(0.0)
    }

    pub fn escalating(amount: f64, escalation_rate_percent: f64) -> Self {
        Self {
            escalation_rate_percent,
            ..Self::level(amount)
        }
    }
}

/// Starting balance, contributions and rate projected over a horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPlan {
    pub starting_balance: f64,

    pub contributions: ContributionSchedule,

    /// Interest rate and its compounding convention
    pub rate: RateSpec,

    /// Contribution periods per year
    /// If None, follows the compounding frequency (12 for continuous)
    #[serde(default)]
    pub contributions_per_year: Option<u32>,

    /// Horizon in contribution periods
    pub horizon_periods: u32,

    /// Percent of each period's interest withheld as tax before compounding
    #[serde(default)]
    pub tax_rate_percent: Option<f64>,
}

impl GrowthPlan {
    /// Plan whose contributions follow the compounding frequency
    pub fn new(
        starting_balance: f64,
        contributions: ContributionSchedule,
        rate: RateSpec,
        horizon_periods: u32,
    ) -> Self {
        Self {
            starting_balance,
            contributions,
            rate,
            contributions_per_year: None,
            horizon_periods,
            tax_rate_percent: None,
        }
    }

    pub fn with_contributions_per_year(mut self, periods: u32) -> Self {
        self.contributions_per_year = Some(periods);
        self
    }

    pub fn with_tax_rate(mut self, tax_rate_percent: f64) -> Self {
        self.tax_rate_percent = Some(tax_rate_percent);
        self
    }

    pub fn with_horizon(mut self, horizon_periods: u32) -> Self {
        self.horizon_periods = horizon_periods;
        self
    }

    /// Effective contribution cadence
    pub fn contribution_periods_per_year(&self) -> u32 {
        self.contributions_per_year
            .or_else(|| self.rate.frequency.periods_per_year())
            .unwrap_or(12)
    }
}

/// One contribution period of a projection trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPeriod {
    /// Period number (1-indexed)
    pub period: u32,
    pub contribution: f64,
    /// Gross interest credited this period
    pub interest: f64,
    pub tax: f64,
    pub ending_balance: f64,
}

/// Result of a growth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub ending_balance: f64,
    pub total_contributions: f64,
    /// Interest net of tax
    pub total_interest: f64,
    pub total_tax: f64,

    /// Per-period trace, empty unless requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<GrowthPeriod>,
}
