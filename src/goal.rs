//! Required periodic contribution to reach a savings target

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TvmError};
use crate::tvm::{future_value, solve, PaymentTiming, SolveFor, TvmParameters};

/// A target balance to reach from a current balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub target_value: f64,
    pub current_balance: f64,
    pub horizon_periods: u32,
    /// Decimal rate per contribution period
    pub period_rate: f64,
}

/// Whether the goal needs further contributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// The current balance alone reaches the target
    AlreadyMet,
    /// Contributions are needed to close the gap
    Shortfall,
}

/// Full answer for a savings goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalAnalysis {
    pub status: GoalStatus,
    /// Per-period contribution, zero when the goal is already met
    pub required_contribution: f64,
    /// Balance at the horizon without further contributions
    pub projected_balance: f64,
    /// Target minus projected balance, floored at zero
    pub gap: f64,
}

fn validate(goal: &SavingsGoal) -> Result<()> {
    if !goal.target_value.is_finite() || goal.target_value <= 0.0 {
        return Err(TvmError::InvalidGoal(format!(
            "target value must be positive, got {:.2}",
            goal.target_value
        )));
    }
    if goal.horizon_periods == 0 {
        return Err(TvmError::InvalidGoal(
            "horizon must be at least one period".to_string(),
        ));
    }
    if !goal.current_balance.is_finite() {
        return Err(TvmError::InvalidGoal(format!(
            "current balance must be finite, got {}",
            goal.current_balance
        )));
    }
    if !goal.period_rate.is_finite() || goal.period_rate < 0.0 {
        return Err(TvmError::InvalidRate(format!(
            "period rate must be non-negative, got {}",
            goal.period_rate
        )));
    }
    Ok(())
}

/// Analyze the goal: projected balance, gap and required contribution
pub fn analyze(goal: &SavingsGoal) -> Result<GoalAnalysis> {
    validate(goal)?;

    let n = goal.horizon_periods as f64;
    let projected_balance = future_value(
        -goal.current_balance,
        0.0,
        n,
        goal.period_rate,
        PaymentTiming::End,
    );
    let gap = goal.target_value - projected_balance;

    debug!(
        "Goal target={:.2} projected={:.2} gap={:.2}",
        goal.target_value, projected_balance, gap
    );

    if gap <= 0.0 {
        return Ok(GoalAnalysis {
            status: GoalStatus::AlreadyMet,
            required_contribution: 0.0,
            projected_balance,
            gap: 0.0,
        });
    }

    let solved = solve(
        &TvmParameters::solving(SolveFor::Pmt)
            .pv(-goal.current_balance)
            .fv(goal.target_value)
            .nper(n)
            .rate(goal.period_rate),
    )?;

    Ok(GoalAnalysis {
        status: GoalStatus::Shortfall,
        required_contribution: solved.magnitude(),
        projected_balance,
        gap,
    })
}

/// Per-period contribution that closes the gap to the target
///
/// Returns 0 when the current balance already reaches the target.
pub fn required_contribution(goal: &SavingsGoal) -> Result<f64> {
    analyze(goal).map(|analysis| analysis.required_contribution)
}
