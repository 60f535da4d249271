//! Period-by-period projection of a balance with recurring contributions

use log::{debug, trace};

use super::plan::{ContributionTiming, GrowthPeriod, GrowthPlan, GrowthProjection};
use super::state::{Accrual, GrowthState};
use crate::config::MAX_PERIODS;
use crate::error::{Result, TvmError};

/// Project the plan to its horizon and return the summary totals
pub fn project(plan: &GrowthPlan) -> Result<GrowthProjection> {
    run(plan, false)
}

/// Project the plan and keep one trace row per contribution period
pub fn project_with_trace(plan: &GrowthPlan) -> Result<GrowthProjection> {
    run(plan, true)
}

/// Ending balance of the plan cut off after `periods` contribution periods
pub fn balance_after(plan: &GrowthPlan, periods: u32) -> Result<f64> {
    Ok(project(&plan.with_horizon(periods))?.ending_balance)
}

/// Pick the interest crediting cadence for the plan's two frequencies
fn accrual_for(plan: &GrowthPlan) -> Result<Accrual> {
    let contribution_freq = plan.contribution_periods_per_year();

    match plan.rate.frequency.periods_per_year() {
        Some(compounding) if compounding == contribution_freq => Ok(Accrual::EveryPeriod {
            rate: plan.rate.period_rate()?,
        }),
        Some(compounding) if compounding < contribution_freq && contribution_freq % compounding == 0 => {
            Ok(Accrual::Windowed {
                rate: plan.rate.period_rate()?,
                window: contribution_freq / compounding,
            })
        }
        _ => Ok(Accrual::EveryPeriod {
            rate: plan.rate.equivalent_period_rate(contribution_freq)?,
        }),
    }
}

fn validate(plan: &GrowthPlan) -> Result<f64> {
    if plan.horizon_periods == 0 || plan.horizon_periods > MAX_PERIODS {
        return Err(TvmError::InvalidHorizon(plan.horizon_periods));
    }
    if !plan.starting_balance.is_finite() || !plan.contributions.amount.is_finite() {
        return Err(TvmError::InvalidParameter(
            "starting balance and contribution must be finite".to_string(),
        ));
    }
    let escalation = plan.contributions.escalation_rate_percent;
    if !escalation.is_finite() || escalation < 0.0 {
        return Err(TvmError::InvalidRate(format!(
            "escalation rate must be non-negative, got {}%",
            escalation
        )));
    }

    let tax_rate = plan.tax_rate_percent.unwrap_or(0.0);
    if !(0.0..=100.0).contains(&tax_rate) {
        return Err(TvmError::InvalidParameter(format!(
            "tax rate must be between 0% and 100%, got {}%",
            tax_rate
        )));
    }
    Ok(tax_rate / 100.0)
}

fn run(plan: &GrowthPlan, keep_trace: bool) -> Result<GrowthProjection> {
    let tax_rate = validate(plan)?;
    let accrual = accrual_for(plan)?;
    let escalation = plan.contributions.escalation_rate_percent / 100.0;

    debug!(
        "Projecting balance={:.2} contribution={:.2} horizon={} accrual={:?}",
        plan.starting_balance, plan.contributions.amount, plan.horizon_periods, accrual
    );

    let mut state = GrowthState::new(
        plan.starting_balance,
        plan.contributions.amount,
        plan.contribution_periods_per_year(),
    );
    let mut periods = if keep_trace {
        Vec::with_capacity(plan.horizon_periods as usize)
    } else {
        Vec::new()
    };

    for _ in 0..plan.horizon_periods {
        state.advance_period();

        let (contribution, interest, tax) = match plan.contributions.timing {
            ContributionTiming::BeginningOfPeriod => {
                let contribution = state.deposit();
                let (interest, tax) = accrue(&mut state, accrual, tax_rate);
                (contribution, interest, tax)
            }
            ContributionTiming::EndOfPeriod => {
                let (interest, tax) = accrue(&mut state, accrual, tax_rate);
                let contribution = state.deposit();
                (contribution, interest, tax)
            }
        };

        trace!(
            "Period {}: contribution={:.4} interest={:.4} balance={:.4}",
            state.period, contribution, interest, state.balance
        );

        if keep_trace {
            periods.push(GrowthPeriod {
                period: state.period,
                contribution,
                interest,
                tax,
                ending_balance: state.balance,
            });
        }

        if state.is_year_end() {
            state.escalate(escalation);
        }
    }

    Ok(GrowthProjection {
        ending_balance: state.balance,
        total_contributions: state.total_contributions,
        total_interest: state.total_interest,
        total_tax: state.total_tax,
        periods,
    })
}

/// Run one period's interest step, returning (gross interest, tax)
fn accrue(state: &mut GrowthState, accrual: Accrual, tax_rate: f64) -> (f64, f64) {
    match accrual {
        Accrual::EveryPeriod { rate } => state.credit_interest(state.balance * rate, tax_rate),
        Accrual::Windowed { rate, window } => {
            state.window_elapsed += 1;
            if state.window_elapsed == window {
                state.window_elapsed = 0;
                state.credit_interest(state.balance * rate, tax_rate)
            } else {
                (0.0, 0.0)
            }
        }
    }
}
