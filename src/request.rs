//! Request/response envelope over the engine
//!
//! Calculator front ends send one JSON request per form submit, tagged by
//! `operation`. Engine failures come back inside the response so the caller
//! can show the message next to the form.
//!
//! # Example
//! ```ignore
//! let evaluator = Evaluator::new();
//! let request: EngineRequest = serde_json::from_str(r#"{
//!     "operation": "amortize",
//!     "loan": { "principal": 10000, "period_rate": 0.004166, "number_of_payments": 60 }
//! }"#)?;
//! let response = evaluator.evaluate(&request);
//! ```

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{
    amortize, Amortization, AmortizationSummary, LoanInput, LoanTerms, YearTotals,
};
use crate::config::RateSolverConfig;
use crate::error::{ErrorKind, Result, TvmError};
use crate::goal::{analyze, GoalAnalysis, SavingsGoal};
use crate::growth::{project, project_with_trace, GrowthPlan, GrowthProjection};
use crate::rates::{convert_nominal, CompoundingFrequency, RateConversion, RateSpec};
use crate::tvm::{solve, solve_rate, SolveFor, SolveResult, TvmParameters};

/// One engine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineRequest {
    NormalizeRate {
        rate: RateSpec,
    },
    ConvertRate {
        nominal_rate_percent: f64,
        from: CompoundingFrequency,
        to: CompoundingFrequency,
    },
    Amortize {
        /// Validated when evaluated so a degenerate loan comes back as a failure
        loan: LoanInput,
        /// If set, also group the schedule into years of this many payments
        #[serde(default)]
        periods_per_year: Option<u32>,
    },
    Project {
        plan: GrowthPlan,
        /// Include the per-period trace
        #[serde(default)]
        trace: bool,
    },
    Solve {
        params: TvmParameters,
        /// Run the iterative search when solving for rate
        #[serde(default)]
        iterate_rate: bool,
    },
    RequiredContribution {
        goal: SavingsGoal,
    },
}

/// Successful engine output, tagged like the request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineOutput {
    NormalizeRate {
        period_rate: f64,
        effective_annual_rate: f64,
    },
    ConvertRate {
        conversion: RateConversion,
    },
    Amortize {
        amortization: Amortization,
        summary: AmortizationSummary,
        #[serde(skip_serializing_if = "Option::is_none")]
        yearly: Option<Vec<YearTotals>>,
    },
    Project {
        projection: GrowthProjection,
    },
    Solve {
        result: SolveResult,
    },
    RequiredContribution {
        analysis: GoalAnalysis,
    },
}

/// Error body returned in place of an output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&TvmError> for ErrorBody {
    fn from(err: &TvmError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Output or failure for a single request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineResponse {
    Success(EngineOutput),
    Failure { error: ErrorBody },
}

impl EngineResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, EngineResponse::Success(_))
    }
}

impl From<Result<EngineOutput>> for EngineResponse {
    fn from(result: Result<EngineOutput>) -> Self {
        match result {
            Ok(output) => EngineResponse::Success(output),
            Err(err) => EngineResponse::Failure { error: (&err).into() },
        }
    }
}

/// Dispatches requests to the engine
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    rate_solver: RateSolverConfig,
}

impl Evaluator {
    /// Evaluator with default rate-search settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(rate_solver: RateSolverConfig) -> Self {
        Self { rate_solver }
    }

    pub fn config(&self) -> &RateSolverConfig {
        &self.rate_solver
    }

    /// Run one request
    pub fn evaluate(&self, request: &EngineRequest) -> EngineResponse {
        let response: EngineResponse = self.dispatch(request).into();
        if let EngineResponse::Failure { error } = &response {
            debug!("Request failed with {:?}: {}", error.kind, error.message);
        }
        response
    }

    /// Run many independent requests in parallel, preserving order
    pub fn evaluate_batch(&self, requests: &[EngineRequest]) -> Vec<EngineResponse> {
        info!("Evaluating batch of {} requests", requests.len());
        requests
            .par_iter()
            .map(|request| self.evaluate(request))
            .collect()
    }

    fn dispatch(&self, request: &EngineRequest) -> Result<EngineOutput> {
        match request {
            EngineRequest::NormalizeRate { rate } => Ok(EngineOutput::NormalizeRate {
                period_rate: rate.period_rate()?,
                effective_annual_rate: rate.effective_annual_rate()?,
            }),
            EngineRequest::ConvertRate {
                nominal_rate_percent,
                from,
                to,
            } => Ok(EngineOutput::ConvertRate {
                conversion: convert_nominal(*nominal_rate_percent, *from, *to)?,
            }),
            EngineRequest::Amortize {
                loan,
                periods_per_year,
            } => {
                let loan = LoanTerms::try_from(*loan)?;
                let amortization = amortize(&loan)?;
                let summary = amortization.summary();
                let yearly = periods_per_year.map(|n| amortization.yearly_totals(n));
                Ok(EngineOutput::Amortize {
                    amortization,
                    summary,
                    yearly,
                })
            }
            EngineRequest::Project { plan, trace } => {
                let projection = if *trace {
                    project_with_trace(plan)?
                } else {
                    project(plan)?
                };
                Ok(EngineOutput::Project { projection })
            }
            EngineRequest::Solve {
                params,
                iterate_rate,
            } => {
                let result = if *iterate_rate && params.solve_for == SolveFor::Rate {
                    solve_rate(params, &self.rate_solver)?
                } else {
                    solve(params)?
                };
                Ok(EngineOutput::Solve { result })
            }
            EngineRequest::RequiredContribution { goal } => Ok(EngineOutput::RequiredContribution {
                analysis: analyze(goal)?,
            }),
        }
    }
}
