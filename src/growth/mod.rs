//! Growth projection of a balance with escalating recurring contributions

mod plan;
mod projector;
mod state;

pub use plan::{ContributionSchedule, ContributionTiming, GrowthPeriod, GrowthPlan, GrowthProjection};
pub use projector::{balance_after, project, project_with_trace};
