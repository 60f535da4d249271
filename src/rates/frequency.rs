//! Compounding frequencies supported by the calculators

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often interest compounds within a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    #[default]
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
    Daily,
    Continuous,
}

impl CompoundingFrequency {
    /// All discrete frequencies, lowest first
    pub const DISCRETE: [CompoundingFrequency; 8] = [
        CompoundingFrequency::Annual,
        CompoundingFrequency::SemiAnnual,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Monthly,
        CompoundingFrequency::SemiMonthly,
        CompoundingFrequency::BiWeekly,
        CompoundingFrequency::Weekly,
        CompoundingFrequency::Daily,
    ];

    /// Compounding periods per year, `None` for continuous compounding
    pub fn periods_per_year(self) -> Option<u32> {
        match self {
            CompoundingFrequency::Annual => Some(1),
            CompoundingFrequency::SemiAnnual => Some(2),
            CompoundingFrequency::Quarterly => Some(4),
            CompoundingFrequency::Monthly => Some(12),
            CompoundingFrequency::SemiMonthly => Some(24),
            CompoundingFrequency::BiWeekly => Some(26),
            CompoundingFrequency::Weekly => Some(52),
            CompoundingFrequency::Daily => Some(365),
            CompoundingFrequency::Continuous => None,
        }
    }

    /// Map a periods-per-year count back to a discrete frequency
    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        Self::DISCRETE
            .iter()
            .copied()
            .find(|f| f.periods_per_year() == Some(periods))
    }

    pub fn is_continuous(self) -> bool {
        matches!(self, CompoundingFrequency::Continuous)
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompoundingFrequency::Annual => "annual",
            CompoundingFrequency::SemiAnnual => "semi-annual",
            CompoundingFrequency::Quarterly => "quarterly",
            CompoundingFrequency::Monthly => "monthly",
            CompoundingFrequency::SemiMonthly => "semi-monthly",
            CompoundingFrequency::BiWeekly => "bi-weekly",
            CompoundingFrequency::Weekly => "weekly",
            CompoundingFrequency::Daily => "daily",
            CompoundingFrequency::Continuous => "continuous",
        };
        f.write_str(name)
    }
}
