//! Rate normalization: nominal annual rates, compounding conventions and
//! conversions through the effective annual rate

mod frequency;
mod normalize;

pub use frequency::CompoundingFrequency;
pub use normalize::{
    convert_nominal, effective_annual_rate, normalize, period_rate_from_effective,
    RateConversion, RateSpec,
};
