//! Fixed-payment loan amortization and schedule reporting

mod engine;
mod schedule;

pub use engine::{amortize, payment_for, LoanInput, LoanTerms};
pub use schedule::{Amortization, AmortizationRow, AmortizationSummary, YearTotals};
