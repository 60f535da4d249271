//! Amortization schedule output structures

use serde::{Deserialize, Serialize};

/// A single period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Payment number (1-indexed)
    pub period: u32,

    /// Total payment made this period
    pub payment: f64,

    /// Interest portion of the payment
    pub interest: f64,

    /// Principal portion of the payment
    pub principal: f64,

    /// Remaining balance after the payment
    pub ending_balance: f64,
}

/// Fixed payment plus its full schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amortization {
    /// Fixed periodic payment
    pub payment: f64,

    /// One row per period, in order
    pub schedule: Vec<AmortizationRow>,
}

impl Amortization {
    pub(crate) fn with_capacity(payment: f64, periods: usize) -> Self {
        Self {
            payment,
            schedule: Vec::with_capacity(periods),
        }
    }

    pub(crate) fn add_row(&mut self, row: AmortizationRow) {
        self.schedule.push(row);
    }

    /// Totals computed by summing the rows directly
    pub fn summary(&self) -> AmortizationSummary {
        let total_paid: f64 = self.schedule.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.schedule.iter().map(|r| r.interest).sum();
        let total_principal: f64 = self.schedule.iter().map(|r| r.principal).sum();

        AmortizationSummary {
            number_of_payments: self.schedule.len() as u32,
            payment: self.payment,
            total_paid,
            total_interest,
            total_principal,
        }
    }

    /// Group rows into years of `periods_per_year` payments
    ///
    /// A trailing partial year is reported as its own entry.
    pub fn yearly_totals(&self, periods_per_year: u32) -> Vec<YearTotals> {
        if periods_per_year == 0 {
            return Vec::new();
        }

        self.schedule
            .chunks(periods_per_year as usize)
            .enumerate()
            .map(|(i, rows)| YearTotals {
                year: i as u32 + 1,
                interest: rows.iter().map(|r| r.interest).sum(),
                principal: rows.iter().map(|r| r.principal).sum(),
                ending_balance: rows.last().map(|r| r.ending_balance).unwrap_or(0.0),
            })
            .collect()
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub number_of_payments: u32,
    pub payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_principal: f64,
}

/// Interest and principal paid within one year of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotals {
    pub year: u32,
    pub interest: f64,
    pub principal: f64,
    pub ending_balance: f64,
}
