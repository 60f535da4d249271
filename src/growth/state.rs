//! Running state of a growth projection

/// How interest is credited across contribution periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Accrual {
    /// Credit `rate` on the balance every contribution period
    EveryPeriod { rate: f64 },
    /// Credit `rate` once per `window` contribution periods
    Windowed { rate: f64, window: u32 },
}

/// State of the account at a point in the projection
#[derive(Debug, Clone)]
pub(crate) struct GrowthState {
    /// Current contribution period (1-indexed once advanced)
    pub period: u32,

    /// Contribution periods per year
    pub periods_per_year: u32,

    pub balance: f64,

    /// Contribution amount in force for the current year
    pub contribution: f64,

    /// Contribution periods elapsed since interest was last credited
    pub window_elapsed: u32,

    pub total_contributions: f64,
    pub total_interest: f64,
    pub total_tax: f64,
}

impl GrowthState {
    pub fn new(starting_balance: f64, contribution: f64, periods_per_year: u32) -> Self {
        Self {
            period: 0,
            periods_per_year,
            balance: starting_balance,
            contribution,
            window_elapsed: 0,
            total_contributions: 0.0,
            total_interest: 0.0,
            total_tax: 0.0,
        }
    }

    pub fn advance_period(&mut self) {
        self.period += 1;
    }

    /// Whether the current period closes a full year
    pub fn is_year_end(&self) -> bool {
        self.periods_per_year > 0 && self.period % self.periods_per_year == 0
    }

    /// Post the current contribution, returning the amount deposited
    pub fn deposit(&mut self) -> f64 {
        let amount = self.contribution;
        self.balance += amount;
        self.total_contributions += amount;
        amount
    }

    /// Credit interest net of tax, returning (gross interest, tax)
    pub fn credit_interest(&mut self, interest: f64, tax_rate: f64) -> (f64, f64) {
        let tax = interest * tax_rate;
        let net = interest - tax;
        self.balance += net;
        self.total_interest += net;
        self.total_tax += tax;
        (interest, tax)
    }

    /// Raise the contribution for the next year
    pub fn escalate(&mut self, escalation_rate: f64) {
        self.contribution *= 1.0 + escalation_rate;
    }
}
