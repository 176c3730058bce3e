use rust_decimal::Decimal;

/// Overall spending limit for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBudget {
    /// Format: "YYYY-MM"
    pub month: String,
    pub limit_amount: Decimal,
}

impl MonthlyBudget {
    pub fn new(month: String, limit_amount: Decimal) -> Self {
        Self {
            month,
            limit_amount,
        }
    }
}
