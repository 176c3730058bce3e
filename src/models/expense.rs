use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Largest amount accepted from user input (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub description: String,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    /// Free-text label. Empty means uncategorized.
    pub category: String,
    pub created_at: String,
}

impl Expense {
    pub fn new(amount: Decimal, description: String, date: String, category: String) -> Self {
        Self {
            id: None,
            amount,
            description,
            date,
            category,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Build an expense from user-entered text, rejecting blank or malformed fields.
    /// The category may be empty; callers fill it in with a suggestion.
    pub fn from_input(amount: &str, description: &str, date: &str, category: &str) -> Result<Self> {
        let cleaned = amount.trim().replace(',', "");
        let amount = Decimal::from_str(&cleaned)
            .map_err(|_| anyhow::anyhow!("Invalid amount: {}", amount.trim()))?;
        if amount <= Decimal::ZERO {
            anyhow::bail!("Amount must be greater than zero");
        }
        if amount > MAX_AMOUNT {
            anyhow::bail!("Amount must not exceed {MAX_AMOUNT}");
        }
        let description = description.trim();
        if description.is_empty() {
            anyhow::bail!("Description is required");
        }
        let date = date.trim();
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            anyhow::bail!("Invalid date: {date}. Use YYYY-MM-DD");
        }
        Ok(Self::new(
            amount,
            description.to_string(),
            date.to_string(),
            category.trim().to_string(),
        ))
    }

    /// The `YYYY-MM` part of the date, if the date is long enough to have one.
    pub fn month(&self) -> Option<&str> {
        self.date.get(..7)
    }

    /// True when the date starts with `month` (a `YYYY-MM` token).
    pub fn in_month(&self, month: &str) -> bool {
        !self.date.is_empty() && self.date.starts_with(month)
    }

    pub fn is_categorized(&self) -> bool {
        !self.category.trim().is_empty()
    }
}
