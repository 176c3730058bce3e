//! Aggregations over an in-memory expense snapshot for the dashboard.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::models::Expense;

/// Month and category filters. `None` means "ALL".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpenseFilter {
    pub(crate) month: Option<String>,
    pub(crate) category: Option<String>,
}

impl ExpenseFilter {
    pub(crate) fn matches(&self, expense: &Expense) -> bool {
        let month_ok = self
            .month
            .as_deref()
            .map_or(true, |m| expense.in_month(m));
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| expense.category == c);
        month_ok && category_ok
    }

    pub(crate) fn is_all(&self) -> bool {
        self.month.is_none() && self.category.is_none()
    }
}

pub(crate) fn filter_expenses<'a>(expenses: &'a [Expense], filter: &ExpenseFilter) -> Vec<&'a Expense> {
    expenses.iter().filter(|e| filter.matches(e)).collect()
}

/// Headline totals across every expense.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SummaryStats {
    pub(crate) total: Decimal,
    pub(crate) food: Decimal,
    pub(crate) bills: Decimal,
    pub(crate) travel: Decimal,
    pub(crate) shopping: Decimal,
}

impl SummaryStats {
    pub(crate) fn from_expenses(expenses: &[Expense]) -> Self {
        let mut stats = Self::default();
        for exp in expenses {
            stats.total = stats.total.saturating_add(exp.amount);
            let bucket = match exp.category.as_str() {
                "Food" => &mut stats.food,
                "Bills" => &mut stats.bills,
                "Travel" => &mut stats.travel,
                "Shopping" => &mut stats.shopping,
                _ => continue,
            };
            *bucket = bucket.saturating_add(exp.amount);
        }
        stats
    }
}

/// Totals per category label for categorized expenses, largest first.
pub(crate) fn spending_by_category<'a, I>(expenses: I) -> Vec<(String, Decimal)>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for exp in expenses {
        if !exp.is_categorized() {
            continue;
        }
        let total = totals.entry(exp.category.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(exp.amount);
    }
    let mut result: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(name, amt)| (name.to_string(), amt))
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    result
}

/// Totals per "YYYY-MM" for dated expenses, oldest first.
pub(crate) fn monthly_totals(expenses: &[Expense]) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for exp in expenses {
        if let Some(month) = exp.month() {
            let total = totals.entry(month).or_insert(Decimal::ZERO);
            *total = total.saturating_add(exp.amount);
        }
    }
    totals
        .into_iter()
        .map(|(m, amt)| (m.to_string(), amt))
        .collect()
}

pub(crate) fn month_total(expenses: &[Expense], month: &str) -> Decimal {
    total_amount(expenses.iter().filter(|e| e.in_month(month)))
}

/// Sum of amounts. Saturates at `Decimal::MAX` instead of overflowing.
pub(crate) fn total_amount<'a, I>(expenses: I) -> Decimal
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    Ok,
    Warning,
    Exceeded,
}

/// How much of a monthly budget has been spent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetUsage {
    pub(crate) spent: Decimal,
    pub(crate) budget: Decimal,
    /// Capped at 100.
    pub(crate) used_pct: Decimal,
}

impl BudgetUsage {
    const WARNING_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
    const FULL_PCT: Decimal = Decimal::ONE_HUNDRED;

    pub(crate) fn new(spent: Decimal, budget: Decimal) -> Self {
        let used_pct = if budget > Decimal::ZERO {
            spent
                .checked_div(budget)
                .and_then(|r| r.checked_mul(Self::FULL_PCT))
                .map_or(Self::FULL_PCT, |pct| pct.min(Self::FULL_PCT))
        } else {
            Decimal::ZERO
        };
        Self {
            spent,
            budget,
            used_pct,
        }
    }

    pub(crate) fn status(&self) -> BudgetStatus {
        if self.used_pct >= Self::FULL_PCT {
            BudgetStatus::Exceeded
        } else if self.used_pct >= Self::WARNING_PCT {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }

    /// Fraction in 0..=1 for gauges.
    pub(crate) fn ratio(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.used_pct / Self::FULL_PCT).to_f64().unwrap_or(0.0)
    }
}
