//! Purchase planner: splits the salary left over after a savings goal
//! across the core spending categories, weighted by historical spending.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{CoreCategory, Expense, MAX_AMOUNT};

pub(crate) const DEFAULT_GOAL_NAME: &str = "Goal";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PlanError {
    #[error("salary must be a positive number")]
    NonPositiveSalary,
    #[error("goal amount must be a positive number")]
    NonPositiveGoal,
    #[error("target month is required")]
    MissingMonth,
    /// Anything other than a real `YYYY-MM` month, including longer date prefixes.
    #[error("invalid target month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("{field} is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{0} is too large")]
    AmountTooLarge(&'static str),
    #[error("expense history total is too large to plan with")]
    HistoryOverflow,
}

/// Inputs to [`compute_plan`]. Borrowed so the expense snapshot is not copied.
#[derive(Debug, Clone)]
pub(crate) struct PlanRequest<'a> {
    pub(crate) salary: Decimal,
    pub(crate) goal_amount: Decimal,
    /// Format: "YYYY-MM"
    pub(crate) target_month: &'a str,
    pub(crate) goal_name: &'a str,
    pub(crate) historical_expenses: &'a [Expense],
}

impl PlanRequest<'_> {
    fn validate(&self) -> Result<(), PlanError> {
        if self.salary <= Decimal::ZERO {
            return Err(PlanError::NonPositiveSalary);
        }
        if self.goal_amount <= Decimal::ZERO {
            return Err(PlanError::NonPositiveGoal);
        }
        if self.salary > MAX_AMOUNT {
            return Err(PlanError::AmountTooLarge("salary"));
        }
        if self.goal_amount > MAX_AMOUNT {
            return Err(PlanError::AmountTooLarge("goal amount"));
        }
        let month = self.target_month.trim();
        if month.is_empty() {
            return Err(PlanError::MissingMonth);
        }
        if month.len() != 7
            || NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_err()
        {
            return Err(PlanError::InvalidMonth(month.to_string()));
        }
        Ok(())
    }
}

/// How the caller should present a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlanVerdict {
    /// The goal costs as much as or more than the salary.
    Infeasible,
    /// Following the category limits leaves enough for the goal.
    Achievable,
    /// Spending this month has already passed the leftover.
    OverBudget,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanResult {
    pub(crate) goal_name: String,
    pub(crate) month: String,
    pub(crate) salary: Decimal,
    pub(crate) goal_amount: Decimal,
    pub(crate) leftover: Decimal,
    pub(crate) spent_so_far: Decimal,
    /// Whole-number ceilings, keyed in core category order.
    pub(crate) budgets_by_category: BTreeMap<CoreCategory, Decimal>,
    pub(crate) overshoot: Decimal,
    pub(crate) can_achieve: bool,
}

impl PlanResult {
    pub(crate) fn verdict(&self) -> PlanVerdict {
        if self.leftover <= Decimal::ZERO {
            PlanVerdict::Infeasible
        } else if self.can_achieve {
            PlanVerdict::Achievable
        } else {
            PlanVerdict::OverBudget
        }
    }

    /// Amount missing to afford the goal at all. Zero when feasible.
    pub(crate) fn shortfall(&self) -> Decimal {
        if self.leftover < Decimal::ZERO {
            self.leftover.abs()
        } else {
            Decimal::ZERO
        }
    }

    pub(crate) fn budget_for(&self, category: CoreCategory) -> Decimal {
        self.budgets_by_category
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn total_budgeted(&self) -> Decimal {
        self.budgets_by_category.values().copied().sum()
    }
}

/// Parse a user-entered amount for one of the planner fields.
pub(crate) fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, PlanError> {
    let cleaned = raw.trim().replace(',', "");
    let amount = Decimal::from_str(&cleaned).map_err(|_| PlanError::InvalidNumber {
        field,
        value: raw.trim().to_string(),
    })?;
    if amount > MAX_AMOUNT {
        return Err(PlanError::AmountTooLarge(field));
    }
    Ok(amount)
}

/// Compute a spending plan for `request.target_month`.
///
/// With a negative leftover every raw budget clamps to zero, so the whole
/// (negative) rounded leftover lands on `Food` through remainder correction.
///
/// A positive leftover can still yield a negative ceiling. When several raw
/// budgets sit on a .5 tie they all round up, and the negative remainder goes
/// to the largest one: a leftover of 2.5 split evenly gives
/// `[-1, 1, 1, 1, 1]`. The ceilings always sum to `round(leftover)`.
///
/// Callers relying on non-negative ceilings should check `verdict()` first.
/// Expense totals that overflow `Decimal` are rejected with
/// [`PlanError::HistoryOverflow`].
pub(crate) fn compute_plan(request: &PlanRequest<'_>) -> Result<PlanResult, PlanError> {
    request.validate()?;
    let month = request.target_month.trim();
    let expenses = request.historical_expenses;

    let leftover = request.salary - request.goal_amount;

    let mut spent_so_far = Decimal::ZERO;
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    let mut total_all = Decimal::ZERO;
    for exp in expenses {
        total_all = checked_sum(total_all, exp.amount)?;
        if exp.in_month(month) {
            spent_so_far = checked_sum(spent_so_far, exp.amount)?;
        }
        let label = if exp.category.is_empty() {
            CoreCategory::Other.as_str()
        } else {
            exp.category.as_str()
        };
        let total = totals.entry(label).or_insert(Decimal::ZERO);
        *total = checked_sum(*total, exp.amount)?;
    }

    let raw_budgets = CoreCategory::all()
        .iter()
        .map(|&cat| {
            let share = if total_all > Decimal::ZERO {
                totals
                    .get(cat.as_str())
                    .copied()
                    .unwrap_or(Decimal::ZERO)
                    .checked_div(total_all)
                    .ok_or(PlanError::HistoryOverflow)?
            } else {
                cat.default_share()
            };
            let raw = leftover
                .checked_mul(share)
                .ok_or(PlanError::HistoryOverflow)?;
            Ok((cat, raw.max(Decimal::ZERO)))
        })
        .collect::<Result<Vec<(CoreCategory, Decimal)>, PlanError>>()?;

    let mut budgets_by_category = BTreeMap::new();
    let mut sum_rounded = Decimal::ZERO;
    for &(cat, raw) in &raw_budgets {
        let rounded = round_whole(raw);
        sum_rounded += rounded;
        budgets_by_category.insert(cat, rounded);
    }

    let diff = round_whole(leftover) - sum_rounded;
    if !diff.is_zero() {
        let main = largest_raw_budget(&raw_budgets);
        if let Some(budget) = budgets_by_category.get_mut(&main) {
            *budget += diff;
        }
    }

    let overshoot = spent_so_far
        .checked_sub(leftover)
        .ok_or(PlanError::HistoryOverflow)?
        .max(Decimal::ZERO);
    let can_achieve = leftover > Decimal::ZERO && overshoot.is_zero();

    tracing::debug!(
        month,
        %leftover,
        %spent_so_far,
        %overshoot,
        can_achieve,
        "computed purchase plan"
    );

    let goal_name = match request.goal_name.trim() {
        "" => DEFAULT_GOAL_NAME.to_string(),
        name => name.to_string(),
    };

    Ok(PlanResult {
        goal_name,
        month: month.to_string(),
        salary: request.salary,
        goal_amount: request.goal_amount,
        leftover,
        spent_so_far,
        budgets_by_category,
        overshoot,
        can_achieve,
    })
}

fn checked_sum(acc: Decimal, amount: Decimal) -> Result<Decimal, PlanError> {
    acc.checked_add(amount).ok_or(PlanError::HistoryOverflow)
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// First category in core order holding the strictly largest raw budget.
fn largest_raw_budget(raw_budgets: &[(CoreCategory, Decimal)]) -> CoreCategory {
    let mut best = CoreCategory::Food;
    let mut best_raw = Decimal::ZERO;
    for &(cat, raw) in raw_budgets {
        if raw > best_raw {
            best = cat;
            best_raw = raw;
        }
    }
    best
}
