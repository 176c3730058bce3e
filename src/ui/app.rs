use anyhow::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::categorize::FallbackSuggester;
use crate::config::Config;
use crate::db::{Database, ExpenseQuery};
use crate::models::{Expense, MonthlyBudget};
use crate::planner::PlanResult;
use crate::summary::{self, BudgetUsage, ExpenseFilter, SummaryStats};
use crate::ui::theme::{self, Palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    Planner,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses, Self::Planner]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Planner => write!(f, "Planner"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, description: String },
    DeleteBudget { month: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) config: Config,
    /// Where `:theme` persists the config. `None` keeps changes in memory.
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) palette: &'static Palette,
    pub(crate) suggester: FallbackSuggester,

    pub(crate) filter: ExpenseFilter,
    pub(crate) month_options: Vec<String>,
    pub(crate) category_options: Vec<String>,

    // Dashboard
    pub(crate) all_expenses: Vec<Expense>,
    pub(crate) stats: SummaryStats,
    pub(crate) spending_by_category: Vec<(String, Decimal)>,
    pub(crate) monthly_trend: Vec<(String, Decimal)>,
    pub(crate) budget: Option<MonthlyBudget>,
    pub(crate) budget_usage: Option<BudgetUsage>,

    // Expenses
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) expense_count: i64,
    pub(crate) editing_id: Option<i64>,

    // Planner
    pub(crate) plan: Option<PlanResult>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let suggester = FallbackSuggester::from_config(&config, &[]);
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            palette: theme::palette(config.theme),
            config,
            config_path,
            suggester,

            filter: ExpenseFilter::default(),
            month_options: Vec::new(),
            category_options: Vec::new(),

            all_expenses: Vec::new(),
            stats: SummaryStats::default(),
            spending_by_category: Vec::new(),
            monthly_trend: Vec::new(),
            budget: None,
            budget_usage: None,

            expenses: Vec::new(),
            expense_index: 0,
            expense_scroll: 0,
            expense_count: 0,
            editing_id: None,

            plan: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload everything derived from the store. Call after any write.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.all_expenses = db.get_all_expenses()?;
        self.month_options = db.get_month_options()?;
        self.category_options = db.get_category_options()?;
        self.suggester.retrain(&self.all_expenses);
        self.refresh_dashboard(db)?;
        self.refresh_expenses(db)?;
        Ok(())
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        self.stats = SummaryStats::from_expenses(&self.all_expenses);
        self.spending_by_category =
            summary::spending_by_category(summary::filter_expenses(&self.all_expenses, &self.filter));
        self.monthly_trend = summary::monthly_totals(&self.all_expenses);
        self.refresh_budget(db)
    }

    /// Budget and usage for the selected month. Nothing when showing all months.
    pub(crate) fn refresh_budget(&mut self, db: &Database) -> Result<()> {
        let Some(month) = self.filter.month.as_deref() else {
            self.budget = None;
            self.budget_usage = None;
            return Ok(());
        };
        self.budget = db.get_monthly_budget(month)?;
        self.budget_usage = self.budget.as_ref().map(|b| {
            BudgetUsage::new(summary::month_total(&self.all_expenses, month), b.limit_amount)
        });
        Ok(())
    }

    pub(crate) fn refresh_expenses(&mut self, db: &Database) -> Result<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };
        self.expenses = db.get_expenses(&ExpenseQuery {
            month: self.filter.month.as_deref(),
            category: self.filter.category.as_deref(),
            search,
            limit: None,
        })?;
        self.expense_count = db.get_expense_count()?;
        if self.expense_index >= self.expenses.len() {
            self.expense_index = self.expenses.len().saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
        Ok(())
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.expenses.get(self.expense_index)
    }

    /// Month the planner and budget commands default to.
    pub(crate) fn active_month(&self) -> String {
        self.filter
            .month
            .clone()
            .unwrap_or_else(crate::ui::util::current_month)
    }

    pub(crate) fn currency(&self) -> &str {
        &self.config.currency_symbol
    }

    pub(crate) fn expenses_page(&self) -> usize {
        self.visible_rows.saturating_sub(1).max(1)
    }

    pub(crate) fn reset_cursor(&mut self) {
        self.expense_index = 0;
        self.expense_scroll = 0;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
