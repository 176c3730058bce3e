use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use rust_decimal::Decimal;

use super::app::{App, InputMode, PendingAction, Screen};
use super::theme;
use super::util::{format_amount, normalize_month, shift_month};
use crate::categorize::CategorySuggester;
use crate::db::Database;
use crate::export;
use crate::models::{CoreCategory, Expense, MonthlyBudget};
use crate::planner::{self, PlanRequest};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SpendWise", cmd_quit, r);
    register_command!("quit", "Quit SpendWise", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("p", "Go to Planner", cmd_planner, r);
    register_command!("planner", "Go to Planner", cmd_planner, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 2024-01-15 250 Pizza | Food)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add expense (e.g. :a 2024-01-15 250 Pizza)",
        cmd_add,
        r
    );
    register_command!("edit", "Edit selected expense", cmd_edit, r);
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "suggest",
        "Suggest a category (no args: recategorize the selected expense)",
        cmd_suggest,
        r
    );
    register_command!(
        "month",
        "Filter by month (e.g. :month 2024-01, :month all)",
        cmd_month,
        r
    );
    register_command!("m", "Filter by month (e.g. :m 3)", cmd_month, r);
    register_command!(
        "category",
        "Filter by category (e.g. :category Food, :category all)",
        cmd_category,
        r
    );
    register_command!("c", "Filter by category", cmd_category, r);
    register_command!(
        "search",
        "Search descriptions (e.g. :search pizza)",
        cmd_search,
        r
    );
    register_command!("s", "Search descriptions (e.g. :s pizza)", cmd_search, r);
    register_command!(
        "budget",
        "Set budget for the selected month (e.g. :budget 20000)",
        cmd_budget,
        r
    );
    register_command!(
        "delete-budget",
        "Delete budget for the selected month",
        cmd_delete_budget,
        r
    );
    register_command!(
        "plan",
        "Plan a purchase (e.g. :plan 50000 20000 2024-06 Laptop)",
        cmd_plan,
        r
    );
    register_command!(
        "export",
        "Export all expenses to CSV (e.g. :export ~/spend.csv)",
        cmd_export,
        r
    );
    register_command!("theme", "Toggle dark/light theme", cmd_theme, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split `"<date> <amount> <description> [| category]"` into its parts.
pub(crate) fn parse_expense_args(args: &str) -> Option<(&str, &str, &str, &str)> {
    let (main, category) = match args.split_once('|') {
        Some((m, c)) => (m.trim(), c.trim()),
        None => (args.trim(), ""),
    };
    let mut parts = main.splitn(3, ' ');
    let date = parts.next().filter(|s| !s.is_empty())?;
    let amount = parts.next().filter(|s| !s.is_empty())?;
    let description = parts.next().map(str::trim).filter(|s| !s.is_empty())?;
    Some((date, amount, description, category))
}

/// Fill in a blank category from the suggester. Returns where it came from.
fn fill_category(app: &App, expense: &mut Expense) -> Option<String> {
    if expense.is_categorized() {
        return None;
    }
    match app.suggester.suggest(&expense.description, expense.amount) {
        Ok(s) => {
            expense.category = s.category;
            Some(s.source.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "no category suggestion");
            None
        }
    }
}

pub(crate) fn apply_edit(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(id) = app.editing_id.take() else {
        return Ok(());
    };
    let Some((date, amount, description, category)) = parse_expense_args(input) else {
        app.set_status("Usage: <YYYY-MM-DD> <amount> <description> | <category>");
        return Ok(());
    };
    let mut expense = match Expense::from_input(amount, description, date, category) {
        Ok(e) => e,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    fill_category(app, &mut expense);
    let saved_id = db.update_expense(id, &expense)?;
    app.refresh_all(db)?;
    app.set_status(format!("Updated: {} ({})", expense.description, expense.category));
    tracing::info!(id = saved_id, "expense updated");
    Ok(())
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh_expenses(db)?;
    Ok(())
}

fn cmd_planner(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Planner;
    if app.plan.is_none() {
        app.set_status("Usage: :plan <salary> <goal amount> [YYYY-MM] [goal name]");
    }
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some((date, amount, description, category)) = parse_expense_args(args) else {
        app.set_status(
            "Usage: :add <YYYY-MM-DD> <amount> <description> [| category]. Example: :add 2024-01-15 250 Pizza | Food",
        );
        return Ok(());
    };

    let mut expense = match Expense::from_input(amount, description, date, category) {
        Ok(e) => e,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    let suggested_by = fill_category(app, &mut expense);

    db.insert_expense(&expense)?;
    app.refresh_all(db)?;
    let amount = format_amount(expense.amount, app.currency());
    app.set_status(match suggested_by {
        Some(source) => format!(
            "Added: {} {amount} as {} (suggested, {source})",
            expense.description, expense.category
        ),
        None => format!("Added: {} {amount} as {}", expense.description, expense.category),
    });
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses || app.expenses.is_empty() {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }
    let Some(selected) = app.selected_expense() else {
        return Ok(());
    };
    let Some(id) = selected.id else {
        return Ok(());
    };

    if args.is_empty() {
        // Inline editing, prefilled with the current values
        app.command_input = format!(
            "{} {} {} | {}",
            selected.date,
            selected.amount.normalize(),
            selected.description,
            selected.category
        );
        app.editing_id = Some(id);
        app.input_mode = InputMode::Editing;
        app.set_status("Edit the expense, press Enter to save");
        return Ok(());
    }

    app.editing_id = Some(id);
    apply_edit(args, app, db)
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses || app.expenses.is_empty() {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }

    if let Some(exp) = app.selected_expense() {
        if let Some(id) = exp.id {
            let description = exp.description.clone();
            app.confirm_message = format!("Delete '{description}'?");
            app.pending_action = Some(PendingAction::DeleteExpense { id, description });
            app.input_mode = InputMode::Confirm;
        }
    }

    Ok(())
}

fn cmd_suggest(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        return recategorize_selected(app, db);
    }
    match app.suggester.suggest(args, Decimal::ZERO) {
        Ok(s) => app.set_status(format!("Suggested category: {} ({})", s.category, s.source)),
        Err(e) => app.set_status(format!("Could not suggest a category: {e}")),
    }
    Ok(())
}

fn recategorize_selected(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let id = match app.selected_expense() {
        Some(exp) if app.screen == Screen::Expenses => exp.id,
        _ => None,
    };
    let Some(expense) = id.map(|id| db.get_expense_by_id(id)).transpose()?.flatten() else {
        app.set_status("Usage: :suggest <description>, or select an expense first");
        return Ok(());
    };
    let Some(id) = expense.id else {
        return Ok(());
    };
    match app.suggester.suggest(&expense.description, expense.amount) {
        Ok(s) => {
            db.update_expense_category(id, &s.category)?;
            app.refresh_all(db)?;
            app.set_status(format!(
                "{} -> {} ({})",
                expense.description, s.category, s.source
            ));
        }
        Err(e) => app.set_status(format!("Could not suggest a category: {e}")),
    }
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() || args.eq_ignore_ascii_case("all") {
        app.filter.month = None;
        app.reset_cursor();
        app.refresh_dashboard(db)?;
        app.refresh_expenses(db)?;
        app.set_status("Showing all months");
        return Ok(());
    }

    let active = app.active_month();
    let default_year = active.get(..4).unwrap_or_default();
    match normalize_month(args, default_year) {
        Some(m) => set_month(app, db, m),
        None => {
            app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)");
            Ok(())
        }
    }
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() || args.eq_ignore_ascii_case("all") {
        app.filter.category = None;
        app.set_status("Showing all categories");
    } else {
        // Filter is exact, but accept any casing of a known label
        let label = app
            .category_options
            .iter()
            .find(|c| c.eq_ignore_ascii_case(args))
            .cloned()
            .or_else(|| CoreCategory::parse(args).map(|c| c.as_str().to_string()))
            .unwrap_or_else(|| args.to_string());
        app.set_status(format!("Category: {label}"));
        app.filter.category = Some(label);
    }
    app.reset_cursor();
    app.refresh_dashboard(db)?;
    app.refresh_expenses(db)?;
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Expenses;
    app.reset_cursor();
    app.refresh_expenses(db)?;

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(month) = app.filter.month.clone() else {
        app.set_status("Select a month first (:month YYYY-MM)");
        return Ok(());
    };
    if args.is_empty() {
        app.set_status("Usage: :budget <amount>. Example: :budget 20000");
        return Ok(());
    }

    let amount = match planner::parse_amount("budget", args) {
        Ok(a) if a > Decimal::ZERO => a,
        _ => {
            app.set_status(format!("Invalid budget amount: {args}"));
            return Ok(());
        }
    };

    db.set_monthly_budget(&MonthlyBudget::new(month.clone(), amount))?;
    app.refresh_budget(db)?;
    app.set_status(format!(
        "Budget set: {} for {month}",
        format_amount(amount, app.currency())
    ));
    Ok(())
}

fn cmd_delete_budget(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(budget) = &app.budget else {
        app.set_status("No budget to delete");
        return Ok(());
    };
    let month = budget.month.clone();
    app.confirm_message = format!("Delete budget for {month}?");
    app.pending_action = Some(PendingAction::DeleteBudget { month });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_plan(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 {
        app.set_status("Usage: :plan <salary> <goal amount> [YYYY-MM] [goal name]");
        return Ok(());
    }

    let (month, name_start) = match parts.get(2) {
        Some(token) if token.len() == 7 && token.as_bytes()[4] == b'-' => (token.to_string(), 3),
        _ => (app.active_month(), 2),
    };
    let goal_name = parts.get(name_start..).map(|p| p.join(" ")).unwrap_or_default();

    let result = planner::parse_amount("salary", parts[0])
        .and_then(|salary| Ok((salary, planner::parse_amount("goal amount", parts[1])?)))
        .and_then(|(salary, goal_amount)| {
            planner::compute_plan(&PlanRequest {
                salary,
                goal_amount,
                target_month: &month,
                goal_name: &goal_name,
                historical_expenses: &app.all_expenses,
            })
        });

    app.screen = Screen::Planner;
    match result {
        Ok(plan) => {
            app.set_status(format!("Plan ready for {} ({})", plan.goal_name, plan.month));
            app.plan = Some(plan);
        }
        Err(e) => {
            app.plan = None;
            app.set_status(format!("Cannot plan: {e}"));
        }
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(export::DEFAULT_EXPORT_FILE)
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    };

    match export::export_to_path(&path, &app.all_expenses, &app.config.currency_symbol) {
        Ok(count) => app.set_status(format!("Exported {count} expenses to {}", path.display())),
        Err(e) => app.set_status(format!("Export failed: {e}")),
    }
    Ok(())
}

fn cmd_theme(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.config.theme = app.config.theme.toggled();
    app.palette = theme::palette(app.config.theme);
    if let Some(path) = &app.config_path {
        if let Err(e) = app.config.save(path) {
            tracing::warn!(error = %e, "could not persist theme");
        }
    }
    app.set_status(format!("Theme: {}", app.config.theme.as_str()));
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    advance_month(app, db, 1)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    advance_month(app, db, -1)
}

fn advance_month(app: &mut App, db: &mut Database, delta: i32) -> anyhow::Result<()> {
    match shift_month(&app.active_month(), delta) {
        Some(m) => set_month(app, db, m),
        None => Ok(()),
    }
}

fn set_month(app: &mut App, db: &mut Database, month: String) -> anyhow::Result<()> {
    app.set_status(format!("Month: {month}"));
    app.filter.month = Some(month);
    app.reset_cursor();
    app.refresh_dashboard(db)?;
    app.refresh_expenses(db)?;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
