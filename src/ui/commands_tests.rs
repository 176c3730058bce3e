#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::config::{Config, Theme};

fn setup() -> (App, Database) {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new(Config::default(), None);
    app.refresh_all(&db).unwrap();
    (app, db)
}

fn run(input: &str, app: &mut App, db: &mut Database) {
    handle_command(input, app, db).unwrap();
}

// ── parsing ───────────────────────────────────────────────────

#[test]
fn test_parse_expense_args() {
    assert_eq!(
        parse_expense_args("2024-01-15 250 Pizza night | Food"),
        Some(("2024-01-15", "250", "Pizza night", "Food"))
    );
    assert_eq!(
        parse_expense_args("2024-01-15 250 Pizza"),
        Some(("2024-01-15", "250", "Pizza", ""))
    );
    assert_eq!(parse_expense_args("2024-01-15 250"), None);
    assert_eq!(parse_expense_args(""), None);
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("plan", "plan"), 0);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut db) = setup();
    run("qiut", &mut app, &mut db);
    assert!(app.status_message.contains("Did you mean :quit?"));
    assert!(app.running);
}

#[test]
fn test_quit() {
    let (mut app, mut db) = setup();
    run("q", &mut app, &mut db);
    assert!(!app.running);
}

// ── expenses ─────────────────────────────────────────────────

#[test]
fn test_add_with_category() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 250 Lunch | Food", &mut app, &mut db);
    assert_eq!(app.all_expenses.len(), 1);
    assert_eq!(app.all_expenses[0].category, "Food");
    assert_eq!(app.stats.food, dec!(250));
    assert_eq!(app.month_options, vec!["2024-01".to_string()]);
}

#[test]
fn test_add_without_category_uses_suggestion() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 40 Uber ride home", &mut app, &mut db);
    assert_eq!(app.all_expenses[0].category, "Travel");
    assert!(app.status_message.contains("suggested"));
}

#[test]
fn test_add_rejects_bad_input() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 abc Pizza", &mut app, &mut db);
    assert!(app.status_message.contains("Invalid amount"));
    run("add 2024-01-15", &mut app, &mut db);
    assert!(app.status_message.starts_with("Usage"));
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_delete_requires_confirmation() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 250 Lunch | Food", &mut app, &mut db);
    run("delete", &mut app, &mut db);
    assert!(app.pending_action.is_none());

    run("expenses", &mut app, &mut db);
    run("delete", &mut app, &mut db);
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(matches!(
        app.pending_action,
        Some(PendingAction::DeleteExpense { ref description, .. }) if description == "Lunch"
    ));
    assert_eq!(db.get_expense_count().unwrap(), 1);
}

#[test]
fn test_edit_prefills_and_applies() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 250 Lunch | Food", &mut app, &mut db);
    run("expenses", &mut app, &mut db);
    run("edit", &mut app, &mut db);
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.command_input, "2024-01-15 250 Lunch | Food");

    apply_edit("2024-01-16 300 Dinner | Food", &mut app, &mut db).unwrap();
    assert!(app.editing_id.is_none());
    assert_eq!(app.all_expenses.len(), 1);
    assert_eq!(app.all_expenses[0].amount, dec!(300));
    assert_eq!(app.all_expenses[0].description, "Dinner");
}

#[test]
fn test_suggest_reports_category() {
    let (mut app, mut db) = setup();
    run("suggest water bill", &mut app, &mut db);
    assert_eq!(app.status_message, "Suggested category: Bills (local)");
}

#[test]
fn test_suggest_without_args_recategorizes_selected() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 120 water bill | Misc", &mut app, &mut db);

    run("suggest", &mut app, &mut db);
    assert!(app.status_message.starts_with("Usage"));

    run("expenses", &mut app, &mut db);
    run("suggest", &mut app, &mut db);
    assert_eq!(app.status_message, "water bill -> Bills (local)");
    assert_eq!(app.all_expenses[0].category, "Bills");
}

// ── filters ──────────────────────────────────────────────────

#[test]
fn test_month_filter_and_navigation() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 100 Lunch | Food", &mut app, &mut db);
    run("add 2024-02-01 50 Bus ticket | Travel", &mut app, &mut db);

    run("month 2024-01", &mut app, &mut db);
    assert_eq!(app.filter.month.as_deref(), Some("2024-01"));
    assert_eq!(app.expenses.len(), 1);

    run("next-month", &mut app, &mut db);
    assert_eq!(app.filter.month.as_deref(), Some("2024-02"));
    assert_eq!(app.expenses[0].category, "Travel");

    run("prev-month", &mut app, &mut db);
    run("prev-month", &mut app, &mut db);
    assert_eq!(app.filter.month.as_deref(), Some("2023-12"));
    assert!(app.expenses.is_empty());

    run("month all", &mut app, &mut db);
    assert!(app.filter.month.is_none());
    assert_eq!(app.expenses.len(), 2);
}

#[test]
fn test_month_invalid() {
    let (mut app, mut db) = setup();
    run("month 2024-13", &mut app, &mut db);
    assert!(app.filter.month.is_none());
    assert!(app.status_message.starts_with("Invalid month"));
}

#[test]
fn test_category_filter_matches_known_label() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 100 Lunch | Food", &mut app, &mut db);
    run("add 2024-01-16 50 Bus | Travel", &mut app, &mut db);
    run("category food", &mut app, &mut db);
    assert_eq!(app.filter.category.as_deref(), Some("Food"));
    assert_eq!(app.expenses.len(), 1);
    assert_eq!(app.spending_by_category, vec![("Food".to_string(), dec!(100))]);
    run("category all", &mut app, &mut db);
    assert!(app.filter.category.is_none());
    run("category SHOPPING", &mut app, &mut db);
    assert_eq!(app.filter.category.as_deref(), Some("Shopping"));
    assert!(app.expenses.is_empty());
}

#[test]
fn test_search() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 100 Pizza | Food", &mut app, &mut db);
    run("add 2024-01-16 50 Bus | Travel", &mut app, &mut db);
    run("search piz", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Expenses);
    assert_eq!(app.expenses.len(), 1);
}

// ── budgets ──────────────────────────────────────────────────

#[test]
fn test_budget_needs_month() {
    let (mut app, mut db) = setup();
    run("budget 1000", &mut app, &mut db);
    assert!(app.status_message.starts_with("Select a month"));
    assert!(db.get_monthly_budgets().unwrap().is_empty());
}

#[test]
fn test_budget_set_and_usage() {
    let (mut app, mut db) = setup();
    run("add 2024-01-15 850 Groceries | Food", &mut app, &mut db);
    run("month 2024-01", &mut app, &mut db);
    run("budget 1,000", &mut app, &mut db);
    assert_eq!(app.budget.as_ref().unwrap().limit_amount, dec!(1000));
    let usage = app.budget_usage.as_ref().unwrap();
    assert_eq!(usage.used_pct, dec!(85));

    run("budget -5", &mut app, &mut db);
    assert!(app.status_message.starts_with("Invalid budget"));

    run("delete-budget", &mut app, &mut db);
    assert_eq!(
        app.pending_action,
        Some(PendingAction::DeleteBudget {
            month: "2024-01".into()
        })
    );
}

// ── planner ──────────────────────────────────────────────────

#[test]
fn test_plan_command() {
    let (mut app, mut db) = setup();
    run("plan 50000 20000 2024-06 New laptop", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Planner);
    let plan = app.plan.as_ref().unwrap();
    assert_eq!(plan.leftover, dec!(30000));
    assert_eq!(plan.month, "2024-06");
    assert_eq!(plan.goal_name, "New laptop");
    assert_eq!(plan.total_budgeted(), dec!(30000));
}

#[test]
fn test_plan_defaults_month_and_name() {
    let (mut app, mut db) = setup();
    run("month 2024-03", &mut app, &mut db);
    run("plan 40000 10000", &mut app, &mut db);
    let plan = app.plan.as_ref().unwrap();
    assert_eq!(plan.month, "2024-03");
    assert_eq!(plan.goal_name, "Goal");
}

#[test]
fn test_plan_invalid_input() {
    let (mut app, mut db) = setup();
    run("plan 0 100 2024-06", &mut app, &mut db);
    assert!(app.plan.is_none());
    assert!(app.status_message.contains("salary must be a positive number"));

    run("plan abc 100", &mut app, &mut db);
    assert!(app.status_message.contains("not a number"));
}

// ── export & theme ───────────────────────────────────────────

#[test]
fn test_export_command() {
    let (mut app, mut db) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    run(&format!("export {}", path.display()), &mut app, &mut db);
    assert!(app.status_message.starts_with("Export failed"));

    run("add 2024-01-15 100 Pizza | Food", &mut app, &mut db);
    run(&format!("export {}", path.display()), &mut app, &mut db);
    assert!(app.status_message.starts_with("Exported 1 expenses"));
    assert!(path.exists());
}

#[test]
fn test_theme_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let mut db = Database::open_in_memory().unwrap();
    let mut app = App::new(Config::default(), Some(config_path.clone()));

    run("theme", &mut app, &mut db);
    assert_eq!(app.config.theme, Theme::Light);
    assert!(std::ptr::eq(app.palette, &theme::LIGHT));
    assert_eq!(Config::load(&config_path).unwrap().theme, Theme::Light);

    run("theme", &mut app, &mut db);
    assert_eq!(app.config.theme, Theme::Dark);
}
