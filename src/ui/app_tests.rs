#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn add(db: &Database, date: &str, amount: Decimal, description: &str, category: &str) {
    let exp = Expense::new(amount, description.into(), date.into(), category.into());
    db.insert_expense(&exp).unwrap();
}

fn seeded() -> (App, Database) {
    let db = Database::open_in_memory().unwrap();
    add(&db, "2024-01-05", dec!(500), "Groceries", "Food");
    add(&db, "2024-01-20", dec!(300), "Electricity bill", "Bills");
    add(&db, "2024-02-02", dec!(200), "Train ticket", "Travel");
    add(&db, "2024-02-10", dec!(50), "Misc", "");
    let mut app = App::new(Config::default(), None);
    app.refresh_all(&db).unwrap();
    (app, db)
}

#[test]
fn test_refresh_all_loads_everything() {
    let (app, _db) = seeded();
    assert_eq!(app.all_expenses.len(), 4);
    assert_eq!(app.expenses.len(), 4);
    assert_eq!(app.expense_count, 4);
    assert_eq!(app.stats.total, dec!(1050));
    assert_eq!(app.month_options, vec!["2024-01", "2024-02"]);
    assert_eq!(app.category_options, vec!["Bills", "Food", "Travel"]);
    assert_eq!(
        app.monthly_trend,
        vec![("2024-01".to_string(), dec!(800)), ("2024-02".to_string(), dec!(250))]
    );
}

#[test]
fn test_no_budget_without_month() {
    let (mut app, db) = seeded();
    db.set_monthly_budget(&MonthlyBudget::new("2024-01".into(), dec!(1000)))
        .unwrap();
    app.refresh_budget(&db).unwrap();
    assert!(app.budget.is_none());
    assert!(app.budget_usage.is_none());
}

#[test]
fn test_budget_usage_for_selected_month() {
    let (mut app, db) = seeded();
    db.set_monthly_budget(&MonthlyBudget::new("2024-01".into(), dec!(1000)))
        .unwrap();
    app.filter.month = Some("2024-01".into());
    app.refresh_dashboard(&db).unwrap();
    let usage = app.budget_usage.unwrap();
    assert_eq!(usage.spent, dec!(800));
    assert_eq!(usage.used_pct, dec!(80));
}

#[test]
fn test_spending_chart_follows_filter() {
    let (mut app, db) = seeded();
    app.filter.month = Some("2024-02".into());
    app.refresh_dashboard(&db).unwrap();
    assert_eq!(
        app.spending_by_category,
        vec![("Travel".to_string(), dec!(200))]
    );
    // Cards always cover every expense
    assert_eq!(app.stats.total, dec!(1050));
}

#[test]
fn test_cursor_clamped_after_refresh() {
    let (mut app, db) = seeded();
    app.expense_index = 3;
    app.expense_scroll = 3;
    app.filter.category = Some("Food".into());
    app.refresh_expenses(&db).unwrap();
    assert_eq!(app.expenses.len(), 1);
    assert_eq!(app.expense_index, 0);
    assert_eq!(app.expense_scroll, 0);
}

#[test]
fn test_active_month() {
    let (mut app, _db) = seeded();
    assert_eq!(app.active_month(), crate::ui::util::current_month());
    app.filter.month = Some("2023-07".into());
    assert_eq!(app.active_month(), "2023-07");
}

#[test]
fn test_palette_follows_config() {
    let config = Config {
        theme: crate::config::Theme::Light,
        ..Config::default()
    };
    let app = App::new(config, None);
    assert!(std::ptr::eq(app.palette, &theme::LIGHT));
}
