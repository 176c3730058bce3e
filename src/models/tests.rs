#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Expense ───────────────────────────────────────────────────

fn make_expense(date: &str, category: &str) -> Expense {
    Expense {
        id: None,
        amount: dec!(250.00),
        description: "Test".into(),
        date: date.into(),
        category: category.into(),
        created_at: String::new(),
    }
}

#[test]
fn test_expense_from_input() {
    let exp = Expense::from_input(" 1,250.50 ", "  Rent share ", "2024-06-01", " Bills ").unwrap();
    assert_eq!(exp.amount, dec!(1250.50));
    assert_eq!(exp.description, "Rent share");
    assert_eq!(exp.date, "2024-06-01");
    assert_eq!(exp.category, "Bills");
}

#[test]
fn test_expense_from_input_allows_blank_category() {
    let exp = Expense::from_input("10", "Chai", "2024-06-01", "").unwrap();
    assert!(!exp.is_categorized());
}

#[test]
fn test_expense_from_input_rejects_bad_fields() {
    assert!(Expense::from_input("abc", "Chai", "2024-06-01", "Food").is_err());
    assert!(Expense::from_input("0", "Chai", "2024-06-01", "Food").is_err());
    assert!(Expense::from_input("-5", "Chai", "2024-06-01", "Food").is_err());
    assert!(Expense::from_input("10", "   ", "2024-06-01", "Food").is_err());
    assert!(Expense::from_input("10", "Chai", "2024-6-1x", "Food").is_err());
    assert!(Expense::from_input("10", "Chai", "2024-02-30", "Food").is_err());
}

#[test]
fn test_expense_from_input_caps_amount() {
    assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    assert!(Expense::from_input("1,000,000,000,000", "Island", "2024-06-01", "").is_ok());
    assert!(Expense::from_input("1000000000000.01", "Island", "2024-06-01", "").is_err());
    assert!(Expense::from_input("40000000000000000000000000000", "Island", "2024-06-01", "").is_err());
}

#[test]
fn test_expense_new_defaults() {
    let exp = Expense::new(dec!(99.50), "Pizza".into(), "2024-06-01".into(), "Food".into());
    assert!(exp.id.is_none());
    assert_eq!(exp.amount, dec!(99.50));
    assert_eq!(exp.category, "Food");
    assert!(!exp.created_at.is_empty());
}

#[test]
fn test_expense_month() {
    assert_eq!(make_expense("2024-06-15", "Food").month(), Some("2024-06"));
    assert_eq!(make_expense("2024-6", "Food").month(), None);
    assert_eq!(make_expense("", "Food").month(), None);
}

#[test]
fn test_expense_in_month_is_prefix_match() {
    let exp = make_expense("2024-06-15", "Food");
    assert!(exp.in_month("2024-06"));
    assert!(exp.in_month("2024"));
    assert!(!exp.in_month("2024-07"));
}

#[test]
fn test_expense_without_date_is_in_no_month() {
    let exp = make_expense("", "Food");
    assert!(!exp.in_month(""));
    assert!(!exp.in_month("2024-06"));
}

#[test]
fn test_expense_is_categorized() {
    assert!(make_expense("2024-06-15", "Food").is_categorized());
    assert!(!make_expense("2024-06-15", "").is_categorized());
    assert!(!make_expense("2024-06-15", "   ").is_categorized());
}

// ── CoreCategory ──────────────────────────────────────────────

#[test]
fn test_core_category_order() {
    let names: Vec<&str> = CoreCategory::all().iter().map(|c| c.as_str()).collect();
    assert_eq!(names, ["Food", "Bills", "Travel", "Shopping", "Other"]);
}

#[test]
fn test_core_category_parse() {
    assert_eq!(CoreCategory::parse("food"), Some(CoreCategory::Food));
    assert_eq!(CoreCategory::parse("BILLS"), Some(CoreCategory::Bills));
    assert_eq!(CoreCategory::parse(" Travel "), Some(CoreCategory::Travel));
    assert_eq!(CoreCategory::parse("Groceries"), None);
}

#[test]
fn test_core_category_roundtrip() {
    for c in CoreCategory::all() {
        assert_eq!(CoreCategory::parse(c.as_str()), Some(*c), "Roundtrip failed for {c}");
    }
}

#[test]
fn test_default_shares_sum_to_one() {
    let total: Decimal = CoreCategory::all().iter().map(|c| c.default_share()).sum();
    assert_eq!(total, Decimal::ONE);
}

// ── MonthlyBudget ─────────────────────────────────────────────

#[test]
fn test_monthly_budget_new() {
    let budget = MonthlyBudget::new("2024-01".into(), dec!(500));
    assert_eq!(budget.month, "2024-01");
    assert_eq!(budget.limit_amount, dec!(500));
}
