#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn make_expense(date: &str, description: &str, category: &str, amount: rust_decimal::Decimal) -> Expense {
    Expense {
        id: Some(1),
        amount,
        description: description.into(),
        date: date.into(),
        category: category.into(),
        created_at: String::new(),
    }
}

fn export_string(expenses: &[Expense], symbol: &str) -> String {
    let mut buf = Vec::new();
    write_expenses_csv(&mut buf, expenses, symbol).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_header_uses_currency_symbol() {
    let out = export_string(&[make_expense("2024-01-05", "Pizza", "Food", dec!(250))], "₹");
    let first = out.lines().next().unwrap();
    assert_eq!(first, r#""Date","Description","Category","Amount (₹)""#);
}

#[test]
fn test_rows_are_quoted_with_date_prefix() {
    let out = export_string(
        &[make_expense("2024-01-05", "Pizza", "Food", dec!(250.00))],
        "$",
    );
    let row = out.lines().nth(1).unwrap();
    assert_eq!(row, r#""'2024-01-05","Pizza","Food","250""#);
}

#[test]
fn test_embedded_quotes_are_doubled() {
    let out = export_string(
        &[make_expense("2024-01-05", r#"The "big" lunch, again"#, "", dec!(12.5))],
        "$",
    );
    let row = out.lines().nth(1).unwrap();
    assert_eq!(row, r#""'2024-01-05","The ""big"" lunch, again","","12.5""#);
}

#[test]
fn test_empty_date_stays_empty() {
    let out = export_string(&[make_expense("", "Cash", "Other", dec!(1))], "$");
    assert!(out.lines().nth(1).unwrap().starts_with(r#""","Cash""#));
}

#[test]
fn test_empty_list_is_error() {
    let mut buf = Vec::new();
    assert!(write_expenses_csv(&mut buf, &[], "₹").is_err());
    assert!(buf.is_empty());
}

#[test]
fn test_export_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_EXPORT_FILE);
    let expenses = vec![
        make_expense("2024-01-05", "Pizza", "Food", dec!(250)),
        make_expense("2024-01-06", "Bus", "Travel", dec!(40)),
    ];
    assert_eq!(export_to_path(&path, &expenses, "₹").unwrap(), 2);
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn test_export_empty_does_not_create_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_EXPORT_FILE);
    assert!(export_to_path(&path, &[], "₹").is_err());
    assert!(!path.exists());
}
