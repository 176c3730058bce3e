use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::planner::{PlanResult, PlanVerdict};

fn group_thousands(int_part: &str) -> String {
    int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_with_places(val: Decimal, symbol: &str, places: u32) -> String {
    let abs = val
        .abs()
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{abs:.prec$}", prec = places as usize);
    let (int_part, dec_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };
    let mut out = String::new();
    if val < Decimal::ZERO && !abs.is_zero() {
        out.push('-');
    }
    out.push_str(symbol);
    out.push(' ');
    out.push_str(&group_thousands(int_part));
    if let Some(d) = dec_part {
        out.push('.');
        out.push_str(d);
    }
    out
}

/// Whole-unit currency display, e.g. `1234.5` with `₹` → `"₹ 1,235"`.
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    format_with_places(val, symbol, 0)
}

/// Two-decimal currency display, e.g. `"₹ 1,234.50"`.
pub(crate) fn format_amount_precise(val: Decimal, symbol: &str) -> String {
    format_with_places(val, symbol, 2)
}

/// One-line verdict shown under a plan.
pub(crate) fn plan_message(plan: &PlanResult, symbol: &str) -> String {
    match plan.verdict() {
        PlanVerdict::Infeasible => format!(
            "With this salary, {} is not possible this month. You need {} more in income or savings.",
            plan.goal_name,
            format_amount(plan.shortfall(), symbol)
        ),
        PlanVerdict::Achievable => format!(
            "Great! If you follow the recommended limits you can afford {} in {}.",
            plan.goal_name, plan.month
        ),
        PlanVerdict::OverBudget => format!(
            "You have already spent {} more than the recommended limit this month. Cut back to reach {}.",
            format_amount(plan.overshoot, symbol),
            plan.goal_name
        ),
    }
}

/// Accepts "YYYY-MM", "YYYY-M", or a bare month number ("3", "03") in `default_year`.
pub(crate) fn normalize_month(input: &str, default_year: &str) -> Option<String> {
    let input = input.trim();
    let candidate = if input.len() <= 2 {
        format!("{default_year}-{input:0>2}")
    } else if let Some((y, m)) = input.split_once('-') {
        if y.len() != 4 || m.is_empty() || m.len() > 2 {
            return None;
        }
        format!("{y}-{m:0>2}")
    } else {
        return None;
    };
    NaiveDate::parse_from_str(&format!("{candidate}-01"), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m").to_string())
}

/// Move a "YYYY-MM" month forwards or backwards by `delta` months.
pub(crate) fn shift_month(month: &str, delta: i32) -> Option<String> {
    let date = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()?;
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }?;
    Some(shifted.format("%Y-%m").to_string())
}

pub(crate) fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
