use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Expense;

pub(crate) const DEFAULT_EXPORT_FILE: &str = "expenses-export.csv";

/// Write every expense as CSV with all fields quoted.
///
/// Dates carry a leading `'` so spreadsheets keep them as text.
pub(crate) fn write_expenses_csv<W: Write>(
    writer: W,
    expenses: &[Expense],
    currency_symbol: &str,
) -> Result<usize> {
    if expenses.is_empty() {
        anyhow::bail!("No expenses to export");
    }

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    let amount_header = format!("Amount ({currency_symbol})");
    wtr.write_record(["Date", "Description", "Category", amount_header.as_str()])
        .context("Failed to write CSV header")?;

    for exp in expenses {
        let date = if exp.date.is_empty() {
            String::new()
        } else {
            format!("'{}", exp.date)
        };
        let amount = exp.amount.normalize().to_string();
        wtr.write_record([
            date.as_str(),
            exp.description.as_str(),
            exp.category.as_str(),
            amount.as_str(),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(expenses.len())
}

pub(crate) fn export_to_path(path: &Path, expenses: &[Expense], currency_symbol: &str) -> Result<usize> {
    if expenses.is_empty() {
        anyhow::bail!("No expenses to export");
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_expenses_csv(file, expenses, currency_symbol)?;
    tracing::info!(path = %path.display(), count, "exported expenses");
    Ok(count)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
