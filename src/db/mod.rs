mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

/// Optional filters for listing expenses. `None` means "all".
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseQuery<'a> {
    /// Date prefix, usually "YYYY-MM".
    pub(crate) month: Option<&'a str>,
    /// Exact category label.
    pub(crate) category: Option<&'a str>,
    /// Substring of the description.
    pub(crate) search: Option<&'a str>,
    pub(crate) limit: Option<u32>,
}

pub(crate) struct Database {
    conn: Connection,
}

const EXPENSE_COLUMNS: &str = "id, amount, description, date, category, created_at";

/// Make `%`, `_` and `\` match literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(1)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        description: row.get(2)?,
        date: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::info!(path = %path.display(), "opened expense store");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying schema migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (amount, description, date, category, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.amount.to_string(),
                expense.description,
                expense.date,
                expense.category,
                expense.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
            params![id],
            expense_from_row,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_expenses(&self, query: &ExpenseQuery<'_>) -> Result<Vec<Expense>> {
        let mut sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(m) = query.month {
            sql.push_str(&format!(
                " AND date LIKE ?{} ESCAPE '\\'",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("{}%", escape_like(m))));
        }
        if let Some(c) = query.category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(c.to_string()));
        }
        if let Some(s) = query.search {
            sql.push_str(&format!(
                " AND description LIKE ?{} ESCAPE '\\'",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{}%", escape_like(s))));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        if let Some(l) = query.limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_all_expenses(&self) -> Result<Vec<Expense>> {
        self.get_expenses(&ExpenseQuery::default())
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    /// Replace the editable fields of expense `id`.
    ///
    /// An unknown id is not an error: the expense is stored as a new record
    /// and the returned id is the new one.
    pub(crate) fn update_expense(&self, id: i64, expense: &Expense) -> Result<i64> {
        let changed = self.conn.execute(
            "UPDATE expenses SET amount = ?1, description = ?2, date = ?3, category = ?4
             WHERE id = ?5",
            params![
                expense.amount.to_string(),
                expense.description,
                expense.date,
                expense.category,
                id,
            ],
        )?;
        if changed == 0 {
            tracing::debug!(id, "expense not found on update, inserting");
            return self.insert_expense(expense);
        }
        Ok(id)
    }

    pub(crate) fn update_expense_category(&self, id: i64, category: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE expenses SET category = ?1 WHERE id = ?2",
            params![category, id],
        )?;
        Ok(())
    }

    pub(crate) fn delete_expense(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Distinct "YYYY-MM" months that have expenses, oldest first.
    pub(crate) fn get_month_options(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(date, 1, 7) FROM expenses
             WHERE length(date) >= 7
             ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Distinct non-empty category labels, sorted.
    pub(crate) fn get_category_options(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT category FROM expenses WHERE category != '' ORDER BY category",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn set_monthly_budget(&self, budget: &MonthlyBudget) -> Result<()> {
        self.conn.execute(
            "INSERT INTO monthly_budgets (month, limit_amount)
             VALUES (?1, ?2)
             ON CONFLICT(month) DO UPDATE SET limit_amount = ?2",
            params![budget.month, budget.limit_amount.to_string()],
        )?;
        Ok(())
    }

    pub(crate) fn get_monthly_budget(&self, month: &str) -> Result<Option<MonthlyBudget>> {
        let result = self.conn.query_row(
            "SELECT month, limit_amount FROM monthly_budgets WHERE month = ?1",
            params![month],
            |row| {
                let amt_str: String = row.get(1)?;
                Ok(MonthlyBudget {
                    month: row.get(0)?,
                    limit_amount: Decimal::from_str(&amt_str).unwrap_or_default(),
                })
            },
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_monthly_budgets(&self) -> Result<Vec<MonthlyBudget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT month, limit_amount FROM monthly_budgets ORDER BY month DESC")?;
        let rows = stmt.query_map([], |row| {
            let amt_str: String = row.get(1)?;
            Ok(MonthlyBudget {
                month: row.get(0)?,
                limit_amount: Decimal::from_str(&amt_str).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn delete_monthly_budget(&self, month: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM monthly_budgets WHERE month = ?1",
            params![month],
        )?;
        Ok(())
    }
}
