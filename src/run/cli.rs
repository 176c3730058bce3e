use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::categorize::{CategorySuggester, FallbackSuggester};
use crate::config::Config;
use crate::db::{Database, ExpenseQuery};
use crate::export;
use crate::models::{CoreCategory, Expense, MonthlyBudget};
use crate::planner::{self, PlanRequest};
use crate::summary::{self, BudgetStatus, BudgetUsage, SummaryStats};
use crate::ui::util::{current_month, format_amount, format_amount_precise, plan_message, truncate};

const FLAGS: &[&str] = &["--category", "--month", "--search", "--name"];

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], db, config),
        "list" | "ls" => cli_list(&args[2..], db, config),
        "suggest" => cli_suggest(&args[2..], db, config),
        "budget" => cli_budget(&args[2..], db, config),
        "plan" => cli_plan(&args[2..], db, config),
        "export" => cli_export(&args[2..], db, config),
        "summary" | "s" => cli_summary(&args[2..], db, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendwise {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SpendWise - expense tracker and purchase planner");
    println!();
    println!("Usage: spendwise [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  add <YYYY-MM-DD> <amount> <desc>    Record an expense");
    println!("    --category <name>                 Category (default: suggested)");
    println!("  list                                List expenses, newest first");
    println!("    --month <YYYY-MM>                 Only this month");
    println!("    --category <name>                 Only this category");
    println!("    --search <text>                   Description contains text");
    println!("  suggest <description>               Suggest a category");
    println!("  budget [YYYY-MM] [amount]           List, show or set monthly budgets");
    println!("  plan <salary> <goal amount>         Plan spending to afford a goal");
    println!("    --month <YYYY-MM>                 Target month (default: current)");
    println!("    --name <goal>                     Goal name");
    println!("  export [path]                       Export all expenses to CSV");
    println!("  summary [YYYY-MM]                   Print spending summary");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither a known flag nor a flag's value.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if FLAGS.contains(&arg.as_str()) {
            skip = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positional(args);
    if pos.len() < 3 {
        anyhow::bail!("Usage: spendwise add <YYYY-MM-DD> <amount> <description> [--category <name>]");
    }
    let description = pos[2..].join(" ");
    let category = flag_value(args, "--category").unwrap_or("");
    let mut expense = Expense::from_input(pos[1], &description, pos[0], category)?;

    if expense.category.is_empty() {
        let history = db.get_all_expenses()?;
        let suggester = FallbackSuggester::from_config(config, &history);
        match suggester.suggest(&expense.description, expense.amount) {
            Ok(s) => {
                println!("Suggested category: {} ({})", s.category, s.source);
                expense.category = s.category;
            }
            Err(e) => tracing::warn!(error = %e, "no category suggestion"),
        }
    }

    let id = db.insert_expense(&expense)?;
    tracing::info!(id, "expense added from cli");
    println!(
        "Added #{id}: {} {} {} [{}]",
        expense.date,
        format_amount_precise(expense.amount, &config.currency_symbol),
        expense.description,
        expense.category
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let expenses = db.get_expenses(&ExpenseQuery {
        month: flag_value(args, "--month"),
        category: flag_value(args, "--category"),
        search: flag_value(args, "--search"),
        limit: None,
    })?;
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!("{:<5} {:<11} {:>12}  {:<30} Category", "ID", "Date", "Amount", "Description");
    println!("{}", "─".repeat(72));
    for exp in &expenses {
        println!(
            "{:<5} {:<11} {:>12}  {:<30} {}",
            exp.id.unwrap_or(0),
            exp.date,
            format_amount_precise(exp.amount, &config.currency_symbol),
            truncate(&exp.description, 30),
            exp.category,
        );
    }
    let total = summary::total_amount(&expenses);
    println!("{}", "─".repeat(72));
    println!(
        "{} expenses, total {}",
        expenses.len(),
        format_amount(total, &config.currency_symbol)
    );
    Ok(())
}

fn cli_suggest(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let description = args.join(" ");
    if description.trim().is_empty() {
        anyhow::bail!("Usage: spendwise suggest <description>");
    }
    let history = db.get_all_expenses()?;
    let suggester = FallbackSuggester::from_config(config, &history);
    let suggestion = suggester.suggest(&description, rust_decimal::Decimal::ZERO)?;
    println!("{} ({})", suggestion.category, suggestion.source);
    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let Some(month) = args.first() else {
        return list_budgets(db, config);
    };
    if crate::ui::util::normalize_month(month, "").as_deref() != Some(month.as_str()) {
        anyhow::bail!("Invalid month '{month}', expected YYYY-MM");
    }

    if let Some(raw) = args.get(1) {
        let amount = planner::parse_amount("budget", raw)?;
        if amount <= rust_decimal::Decimal::ZERO {
            anyhow::bail!("Budget must be a positive number");
        }
        db.set_monthly_budget(&MonthlyBudget::new(month.clone(), amount))?;
        println!(
            "Budget for {month} set to {}",
            format_amount(amount, &config.currency_symbol)
        );
        return Ok(());
    }

    let Some(budget) = db.get_monthly_budget(month)? else {
        println!("No budget set for {month}");
        return Ok(());
    };
    let spent = summary::month_total(&db.get_all_expenses()?, month);
    let usage = BudgetUsage::new(spent, budget.limit_amount);
    let symbol = &config.currency_symbol;
    println!("Budget for {month}");
    println!("{}", "─".repeat(40));
    println!("  Budget:  {}", format_amount(budget.limit_amount, symbol));
    println!("  Spent:   {}", format_amount(spent, symbol));
    println!("  Used:    {}%", usage.used_pct.round());
    match usage.status() {
        BudgetStatus::Exceeded => println!("  Budget exceeded!"),
        BudgetStatus::Warning => println!("  Warning: more than 80% of the budget is used"),
        BudgetStatus::Ok => {}
    }
    Ok(())
}

fn list_budgets(db: &mut Database, config: &Config) -> Result<()> {
    let budgets = db.get_monthly_budgets()?;
    if budgets.is_empty() {
        println!("No budgets set");
        return Ok(());
    }
    let all = db.get_all_expenses()?;
    println!("{:<10} {:>12} {:>12} {:>6}", "Month", "Budget", "Spent", "Used");
    println!("{}", "─".repeat(43));
    for budget in &budgets {
        let usage = BudgetUsage::new(summary::month_total(&all, &budget.month), budget.limit_amount);
        println!(
            "{:<10} {:>12} {:>12} {:>5}%",
            budget.month,
            format_amount(budget.limit_amount, &config.currency_symbol),
            format_amount(usage.spent, &config.currency_symbol),
            usage.used_pct.round(),
        );
    }
    Ok(())
}

fn cli_plan(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positional(args);
    if pos.len() < 2 {
        anyhow::bail!("Usage: spendwise plan <salary> <goal amount> [--month <YYYY-MM>] [--name <goal>]");
    }
    let salary = planner::parse_amount("salary", pos[0])?;
    let goal_amount = planner::parse_amount("goal amount", pos[1])?;
    let month = flag_value(args, "--month")
        .map(str::to_string)
        .unwrap_or_else(current_month);
    let goal_name = flag_value(args, "--name").unwrap_or(planner::DEFAULT_GOAL_NAME);

    let history = db.get_all_expenses()?;
    let plan = planner::compute_plan(&PlanRequest {
        salary,
        goal_amount,
        target_month: &month,
        goal_name,
        historical_expenses: &history,
    })?;

    let symbol = &config.currency_symbol;
    println!("Plan for {} in {}", plan.goal_name, plan.month);
    println!("{}", "─".repeat(40));
    println!("  Salary:          {}", format_amount(plan.salary, symbol));
    println!("  Goal:            {}", format_amount(plan.goal_amount, symbol));
    println!("  Leftover:        {}", format_amount(plan.leftover, symbol));
    println!("  Spent so far:    {}", format_amount(plan.spent_so_far, symbol));
    println!("  Total budgeted:  {}", format_amount(plan.total_budgeted(), symbol));
    println!();
    println!("Recommended maximum spending this month:");
    for cat in CoreCategory::all() {
        println!("  {:<12} {}", cat.as_str(), format_amount(plan.budget_for(*cat), symbol));
    }
    println!();
    println!("{}", plan_message(&plan, symbol));
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(export::DEFAULT_EXPORT_FILE)
        });

    let expenses = db.get_all_expenses()?;
    let count = export::export_to_path(&output_path, &expenses, &config.currency_symbol)
        .with_context(|| format!("Export to {} failed", output_path.display()))?;
    println!("Exported {count} expenses to {}", output_path.display());
    Ok(())
}

fn cli_summary(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let month = args.first().filter(|a| !a.starts_with('-')).cloned();
    let all = db.get_all_expenses()?;
    let scoped: Vec<Expense> = match &month {
        Some(m) => all.iter().filter(|e| e.in_month(m)).cloned().collect(),
        None => all.clone(),
    };
    let stats = SummaryStats::from_expenses(&scoped);
    let symbol = &config.currency_symbol;

    println!("SpendWise - {}", month.as_deref().unwrap_or("all months"));
    println!("{}", "─".repeat(40));
    println!("  Total Spent: {}", format_amount(stats.total, symbol));
    println!("  Food:        {}", format_amount(stats.food, symbol));
    println!("  Bills:       {}", format_amount(stats.bills, symbol));
    println!("  Travel:      {}", format_amount(stats.travel, symbol));
    println!("  Shopping:    {}", format_amount(stats.shopping, symbol));
    println!("  Expenses:    {}", scoped.len());

    let by_category = summary::spending_by_category(&scoped);
    if !by_category.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &by_category {
            println!("  {name:<24} {}", format_amount(*amount, symbol));
        }
    }

    if month.is_none() {
        let monthly = summary::monthly_totals(&all);
        if !monthly.is_empty() {
            println!();
            println!("Monthly Totals:");
            for (m, amount) in &monthly {
                println!("  {m:<10} {}", format_amount(*amount, symbol));
            }
        }
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
