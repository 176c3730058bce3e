mod budget;
mod category;
mod expense;

pub use budget::MonthlyBudget;
pub use category::CoreCategory;
pub use expense::{Expense, MAX_AMOUNT};

#[cfg(test)]
mod tests;
