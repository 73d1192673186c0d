//! Pure aggregation over transaction lists, used to back charts and budget progress views.

use crate::model::{BudgetGoal, Transaction, TransactionKind};
use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Total income and expense across a set of transactions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    /// Income minus expense.
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Sums income and expense amounts over `transactions`.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut result = Totals::default();
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => result.income += transaction.amount.value(),
            TransactionKind::Expense => result.expense += transaction.amount.value(),
        }
    }
    result
}

/// Sums expense amounts per category. Income transactions are ignored.
pub fn expense_by_category(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut by_category = BTreeMap::new();
    for transaction in transactions {
        if transaction.kind == TransactionKind::Expense {
            *by_category
                .entry(transaction.category.clone())
                .or_insert(Decimal::ZERO) += transaction.amount.value();
        }
    }
    by_category
}

/// One category's spending measured against its budget goal for a given month.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BudgetProgress {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
}

impl BudgetProgress {
    pub fn over_limit(&self) -> bool {
        self.spent > self.limit
    }

    /// The remaining budget for the month. Negative when over the limit.
    pub fn remaining(&self) -> Decimal {
        self.limit - self.spent
    }
}

/// Measures the given month's expenses against each budget goal. Every goal produces an entry,
/// including goals with no spending. Results are ordered by category name.
pub fn budget_progress(
    transactions: &[Transaction],
    budgets: &[BudgetGoal],
    year: i32,
    month: u32,
) -> Vec<BudgetProgress> {
    let monthly: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .cloned()
        .collect();
    let spent_by_category = expense_by_category(&monthly);

    let mut progress: Vec<BudgetProgress> = budgets
        .iter()
        .map(|goal| BudgetProgress {
            category: goal.category.clone(),
            limit: goal.limit.value(),
            spent: spent_by_category
                .get(&goal.category)
                .copied()
                .unwrap_or(Decimal::ZERO),
        })
        .collect();
    progress.sort_by(|a, b| a.category.cmp(&b.category));
    progress
}
