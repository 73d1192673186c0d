//! Types that represent the core data model, such as `RecurrenceRule` and `Transaction`.
mod amount;
mod budget;
mod category;
mod rule;
mod transaction;

pub use amount::Amount;
pub use budget::BudgetGoal;
pub use category::{default_categories, Category, CategoryData, CategoryKind};
pub use rule::{Frequency, RecurrenceRule, RuleData};
pub use transaction::{Transaction, TransactionData, TransactionKind};
