//! Abstract contracts for the document stores the core consumes.
//!
//! The tracker treats its storage as an opaque document database: the scheduler and the UI layer
//! only ever talk to these traits. Whether the backing implementation pushes changes or is polled
//! is its own business. `MemoryStore` implements every trait and is compiled even in the
//! "production" build so the whole library can run, top-to-bottom, without a remote store.

mod memory;

use crate::model::{
    BudgetGoal, Category, CategoryData, RecurrenceRule, Transaction, TransactionData,
};
use crate::Result;
use chrono::NaiveDate;

pub use memory::MemoryStore;

/// Storage for recurrence rules, scoped to one owner per call.
#[async_trait::async_trait]
pub trait RuleStore: Send + Sync {
    /// Returns all of the owner's rules, active or not. No ordering is guaranteed.
    async fn list_rules(&self, owner_id: &str) -> Result<Vec<RecurrenceRule>>;

    /// Returns the owner's rules with `is_active = true`. No ordering is guaranteed.
    async fn list_active_rules(&self, owner_id: &str) -> Result<Vec<RecurrenceRule>>;

    /// Appends a rule record, ignoring `rule.id`, and returns the assigned id.
    async fn create_rule(&self, owner_id: &str, rule: RecurrenceRule) -> Result<String>;

    /// Partially updates a rule's anchor dates. Last write wins; no concurrency token is used.
    async fn update_rule_schedule(
        &self,
        owner_id: &str,
        rule_id: &str,
        next_due_date: NaiveDate,
        last_processed_date: Option<NaiveDate>,
    ) -> Result<()>;

    /// Pauses or resumes a rule. Does not touch `next_due_date`.
    async fn set_rule_active(&self, owner_id: &str, rule_id: &str, active: bool) -> Result<()>;

    /// Removes the rule permanently. Transactions it already materialized are not retracted.
    async fn delete_rule(&self, owner_id: &str, rule_id: &str) -> Result<()>;
}

/// Storage for transaction records, scoped to one owner per call.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// Appends one transaction record and returns the assigned id. Append-only: calling this twice
    /// with the same data creates two records.
    async fn create_transaction(&self, owner_id: &str, data: TransactionData) -> Result<String>;

    /// Returns the owner's transactions ordered by date descending, then creation time descending.
    async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>>;

    async fn delete_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<()>;
}

/// Storage for monthly budget goals, keyed by category name.
#[async_trait::async_trait]
pub trait BudgetStore: Send + Sync {
    async fn list_budgets(&self, owner_id: &str) -> Result<Vec<BudgetGoal>>;

    /// Creates or replaces the goal for `budget.category`.
    async fn set_budget(&self, owner_id: &str, budget: BudgetGoal) -> Result<()>;

    async fn remove_budget(&self, owner_id: &str, category: &str) -> Result<()>;
}

/// Storage for transaction categories.
#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self, owner_id: &str) -> Result<Vec<Category>>;

    async fn create_category(&self, owner_id: &str, data: CategoryData) -> Result<String>;

    async fn delete_category(&self, owner_id: &str, category_id: &str) -> Result<()>;
}
