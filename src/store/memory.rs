//! Implements the store traits using in-memory data.
//!
//! Note: this is compiled even in the "production" version of the library so that the whole
//! tracker can run, top-to-bottom, without a remote document store. It also backs the scheduler
//! tests, including a failure-injection hook for exercising partial-write behavior.

use crate::model::{
    default_categories, BudgetGoal, Category, CategoryData, RecurrenceRule, Transaction,
    TransactionData,
};
use crate::store::{BudgetStore, CategoryStore, RuleStore, TransactionStore};
use crate::Result;
use anyhow::bail;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// All of one owner's documents.
struct OwnerData {
    rules: BTreeMap<String, RecurrenceRule>,
    transactions: BTreeMap<String, Transaction>,
    budgets: BTreeMap<String, BudgetGoal>,
    categories: BTreeMap<String, Category>,
}

impl OwnerData {
    /// A fresh owner starts with the built-in category set, the way a new account is seeded.
    fn new() -> Self {
        let mut categories = BTreeMap::new();
        for data in default_categories() {
            let id = new_id();
            categories.insert(
                id.clone(),
                Category {
                    id,
                    name: data.name,
                    kind: data.kind,
                    color: data.color,
                    icon: data.icon,
                    is_default: true,
                },
            );
        }
        Self {
            rules: BTreeMap::new(),
            transactions: BTreeMap::new(),
            budgets: BTreeMap::new(),
            categories,
        }
    }
}

/// An implementation of all store traits that holds documents in memory, keyed by owner.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<HashMap<String, OwnerData>>,
    /// When non-zero, the next N transaction creates fail. Decremented per failed create.
    failing_creates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls to `create_transaction` fail, to simulate a store outage.
    pub fn fail_next_transaction_creates(&self, count: usize) {
        self.failing_creates.store(count, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, OwnerData>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn owner<'a>(state: &'a mut HashMap<String, OwnerData>, owner_id: &str) -> &'a mut OwnerData {
    state
        .entry(owner_id.to_string())
        .or_insert_with(OwnerData::new)
}

#[async_trait::async_trait]
impl RuleStore for MemoryStore {
    async fn list_rules(&self, owner_id: &str) -> Result<Vec<RecurrenceRule>> {
        let mut state = self.lock();
        Ok(owner(&mut state, owner_id).rules.values().cloned().collect())
    }

    async fn list_active_rules(&self, owner_id: &str) -> Result<Vec<RecurrenceRule>> {
        let mut state = self.lock();
        Ok(owner(&mut state, owner_id)
            .rules
            .values()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }

    async fn create_rule(&self, owner_id: &str, rule: RecurrenceRule) -> Result<String> {
        let mut state = self.lock();
        let id = new_id();
        let record = RecurrenceRule {
            id: id.clone(),
            owner_id: owner_id.to_string(),
            ..rule
        };
        owner(&mut state, owner_id).rules.insert(id.clone(), record);
        Ok(id)
    }

    async fn update_rule_schedule(
        &self,
        owner_id: &str,
        rule_id: &str,
        next_due_date: NaiveDate,
        last_processed_date: Option<NaiveDate>,
    ) -> Result<()> {
        let mut state = self.lock();
        match owner(&mut state, owner_id).rules.get_mut(rule_id) {
            Some(rule) => {
                rule.next_due_date = next_due_date;
                rule.last_processed_date = last_processed_date;
                Ok(())
            }
            None => bail!("no rule '{rule_id}' exists for owner '{owner_id}'"),
        }
    }

    async fn set_rule_active(&self, owner_id: &str, rule_id: &str, active: bool) -> Result<()> {
        let mut state = self.lock();
        match owner(&mut state, owner_id).rules.get_mut(rule_id) {
            Some(rule) => {
                rule.is_active = active;
                Ok(())
            }
            None => bail!("no rule '{rule_id}' exists for owner '{owner_id}'"),
        }
    }

    async fn delete_rule(&self, owner_id: &str, rule_id: &str) -> Result<()> {
        let mut state = self.lock();
        match owner(&mut state, owner_id).rules.remove(rule_id) {
            Some(_) => Ok(()),
            None => bail!("no rule '{rule_id}' exists for owner '{owner_id}'"),
        }
    }
}

#[async_trait::async_trait]
impl TransactionStore for MemoryStore {
    async fn create_transaction(&self, owner_id: &str, data: TransactionData) -> Result<String> {
        if self
            .failing_creates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            bail!("transaction store unavailable (injected failure)");
        }
        let mut state = self.lock();
        let id = new_id();
        let record = Transaction {
            id: id.clone(),
            owner_id: owner_id.to_string(),
            amount: data.amount,
            category: data.category,
            description: data.description,
            kind: data.kind,
            date: data.date,
            created_at: Utc::now(),
        };
        owner(&mut state, owner_id)
            .transactions
            .insert(id.clone(), record);
        Ok(id)
    }

    async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>> {
        let mut state = self.lock();
        let mut transactions: Vec<Transaction> = owner(&mut state, owner_id)
            .transactions
            .values()
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    async fn delete_transaction(&self, owner_id: &str, transaction_id: &str) -> Result<()> {
        let mut state = self.lock();
        match owner(&mut state, owner_id).transactions.remove(transaction_id) {
            Some(_) => Ok(()),
            None => bail!("no transaction '{transaction_id}' exists for owner '{owner_id}'"),
        }
    }
}

#[async_trait::async_trait]
impl BudgetStore for MemoryStore {
    async fn list_budgets(&self, owner_id: &str) -> Result<Vec<BudgetGoal>> {
        let mut state = self.lock();
        Ok(owner(&mut state, owner_id)
            .budgets
            .values()
            .cloned()
            .collect())
    }

    async fn set_budget(&self, owner_id: &str, budget: BudgetGoal) -> Result<()> {
        let mut state = self.lock();
        owner(&mut state, owner_id)
            .budgets
            .insert(budget.category.clone(), budget);
        Ok(())
    }

    async fn remove_budget(&self, owner_id: &str, category: &str) -> Result<()> {
        let mut state = self.lock();
        match owner(&mut state, owner_id).budgets.remove(category) {
            Some(_) => Ok(()),
            None => bail!("no budget for category '{category}' exists for owner '{owner_id}'"),
        }
    }
}

#[async_trait::async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self, owner_id: &str) -> Result<Vec<Category>> {
        let mut state = self.lock();
        Ok(owner(&mut state, owner_id)
            .categories
            .values()
            .cloned()
            .collect())
    }

    async fn create_category(&self, owner_id: &str, data: CategoryData) -> Result<String> {
        let mut state = self.lock();
        let id = new_id();
        let record = Category {
            id: id.clone(),
            name: data.name,
            kind: data.kind,
            color: data.color,
            icon: data.icon,
            is_default: false,
        };
        owner(&mut state, owner_id)
            .categories
            .insert(id.clone(), record);
        Ok(id)
    }

    async fn delete_category(&self, owner_id: &str, category_id: &str) -> Result<()> {
        let mut state = self.lock();
        match owner(&mut state, owner_id).categories.remove(category_id) {
            Some(_) => Ok(()),
            None => bail!("no category '{category_id}' exists for owner '{owner_id}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, CategoryKind, Frequency, TransactionKind};
    use crate::test::{date, rule, transaction_data};
    use rust_decimal_macros::dec;

    const OWNER: &str = "owner-1";

    #[tokio::test]
    async fn test_rule_crud() {
        let store = MemoryStore::new();
        let id = store
            .create_rule(
                OWNER,
                rule("", Frequency::Monthly, date(2024, 1, 1), date(2024, 2, 1)),
            )
            .await
            .unwrap();
        assert!(!id.is_empty());

        let rules = store.list_active_rules(OWNER).await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, id);
        assert_eq!(rules[0].owner_id, OWNER);

        store.set_rule_active(OWNER, &id, false).await.unwrap();
        assert!(store.list_active_rules(OWNER).await.unwrap().is_empty());
        assert_eq!(store.list_rules(OWNER).await.unwrap().len(), 1);

        store.delete_rule(OWNER, &id).await.unwrap();
        assert!(store.list_rules(OWNER).await.unwrap().is_empty());
        assert!(store.delete_rule(OWNER, &id).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_does_not_touch_next_due_date() {
        let store = MemoryStore::new();
        let id = store
            .create_rule(
                OWNER,
                rule("", Frequency::Monthly, date(2024, 1, 1), date(2024, 2, 1)),
            )
            .await
            .unwrap();
        store.set_rule_active(OWNER, &id, false).await.unwrap();
        store.set_rule_active(OWNER, &id, true).await.unwrap();
        let rules = store.list_rules(OWNER).await.unwrap();
        assert_eq!(rules[0].next_due_date, date(2024, 2, 1));
    }

    #[tokio::test]
    async fn test_update_rule_schedule() {
        let store = MemoryStore::new();
        let id = store
            .create_rule(
                OWNER,
                rule("", Frequency::Monthly, date(2024, 1, 1), date(2024, 2, 1)),
            )
            .await
            .unwrap();
        store
            .update_rule_schedule(OWNER, &id, date(2024, 3, 1), Some(date(2024, 2, 15)))
            .await
            .unwrap();
        let rules = store.list_rules(OWNER).await.unwrap();
        assert_eq!(rules[0].next_due_date, date(2024, 3, 1));
        assert_eq!(rules[0].last_processed_date, Some(date(2024, 2, 15)));

        let missing = store
            .update_rule_schedule(OWNER, "nope", date(2024, 3, 1), None)
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_transactions_sorted_by_date_then_created_at() {
        let store = MemoryStore::new();
        store
            .create_transaction(OWNER, transaction_data("older", date(2024, 1, 1)))
            .await
            .unwrap();
        store
            .create_transaction(OWNER, transaction_data("newest", date(2024, 3, 1)))
            .await
            .unwrap();
        store
            .create_transaction(OWNER, transaction_data("middle", date(2024, 2, 1)))
            .await
            .unwrap();

        let transactions = store.list_transactions(OWNER).await.unwrap();
        let descriptions: Vec<&str> = transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = MemoryStore::new();
        store
            .create_transaction("alice", transaction_data("rent", date(2024, 1, 1)))
            .await
            .unwrap();
        assert!(store.list_transactions("bob").await.unwrap().is_empty());
        assert_eq!(store.list_transactions("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.fail_next_transaction_creates(2);
        assert!(store
            .create_transaction(OWNER, transaction_data("a", date(2024, 1, 1)))
            .await
            .is_err());
        assert!(store
            .create_transaction(OWNER, transaction_data("b", date(2024, 1, 1)))
            .await
            .is_err());
        // The third create succeeds.
        assert!(store
            .create_transaction(OWNER, transaction_data("c", date(2024, 1, 1)))
            .await
            .is_ok());
        assert_eq!(store.list_transactions(OWNER).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_budget_upsert_and_remove() {
        let store = MemoryStore::new();
        store
            .set_budget(OWNER, BudgetGoal::new("Groceries", Amount::new(dec!(400))))
            .await
            .unwrap();
        store
            .set_budget(OWNER, BudgetGoal::new("Groceries", Amount::new(dec!(450))))
            .await
            .unwrap();

        let budgets = store.list_budgets(OWNER).await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].limit, Amount::new(dec!(450)));

        store.remove_budget(OWNER, "Groceries").await.unwrap();
        assert!(store.list_budgets(OWNER).await.unwrap().is_empty());
        assert!(store.remove_budget(OWNER, "Groceries").await.is_err());
    }

    #[tokio::test]
    async fn test_new_owner_seeded_with_default_categories() {
        let store = MemoryStore::new();
        let categories = store.list_categories(OWNER).await.unwrap();
        assert!(!categories.is_empty());
        assert!(categories.iter().all(|c| c.is_default));
        assert!(categories.iter().any(|c| c.name == "Groceries"));
    }

    #[tokio::test]
    async fn test_category_create_and_delete() {
        let store = MemoryStore::new();
        let id = store
            .create_category(
                OWNER,
                CategoryData {
                    name: "Hobbies".to_string(),
                    kind: CategoryKind::Expense,
                    color: "#123456".to_string(),
                    icon: "Palette".to_string(),
                },
            )
            .await
            .unwrap();

        let categories = store.list_categories(OWNER).await.unwrap();
        let hobbies = categories.iter().find(|c| c.id == id).unwrap();
        assert_eq!(hobbies.name, "Hobbies");
        assert!(!hobbies.is_default);

        store.delete_category(OWNER, &id).await.unwrap();
        assert!(store
            .list_categories(OWNER)
            .await
            .unwrap()
            .iter()
            .all(|c| c.id != id));
    }

    #[tokio::test]
    async fn test_transaction_kind_defaults() {
        let store = MemoryStore::new();
        let data = transaction_data("salary", date(2024, 1, 31));
        assert_eq!(data.kind, TransactionKind::Expense);
        store.create_transaction(OWNER, data).await.unwrap();
        let transactions = store.list_transactions(OWNER).await.unwrap();
        assert_eq!(transactions[0].kind, TransactionKind::Expense);
    }
}
