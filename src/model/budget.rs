use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// A monthly spending limit for one category. Keyed by category name; setting a goal for the same
/// category again replaces the previous limit.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BudgetGoal {
    pub category: String,
    pub limit: Amount,
}

impl BudgetGoal {
    pub fn new(category: impl Into<String>, limit: Amount) -> Self {
        Self {
            category: category.into(),
            limit,
        }
    }
}
