use serde::{Deserialize, Serialize};

/// Which side of the ledger a category applies to.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
    Both,
}

serde_plain::derive_display_from_serialize!(CategoryKind);
serde_plain::derive_fromstr_from_deserialize!(CategoryKind);

/// A free-form label used to group transactions. No referential constraint is enforced between
/// transactions and categories.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
    /// Hex color used by chart rendering.
    pub color: String,
    /// Icon identifier interpreted by the UI layer.
    pub icon: String,
    pub is_default: bool,
}

/// The fields supplied when creating a category. The id is assigned by the store.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryData {
    pub name: String,
    pub kind: CategoryKind,
    pub color: String,
    pub icon: String,
}

impl CategoryData {
    fn new(name: &str, kind: CategoryKind, color: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color: color.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// The built-in category set seeded for every new owner.
pub fn default_categories() -> Vec<CategoryData> {
    use CategoryKind::*;
    vec![
        CategoryData::new("Salary", Income, "#10b981", "Wallet"),
        CategoryData::new("Freelance", Income, "#3b82f6", "Briefcase"),
        CategoryData::new("Investments", Income, "#8b5cf6", "TrendingUp"),
        CategoryData::new("Gifts", Both, "#f472b6", "Gift"),
        CategoryData::new("Food & Dining", Expense, "#f59e0b", "Utensils"),
        CategoryData::new("Groceries", Expense, "#84cc16", "ShoppingCart"),
        CategoryData::new("Transport", Expense, "#ef4444", "Car"),
        CategoryData::new("Housing", Expense, "#6366f1", "Home"),
        CategoryData::new("Utilities", Expense, "#06b6d4", "Zap"),
        CategoryData::new("Entertainment", Expense, "#ec4899", "Film"),
        CategoryData::new("Health", Expense, "#14b8a6", "Heart"),
        CategoryData::new("Subscriptions", Expense, "#0ea5e9", "CreditCard"),
        CategoryData::new("Travel", Expense, "#f97316", "Plane"),
        CategoryData::new("Other", Both, "#94a3b8", "MoreHorizontal"),
    ]
}
