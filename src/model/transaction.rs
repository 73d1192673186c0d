use crate::model::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether a transaction adds to or subtracts from the owner's balance.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// A single transaction record.
///
/// `date` is the occurrence instant, not the creation time. `created_at` is the wall-clock
/// creation time, used as the secondary sort key when listing.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    pub owner_id: String,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// The fields supplied when creating a transaction. The id and `created_at` are assigned by the
/// store.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionData {
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
}
