use crate::model::{Amount, TransactionKind};
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often a recurrence rule produces an occurrence.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

serde_plain::derive_display_from_serialize!(Frequency);
serde_plain::derive_fromstr_from_deserialize!(Frequency);

/// A recurrence definition that generates transactions over time.
///
/// `next_due_date` is the next occurrence that has not yet been materialized. It never moves
/// backwards and is only advanced by the engine. `last_processed_date` is an audit marker for the
/// date through which materialization has been confirmed.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecurrenceRule {
    /// Opaque identifier assigned by the store on creation.
    pub id: String,
    /// The owning user. All store operations are scoped to one owner.
    pub owner_id: String,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    pub frequency: Frequency,
    /// The rule's logical first occurrence.
    pub start_date: NaiveDate,
    /// Invariant: `next_due_date >= start_date`.
    pub next_due_date: NaiveDate,
    pub last_processed_date: Option<NaiveDate>,
    /// Inactive rules are skipped by the scheduler and their `next_due_date` is frozen.
    pub is_active: bool,
}

impl RecurrenceRule {
    /// Checks that a rule loaded from a store is well-formed enough to run through the engine.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            bail!("rule amount must be positive, got {}", self.amount);
        }
        if self.category.trim().is_empty() {
            bail!("rule category must not be empty");
        }
        if self.next_due_date < self.start_date {
            bail!(
                "rule next_due_date {} precedes start_date {}",
                self.next_due_date,
                self.start_date
            );
        }
        Ok(())
    }
}

/// The user-supplied fields for creating a new recurrence rule. The anchor dates
/// (`next_due_date`, `last_processed_date`) are derived at creation time, not supplied.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleData {
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
}

impl RuleData {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            bail!("rule amount must be positive, got {}", self.amount);
        }
        if self.category.trim().is_empty() {
            bail!("rule category must not be empty");
        }
        Ok(())
    }
}
