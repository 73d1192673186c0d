//! The recurrence engine: pure logic that decides which occurrences of a rule are due and how the
//! rule's anchor dates advance.
//!
//! Nothing in this module performs I/O or reads a clock. The caller captures "now" once and passes
//! it in, so the same `(rule, now)` pair always yields the same output.

use crate::model::{Amount, Frequency, RecurrenceRule, TransactionData, TransactionKind};
use chrono::{Days, Months, NaiveDate};

/// Appended to occurrence descriptions so auto-generated transactions are distinguishable from
/// manually entered ones.
pub const RECURRING_SUFFIX: &str = " (Recurring)";

/// One instance of a rule's recurring event, dated to a period boundary.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
}

impl From<Occurrence> for TransactionData {
    fn from(occurrence: Occurrence) -> Self {
        TransactionData {
            amount: occurrence.amount,
            category: occurrence.category,
            description: occurrence.description,
            kind: occurrence.kind,
            date: occurrence.date,
        }
    }
}

/// The anchor dates for a newly created rule.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InitialSchedule {
    pub next_due_date: NaiveDate,
    pub last_processed_date: NaiveDate,
}

/// Advances a date by one period.
///
/// Monthly and yearly steps clamp to the last day of shorter target months, so Jan 31 + 1 month is
/// Feb 28 (or Feb 29 in a leap year) and Feb 29 + 1 year is Feb 28. Dates at the very end of the
/// supported calendar range clamp to the maximum representable date instead of overflowing.
pub fn advance(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    let next = match frequency {
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    };
    next.unwrap_or(NaiveDate::MAX)
}

/// Computes every occurrence of `rule` that is due on or before `now`, and the rule value as it
/// should be persisted afterwards.
///
/// The cursor starts at `next_due_date` and emits one occurrence per period while it is `<= now`
/// (the boundary instant counts as due). Multiple elapsed periods are caught up in a single call.
/// The returned rule has `next_due_date` set to the first future due date and `last_processed_date`
/// set to `now` only if at least one occurrence was produced; every other field is unchanged.
pub fn compute_due_occurrences(
    rule: &RecurrenceRule,
    now: NaiveDate,
) -> (Vec<Occurrence>, RecurrenceRule) {
    let mut occurrences = Vec::new();
    let mut cursor = rule.next_due_date;

    while cursor <= now {
        occurrences.push(Occurrence {
            date: cursor,
            amount: rule.amount,
            category: rule.category.clone(),
            description: format!("{}{RECURRING_SUFFIX}", rule.description),
            kind: rule.kind,
        });
        let next = advance(cursor, rule.frequency);
        if next <= cursor {
            // Only possible when clamped at the end of the calendar range.
            break;
        }
        cursor = next;
    }

    let mut updated = rule.clone();
    updated.next_due_date = cursor;
    if !occurrences.is_empty() {
        updated.last_processed_date = Some(now);
    }
    (occurrences, updated)
}

/// Computes the anchor dates for a rule that is being created right now.
///
/// The caller is expected to have materialized the occurrence at `start_date` already (the manual
/// add-transaction flow creates the first one immediately), so the rule's first due date is one
/// period after the start and `last_processed_date` records the seed occurrence as accounted for.
pub fn schedule_first_occurrence(start_date: NaiveDate, frequency: Frequency) -> InitialSchedule {
    InitialSchedule {
        next_due_date: advance(start_date, frequency),
        last_processed_date: start_date,
    }
}
