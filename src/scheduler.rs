//! Orchestrates the recurrence engine against live stores.
//!
//! The engine itself is pure, so this is where the clock is read, where store failures are
//! handled, and where concurrent invocations are fenced off. The in-flight guard is process-local:
//! two tabs in one process cannot double-run a pass, but two separate devices can, and the worst
//! case there is a duplicated occurrence set because transaction creates are append-only.

use crate::engine;
use crate::model::{RecurrenceRule, RuleData};
use crate::store::{RuleStore, TransactionStore};
use crate::Result;
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// The outcome of one scheduler pass, for observability. Per-rule failures are logged, not
/// surfaced; a skipped pass is a no-op, not an error.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct PassReport {
    /// Rules whose occurrences were created and whose schedule was advanced.
    pub rules_processed: usize,
    /// Total transactions created across all rules.
    pub occurrences_created: usize,
    /// Rules skipped due to validation failure or aborted due to a store failure. These retry on
    /// the next pass.
    pub rules_failed: usize,
    /// True when the pass did not run at all (already in flight, or already ran this session).
    pub skipped: bool,
}

impl PassReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Runs the recurrence engine for an owner's active rules and persists the results.
#[derive(Clone)]
pub struct Scheduler {
    rules: Arc<dyn RuleStore>,
    transactions: Arc<dyn TransactionStore>,
    /// Owners with a pass currently in flight. Guards against concurrent re-entry within this
    /// process; entries are removed by `PassGuard` on every exit path.
    in_flight: Arc<Mutex<HashSet<String>>>,
    /// Owners for whom the automatic pass has already run this session.
    processed: Arc<Mutex<HashSet<String>>>,
}

impl Scheduler {
    pub fn new(rules: Arc<dyn RuleStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            rules,
            transactions,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            processed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Creates a recurrence rule from user-supplied data and returns the assigned id.
    ///
    /// The rule's first due date is one period after `start_date`: the caller is expected to have
    /// created the seed transaction itself, and scheduling the start date again would double it.
    pub async fn create_rule(&self, owner_id: &str, data: RuleData) -> Result<String> {
        data.validate().context("cannot create recurrence rule")?;
        let schedule = engine::schedule_first_occurrence(data.start_date, data.frequency);
        let rule = RecurrenceRule {
            id: String::new(), // assigned by the store
            owner_id: owner_id.to_string(),
            amount: data.amount,
            category: data.category,
            description: data.description,
            kind: data.kind,
            frequency: data.frequency,
            start_date: data.start_date,
            next_due_date: schedule.next_due_date,
            last_processed_date: Some(schedule.last_processed_date),
            is_active: true,
        };
        self.rules.create_rule(owner_id, rule).await
    }

    /// Materializes every due occurrence for the owner's active rules.
    ///
    /// Runs at most once per owner per `Scheduler` lifetime; later calls are no-ops. The latch is
    /// consumed up front, so it is spent even when the pass itself is dropped because another pass
    /// for the owner is in flight. Intended for the automatic invocation on app load. Use
    /// [`Self::force_process_due_transactions`] for a user-triggered refresh.
    pub async fn process_due_transactions(&self, owner_id: &str) -> Result<PassReport> {
        {
            let mut processed = lock(&self.processed);
            if !processed.insert(owner_id.to_string()) {
                debug!("automatic pass already ran for owner {owner_id} this session");
                return Ok(PassReport::skipped());
            }
        }
        self.run_pass(owner_id).await
    }

    /// Same as [`Self::process_due_transactions`] but without the once-per-session latch. A forced
    /// pass while another pass is in flight is still dropped, not queued.
    pub async fn force_process_due_transactions(&self, owner_id: &str) -> Result<PassReport> {
        self.run_pass(owner_id).await
    }

    async fn run_pass(&self, owner_id: &str) -> Result<PassReport> {
        let Some(_guard) = PassGuard::try_acquire(&self.in_flight, owner_id) else {
            debug!("a pass for owner {owner_id} is already in flight, skipping");
            return Ok(PassReport::skipped());
        };

        // Captured once so every rule in this pass sees the same "now".
        let now = Utc::now().date_naive();
        let rules = self
            .rules
            .list_active_rules(owner_id)
            .await
            .with_context(|| format!("failed to list active rules for owner {owner_id}"))?;

        let mut report = PassReport::default();
        for rule in &rules {
            if let Err(e) = rule.validate() {
                warn!("skipping invalid rule {}: {e:#}", rule.id);
                report.rules_failed += 1;
                continue;
            }
            match self.process_rule(owner_id, rule, now).await {
                Ok(created) => {
                    report.rules_processed += 1;
                    report.occurrences_created += created;
                }
                Err(e) => {
                    // The rule's schedule was not advanced, so the next pass retries it.
                    error!("rule {} failed and will be retried next pass: {e:#}", rule.id);
                    report.rules_failed += 1;
                }
            }
        }

        if report.occurrences_created > 0 {
            info!(
                "created {} recurring transactions across {} rules for owner {owner_id}",
                report.occurrences_created, report.rules_processed
            );
        }
        Ok(report)
    }

    /// Creates all of one rule's due occurrences, then advances the rule's schedule.
    ///
    /// The rule update is persisted only after every occurrence create has succeeded: a stale
    /// `next_due_date` is recoverable (the next pass catches up), a silently skipped occurrence is
    /// not. A partially created batch is not rolled back, so a retry after failure can duplicate
    /// the occurrences that did land.
    async fn process_rule(
        &self,
        owner_id: &str,
        rule: &RecurrenceRule,
        now: NaiveDate,
    ) -> Result<usize> {
        let (occurrences, updated) = engine::compute_due_occurrences(rule, now);
        if occurrences.is_empty() {
            return Ok(0);
        }

        let count = occurrences.len();
        for occurrence in occurrences {
            let date = occurrence.date;
            self.transactions
                .create_transaction(owner_id, occurrence.into())
                .await
                .with_context(|| {
                    format!("failed to create occurrence dated {date} of rule {}", rule.id)
                })?;
        }

        self.rules
            .update_rule_schedule(
                owner_id,
                &rule.id,
                updated.next_due_date,
                updated.last_processed_date,
            )
            .await
            .with_context(|| format!("failed to advance schedule of rule {}", rule.id))?;
        debug!(
            "rule {} advanced to {} after {count} occurrences",
            rule.id, updated.next_due_date
        );
        Ok(count)
    }
}

fn lock<'a>(set: &'a Mutex<HashSet<String>>) -> MutexGuard<'a, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks an owner as in flight for the lifetime of a pass. Dropping the guard releases the owner,
/// which covers early returns and error paths alike.
struct PassGuard {
    owner_id: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl PassGuard {
    fn try_acquire(in_flight: &Arc<Mutex<HashSet<String>>>, owner_id: &str) -> Option<Self> {
        let mut set = lock(in_flight);
        if !set.insert(owner_id.to_string()) {
            return None;
        }
        Some(Self {
            owner_id: owner_id.to_string(),
            in_flight: Arc::clone(in_flight),
        })
    }
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.owner_id);
    }
}
