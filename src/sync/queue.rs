//! The durable offline action queue.
//!
//! Every mutating user action becomes a persisted entry here before any
//! network attempt. Entries are drained in enqueue order (see
//! `sync::executor`), retried with backoff, and removed only on successful
//! execution.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::QuadrantError;
use crate::sync::entry::{EntryStatus, OperationType, QueueEntry};
use crate::sync::store::QueueStore;

/// Queue statistics for diagnostics and the "N changes pending" affordance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub pending: usize,
    pub syncing: usize,
    pub failed: usize,
    /// Counts per operation display name.
    pub by_operation: Vec<(String, usize)>,
    pub oldest_pending: Option<DateTime<Utc>>,
}

impl QueueStats {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.syncing + self.failed
    }
}

/// The action queue over a pluggable durable store.
pub struct ActionQueue<S: QueueStore> {
    store: S,
    next_seq: u64,
}

impl<S: QueueStore> ActionQueue<S> {
    /// Open a queue over a store, resuming the sequence counter from the
    /// highest persisted entry so restarts keep FIFO order total.
    ///
    /// An entry may only be `Syncing` for the duration of one execution
    /// attempt; any found here was stranded by a crash mid-attempt and is
    /// reverted to `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn open(store: S) -> Result<Self, QuadrantError> {
        let mut max_seq = 0u64;
        let mut stranded = Vec::new();
        store.iterate(&mut |entry| {
            max_seq = max_seq.max(entry.seq);
            if entry.status == EntryStatus::Syncing {
                stranded.push(entry.id.clone());
            }
        })?;

        let mut queue = Self {
            store,
            next_seq: max_seq + 1,
        };
        for id in stranded {
            tracing::warn!(id = %id, "recovering entry stranded mid-attempt");
            queue.update_entry(&id, |entry| entry.status = EntryStatus::Pending)?;
        }
        Ok(queue)
    }

    /// Persist a new pending entry and return its id.
    ///
    /// Never attempts network execution; a store write failure propagates
    /// immediately (durability cannot be guaranteed, so the action must not
    /// be silently accepted).
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn enqueue(
        &mut self,
        operation: OperationType,
        payload: &impl Serialize,
    ) -> Result<String, QuadrantError> {
        let json = serde_json::to_string(payload)?;
        let entry = QueueEntry::new(self.next_seq, operation, json);
        self.store.set(&entry.id, &entry)?;
        self.next_seq += 1;
        tracing::debug!(id = %entry.id, operation = %operation, "enqueued");
        Ok(entry.id)
    }

    /// Remove an entry unconditionally. Used after successful execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn dequeue(&mut self, id: &str) -> Result<(), QuadrantError> {
        self.store.remove(id)
    }

    /// Fetch one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub fn get(&self, id: &str) -> Result<Option<QueueEntry>, QuadrantError> {
        self.store.get(id)
    }

    /// Entries with the given status (or all), sorted by
    /// `(created_at, seq)` ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub fn list_by_status(
        &self,
        status: Option<EntryStatus>,
    ) -> Result<Vec<QueueEntry>, QuadrantError> {
        let mut entries = Vec::new();
        self.store.iterate(&mut |entry| {
            if status.map_or(true, |s| entry.status == s) {
                entries.push(entry.clone());
            }
        })?;
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        Ok(entries)
    }

    /// Transition an entry to `Syncing` for the duration of one attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unknown or the store write fails.
    pub fn mark_syncing(&mut self, id: &str) -> Result<(), QuadrantError> {
        self.update_entry(id, |entry| {
            entry.status = EntryStatus::Syncing;
            entry.last_attempt_at = Some(Utc::now());
        })
    }

    /// Record a failed attempt: bump `retry_count`, remember the error, and
    /// either revert to `Pending` or demote to `Failed` once the retry
    /// budget is spent.
    ///
    /// Returns the updated entry so callers can schedule backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unknown or the store write fails.
    pub fn record_failure(
        &mut self,
        id: &str,
        error: &str,
        max_retries: u32,
    ) -> Result<QueueEntry, QuadrantError> {
        let mut updated = None;
        self.update_entry(id, |entry| {
            entry.retry_count += 1;
            entry.last_error = Some(error.to_string());
            entry.last_attempt_at = Some(Utc::now());
            entry.status = if entry.retry_count >= max_retries {
                EntryStatus::Failed
            } else {
                EntryStatus::Pending
            };
            updated = Some(entry.clone());
        })?;
        updated.ok_or_else(|| QuadrantError::Queue(format!("unknown entry: {id}")))
    }

    /// Demote an entry to `Failed` directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unknown or the store write fails.
    pub fn mark_failed(&mut self, id: &str, error: &str) -> Result<(), QuadrantError> {
        self.update_entry(id, |entry| {
            entry.status = EntryStatus::Failed;
            entry.last_error = Some(error.to_string());
            entry.last_attempt_at = Some(Utc::now());
        })
    }

    /// Reset a `Failed` entry to `Pending` with a fresh retry budget, for
    /// the manual-retry affordance.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unknown, not `Failed`, or the
    /// store write fails.
    pub fn reset_failed(&mut self, id: &str) -> Result<(), QuadrantError> {
        let Some(entry) = self.store.get(id)? else {
            return Err(QuadrantError::Queue(format!("unknown entry: {id}")));
        };
        if entry.status != EntryStatus::Failed {
            return Err(QuadrantError::Queue(format!(
                "entry {id} is {}, not failed",
                entry.status
            )));
        }
        self.update_entry(id, |entry| {
            entry.status = EntryStatus::Pending;
            entry.retry_count = 0;
            entry.last_error = None;
        })
    }

    /// Reset every `Failed` entry to `Pending`. Returns how many were reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn reset_all_failed(&mut self) -> Result<usize, QuadrantError> {
        let failed = self.list_by_status(Some(EntryStatus::Failed))?;
        for entry in &failed {
            self.reset_failed(&entry.id)?;
        }
        Ok(failed.len())
    }

    /// Counts by status and operation, plus the oldest pending timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub fn stats(&self) -> Result<QueueStats, QuadrantError> {
        let mut pending = 0;
        let mut syncing = 0;
        let mut failed = 0;
        let mut by_operation: Vec<(String, usize)> = Vec::new();
        let mut oldest_pending: Option<DateTime<Utc>> = None;

        self.store.iterate(&mut |entry| {
            match entry.status {
                EntryStatus::Pending => {
                    pending += 1;
                    let older = oldest_pending.map_or(true, |t| entry.created_at < t);
                    if older {
                        oldest_pending = Some(entry.created_at);
                    }
                }
                EntryStatus::Syncing => syncing += 1,
                EntryStatus::Failed => failed += 1,
            }
            let name = entry.operation.display_name().to_string();
            if let Some(slot) = by_operation.iter_mut().find(|(n, _)| *n == name) {
                slot.1 += 1;
            } else {
                by_operation.push((name, 1));
            }
        })?;

        Ok(QueueStats {
            pending,
            syncing,
            failed,
            by_operation,
            oldest_pending,
        })
    }

    /// Number of entries awaiting sync (pending or mid-attempt).
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub fn pending_count(&self) -> Result<usize, QuadrantError> {
        let stats = self.stats()?;
        Ok(stats.pending + stats.syncing)
    }

    /// Remove every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn clear(&mut self) -> Result<(), QuadrantError> {
        self.store.clear()
    }

    /// Consume the queue, returning the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn update_entry(
        &mut self,
        id: &str,
        mutate: impl FnOnce(&mut QueueEntry),
    ) -> Result<(), QuadrantError> {
        let Some(mut entry) = self.store.get(id)? else {
            return Err(QuadrantError::Queue(format!("unknown entry: {id}")));
        };
        mutate(&mut entry);
        self.store.set(id, &entry)
    }
}
