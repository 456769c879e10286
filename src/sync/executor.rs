//! Drain algorithm and entry execution.
//!
//! A drain pass processes every pending entry once, in enqueue order:
//! `Pending -> Syncing -> removed` on success, or back to `Pending` with a
//! bumped retry count (and a reported backoff delay) on failure, until the
//! retry budget demotes the entry to `Failed`.
//!
//! Delivery is at-least-once against an idempotent target: the executor is
//! an upsert keyed by the payload's task id, so a duplicate delivery after
//! a retried-but-actually-succeeded attempt is harmless.

use std::time::Duration;

use crate::core::TaskRepository;
use crate::error::QuadrantError;
use crate::sync::entry::{
    AddTaskPayload, DeleteTaskPayload, EntryStatus, MoveTaskPayload, OperationType, QueueEntry,
    UpdateTaskPayload,
};
use crate::sync::queue::ActionQueue;
use crate::sync::store::QueueStore;

/// Executes one queue entry against the remote side.
pub trait EntryExecutor {
    /// Apply the entry. An `Err` counts as a failed attempt and is retried.
    fn execute(&mut self, entry: &QueueEntry) -> Result<(), QuadrantError>;
}

/// Adapter turning a plain closure into an executor; tests and simple
/// hosts rely on this.
pub struct FnExecutor<F>(F);

/// Wrap a closure as an [`EntryExecutor`].
pub fn from_fn<F>(f: F) -> FnExecutor<F>
where
    F: FnMut(&QueueEntry) -> Result<(), QuadrantError>,
{
    FnExecutor(f)
}

impl<F> EntryExecutor for FnExecutor<F>
where
    F: FnMut(&QueueEntry) -> Result<(), QuadrantError>,
{
    fn execute(&mut self, entry: &QueueEntry) -> Result<(), QuadrantError> {
        (self.0)(entry)
    }
}

/// Configuration for a drain pass.
#[derive(Debug, Clone)]
pub struct DrainConfig {
    /// Failed attempts allowed before an entry is demoted to `Failed`.
    pub max_retries: u32,
    /// Abort the pass on the first failure instead of continuing.
    pub stop_on_error: bool,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            stop_on_error: false,
        }
    }
}

/// Progress callback payload, one per processed entry.
#[derive(Debug, Clone)]
pub struct DrainProgress {
    pub entry_id: String,
    pub operation: OperationType,
    pub index: usize,
    pub total: usize,
    pub succeeded: bool,
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Default)]
pub struct DrainReport {
    /// Entries executed and removed.
    pub succeeded: usize,
    /// Entries that failed but stay pending for another pass.
    pub retried: usize,
    /// Entries demoted to `Failed` this pass.
    pub failed: usize,
    /// Error strings, in processing order.
    pub errors: Vec<String>,
    /// Smallest backoff among retried entries: when the next automatic
    /// whole-queue re-drain should run.
    pub next_retry_in: Option<Duration>,
}

impl DrainReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.retried + self.failed
    }

    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.retried == 0 && self.failed == 0
    }
}

impl<S: QueueStore> ActionQueue<S> {
    /// Process every pending entry once, in `(created_at, seq)` order.
    ///
    /// Exclusive access (`&mut self`) statically rules out a second
    /// concurrent drain on the same queue; distinct trigger sources must
    /// share one queue value.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store itself fails; executor failures
    /// are recorded per-entry in the report instead.
    pub fn drain(
        &mut self,
        executor: &mut dyn EntryExecutor,
        config: &DrainConfig,
        mut on_progress: Option<&mut dyn FnMut(&DrainProgress)>,
    ) -> Result<DrainReport, QuadrantError> {
        let pending = self.list_by_status(Some(EntryStatus::Pending))?;
        let total = pending.len();
        let mut report = DrainReport::default();

        tracing::debug!(total, "drain pass started");

        for (index, entry) in pending.into_iter().enumerate() {
            self.mark_syncing(&entry.id)?;

            let result = executor.execute(&entry);
            let succeeded = result.is_ok();
            match result {
                Ok(()) => {
                    self.dequeue(&entry.id)?;
                    report.succeeded += 1;
                }
                Err(error) => {
                    let message = error.to_string();
                    let updated = self.record_failure(&entry.id, &message, config.max_retries)?;
                    if updated.status == EntryStatus::Failed {
                        tracing::warn!(id = %entry.id, error = %message, "entry failed permanently");
                        report.failed += 1;
                    } else {
                        let backoff = Duration::from_millis(updated.backoff_ms());
                        let sooner =
                            report.next_retry_in.map_or(true, |current| backoff < current);
                        if sooner {
                            report.next_retry_in = Some(backoff);
                        }
                        report.retried += 1;
                    }
                    report.errors.push(message);
                }
            }

            if let Some(progress) = on_progress.as_deref_mut() {
                progress(&DrainProgress {
                    entry_id: entry.id.clone(),
                    operation: entry.operation,
                    index,
                    total,
                    succeeded,
                });
            }

            if !succeeded && config.stop_on_error {
                break;
            }
        }

        tracing::debug!(
            succeeded = report.succeeded,
            retried = report.retried,
            failed = report.failed,
            "drain pass finished"
        );
        Ok(report)
    }
}

/// Executes entries against the external task repository.
pub struct RepositoryExecutor<'a, R: TaskRepository> {
    repository: &'a mut R,
}

impl<'a, R: TaskRepository> RepositoryExecutor<'a, R> {
    #[must_use]
    pub fn new(repository: &'a mut R) -> Self {
        Self { repository }
    }
}

impl<R: TaskRepository> EntryExecutor for RepositoryExecutor<'_, R> {
    fn execute(&mut self, entry: &QueueEntry) -> Result<(), QuadrantError> {
        match entry.operation {
            OperationType::AddTask => {
                let data: AddTaskPayload = serde_json::from_str(&entry.payload)?;
                self.repository.upsert_task(&data.task)
            }
            OperationType::UpdateTask => {
                let data: UpdateTaskPayload = serde_json::from_str(&entry.payload)?;
                self.repository.upsert_task(&data.task)
            }
            OperationType::MoveTask => {
                let data: MoveTaskPayload = serde_json::from_str(&entry.payload)?;
                self.repository.upsert_task(&data.task)
            }
            OperationType::DeleteTask => {
                let data: DeleteTaskPayload = serde_json::from_str(&entry.payload)?;
                self.repository.delete_task(&data.id)
            }
        }
    }
}
