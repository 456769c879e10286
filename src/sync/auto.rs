//! Automatic queue draining.
//!
//! Event-driven, not time-driven: a drain runs when connectivity comes back
//! (Offline -> Online transition) and when a previously scheduled backoff
//! deadline passes. While online with an empty queue nothing fires.
//!
//! A failing entry schedules one whole-queue re-drain at the smallest
//! backoff among the retried entries. That keeps the opportunistic
//! batch-retry behavior of the original design while bounding the cost of
//! sustained failure to one pass per backoff window.

use chrono::{DateTime, Duration, Utc};

use crate::core::NetworkStatus;
use crate::error::QuadrantError;
use crate::state::{StatePatch, StateStore};
use crate::sync::executor::{DrainConfig, DrainReport, EntryExecutor};
use crate::sync::queue::ActionQueue;
use crate::sync::store::QueueStore;

/// Drives drains from network transitions and backoff deadlines.
pub struct AutoSync {
    config: DrainConfig,
    last_status: NetworkStatus,
    retry_at: Option<DateTime<Utc>>,
}

impl AutoSync {
    #[must_use]
    pub const fn new(config: DrainConfig, initial: NetworkStatus) -> Self {
        Self {
            config,
            last_status: initial,
            retry_at: None,
        }
    }

    /// The scheduled re-drain instant, if any.
    #[must_use]
    pub const fn retry_at(&self) -> Option<DateTime<Utc>> {
        self.retry_at
    }

    /// Feed a connectivity transition. Updates the state store's
    /// `network_status` and drains on the Offline -> Online edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue store fails.
    pub fn handle_network_change<S: QueueStore>(
        &mut self,
        status: NetworkStatus,
        queue: &mut ActionQueue<S>,
        executor: &mut dyn EntryExecutor,
        state: &StateStore,
        now: DateTime<Utc>,
    ) -> Result<Option<DrainReport>, QuadrantError> {
        let previous = self.last_status;
        self.last_status = status;
        state.set_state(StatePatch::network(status), "network");

        if previous == NetworkStatus::Offline && status == NetworkStatus::Online {
            tracing::info!("connectivity restored, draining queue");
            return self.run_drain(queue, executor, now).map(Some);
        }
        if status == NetworkStatus::Offline {
            // No point firing backoff retries while offline.
            self.retry_at = None;
        }
        Ok(None)
    }

    /// Host-loop tick. Runs the scheduled re-drain when its deadline has
    /// passed and we are online.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue store fails.
    pub fn tick<S: QueueStore>(
        &mut self,
        queue: &mut ActionQueue<S>,
        executor: &mut dyn EntryExecutor,
        now: DateTime<Utc>,
    ) -> Result<Option<DrainReport>, QuadrantError> {
        if self.last_status != NetworkStatus::Online {
            return Ok(None);
        }
        let due = self.retry_at.is_some_and(|at| now >= at);
        if !due {
            return Ok(None);
        }
        tracing::debug!("backoff deadline reached, re-draining");
        self.run_drain(queue, executor, now).map(Some)
    }

    /// Explicit drain request (manual retry affordance). Ignores backoff
    /// scheduling but still records the next one from the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue store fails.
    pub fn request_drain<S: QueueStore>(
        &mut self,
        queue: &mut ActionQueue<S>,
        executor: &mut dyn EntryExecutor,
        now: DateTime<Utc>,
    ) -> Result<DrainReport, QuadrantError> {
        self.run_drain(queue, executor, now)
    }

    fn run_drain<S: QueueStore>(
        &mut self,
        queue: &mut ActionQueue<S>,
        executor: &mut dyn EntryExecutor,
        now: DateTime<Utc>,
    ) -> Result<DrainReport, QuadrantError> {
        let report = queue.drain(executor, &self.config, None)?;
        self.retry_at = report.next_retry_in.and_then(|backoff| {
            Duration::from_std(backoff)
                .ok()
                .map(|delay| now + delay)
        });
        Ok(report)
    }
}
