//! Boundary traits for external collaborators.
//!
//! The core never talks to a concrete remote store, platform connectivity
//! API, or storage engine directly; it consumes these seams. Hosts and tests
//! supply implementations (see `storage::LocalTaskRepository` and the mock
//! repository generated for tests).

use serde::{Deserialize, Serialize};

use crate::core::task::{Quadrant, Task};
use crate::error::QuadrantError;

/// The remote task repository executed against by the sync queue.
///
/// `upsert_task` and `delete_task` must be idempotent under repeated
/// application with the same payload: the queue delivers at-least-once and
/// relies on the target absorbing duplicates.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    /// Create or replace a task record, keyed by `task.id`.
    fn upsert_task(&mut self, task: &Task) -> Result<(), QuadrantError>;

    /// Delete a task record. Deleting an absent id is not an error.
    fn delete_task(&mut self, id: &str) -> Result<(), QuadrantError>;

    /// Fetch a single task record.
    fn get_task(&self, id: &str) -> Result<Option<Task>, QuadrantError>;

    /// List all tasks in a quadrant, ordered by position.
    fn list_tasks(&self, quadrant: Quadrant) -> Result<Vec<Task>, QuadrantError>;
}

/// Platform connectivity, queryable synchronously.
///
/// Transition events are delivered to `sync::AutoSync` by the host loop;
/// this trait only answers "what is the status right now".
pub trait NetworkSignal {
    fn status(&self) -> NetworkStatus;
}

/// Connectivity state driving queue drain decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Online,
    Offline,
}

impl NetworkStatus {
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// A manually driven connectivity signal.
///
/// Hosts without a real platform signal (the terminal board, tests) toggle
/// this and forward the transition to `AutoSync` themselves.
#[derive(Debug, Clone)]
pub struct ManualNetworkSignal {
    status: NetworkStatus,
}

impl ManualNetworkSignal {
    #[must_use]
    pub const fn new(status: NetworkStatus) -> Self {
        Self { status }
    }

    /// Flip the status, returning the new value.
    pub fn toggle(&mut self) -> NetworkStatus {
        self.status = match self.status {
            NetworkStatus::Online => NetworkStatus::Offline,
            NetworkStatus::Offline => NetworkStatus::Online,
        };
        self.status
    }

    pub fn set(&mut self, status: NetworkStatus) {
        self.status = status;
    }
}

impl NetworkSignal for ManualNetworkSignal {
    fn status(&self) -> NetworkStatus {
        self.status
    }
}
