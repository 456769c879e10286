//! Queue entry types for the offline action queue.
//!
//! Defines the operations that can be queued, their payloads, and the
//! per-entry retry bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Quadrant, Task, TaskFields};

/// Mutating operations the queue can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Create a task.
    AddTask,
    /// Update fields of an existing task.
    UpdateTask,
    /// Delete a task.
    DeleteTask,
    /// Move a task between quadrants.
    MoveTask,
}

impl OperationType {
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::AddTask => "Add Task",
            Self::UpdateTask => "Update Task",
            Self::DeleteTask => "Delete Task",
            Self::MoveTask => "Move Task",
        }
    }

    /// Stable storage code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AddTask => "add_task",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::MoveTask => "move_task",
        }
    }

    /// Parse a storage code, defaulting unknown input to `AddTask`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "update_task" => Self::UpdateTask,
            "delete_task" => Self::DeleteTask,
            "move_task" => Self::MoveTask,
            _ => Self::AddTask,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lifecycle status of a queued entry.
///
/// Entries leave the queue only by successful execution (removal); `Failed`
/// is a soft-terminal state that keeps the entry queryable and retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Waiting for a drain pass.
    Pending,
    /// Held by the current execution attempt. Never outlives one attempt.
    Syncing,
    /// Retry budget exhausted; awaiting manual reset or clear.
    Failed,
}

impl EntryStatus {
    /// Parse a storage code, defaulting unknown input to `Pending`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "syncing" => Self::Syncing,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Pending => "pending",
            Self::Syncing => "syncing",
            Self::Failed => "failed",
        };
        write!(f, "{code}")
    }
}

/// Payload for [`OperationType::AddTask`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskPayload {
    pub task: Task,
}

/// Payload for [`OperationType::UpdateTask`]. Carries the updated record so
/// the remote upsert is idempotent and self-contained.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub task: Task,
    pub fields: TaskFields,
}

/// Payload for [`OperationType::DeleteTask`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskPayload {
    pub id: String,
    pub quadrant: Quadrant,
}

/// Payload for [`OperationType::MoveTask`]. The record snapshot already
/// carries the target quadrant; `from`/`to` record the mapping for
/// diagnostics and conflict inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskPayload {
    pub task: Task,
    pub from: Quadrant,
    pub to: Quadrant,
}

/// A queued entry with retry metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// Opaque unique id, assigned at enqueue time, never reused.
    pub id: String,
    /// Monotonic enqueue sequence; breaks `created_at` ties.
    pub seq: u64,
    pub operation: OperationType,
    /// JSON-encoded operation payload.
    pub payload: String,
    pub status: EntryStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl QueueEntry {
    /// Build a fresh pending entry. Called by the queue at enqueue time.
    #[must_use]
    pub fn new(seq: u64, operation: OperationType, payload: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            seq,
            operation,
            payload,
            status: EntryStatus::Pending,
            retry_count: 0,
            created_at: Utc::now(),
            last_attempt_at: None,
            last_error: None,
        }
    }

    /// Whether another automatic attempt is allowed under `max_retries`.
    #[must_use]
    pub fn should_retry(&self, max_retries: u32) -> bool {
        self.status == EntryStatus::Pending && self.retry_count < max_retries
    }

    /// Exponential backoff before the next automatic re-drain:
    /// `min(1000 * 2^retry_count, 30000)` milliseconds.
    #[must_use]
    pub fn backoff_ms(&self) -> u64 {
        let exp = u32::min(self.retry_count, 16);
        u64::min(1000u64 << exp, 30_000)
    }

    /// Task id targeted by this entry's payload, if extractable.
    #[must_use]
    pub fn target_task_id(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.payload).ok()?;
        if let Some(id) = value.get("id").and_then(|id| id.as_str()) {
            return Some(id.to_string());
        }
        value
            .get("task")
            .and_then(|task| task.get("id"))
            .and_then(|id| id.as_str())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_codes_round_trip() {
        for op in [
            OperationType::AddTask,
            OperationType::UpdateTask,
            OperationType::DeleteTask,
            OperationType::MoveTask,
        ] {
            assert_eq!(OperationType::from_code(op.code()), op);
        }
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [EntryStatus::Pending, EntryStatus::Syncing, EntryStatus::Failed] {
            assert_eq!(EntryStatus::from_code(&status.to_string()), status);
        }
    }

    #[test]
    fn test_new_entry_is_pending_with_zero_retries() {
        let entry = QueueEntry::new(1, OperationType::AddTask, "{}".to_string());
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.retry_count, 0);
        assert!(entry.last_attempt_at.is_none());
        assert!(entry.last_error.is_none());
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut entry = QueueEntry::new(1, OperationType::MoveTask, "{}".to_string());
        entry.retry_count = 1;
        assert_eq!(entry.backoff_ms(), 2000);
        entry.retry_count = 2;
        assert_eq!(entry.backoff_ms(), 4000);
        entry.retry_count = 10;
        assert_eq!(entry.backoff_ms(), 30_000);
    }

    #[test]
    fn test_should_retry_respects_budget_and_status() {
        let mut entry = QueueEntry::new(1, OperationType::AddTask, "{}".to_string());
        assert!(entry.should_retry(3));
        entry.retry_count = 3;
        assert!(!entry.should_retry(3));
        entry.retry_count = 0;
        entry.status = EntryStatus::Failed;
        assert!(!entry.should_retry(3));
    }

    #[test]
    fn test_target_task_id_from_nested_record() {
        use crate::core::{Quadrant, Task};

        let task = Task::new("T", Quadrant::UrgentImportant, 0);
        let payload = serde_json::to_string(&AddTaskPayload { task: task.clone() }).unwrap();
        let entry = QueueEntry::new(1, OperationType::AddTask, payload);
        assert_eq!(entry.target_task_id(), Some(task.id));
    }
}
