//! JSON output formatting for quadrant.

use serde::Serialize;
use serde_json::json;

use crate::core::Task;
use crate::error::QuadrantError;
use crate::sync::{QueueEntry, QueueStats};

/// Format any serializable value as pretty JSON
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, QuadrantError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format tasks as JSON, grouped under a list name
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task], list_name: &str) -> Result<String, QuadrantError> {
    let output = json!({
        "list": list_name,
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format queue entries as JSON
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn format_entries_json(entries: &[QueueEntry]) -> Result<String, QuadrantError> {
    let output = json!({
        "count": entries.len(),
        "entries": entries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format queue statistics as JSON
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn format_stats_json(stats: &QueueStats) -> Result<String, QuadrantError> {
    Ok(serde_json::to_string_pretty(stats)?)
}
