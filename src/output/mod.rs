//! Output formatting for quadrant.
//!
//! This module provides formatters for displaying tasks and queue state in
//! pretty and JSON formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::core::Task;
use crate::error::QuadrantError;
use crate::sync::{QueueEntry, QueueStats};

pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    title: &str,
    format: OutputFormat,
) -> Result<String, QuadrantError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title)),
        OutputFormat::Json => format_tasks_json(tasks, title),
    }
}

/// Format queue entries based on output format
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn format_entries(
    entries: &[QueueEntry],
    format: OutputFormat,
) -> Result<String, QuadrantError> {
    match format {
        OutputFormat::Pretty => Ok(format_entries_pretty(entries)),
        OutputFormat::Json => format_entries_json(entries),
    }
}

/// Format queue statistics based on output format
///
/// # Errors
///
/// Returns `QuadrantError::Parse` if JSON serialization fails.
pub fn format_stats(stats: &QueueStats, format: OutputFormat) -> Result<String, QuadrantError> {
    match format {
        OutputFormat::Pretty => Ok(format_stats_pretty(stats)),
        OutputFormat::Json => format_stats_json(stats),
    }
}
