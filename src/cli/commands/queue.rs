//! Sync queue command implementation.
//!
//! Handles queue management commands: status, list, run, retry, clear.

use colored::Colorize;

use crate::cli::args::{OutputFormat, QueueCommands};
use crate::config::Config;
use crate::error::QuadrantError;
use crate::output::{format_entries, format_stats, to_json};
use crate::storage::{Database, LocalTaskRepository};
use crate::sync::{
    ActionQueue, DrainReport, EntryStatus, RepositoryExecutor, SqliteQueueStore,
};

/// Execute queue subcommands.
pub fn queue(cmd: QueueCommands, format: OutputFormat) -> Result<String, QuadrantError> {
    let mut queue = open_queue()?;

    match cmd {
        QueueCommands::Status => {
            let stats = queue.stats()?;
            format_stats(&stats, format)
        }
        QueueCommands::Run { stop_on_error } => run_queue(&mut queue, stop_on_error, format),
        QueueCommands::List { status, limit } => list_entries(&queue, status, limit, format),
        QueueCommands::Retry { all, id } => retry_entries(&mut queue, all, id, format),
        QueueCommands::Clear { force } => clear_entries(&mut queue, force),
    }
}

fn open_queue() -> Result<ActionQueue<SqliteQueueStore>, QuadrantError> {
    let store = SqliteQueueStore::new(Database::open()?);
    ActionQueue::open(store)
}

/// Drain the queue against the local task repository.
fn run_queue(
    queue: &mut ActionQueue<SqliteQueueStore>,
    stop_on_error: bool,
    format: OutputFormat,
) -> Result<String, QuadrantError> {
    let config = Config::load()?;
    let mut drain_config = config.drain_config();
    drain_config.stop_on_error = drain_config.stop_on_error || stop_on_error;

    let mut repository = LocalTaskRepository::new(Database::open()?);
    let mut executor = RepositoryExecutor::new(&mut repository);
    let report = queue.drain(&mut executor, &drain_config, None)?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "succeeded": report.succeeded,
            "retried": report.retried,
            "failed": report.failed,
            "errors": report.errors,
        })),
        OutputFormat::Pretty => Ok(format_drain_report(&report)),
    }
}

fn list_entries(
    queue: &ActionQueue<SqliteQueueStore>,
    status: Option<String>,
    limit: usize,
    format: OutputFormat,
) -> Result<String, QuadrantError> {
    let status = status.map(|s| parse_status(&s)).transpose()?;
    let mut entries = queue.list_by_status(status)?;
    entries.truncate(limit);
    format_entries(&entries, format)
}

fn retry_entries(
    queue: &mut ActionQueue<SqliteQueueStore>,
    all: bool,
    id: Option<String>,
    format: OutputFormat,
) -> Result<String, QuadrantError> {
    let count = if all {
        queue.reset_all_failed()?
    } else if let Some(id) = id {
        queue.reset_failed(&id)?;
        1
    } else {
        return Err(QuadrantError::Queue(
            "specify an entry id or --all".to_string(),
        ));
    };

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "reset": count })),
        OutputFormat::Pretty => Ok(format!(
            "{} {} reset to pending",
            count,
            if count == 1 { "entry" } else { "entries" }
        )),
    }
}

fn clear_entries(
    queue: &mut ActionQueue<SqliteQueueStore>,
    force: bool,
) -> Result<String, QuadrantError> {
    if !force {
        return Err(QuadrantError::Queue(
            "clearing discards unsynced changes; pass --force to confirm".to_string(),
        ));
    }
    let total = queue.stats()?.total();
    queue.clear()?;
    Ok(format!("Cleared {total} entries"))
}

fn parse_status(input: &str) -> Result<EntryStatus, QuadrantError> {
    match input.to_lowercase().as_str() {
        "pending" => Ok(EntryStatus::Pending),
        "syncing" => Ok(EntryStatus::Syncing),
        "failed" => Ok(EntryStatus::Failed),
        other => Err(QuadrantError::Queue(format!(
            "unknown status filter: {other} (expected pending, syncing, or failed)"
        ))),
    }
}

/// Format a drain report for display.
#[must_use]
pub fn format_drain_report(report: &DrainReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Sync completed: {} entries", report.total()));
    lines.push("─".repeat(40));

    if report.succeeded > 0 {
        lines.push(format!(
            "  {} {}",
            "✓".green(),
            format!("{} succeeded", report.succeeded).green()
        ));
    }
    if report.retried > 0 {
        lines.push(format!(
            "  {} {}",
            "↻".yellow(),
            format!("{} will retry", report.retried).yellow()
        ));
    }
    if report.failed > 0 {
        lines.push(format!(
            "  {} {}",
            "✗".red(),
            format!("{} failed", report.failed).red()
        ));
    }

    let errors: Vec<_> = report.errors.iter().take(3).collect();
    if !errors.is_empty() {
        lines.push(String::new());
        lines.push("Errors:".to_string());
        for error in errors {
            lines.push(format!("  - {error}"));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("pending").unwrap(), EntryStatus::Pending);
        assert_eq!(parse_status("FAILED").unwrap(), EntryStatus::Failed);
        assert!(parse_status("done").is_err());
    }

    #[test]
    fn test_format_drain_report_counts() {
        let report = DrainReport {
            succeeded: 2,
            retried: 1,
            failed: 0,
            errors: vec!["remote unavailable".to_string()],
            next_retry_in: None,
        };
        let text = format_drain_report(&report);
        assert!(text.contains("3 entries"));
        assert!(text.contains("2 succeeded"));
        assert!(text.contains("remote unavailable"));
    }
}
