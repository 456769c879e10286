use chrono::Utc;
use colored::Colorize;

use crate::core::{Quadrant, Task};
use crate::sync::{EntryStatus, QueueEntry, QueueStats};

/// Format a list of tasks as a pretty table
pub fn format_tasks_pretty(tasks: &[Task], title: &str) -> String {
    if tasks.is_empty() {
        return format!("{} (0 items)\n  No items", title);
    }

    let mut output = format!("{} ({} items)\n", title, tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let mut line = format!(
            "{} {}",
            format!("[{}]", task.quadrant).cyan(),
            task.title.bold()
        );
        if !task.notes.is_empty() {
            line.push_str(&format!("  {}", task.notes.dimmed()));
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format tasks grouped by quadrant
pub fn format_board_pretty(groups: &[(Quadrant, Vec<Task>)]) -> String {
    let mut output = String::new();

    for (quadrant, tasks) in groups {
        output.push_str(&format!(
            "{} {}\n",
            quadrant.label().bold(),
            format!("({})", tasks.len()).dimmed()
        ));
        if tasks.is_empty() {
            output.push_str(&format!("  {}\n", "empty".dimmed()));
        }
        for task in tasks {
            output.push_str(&format!("  • {}\n", task.title));
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Format queue entries as a pretty list
pub fn format_entries_pretty(entries: &[QueueEntry]) -> String {
    if entries.is_empty() {
        return "Queue is empty".to_string();
    }

    let mut output = format!("Queue ({} entries)\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let status = match entry.status {
            EntryStatus::Pending => "pending".yellow(),
            EntryStatus::Syncing => "syncing".blue(),
            EntryStatus::Failed => "failed".red(),
        };

        let mut line = format!(
            "{} {} {}",
            status,
            entry.operation.to_string().bold(),
            entry.id.dimmed()
        );
        if entry.retry_count > 0 {
            line.push_str(&format!("  {}", format!("retries: {}", entry.retry_count).dimmed()));
        }
        if let Some(error) = &entry.last_error {
            line.push_str(&format!("\n    {}", error.red()));
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format queue statistics
pub fn format_stats_pretty(stats: &QueueStats) -> String {
    let mut lines = Vec::new();

    lines.push("Sync Queue Status".bold().to_string());
    lines.push("─".repeat(40));

    lines.push(format!(
        "  Pending:  {} {}",
        stats.pending,
        if stats.pending > 0 {
            "changes waiting".dimmed()
        } else {
            "".dimmed()
        }
    ));
    lines.push(format!("  Syncing:  {}", stats.syncing));
    lines.push(format!(
        "  Failed:   {} {}",
        stats.failed,
        if stats.failed > 0 {
            "need attention".red()
        } else {
            "".normal()
        }
    ));

    if !stats.by_operation.is_empty() {
        lines.push(String::new());
        for (operation, count) in &stats.by_operation {
            lines.push(format!("  {}: {}", operation.dimmed(), count));
        }
    }

    if let Some(oldest) = stats.oldest_pending {
        let age = Utc::now().signed_duration_since(oldest);
        let age_str = if age.num_hours() > 0 {
            format!("{} hours ago", age.num_hours())
        } else if age.num_minutes() > 0 {
            format!("{} minutes ago", age.num_minutes())
        } else {
            "just now".to_string()
        };
        lines.push(format!("  Oldest:   {}", age_str.dimmed()));
    }

    if stats.pending > 0 {
        lines.push(String::new());
        lines.push(
            "Run 'quadrant queue run' to execute pending changes"
                .dimmed()
                .to_string(),
        );
    }

    lines.join("\n")
}
