//! Task commands: add and list.

use crate::cli::args::{AddArgs, OutputFormat, TasksArgs};
use crate::core::{Quadrant, Task, TaskRepository};
use crate::error::QuadrantError;
use crate::output::{format_board_pretty, format_tasks, to_json};
use crate::storage::{Database, LocalTaskRepository};
use crate::sync::{ActionQueue, AddTaskPayload, OperationType, SqliteQueueStore};

/// Queue a new task for creation.
///
/// The task is not written to the repository directly; it lands there on
/// the next queue run, like every other offline mutation.
pub fn add(args: AddArgs, format: OutputFormat) -> Result<String, QuadrantError> {
    let quadrant = Quadrant::parse(&args.quadrant)?;
    let repository = LocalTaskRepository::new(Database::open()?);
    let position = u32::try_from(repository.list_tasks(quadrant)?.len()).unwrap_or(u32::MAX);

    let mut task = Task::new(args.title, quadrant, position);
    if let Some(notes) = args.notes {
        task.notes = notes;
    }

    let store = SqliteQueueStore::new(Database::open()?);
    let mut queue = ActionQueue::open(store)?;
    let entry_id = queue.enqueue(OperationType::AddTask, &AddTaskPayload { task: task.clone() })?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "queued": task,
            "entry": entry_id,
        })),
        OutputFormat::Pretty => Ok(format!(
            "Queued: {} [{}]  (run 'quadrant queue run' to sync)",
            task.title, task.quadrant
        )),
    }
}

/// List repository tasks, grouped by quadrant or for a single quadrant.
pub fn tasks(args: TasksArgs, format: OutputFormat) -> Result<String, QuadrantError> {
    let repository = LocalTaskRepository::new(Database::open()?);

    if let Some(code) = args.quadrant {
        let quadrant = Quadrant::parse(&code)?;
        let tasks = repository.list_tasks(quadrant)?;
        return format_tasks(&tasks, quadrant.label(), format);
    }

    let mut groups = Vec::new();
    for quadrant in Quadrant::ALL {
        groups.push((quadrant, repository.list_tasks(quadrant)?));
    }

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = groups
                .iter()
                .map(|(quadrant, tasks)| {
                    serde_json::json!({
                        "quadrant": quadrant.code(),
                        "label": quadrant.label(),
                        "count": tasks.len(),
                        "items": tasks,
                    })
                })
                .collect();
            to_json(&output)
        }
        OutputFormat::Pretty => Ok(format_board_pretty(&groups)),
    }
}
