//! End-to-end offline sync flow.
//!
//! Drives the full loop with real components: optimistic state updates
//! while offline, a durable queue that survives reopening, and a drain on
//! reconnect that lands the changes in the task repository.

use std::rc::Rc;

use chrono::Utc;

use quadrant::core::{NetworkStatus, Quadrant, Task, TaskRepository};
use quadrant::state::{AppState, StateStore};
use quadrant::storage::{Database, LocalTaskRepository};
use quadrant::sync::{
    ActionQueue, AutoSync, DrainConfig, EntryStatus, OperationType, RepositoryExecutor,
    SqliteQueueStore, SyncOrchestrator, TaskIntent,
};

fn open_queue(dir: &std::path::Path) -> ActionQueue<SqliteQueueStore> {
    let db = Database::open_at(&dir.join("quadrant.db")).unwrap();
    ActionQueue::open(SqliteQueueStore::new(db)).unwrap()
}

#[test]
fn test_offline_move_syncs_on_reconnect() {
    let dir = tempfile::TempDir::new().unwrap();
    let queue = open_queue(dir.path());
    let state = Rc::new(StateStore::new(AppState::default()));
    let mut orchestrator = SyncOrchestrator::new(queue, Rc::clone(&state));

    // Create task T in q1, then drag it to q2, all while offline.
    let task = Task::new("T", Quadrant::UrgentImportant, 0);
    let task_id = task.id.clone();
    orchestrator.apply(TaskIntent::Add { task }).unwrap();
    orchestrator
        .apply(TaskIntent::Move {
            id: task_id.clone(),
            from: Quadrant::UrgentImportant,
            to: Quadrant::ImportantOnly,
        })
        .unwrap();

    // The state store shows T under q2 immediately (optimistic).
    let snapshot = state.get_state();
    assert!(snapshot.tasks[&Quadrant::UrgentImportant].is_empty());
    assert_eq!(snapshot.tasks[&Quadrant::ImportantOnly][0].id, task_id);

    // The queue holds the pending entries, move last.
    let pending = orchestrator
        .queue()
        .list_by_status(Some(EntryStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[1].operation, OperationType::MoveTask);

    // Network comes online: the queue drains into the repository.
    let mut repository =
        LocalTaskRepository::new(Database::open_at(&dir.path().join("repo.db")).unwrap());
    let mut auto = AutoSync::new(DrainConfig::default(), NetworkStatus::Offline);
    let mut executor = RepositoryExecutor::new(&mut repository);
    let report = auto
        .handle_network_change(
            NetworkStatus::Online,
            orchestrator.queue_mut(),
            &mut executor,
            &state,
            Utc::now(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(report.succeeded, 2);
    assert!(orchestrator.queue().list_by_status(None).unwrap().is_empty());

    // The repository reflects T under q2.
    let remote = repository.get_task(&task_id).unwrap().unwrap();
    assert_eq!(remote.quadrant, Quadrant::ImportantOnly);
    assert!(state.get_state().network_status.is_online());
}

#[test]
fn test_queue_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    let entry_id = {
        let queue = open_queue(dir.path());
        let state = Rc::new(StateStore::new(AppState::default()));
        let mut orchestrator = SyncOrchestrator::new(queue, state);
        orchestrator
            .apply(TaskIntent::Add {
                task: Task::new("Persistent", Quadrant::UrgentOnly, 0),
            })
            .unwrap()
    };

    // A fresh process over the same file sees the entry, still pending.
    let queue = open_queue(dir.path());
    let entries = queue.list_by_status(Some(EntryStatus::Pending)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, entry_id);
    assert_eq!(entries[0].retry_count, 0);
}

#[test]
fn test_failed_entry_stays_queryable_and_retryable() {
    let dir = tempfile::TempDir::new().unwrap();
    let queue = open_queue(dir.path());
    let state = Rc::new(StateStore::new(AppState::default()));

    // Enqueue a delete whose target repository keeps failing.
    struct FlakyRepo {
        failures_left: u32,
        deletes: u32,
    }
    impl TaskRepository for FlakyRepo {
        fn upsert_task(&mut self, _task: &Task) -> Result<(), quadrant::QuadrantError> {
            Ok(())
        }
        fn delete_task(&mut self, _id: &str) -> Result<(), quadrant::QuadrantError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(quadrant::QuadrantError::Repository(
                    "remote unavailable".to_string(),
                ));
            }
            self.deletes += 1;
            Ok(())
        }
        fn get_task(&self, _id: &str) -> Result<Option<Task>, quadrant::QuadrantError> {
            Ok(None)
        }
        fn list_tasks(&self, _q: Quadrant) -> Result<Vec<Task>, quadrant::QuadrantError> {
            Ok(Vec::new())
        }
    }

    let mut orchestrator = SyncOrchestrator::new(queue, Rc::clone(&state));
    let task = Task::new("Doomed", Quadrant::Neither, 0);
    let task_id = task.id.clone();
    orchestrator.apply(TaskIntent::Add { task }).unwrap();
    orchestrator
        .apply(TaskIntent::Delete {
            id: task_id,
            quadrant: Quadrant::Neither,
        })
        .unwrap();

    let mut repo = FlakyRepo {
        failures_left: 10,
        deletes: 0,
    };
    let config = DrainConfig::default();
    for _ in 0..3 {
        let mut executor = RepositoryExecutor::new(&mut repo);
        orchestrator
            .queue_mut()
            .drain(&mut executor, &config, None)
            .unwrap();
    }

    // The add succeeded; the delete exhausted its budget.
    let failed = orchestrator
        .queue()
        .list_by_status(Some(EntryStatus::Failed))
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].operation, OperationType::DeleteTask);
    assert_eq!(failed[0].retry_count, 3);
    assert!(failed[0]
        .last_error
        .as_deref()
        .unwrap()
        .contains("remote unavailable"));

    // Manual retry once the remote recovers.
    repo.failures_left = 0;
    orchestrator.queue_mut().reset_all_failed().unwrap();
    let mut executor = RepositoryExecutor::new(&mut repo);
    let report = orchestrator
        .queue_mut()
        .drain(&mut executor, &config, None)
        .unwrap();
    assert_eq!(report.succeeded, 1);
    assert_eq!(repo.deletes, 1);
    assert!(orchestrator.queue().list_by_status(None).unwrap().is_empty());
}
