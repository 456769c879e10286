//! Durable offline action queue and sync orchestration.
//!
//! Every mutating user action is persisted here before any network
//! attempt, drained opportunistically (reconnect, backoff deadline, manual
//! request) against the remote task repository, and retried with
//! exponential backoff until it succeeds or exhausts its budget.

pub mod auto;
pub mod entry;
pub mod executor;
pub mod orchestrator;
pub mod queue;
pub mod store;

pub use auto::AutoSync;
pub use entry::{
    AddTaskPayload, DeleteTaskPayload, EntryStatus, MoveTaskPayload, OperationType, QueueEntry,
    UpdateTaskPayload,
};
pub use executor::{
    from_fn, DrainConfig, DrainProgress, DrainReport, EntryExecutor, FnExecutor,
    RepositoryExecutor,
};
pub use orchestrator::{SyncOrchestrator, TaskIntent};
pub use queue::{ActionQueue, QueueStats};
pub use store::{MemoryQueueStore, QueueStore, SqliteQueueStore};
