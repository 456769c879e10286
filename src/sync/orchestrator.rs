//! Intent handling: optimistic state updates plus queue entries.
//!
//! The orchestrator is the thin glue between gesture/UI intents and the
//! durable queue. It never talks to the network itself; dequeued entries
//! are executed by `RepositoryExecutor` elsewhere.

use std::rc::Rc;

use crate::core::{Point, Quadrant, Task, TaskFields};
use crate::error::QuadrantError;
use crate::gesture::{DragPayload, IntentSink};
use crate::state::{StatePatch, StateStore};
use crate::sync::entry::{
    AddTaskPayload, DeleteTaskPayload, MoveTaskPayload, OperationType, UpdateTaskPayload,
};
use crate::sync::queue::ActionQueue;
use crate::sync::store::QueueStore;

/// A high-level mutating user action, independent of input device.
#[derive(Debug, Clone)]
pub enum TaskIntent {
    Add {
        task: Task,
    },
    Update {
        id: String,
        quadrant: Quadrant,
        fields: TaskFields,
    },
    Delete {
        id: String,
        quadrant: Quadrant,
    },
    Move {
        id: String,
        from: Quadrant,
        to: Quadrant,
    },
}

/// Translates intents into state patches and queue entries.
pub struct SyncOrchestrator<S: QueueStore> {
    queue: ActionQueue<S>,
    state: Rc<StateStore>,
}

impl<S: QueueStore> SyncOrchestrator<S> {
    #[must_use]
    pub const fn new(queue: ActionQueue<S>, state: Rc<StateStore>) -> Self {
        Self { queue, state }
    }

    #[must_use]
    pub fn state(&self) -> Rc<StateStore> {
        Rc::clone(&self.state)
    }

    #[must_use]
    pub const fn queue(&self) -> &ActionQueue<S> {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut ActionQueue<S> {
        &mut self.queue
    }

    /// Apply an intent: enqueue the durable entry, then commit the
    /// optimistic state mutation. Returns the queue entry id.
    ///
    /// The enqueue happens first so a persistence failure leaves local
    /// state untouched instead of showing a change that was never queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the intent references an unknown task or the
    /// queue store fails.
    pub fn apply(&mut self, intent: TaskIntent) -> Result<String, QuadrantError> {
        match intent {
            TaskIntent::Add { task } => {
                let entry_id = self
                    .queue
                    .enqueue(OperationType::AddTask, &AddTaskPayload { task: task.clone() })?;
                let mut tasks = self.state.get_state().tasks;
                if let Some(list) = tasks.get_mut(&task.quadrant) {
                    list.push(task);
                }
                self.state.set_state(StatePatch::tasks(tasks), "intent:add");
                Ok(entry_id)
            }
            TaskIntent::Update {
                id,
                quadrant,
                fields,
            } => {
                let mut tasks = self.state.get_state().tasks;
                let task = tasks
                    .get_mut(&quadrant)
                    .and_then(|list| list.iter_mut().find(|t| t.id == id))
                    .ok_or_else(|| QuadrantError::Queue(format!("unknown task: {id}")))?;
                fields.apply_to(task);
                let updated = task.clone();

                let entry_id = self.queue.enqueue(
                    OperationType::UpdateTask,
                    &UpdateTaskPayload {
                        task: updated,
                        fields,
                    },
                )?;
                self.state
                    .set_state(StatePatch::tasks(tasks), "intent:update");
                Ok(entry_id)
            }
            TaskIntent::Delete { id, quadrant } => {
                let entry_id = self.queue.enqueue(
                    OperationType::DeleteTask,
                    &DeleteTaskPayload {
                        id: id.clone(),
                        quadrant,
                    },
                )?;
                let mut tasks = self.state.get_state().tasks;
                if let Some(list) = tasks.get_mut(&quadrant) {
                    list.retain(|t| t.id != id);
                }
                self.state
                    .set_state(StatePatch::tasks(tasks), "intent:delete");
                Ok(entry_id)
            }
            TaskIntent::Move { id, from, to } => {
                let mut tasks = self.state.get_state().tasks;
                let source = tasks
                    .get_mut(&from)
                    .ok_or_else(|| QuadrantError::Queue(format!("unknown quadrant: {from}")))?;
                let index = source
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or_else(|| QuadrantError::Queue(format!("unknown task: {id}")))?;
                let mut task = source.remove(index);
                task.quadrant = to;
                let target = tasks.entry(to).or_default();
                task.position = u32::try_from(target.len()).unwrap_or(u32::MAX);
                target.push(task.clone());

                let entry_id = self.queue.enqueue(
                    OperationType::MoveTask,
                    &MoveTaskPayload { task, from, to },
                )?;
                self.state
                    .set_state(StatePatch::tasks(tasks), "intent:move");
                Ok(entry_id)
            }
        }
    }
}

impl<S: QueueStore> IntentSink for SyncOrchestrator<S> {
    fn on_intent_start(&mut self, payload: &DragPayload) -> Result<(), QuadrantError> {
        tracing::trace!(task = %payload.task.id, "drag started");
        Ok(())
    }

    fn on_intent_move(&mut self, _payload: &DragPayload, _point: Point) -> Result<(), QuadrantError> {
        Ok(())
    }

    fn on_intent_end(
        &mut self,
        payload: &DragPayload,
        target: Option<Quadrant>,
    ) -> Result<(), QuadrantError> {
        // No target under the pointer, or dropped back home: nothing moves.
        let Some(to) = target else {
            return Ok(());
        };
        if to == payload.task.quadrant {
            return Ok(());
        }
        self.apply(TaskIntent::Move {
            id: payload.task.id.clone(),
            from: payload.task.quadrant,
            to,
        })?;
        Ok(())
    }

    fn on_delete_intent(&mut self, payload: &DragPayload) -> Result<(), QuadrantError> {
        self.apply(TaskIntent::Delete {
            id: payload.task.id.clone(),
            quadrant: payload.task.quadrant,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NetworkStatus;
    use crate::state::AppState;
    use crate::sync::entry::EntryStatus;
    use crate::sync::store::MemoryQueueStore;

    fn orchestrator() -> SyncOrchestrator<MemoryQueueStore> {
        let queue = ActionQueue::open(MemoryQueueStore::new()).unwrap();
        let state = Rc::new(StateStore::new(AppState::default()));
        SyncOrchestrator::new(queue, state)
    }

    #[test]
    fn test_add_updates_state_and_enqueues() {
        let mut orch = orchestrator();
        let task = Task::new("T", Quadrant::UrgentImportant, 0);
        orch.apply(TaskIntent::Add { task }).unwrap();

        let state = orch.state().get_state();
        assert_eq!(state.tasks[&Quadrant::UrgentImportant].len(), 1);
        assert_eq!(
            orch.queue()
                .list_by_status(Some(EntryStatus::Pending))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_move_is_optimistic() {
        let mut orch = orchestrator();
        let task = Task::new("T", Quadrant::UrgentImportant, 0);
        let id = task.id.clone();
        orch.apply(TaskIntent::Add { task }).unwrap();

        orch.apply(TaskIntent::Move {
            id: id.clone(),
            from: Quadrant::UrgentImportant,
            to: Quadrant::ImportantOnly,
        })
        .unwrap();

        let state = orch.state().get_state();
        assert!(state.tasks[&Quadrant::UrgentImportant].is_empty());
        let moved = &state.tasks[&Quadrant::ImportantOnly][0];
        assert_eq!(moved.id, id);
        assert_eq!(moved.quadrant, Quadrant::ImportantOnly);
        // Works offline: entries queue up regardless of connectivity.
        assert_eq!(state.network_status, NetworkStatus::Offline);
        assert_eq!(orch.queue().pending_count().unwrap(), 2);
    }

    #[test]
    fn test_move_unknown_task_is_error_and_leaves_state_alone() {
        let mut orch = orchestrator();
        let result = orch.apply(TaskIntent::Move {
            id: "ghost".to_string(),
            from: Quadrant::UrgentImportant,
            to: Quadrant::Neither,
        });
        assert!(result.is_err());
        assert_eq!(orch.queue().pending_count().unwrap(), 0);
    }

    #[test]
    fn test_drop_on_source_quadrant_is_noop() {
        let mut orch = orchestrator();
        let task = Task::new("T", Quadrant::UrgentOnly, 0);
        let reference = task.reference();
        orch.apply(TaskIntent::Add { task }).unwrap();

        let payload = DragPayload { task: reference };
        orch.on_intent_end(&payload, Some(Quadrant::UrgentOnly))
            .unwrap();
        // Only the add is queued.
        assert_eq!(orch.queue().pending_count().unwrap(), 1);
    }

    #[test]
    fn test_delete_intent_removes_and_enqueues() {
        let mut orch = orchestrator();
        let task = Task::new("T", Quadrant::Neither, 0);
        let reference = task.reference();
        orch.apply(TaskIntent::Add { task }).unwrap();

        let payload = DragPayload { task: reference };
        orch.on_delete_intent(&payload).unwrap();

        let state = orch.state().get_state();
        assert!(state.tasks[&Quadrant::Neither].is_empty());
        assert_eq!(orch.queue().pending_count().unwrap(), 2);
    }
}
