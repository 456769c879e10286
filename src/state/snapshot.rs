//! Application state snapshots.
//!
//! State is replaced wholesale on every change (copy-on-write); subscribers
//! receive owned clones, so a snapshot can never be used to mutate the
//! store from outside.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{NetworkStatus, Quadrant, Task, TaskRef};

/// One immutable application state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Opaque identifier of the signed-in user, if any.
    pub current_user: Option<String>,
    /// Tasks per quadrant. All four keys are always present; a quadrant
    /// with no tasks maps to an empty list, never to an absent key.
    pub tasks: BTreeMap<Quadrant, Vec<Task>>,
    /// Connectivity state, the single source of truth for drain decisions.
    pub network_status: NetworkStatus,
    /// Whether a drag gesture is in progress.
    pub is_dragging: bool,
    /// The task being dragged. `Some` iff `is_dragging`.
    pub dragged_task: Option<TaskRef>,
    /// Quadrant the drag started from.
    pub drag_source: Option<Quadrant>,
    /// Candidate drop quadrant under the pointer.
    pub drag_target: Option<Quadrant>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut tasks = BTreeMap::new();
        for quadrant in Quadrant::ALL {
            tasks.insert(quadrant, Vec::new());
        }
        Self {
            current_user: None,
            tasks,
            network_status: NetworkStatus::Offline,
            is_dragging: false,
            dragged_task: None,
            drag_source: None,
            drag_target: None,
        }
    }
}

impl AppState {
    /// Total number of tasks across all quadrants.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    /// Which keys differ between two snapshots.
    #[must_use]
    pub fn changed_keys(prev: &Self, next: &Self) -> Vec<StateKey> {
        let mut changed = Vec::new();
        if prev.current_user != next.current_user {
            changed.push(StateKey::CurrentUser);
        }
        if prev.tasks != next.tasks {
            changed.push(StateKey::Tasks);
        }
        if prev.network_status != next.network_status {
            changed.push(StateKey::NetworkStatus);
        }
        if prev.is_dragging != next.is_dragging {
            changed.push(StateKey::IsDragging);
        }
        if prev.dragged_task != next.dragged_task {
            changed.push(StateKey::DraggedTask);
        }
        if prev.drag_source != next.drag_source {
            changed.push(StateKey::DragSource);
        }
        if prev.drag_target != next.drag_target {
            changed.push(StateKey::DragTarget);
        }
        changed
    }
}

/// Addressable top-level state keys for filtered subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    CurrentUser,
    Tasks,
    NetworkStatus,
    IsDragging,
    DraggedTask,
    DragSource,
    DragTarget,
}

/// A shallow partial update merged into the current snapshot.
///
/// Unset fields leave the current value untouched. The doubly-optional
/// fields distinguish "not part of this patch" from "set to none".
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub current_user: Option<Option<String>>,
    pub tasks: Option<BTreeMap<Quadrant, Vec<Task>>>,
    pub network_status: Option<NetworkStatus>,
    pub is_dragging: Option<bool>,
    pub dragged_task: Option<Option<TaskRef>>,
    pub drag_source: Option<Option<Quadrant>>,
    pub drag_target: Option<Option<Quadrant>>,
}

impl StatePatch {
    /// Patch replacing the task collections.
    #[must_use]
    pub fn tasks(tasks: BTreeMap<Quadrant, Vec<Task>>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Self::default()
        }
    }

    /// Patch updating connectivity.
    #[must_use]
    pub fn network(status: NetworkStatus) -> Self {
        Self {
            network_status: Some(status),
            ..Self::default()
        }
    }

    /// Patch entering the dragging state. Keeps the drag fields mutually
    /// consistent: a dragged task is always set together with `is_dragging`.
    #[must_use]
    pub fn drag_started(task: TaskRef, source: Quadrant) -> Self {
        Self {
            is_dragging: Some(true),
            dragged_task: Some(Some(task)),
            drag_source: Some(Some(source)),
            drag_target: Some(None),
            ..Self::default()
        }
    }

    /// Patch updating the candidate drop target mid-drag.
    #[must_use]
    pub fn drag_target(target: Option<Quadrant>) -> Self {
        Self {
            drag_target: Some(target),
            ..Self::default()
        }
    }

    /// Patch leaving the dragging state, clearing every transient field.
    #[must_use]
    pub fn drag_cleared() -> Self {
        Self {
            is_dragging: Some(false),
            dragged_task: Some(None),
            drag_source: Some(None),
            drag_target: Some(None),
            ..Self::default()
        }
    }

    /// Merge this patch into a snapshot, producing the next snapshot.
    #[must_use]
    pub fn merge_into(self, mut state: AppState) -> AppState {
        if let Some(current_user) = self.current_user {
            state.current_user = current_user;
        }
        if let Some(tasks) = self.tasks {
            state.tasks = tasks;
            // The quadrant keys are structural; restore any the patch dropped.
            for quadrant in Quadrant::ALL {
                state.tasks.entry(quadrant).or_default();
            }
        }
        if let Some(network_status) = self.network_status {
            state.network_status = network_status;
        }
        if let Some(is_dragging) = self.is_dragging {
            state.is_dragging = is_dragging;
        }
        if let Some(dragged_task) = self.dragged_task {
            state.dragged_task = dragged_task;
        }
        if let Some(drag_source) = self.drag_source {
            state.drag_source = drag_source;
        }
        if let Some(drag_target) = self.drag_target {
            state.drag_target = drag_target;
        }
        state
    }
}
