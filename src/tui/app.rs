//! Application state for the terminal board.

use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::core::{
    ManualNetworkSignal, NetworkSignal, NetworkStatus, Point, Quadrant, TaskRef, TaskRepository,
};
use crate::error::QuadrantError;
use crate::gesture::{
    CloneHandle, DragPayload, GestureConfig, GestureRecognizer, GestureSurface,
};
use crate::state::{AppState, StatePatch, StateStore};
use crate::storage::{Database, LocalTaskRepository};
use crate::sync::{
    ActionQueue, AutoSync, RepositoryExecutor, SqliteQueueStore, SyncOrchestrator,
};

/// Visual feedback state owned by the board surface.
///
/// The gesture recognizer drives this through the `GestureSurface` trait;
/// the renderer reads it back each frame. Zone and card rectangles are
/// recorded during rendering so hit-testing matches what is on screen.
#[derive(Debug, Default)]
pub struct BoardSurface {
    /// Drop zones as laid out by the last render.
    pub zones: Vec<(Quadrant, Rect)>,
    /// Card rows as laid out by the last render.
    pub cards: Vec<(TaskRef, String, Rect)>,
    /// Floating proxy for the dragged card: position and title.
    pub ghost: Option<(Point, String)>,
    pub ghost_visible: bool,
    pub highlight: Option<Quadrant>,
    /// Horizontal offset and opacity of the card being swiped away.
    pub swipe: Option<(f64, f64)>,
    pub scroll_locked: bool,
    ghost_title: String,
    next_handle: u64,
}

impl BoardSurface {
    fn card_at(&self, point: Point) -> Option<(TaskRef, String)> {
        self.cards
            .iter()
            .find(|(_, _, rect)| rect_contains(*rect, point))
            .map(|(task, title, _)| (task.clone(), title.clone()))
    }
}

fn rect_contains(rect: Rect, point: Point) -> bool {
    let (x, y) = (point.x, point.y);
    x >= f64::from(rect.x)
        && x < f64::from(rect.x + rect.width)
        && y >= f64::from(rect.y)
        && y < f64::from(rect.y + rect.height)
}

impl GestureSurface for BoardSurface {
    fn drop_zone_at(&mut self, point: Point) -> Option<Quadrant> {
        self.zones
            .iter()
            .find(|(_, rect)| rect_contains(*rect, point))
            .map(|(quadrant, _)| *quadrant)
    }

    fn spawn_clone(&mut self, origin: Point) -> CloneHandle {
        self.next_handle += 1;
        self.ghost = Some((origin, self.ghost_title.clone()));
        self.ghost_visible = true;
        CloneHandle(self.next_handle)
    }

    fn move_clone(&mut self, _handle: CloneHandle, point: Point) {
        if let Some((position, _)) = self.ghost.as_mut() {
            *position = point;
        }
    }

    fn set_clone_visible(&mut self, _handle: CloneHandle, visible: bool) {
        self.ghost_visible = visible;
    }

    fn destroy_clone(&mut self, _handle: CloneHandle) {
        self.ghost = None;
    }

    fn set_swipe_feedback(&mut self, offset_x: f64, opacity: f64) {
        self.swipe = Some((offset_x, opacity));
    }

    fn clear_swipe_feedback(&mut self) {
        self.swipe = None;
    }

    fn highlight_zone(&mut self, zone: Option<Quadrant>) {
        self.highlight = zone;
    }

    fn lock_scroll(&mut self) {
        self.scroll_locked = true;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
    }

    fn animate_return(&mut self) {
        // Terminal cells snap back instantly; nothing to animate.
    }

    // No haptic actuator in a terminal; the default no-op applies.
}

/// Application state.
pub struct App {
    orchestrator: SyncOrchestrator<SqliteQueueStore>,
    repository: LocalTaskRepository,
    auto_sync: AutoSync,
    network: ManualNetworkSignal,
    gesture_config: GestureConfig,
    recognizer: Option<GestureRecognizer>,
    /// Task currently being swiped, for offset rendering.
    pub swiping_task: Option<String>,
    pub surface: BoardSurface,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Create the board over the on-disk queue and repository.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened.
    pub fn new(config: &Config) -> Result<Self, QuadrantError> {
        let store = SqliteQueueStore::new(Database::open()?);
        let queue = ActionQueue::open(store)?;
        let repository = LocalTaskRepository::new(Database::open()?);

        let mut initial = AppState::default();
        let mut tasks = BTreeMap::new();
        for quadrant in Quadrant::ALL {
            tasks.insert(quadrant, repository.list_tasks(quadrant)?);
        }
        initial.tasks = tasks;

        let state = Rc::new(StateStore::new(initial));
        let orchestrator = SyncOrchestrator::new(queue, state);

        // Sessions start offline; connectivity is toggled with 'o'.
        let network = ManualNetworkSignal::new(NetworkStatus::Offline);
        let auto_sync = AutoSync::new(config.drain_config(), network.status());

        let gesture_config = GestureConfig {
            long_press_delay: std::time::Duration::from_millis(config.gesture.long_press_ms),
            swipe_distance_threshold: config.board.swipe_distance_cells,
            swipe_activation_distance: config.board.swipe_distance_cells / 2.0,
            jitter_threshold: 1.0,
            delete_enabled: config.gesture.delete_enabled,
        };

        Ok(Self {
            orchestrator,
            repository,
            auto_sync,
            network,
            gesture_config,
            recognizer: None,
            swiping_task: None,
            surface: BoardSurface::default(),
            status: Some("hold+drag to move, swipe to delete, o:network s:sync q:quit".to_string()),
            should_quit: false,
        })
    }

    /// Current state snapshot for rendering.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.orchestrator.state().get_state()
    }

    /// Connectivity as shown in the header.
    #[must_use]
    pub fn network_status(&self) -> NetworkStatus {
        self.network.status()
    }

    /// Pending queue entries, for the "N changes pending" line.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.orchestrator.queue().pending_count().unwrap_or(0)
    }

    /// Failed queue entries, for the failure notification.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.orchestrator
            .queue()
            .stats()
            .map(|s| s.failed)
            .unwrap_or(0)
    }

    /// Mouse pressed: bind a recognizer to the card under the pointer.
    pub fn pointer_down(&mut self, point: Point, now: DateTime<Utc>) {
        if self.recognizer.is_some() {
            return;
        }
        let Some((task, title)) = self.surface.card_at(point) else {
            return;
        };
        self.surface.ghost_title = title;
        self.swiping_task = Some(task.id.clone());

        let mut recognizer = GestureRecognizer::new(
            DragPayload { task },
            self.gesture_config.clone(),
            self.orchestrator.state(),
        );
        recognizer.pointer_down(point, now);
        self.recognizer = Some(recognizer);
    }

    /// Mouse moved with the button held.
    pub fn pointer_move(&mut self, point: Point) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            let result = recognizer.pointer_move(point, &mut self.surface, &mut self.orchestrator);
            if let Err(e) = result {
                self.status = Some(format!("error: {e}"));
            }
        }
    }

    /// Mouse released.
    pub fn pointer_up(&mut self, point: Point) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            let result = recognizer.pointer_up(point, &mut self.surface, &mut self.orchestrator);
            if let Err(e) = result {
                self.status = Some(format!("error: {e}"));
            }
        }
        self.finish_gesture();
    }

    /// Escape pressed or terminal lost focus: roll the gesture back.
    pub fn cancel_gesture(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.cancel(&mut self.surface);
        }
        self.finish_gesture();
    }

    /// Event-loop tick: fire the long-press timer and any due backoff
    /// re-drain.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            let result = recognizer.poll(now, &mut self.surface, &mut self.orchestrator);
            if let Err(e) = result {
                self.status = Some(format!("error: {e}"));
                self.finish_gesture();
            }
        }

        let mut executor = RepositoryExecutor::new(&mut self.repository);
        match self
            .auto_sync
            .tick(self.orchestrator.queue_mut(), &mut executor, now)
        {
            Ok(Some(report)) if report.total() > 0 => {
                self.status = Some(format!("retried: {} synced", report.succeeded));
            }
            Ok(_) => {}
            Err(e) => self.status = Some(format!("sync error: {e}")),
        }
    }

    /// Toggle the simulated connectivity signal.
    pub fn toggle_network(&mut self, now: DateTime<Utc>) {
        let status = self.network.toggle();
        let state = self.orchestrator.state();
        let mut executor = RepositoryExecutor::new(&mut self.repository);
        match self.auto_sync.handle_network_change(
            status,
            self.orchestrator.queue_mut(),
            &mut executor,
            &state,
            now,
        ) {
            Ok(Some(report)) => {
                self.status = Some(format!(
                    "online: {} synced, {} pending",
                    report.succeeded,
                    self.pending_count()
                ));
            }
            Ok(None) => self.status = Some(format!("network: {status}")),
            Err(e) => self.status = Some(format!("sync error: {e}")),
        }
    }

    /// Manual drain request.
    pub fn sync_now(&mut self, now: DateTime<Utc>) {
        if !self.network.status().is_online() {
            self.status = Some(format!("offline: {} changes pending", self.pending_count()));
            return;
        }
        let mut executor = RepositoryExecutor::new(&mut self.repository);
        match self
            .auto_sync
            .request_drain(self.orchestrator.queue_mut(), &mut executor, now)
        {
            Ok(report) => {
                self.status = Some(format!(
                    "synced {} / retrying {} / failed {}",
                    report.succeeded, report.retried, report.failed
                ));
            }
            Err(e) => self.status = Some(format!("sync error: {e}")),
        }
    }

    /// Reset failed entries and drain again.
    pub fn retry_failed(&mut self, now: DateTime<Utc>) {
        match self.orchestrator.queue_mut().reset_all_failed() {
            Ok(0) => {
                self.status = Some("no failed entries".to_string());
            }
            Ok(count) => {
                self.status = Some(format!("retrying {count} entries"));
                self.sync_now(now);
            }
            Err(e) => self.status = Some(format!("queue error: {e}")),
        }
    }

    /// Reload the board from the repository, discarding optimistic state.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository read fails.
    pub fn refresh(&mut self) -> Result<(), QuadrantError> {
        let mut tasks = BTreeMap::new();
        for quadrant in Quadrant::ALL {
            tasks.insert(quadrant, self.repository.list_tasks(quadrant)?);
        }
        self.orchestrator
            .state()
            .set_state(StatePatch::tasks(tasks), "refresh");
        self.status = Some("reloaded from repository".to_string());
        Ok(())
    }

    fn finish_gesture(&mut self) {
        let done = self
            .recognizer
            .as_ref()
            .map_or(true, |recognizer| !recognizer.is_active());
        if done {
            self.recognizer = None;
            self.swiping_task = None;
        }
    }
}
