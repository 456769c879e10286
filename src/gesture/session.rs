//! Gesture session state shared by both input strategies.
//!
//! A session exists only during an active interaction. Both the touch
//! recognizer and the native-drag recognizer drive the same session record
//! through the same dragging-phase behaviors, so callers are device
//! agnostic; the strategies differ only in how a session activates.

use chrono::{DateTime, Utc};

use crate::core::{Axis, Delta, Point, Quadrant};
use crate::error::QuadrantError;
use crate::gesture::surface::{
    CloneHandle, DragPayload, GestureSurface, IntentSink, HAPTIC_COMMIT, HAPTIC_DRAG_START,
};
use crate::state::{StatePatch, StateStore};

/// Phase of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No interaction in progress.
    #[default]
    Idle,
    /// Pointer is down, long-press timer running, direction undetermined.
    PendingActivation,
    /// Long-press or vertical movement activated a drag.
    Dragging,
    /// Horizontal movement activated a swipe-to-delete.
    SwipingDelete,
    /// External cancellation is being rolled back.
    Cancelled,
}

/// Mutable state of one interaction.
#[derive(Debug, Default)]
pub struct GestureSession {
    pub phase: GesturePhase,
    pub origin: Point,
    pub current: Point,
    /// Dominant axis chosen on the first qualifying movement; never
    /// re-evaluated for the remainder of the gesture.
    pub committed_axis: Option<Axis>,
    /// Long-press activation deadline. Cleared when the timer is cancelled
    /// by movement or release.
    pub long_press_deadline: Option<DateTime<Utc>>,
    /// Exclusively owned drag proxy, present only while `Dragging`.
    pub clone: Option<CloneHandle>,
    /// Candidate drop zone under the pointer (weak: identified by lookup).
    pub target: Option<Quadrant>,
}

impl GestureSession {
    /// Displacement from the press origin to the current pointer position.
    #[must_use]
    pub fn delta(&self) -> Delta {
        self.current.delta_from(self.origin)
    }

    /// Whether an interaction is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != GesturePhase::Idle
    }
}

/// Activate the dragging phase: spawn the proxy, suspend scrolling, pulse
/// haptics, publish the transient drag state, and notify the sink.
///
/// On a sink error the session is finalized (surface fully restored)
/// before the error propagates.
pub(crate) fn enter_dragging(
    session: &mut GestureSession,
    payload: &DragPayload,
    surface: &mut dyn GestureSurface,
    sink: &mut dyn IntentSink,
    state: &StateStore,
) -> Result<(), QuadrantError> {
    session.phase = GesturePhase::Dragging;
    session.long_press_deadline = None;
    session.clone = Some(surface.spawn_clone(session.current));
    surface.lock_scroll();
    surface.haptic(HAPTIC_DRAG_START);
    state.set_state(
        StatePatch::drag_started(payload.task.clone(), payload.task.quadrant),
        "gesture",
    );
    tracing::trace!(task = %payload.task.id, "dragging activated");

    let started = sink.on_intent_start(payload);
    if started.is_err() {
        finalize(session, surface, state);
    }
    started
}

/// Dragging-phase pointer movement: follow with the proxy, hit-test the
/// point underneath it, and re-highlight only when the candidate changed.
pub(crate) fn drag_move(
    session: &mut GestureSession,
    payload: &DragPayload,
    point: Point,
    surface: &mut dyn GestureSurface,
    sink: &mut dyn IntentSink,
    state: &StateStore,
) -> Result<(), QuadrantError> {
    session.current = point;
    let zone = if let Some(handle) = session.clone {
        surface.move_clone(handle, point);
        // The proxy sits under the pointer; hide it for the hit-test so
        // the zone underneath is found, then restore it.
        surface.set_clone_visible(handle, false);
        let zone = surface.drop_zone_at(point);
        surface.set_clone_visible(handle, true);
        zone
    } else {
        surface.drop_zone_at(point)
    };

    if zone != session.target {
        surface.highlight_zone(zone);
        session.target = zone;
        state.set_state(StatePatch::drag_target(zone), "gesture");
    }

    let moved = sink.on_intent_move(payload, point);
    if moved.is_err() {
        finalize(session, surface, state);
    }
    moved
}

/// Dragging-phase release: one final hit-test decides the commit. `None`
/// under the pointer skips the commit and animates the element home.
pub(crate) fn finish_drag(
    session: &mut GestureSession,
    payload: &DragPayload,
    point: Point,
    surface: &mut dyn GestureSurface,
    sink: &mut dyn IntentSink,
    state: &StateStore,
) -> Result<(), QuadrantError> {
    session.current = point;
    let target = if let Some(handle) = session.clone {
        surface.set_clone_visible(handle, false);
        let zone = surface.drop_zone_at(point);
        surface.set_clone_visible(handle, true);
        zone
    } else {
        surface.drop_zone_at(point)
    };

    if target.is_none() {
        surface.animate_return();
    }
    let ended = sink.on_intent_end(payload, target);
    if ended.is_ok() && target.is_some() {
        surface.haptic(HAPTIC_COMMIT);
    }
    finalize(session, surface, state);
    ended
}

/// The single cleanup path every gesture exit funnels through.
///
/// Destroys the proxy, resets swipe feedback, clears the highlight,
/// restores scrolling, clears the transient drag state, and returns the
/// session to `Idle`. Safe to run from any phase, any number of times.
pub(crate) fn finalize(
    session: &mut GestureSession,
    surface: &mut dyn GestureSurface,
    state: &StateStore,
) {
    if let Some(handle) = session.clone.take() {
        surface.destroy_clone(handle);
    }
    surface.clear_swipe_feedback();
    surface.highlight_zone(None);
    surface.unlock_scroll();

    if state.get_state().is_dragging {
        state.set_state(StatePatch::drag_cleared(), "gesture");
    }

    session.phase = GesturePhase::Idle;
    session.committed_axis = None;
    session.long_press_deadline = None;
    session.target = None;
}
