//! Host surface and intent callbacks for gesture recognition.
//!
//! The recognizer never touches task data or the DOM-equivalent directly;
//! it drives these two seams. `GestureSurface` is the visual/platform side
//! (hit-testing, drag clone, highlight, scroll lock, haptics) and
//! `IntentSink` receives the classified high-level actions.

use crate::core::{Point, Quadrant, TaskRef};
use crate::error::QuadrantError;

/// Single short pulse fired when a drag activates.
pub const HAPTIC_DRAG_START: &[u64] = &[40];
/// Double pulse fired on a successful commit (drop or delete).
pub const HAPTIC_COMMIT: &[u64] = &[30, 40, 30];

/// What is being dragged: the task reference bound to the interactive
/// element at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub task: TaskRef,
}

/// Handle to the transient visual proxy created while dragging.
///
/// Exclusively owned by the gesture session: created on entering the
/// dragging phase, destroyed when leaving it, never shared or retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneHandle(pub u64);

/// Platform surface the recognizer manipulates.
///
/// Implementations must tolerate redundant cleanup calls (`unlock_scroll`
/// without a prior lock, clearing an absent highlight): the recognizer's
/// finalizer runs them unconditionally on every exit path.
pub trait GestureSurface {
    /// Topmost drop zone at a point, if any. No zone is a legal outcome.
    fn drop_zone_at(&mut self, point: Point) -> Option<Quadrant>;

    /// Create the visual drag proxy at the given point.
    fn spawn_clone(&mut self, origin: Point) -> CloneHandle;

    /// Move the proxy to follow the pointer.
    fn move_clone(&mut self, handle: CloneHandle, point: Point);

    /// Temporarily hide/show the proxy so hit-testing under the pointer
    /// does not find the proxy itself.
    fn set_clone_visible(&mut self, handle: CloneHandle, visible: bool);

    /// Destroy the proxy.
    fn destroy_clone(&mut self, handle: CloneHandle);

    /// Horizontal offset + opacity feedback while swiping to delete.
    fn set_swipe_feedback(&mut self, offset_x: f64, opacity: f64);

    /// Reset swipe feedback to rest.
    fn clear_swipe_feedback(&mut self);

    /// Highlight the candidate drop zone (`None` clears).
    fn highlight_zone(&mut self, zone: Option<Quadrant>);

    /// Suspend scrolling for the duration of a drag.
    fn lock_scroll(&mut self);

    /// Restore scrolling.
    fn unlock_scroll(&mut self);

    /// Animate the element back to its origin after an uncommitted gesture.
    fn animate_return(&mut self);

    /// Emit a vibration pattern. Hosts without a haptic actuator keep the
    /// default empty body.
    fn haptic(&mut self, _pattern: &[u64]) {}
}

/// Receiver for classified gesture intents.
///
/// An `Err` from any callback aborts the gesture, but only after the
/// recognizer's finalizer has restored the surface.
pub trait IntentSink {
    /// A drag activated.
    fn on_intent_start(&mut self, payload: &DragPayload) -> Result<(), QuadrantError>;

    /// The drag moved. Geometry only; the candidate target is reported
    /// through the state store and at commit time.
    fn on_intent_move(&mut self, payload: &DragPayload, point: Point)
        -> Result<(), QuadrantError>;

    /// The drag released. `target` is `None` when no valid drop zone was
    /// under the pointer; the receiver must not move the item in that case.
    fn on_intent_end(
        &mut self,
        payload: &DragPayload,
        target: Option<Quadrant>,
    ) -> Result<(), QuadrantError>;

    /// A swipe-to-delete committed.
    fn on_delete_intent(&mut self, payload: &DragPayload) -> Result<(), QuadrantError>;
}
