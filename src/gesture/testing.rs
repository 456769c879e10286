//! Test doubles for gesture tests: a counting surface and recording sinks.

use crate::core::{Point, Quadrant};
use crate::error::QuadrantError;
use crate::gesture::surface::{CloneHandle, DragPayload, GestureSurface, IntentSink};

/// A surface that counts every resource it hands out so tests can assert
/// nothing leaks. Drop zones: the top band (y < 100) is split at x = 150
/// into q1 | q2; everything below is dead space.
#[derive(Debug, Default)]
pub(crate) struct TestSurface {
    next_handle: u64,
    pub clones_alive: i32,
    pub clone_visible: bool,
    pub clone_position: Option<Point>,
    pub scroll_locked: bool,
    pub lock_calls: u32,
    pub unlock_calls: u32,
    pub highlight: Option<Quadrant>,
    pub highlight_changes: u32,
    pub swipe_feedback: Option<(f64, f64)>,
    pub returns_animated: u32,
    pub haptics: Vec<Vec<u64>>,
    /// When set, every hit-test misses (simulates dead space everywhere).
    pub no_zones: bool,
}

impl TestSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every per-gesture resource has been released.
    pub fn is_pristine(&self) -> bool {
        self.clones_alive == 0
            && !self.scroll_locked
            && self.highlight.is_none()
            && self.swipe_feedback.is_none()
    }
}

impl GestureSurface for TestSurface {
    fn drop_zone_at(&mut self, point: Point) -> Option<Quadrant> {
        if self.no_zones || point.y >= 100.0 {
            None
        } else if point.x < 150.0 {
            Some(Quadrant::UrgentImportant)
        } else {
            Some(Quadrant::ImportantOnly)
        }
    }

    fn spawn_clone(&mut self, origin: Point) -> CloneHandle {
        self.next_handle += 1;
        self.clones_alive += 1;
        self.clone_visible = true;
        self.clone_position = Some(origin);
        CloneHandle(self.next_handle)
    }

    fn move_clone(&mut self, _handle: CloneHandle, point: Point) {
        self.clone_position = Some(point);
    }

    fn set_clone_visible(&mut self, _handle: CloneHandle, visible: bool) {
        self.clone_visible = visible;
    }

    fn destroy_clone(&mut self, _handle: CloneHandle) {
        self.clones_alive -= 1;
        self.clone_position = None;
    }

    fn set_swipe_feedback(&mut self, offset_x: f64, opacity: f64) {
        self.swipe_feedback = Some((offset_x, opacity));
    }

    fn clear_swipe_feedback(&mut self) {
        self.swipe_feedback = None;
    }

    fn highlight_zone(&mut self, zone: Option<Quadrant>) {
        if self.highlight != zone {
            self.highlight_changes += 1;
        }
        self.highlight = zone;
    }

    fn lock_scroll(&mut self) {
        self.scroll_locked = true;
        self.lock_calls += 1;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
        self.unlock_calls += 1;
    }

    fn animate_return(&mut self) {
        self.returns_animated += 1;
    }

    fn haptic(&mut self, pattern: &[u64]) {
        self.haptics.push(pattern.to_vec());
    }
}

/// Records every intent callback in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub starts: u32,
    pub moves: u32,
    pub ends: Vec<Option<Quadrant>>,
    pub deletes: u32,
}

impl IntentSink for RecordingSink {
    fn on_intent_start(&mut self, _payload: &DragPayload) -> Result<(), QuadrantError> {
        self.starts += 1;
        Ok(())
    }

    fn on_intent_move(
        &mut self,
        _payload: &DragPayload,
        _point: Point,
    ) -> Result<(), QuadrantError> {
        self.moves += 1;
        Ok(())
    }

    fn on_intent_end(
        &mut self,
        _payload: &DragPayload,
        target: Option<Quadrant>,
    ) -> Result<(), QuadrantError> {
        self.ends.push(target);
        Ok(())
    }

    fn on_delete_intent(&mut self, _payload: &DragPayload) -> Result<(), QuadrantError> {
        self.deletes += 1;
        Ok(())
    }
}

/// Fails from the chosen callback; the recognizer must still restore the
/// surface before the error escapes.
#[derive(Debug, Default)]
pub(crate) struct FailingSink {
    pub fail_on_end: bool,
    pub fail_on_start: bool,
}

impl IntentSink for FailingSink {
    fn on_intent_start(&mut self, _payload: &DragPayload) -> Result<(), QuadrantError> {
        if self.fail_on_start {
            Err(QuadrantError::Intent("start rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn on_intent_move(
        &mut self,
        _payload: &DragPayload,
        _point: Point,
    ) -> Result<(), QuadrantError> {
        Ok(())
    }

    fn on_intent_end(
        &mut self,
        _payload: &DragPayload,
        _target: Option<Quadrant>,
    ) -> Result<(), QuadrantError> {
        if self.fail_on_end {
            Err(QuadrantError::Intent("end rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn on_delete_intent(&mut self, _payload: &DragPayload) -> Result<(), QuadrantError> {
        Ok(())
    }
}
