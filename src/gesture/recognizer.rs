//! Touch-path gesture recognizer.
//!
//! Implements the full phase machine over discrete pointer events:
//!
//! ```text
//! Idle --down--> PendingActivation
//! PendingActivation --timer fires (no early movement)--> Dragging
//! PendingActivation --movement, vertical dominant--> Dragging
//! PendingActivation --movement, horizontal dominant + threshold--> SwipingDelete
//! PendingActivation --up before timer/threshold--> Idle (tap, no-op)
//! Dragging / SwipingDelete --up--> Idle (commit or revert)
//! any --cancel--> Idle (full rollback)
//! ```
//!
//! Timing is explicit: the host passes `now` with each event and calls
//! [`GestureRecognizer::poll`] from its loop so the long-press timer fires
//! deterministically.

use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::core::{Axis, Point};
use crate::error::QuadrantError;
use crate::gesture::session::{
    drag_move, enter_dragging, finalize, finish_drag, GesturePhase, GestureSession,
};
use crate::gesture::surface::{DragPayload, GestureSurface, IntentSink, HAPTIC_COMMIT};
use crate::state::StateStore;

/// Tunables for gesture classification.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Hold duration that activates a drag without movement.
    pub long_press_delay: Duration,
    /// Horizontal travel at release that commits a delete.
    pub swipe_distance_threshold: f64,
    /// Horizontal travel that moves an undetermined gesture into the
    /// swiping phase.
    pub swipe_activation_distance: f64,
    /// Movement below this is jitter and commits no direction.
    pub jitter_threshold: f64,
    /// Whether swipe-to-delete is available at all.
    pub delete_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_delay: Duration::from_millis(300),
            swipe_distance_threshold: 100.0,
            swipe_activation_distance: 50.0,
            jitter_threshold: 10.0,
            delete_enabled: true,
        }
    }
}

/// One recognizer per interactive element, holding at most one session.
pub struct GestureRecognizer {
    payload: DragPayload,
    config: GestureConfig,
    state: Rc<StateStore>,
    session: GestureSession,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(payload: DragPayload, config: GestureConfig, state: Rc<StateStore>) -> Self {
        Self {
            payload,
            config,
            state,
            session: GestureSession::default(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.session.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    #[must_use]
    pub const fn payload(&self) -> &DragPayload {
        &self.payload
    }

    /// Pointer contact. Starts the long-press timer. A second contact while
    /// a session is active is ignored; the platform delivers one pointer
    /// sequence per element at a time.
    pub fn pointer_down(&mut self, point: Point, now: DateTime<Utc>) {
        if self.session.is_active() {
            return;
        }
        self.session.phase = GesturePhase::PendingActivation;
        self.session.origin = point;
        self.session.current = point;
        self.session.committed_axis = None;
        self.session.target = None;
        self.session.long_press_deadline =
            chrono::Duration::from_std(self.config.long_press_delay)
                .ok()
                .map(|delay| now + delay);
    }

    /// Host-loop tick: fires the long-press activation once its deadline
    /// has passed. Cancelable up to the instant it fires; any committed
    /// movement direction has already cleared the deadline.
    ///
    /// # Errors
    ///
    /// Propagates a sink error after the surface has been restored.
    pub fn poll(
        &mut self,
        now: DateTime<Utc>,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        if self.session.phase != GesturePhase::PendingActivation {
            return Ok(());
        }
        let fired = self
            .session
            .long_press_deadline
            .is_some_and(|deadline| now >= deadline);
        if fired {
            return enter_dragging(&mut self.session, &self.payload, surface, sink, &self.state);
        }
        Ok(())
    }

    /// Pointer movement.
    ///
    /// # Errors
    ///
    /// Propagates a sink error after the surface has been restored.
    pub fn pointer_move(
        &mut self,
        point: Point,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        match self.session.phase {
            GesturePhase::PendingActivation => self.undetermined_move(point, surface, sink),
            GesturePhase::Dragging => drag_move(
                &mut self.session,
                &self.payload,
                point,
                surface,
                sink,
                &self.state,
            ),
            GesturePhase::SwipingDelete => {
                self.session.current = point;
                let dx = self.session.delta().x;
                surface.set_swipe_feedback(dx, swipe_opacity(dx, self.config.swipe_distance_threshold));
                Ok(())
            }
            GesturePhase::Idle | GesturePhase::Cancelled => Ok(()),
        }
    }

    /// Pointer release: commit, revert, or no-op depending on phase.
    ///
    /// # Errors
    ///
    /// Propagates a sink error after the surface has been restored.
    pub fn pointer_up(
        &mut self,
        point: Point,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        match self.session.phase {
            GesturePhase::PendingActivation => {
                // Released before the timer or any threshold: a tap.
                finalize(&mut self.session, surface, &self.state);
                Ok(())
            }
            GesturePhase::Dragging => finish_drag(
                &mut self.session,
                &self.payload,
                point,
                surface,
                sink,
                &self.state,
            ),
            GesturePhase::SwipingDelete => {
                self.session.current = point;
                let travelled = self.session.delta().x.abs();
                if travelled >= self.config.swipe_distance_threshold {
                    let deleted = sink.on_delete_intent(&self.payload);
                    if deleted.is_ok() {
                        surface.haptic(HAPTIC_COMMIT);
                    }
                    finalize(&mut self.session, surface, &self.state);
                    deleted
                } else {
                    surface.animate_return();
                    finalize(&mut self.session, surface, &self.state);
                    Ok(())
                }
            }
            GesturePhase::Idle | GesturePhase::Cancelled => Ok(()),
        }
    }

    /// External cancellation (pointer cancel, context loss, escape): full
    /// rollback through the same cleanup path as normal completion.
    pub fn cancel(&mut self, surface: &mut dyn GestureSurface) {
        if !self.session.is_active() {
            return;
        }
        self.session.phase = GesturePhase::Cancelled;
        finalize(&mut self.session, surface, &self.state);
    }

    /// Movement while the direction is still undetermined. The first
    /// movement beyond the jitter threshold commits the dominant axis for
    /// the remainder of the gesture and cancels the long-press timer.
    fn undetermined_move(
        &mut self,
        point: Point,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        self.session.current = point;
        let delta = self.session.delta();

        if self.session.committed_axis.is_none() {
            if delta.magnitude() <= self.config.jitter_threshold {
                return Ok(());
            }
            let axis = delta.dominant_axis();
            self.session.committed_axis = Some(axis);
            self.session.long_press_deadline = None;
            if axis == Axis::Vertical {
                return enter_dragging(
                    &mut self.session,
                    &self.payload,
                    surface,
                    sink,
                    &self.state,
                );
            }
        }

        // Horizontal axis committed: enter the swiping phase once the
        // activation distance is crossed, if deletion is available.
        if self.session.committed_axis == Some(Axis::Horizontal)
            && self.config.delete_enabled
            && delta.x.abs() >= self.config.swipe_activation_distance
        {
            self.session.phase = GesturePhase::SwipingDelete;
            let dx = delta.x;
            surface.set_swipe_feedback(dx, swipe_opacity(dx, self.config.swipe_distance_threshold));
        }
        Ok(())
    }
}

/// Fade the swiped element toward (but never past) near-transparency.
fn swipe_opacity(offset_x: f64, threshold: f64) -> f64 {
    (1.0 - offset_x.abs() / (threshold * 1.5)).clamp(0.35, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Quadrant, TaskRef};
    use crate::gesture::testing::{FailingSink, RecordingSink, TestSurface};
    use crate::state::AppState;

    fn payload() -> DragPayload {
        DragPayload {
            task: TaskRef {
                id: "task-1".to_string(),
                quadrant: Quadrant::UrgentImportant,
            },
        }
    }

    fn recognizer() -> (GestureRecognizer, Rc<StateStore>) {
        let state = Rc::new(StateStore::new(AppState::default()));
        (
            GestureRecognizer::new(payload(), GestureConfig::default(), Rc::clone(&state)),
            state,
        )
    }

    fn millis(ms: i64) -> chrono::Duration {
        chrono::Duration::milliseconds(ms)
    }

    #[test]
    fn test_long_press_at_exactly_300ms_activates_drag() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        assert_eq!(rec.phase(), GesturePhase::PendingActivation);

        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
        assert_eq!(rec.phase(), GesturePhase::Dragging);
        assert_eq!(sink.starts, 1);
        assert_eq!(surface.clones_alive, 1);
        assert!(surface.scroll_locked);
        assert_eq!(surface.haptics, vec![vec![40]]);
    }

    #[test]
    fn test_release_at_299ms_is_a_tap() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(299), &mut surface, &mut sink).unwrap();
        assert_eq!(rec.phase(), GesturePhase::PendingActivation);

        rec.pointer_up(Point::new(50.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::Idle);
        assert_eq!(sink.starts, 0);
        assert!(sink.ends.is_empty());
        assert!(surface.is_pristine());
    }

    #[test]
    fn test_vertical_movement_activates_drag_before_timer() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 20.0), t0);
        rec.pointer_move(Point::new(52.0, 32.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::Dragging);

        // The timer was cancelled; polling long after changes nothing.
        rec.poll(t0 + millis(10_000), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(sink.starts, 1);
    }

    #[test]
    fn test_axis_commitment_is_stable() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();

        rec.pointer_down(Point::new(50.0, 20.0), Utc::now());
        // Vertical first: Dragging.
        rec.pointer_move(Point::new(50.0, 35.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::Dragging);

        // A later strongly horizontal movement must not flip to swiping.
        rec.pointer_move(Point::new(180.0, 36.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::Dragging);
        assert!(surface.swipe_feedback.is_none());
    }

    #[test]
    fn test_horizontal_movement_enters_swiping_past_activation() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();

        rec.pointer_down(Point::new(50.0, 20.0), Utc::now());
        // Beyond jitter, horizontal dominant, below activation distance.
        rec.pointer_move(Point::new(70.0, 22.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::PendingActivation);

        rec.pointer_move(Point::new(101.0, 22.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::SwipingDelete);
        assert!(surface.swipe_feedback.is_some());
    }

    #[test]
    fn test_swipe_commit_boundary() {
        // Exactly the threshold commits.
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        rec.pointer_down(Point::new(0.0, 20.0), Utc::now());
        rec.pointer_move(Point::new(60.0, 21.0), &mut surface, &mut sink)
            .unwrap();
        rec.pointer_up(Point::new(100.0, 21.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(sink.deletes, 1);
        assert_eq!(rec.phase(), GesturePhase::Idle);
        assert!(surface.is_pristine());

        // One unit short does not.
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        rec.pointer_down(Point::new(0.0, 20.0), Utc::now());
        rec.pointer_move(Point::new(60.0, 21.0), &mut surface, &mut sink)
            .unwrap();
        rec.pointer_up(Point::new(99.0, 21.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(sink.deletes, 0);
        assert_eq!(surface.returns_animated, 1);
        assert!(surface.is_pristine());
    }

    #[test]
    fn test_delete_disabled_inerts_horizontal_gesture() {
        let state = Rc::new(StateStore::new(AppState::default()));
        let config = GestureConfig {
            delete_enabled: false,
            ..GestureConfig::default()
        };
        let mut rec = GestureRecognizer::new(payload(), config, state);
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(0.0, 20.0), t0);
        rec.pointer_move(Point::new(80.0, 21.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(rec.phase(), GesturePhase::PendingActivation);

        // The committed horizontal axis also cancelled the long-press
        // timer, so this cannot become a drag either.
        rec.poll(t0 + millis(1000), &mut surface, &mut sink).unwrap();
        assert_eq!(rec.phase(), GesturePhase::PendingActivation);

        rec.pointer_up(Point::new(120.0, 21.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(sink.deletes, 0);
        assert_eq!(rec.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_drop_over_zone_commits_with_double_pulse() {
        let (mut rec, state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
        rec.pointer_move(Point::new(200.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(surface.highlight, Some(Quadrant::ImportantOnly));
        assert!(state.get_state().is_dragging);
        assert_eq!(state.get_state().drag_target, Some(Quadrant::ImportantOnly));

        rec.pointer_up(Point::new(200.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(sink.ends, vec![Some(Quadrant::ImportantOnly)]);
        // Single pulse on activation, double pulse on commit.
        assert_eq!(surface.haptics, vec![vec![40], vec![30, 40, 30]]);
        assert!(surface.is_pristine());
        assert!(!state.get_state().is_dragging);
        assert!(state.get_state().dragged_task.is_none());
    }

    #[test]
    fn test_drop_outside_any_zone_reports_none() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
        rec.pointer_up(Point::new(50.0, 400.0), &mut surface, &mut sink)
            .unwrap();

        assert_eq!(sink.ends, vec![None]);
        assert_eq!(surface.returns_animated, 1);
        // No commit pulse.
        assert_eq!(surface.haptics, vec![vec![40]]);
    }

    #[test]
    fn test_highlight_updates_only_on_zone_change() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();

        rec.pointer_move(Point::new(60.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        rec.pointer_move(Point::new(70.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        rec.pointer_move(Point::new(80.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        // Same zone throughout: one highlight write (plus none cleared yet).
        assert_eq!(surface.highlight_changes, 1);

        rec.pointer_move(Point::new(200.0, 50.0), &mut surface, &mut sink)
            .unwrap();
        assert_eq!(surface.highlight_changes, 2);
    }

    #[test]
    fn test_cancel_mid_drag_rolls_back_fully() {
        let (mut rec, state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
        rec.pointer_move(Point::new(200.0, 50.0), &mut surface, &mut sink)
            .unwrap();

        rec.cancel(&mut surface);
        assert_eq!(rec.phase(), GesturePhase::Idle);
        assert!(surface.is_pristine());
        assert!(!state.get_state().is_dragging);
        assert!(sink.ends.is_empty());
    }

    #[test]
    fn test_sink_error_on_end_still_cleans_up() {
        let (mut rec, state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = FailingSink {
            fail_on_end: true,
            ..FailingSink::default()
        };
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();

        let result = rec.pointer_up(Point::new(60.0, 50.0), &mut surface, &mut sink);
        assert!(result.is_err());
        assert!(surface.is_pristine());
        assert!(!state.get_state().is_dragging);
        assert_eq!(rec.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_sink_error_on_start_still_cleans_up() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = FailingSink {
            fail_on_start: true,
            ..FailingSink::default()
        };
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        let result = rec.poll(t0 + millis(300), &mut surface, &mut sink);
        assert!(result.is_err());
        assert!(surface.is_pristine());
        assert_eq!(rec.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let (mut rec, _state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();
        let t0 = Utc::now();

        rec.pointer_down(Point::new(50.0, 50.0), t0);
        rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
        assert_eq!(rec.phase(), GesturePhase::Dragging);

        rec.pointer_down(Point::new(10.0, 10.0), t0 + millis(400));
        assert_eq!(rec.phase(), GesturePhase::Dragging);
        assert_eq!(surface.clones_alive, 1);
    }

    #[test]
    fn test_hundred_sequential_gestures_leak_nothing() {
        let (mut rec, state) = recognizer();
        let mut surface = TestSurface::new();
        let mut sink = RecordingSink::default();

        for i in 0..100u32 {
            let t0 = Utc::now();
            rec.pointer_down(Point::new(50.0, 50.0), t0);
            match i % 4 {
                0 => {
                    // Long-press drag committed over a zone.
                    rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
                    rec.pointer_move(Point::new(200.0, 50.0), &mut surface, &mut sink)
                        .unwrap();
                    rec.pointer_up(Point::new(200.0, 50.0), &mut surface, &mut sink)
                        .unwrap();
                }
                1 => {
                    // Swipe delete.
                    rec.pointer_move(Point::new(120.0, 51.0), &mut surface, &mut sink)
                        .unwrap();
                    rec.pointer_up(Point::new(170.0, 51.0), &mut surface, &mut sink)
                        .unwrap();
                }
                2 => {
                    // Cancelled drag.
                    rec.poll(t0 + millis(300), &mut surface, &mut sink).unwrap();
                    rec.cancel(&mut surface);
                }
                _ => {
                    // Tap.
                    rec.pointer_up(Point::new(50.0, 50.0), &mut surface, &mut sink)
                        .unwrap();
                }
            }
            assert_eq!(rec.phase(), GesturePhase::Idle, "gesture {i}");
            assert!(surface.is_pristine(), "gesture {i} leaked");
            assert!(!state.get_state().is_dragging, "gesture {i}");
        }
    }

    #[test]
    fn test_swipe_opacity_fades_with_distance() {
        assert_eq!(swipe_opacity(0.0, 100.0), 1.0);
        assert!(swipe_opacity(75.0, 100.0) < 1.0);
        assert_eq!(swipe_opacity(1000.0, 100.0), 0.35);
    }
}
