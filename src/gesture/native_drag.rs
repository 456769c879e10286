//! Native-drag gesture strategy.
//!
//! Hosts whose platform provides continuous drag events (pointer drag
//! start/over/end) map them onto the same session and callback contract as
//! the touch path. Long-press emulation is delegated to the platform's own
//! drag activation, so there is no `PendingActivation` phase here:
//! activation is immediate on drag start. Callers remain device agnostic.

use std::rc::Rc;

use crate::core::Point;
use crate::error::QuadrantError;
use crate::gesture::session::{
    drag_move, enter_dragging, finalize, finish_drag, GesturePhase, GestureSession,
};
use crate::gesture::surface::{DragPayload, GestureSurface, IntentSink};
use crate::state::StateStore;

/// Recognizer fed by platform drag events.
pub struct NativeDragRecognizer {
    payload: DragPayload,
    state: Rc<StateStore>,
    session: GestureSession,
}

impl NativeDragRecognizer {
    #[must_use]
    pub fn new(payload: DragPayload, state: Rc<StateStore>) -> Self {
        Self {
            payload,
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

    /// The platform reported a drag start: activate immediately.
    ///
    /// # Errors
    ///
    /// Propagates a sink error after the surface has been restored.
    pub fn drag_start(
        &mut self,
        point: Point,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        if self.session.is_active() {
            return Ok(());
        }
        self.session.origin = point;
        self.session.current = point;
        enter_dragging(&mut self.session, &self.payload, surface, sink, &self.state)
    }

    /// The drag moved over the surface.
    ///
    /// # Errors
    ///
    /// Propagates a sink error after the surface has been restored.
    pub fn drag_over(
        &mut self,
        point: Point,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        if self.session.phase != GesturePhase::Dragging {
            return Ok(());
        }
        drag_move(
            &mut self.session,
            &self.payload,
            point,
            surface,
            sink,
            &self.state,
        )
    }

    /// The drag released.
    ///
    /// # Errors
    ///
    /// Propagates a sink error after the surface has been restored.
    pub fn drag_end(
        &mut self,
        point: Point,
        surface: &mut dyn GestureSurface,
        sink: &mut dyn IntentSink,
    ) -> Result<(), QuadrantError> {
        if self.session.phase != GesturePhase::Dragging {
            return Ok(());
        }
        finish_drag(
            &mut self.session,
            &self.payload,
            point,
            surface,
            sink,
            &self.state,
        )
    }

    /// The platform cancelled the drag: full rollback.
    pub fn drag_cancel(&mut self, surface: &mut dyn GestureSurface) {
        if !self.session.is_active() {
            return;
        }
        self.session.phase = GesturePhase::Cancelled;
        finalize(&mut self.session, surface, &self.state);
    }
}
