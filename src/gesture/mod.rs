//! Unified gesture recognition.
//!
//! One state machine classifies raw input as a long-press drag, a
//! horizontal swipe-to-delete, or a no-op tap, behind two input strategies
//! with identical session and callback contracts: the touch path
//! ([`GestureRecognizer`]) and the native-drag path
//! ([`NativeDragRecognizer`]). The recognizer reports geometry and drop
//! targets only; it never touches task data.

pub mod native_drag;
pub mod recognizer;
pub mod session;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use native_drag::NativeDragRecognizer;
pub use recognizer::{GestureConfig, GestureRecognizer};
pub use session::{GesturePhase, GestureSession};
pub use surface::{
    CloneHandle, DragPayload, GestureSurface, IntentSink, HAPTIC_COMMIT, HAPTIC_DRAG_START,
};
