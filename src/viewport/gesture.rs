//! Pinch gesture session lifecycle.

use crate::geometry::Point;

/// Snapshot taken when a continuous pinch gesture starts.
///
/// `content_position` is the gesture anchor in content coordinates at the
/// origin zoom, `container_position` the same anchor relative to the scroll
/// container. The anchor math in the engine only holds in these
/// coordinates.
#[derive(Clone, Copy, Debug)]
pub struct GestureSession {
    pub content_position: Point,
    pub container_position: Point,
    pub origin_zoom: f32,
    pub origin_translate: Point,
}

/// One gesture-update event from the embedder's pinch recognizer.
#[derive(Clone, Copy, Debug)]
pub struct PinchUpdate {
    /// Gesture origin in screen coordinates.
    pub origin: Point,
    /// Accumulated movement scale since the gesture started.
    pub movement: f32,
    /// Whether this is the first update of a new gesture.
    pub first: bool,
}

/// Raised when gesture state is used before a session exists.
#[derive(Debug, thiserror::Error)]
pub enum GestureFault {
    #[error("pinch update arrived before a gesture session was started")]
    SessionNotStarted,
}

/// Gesture lifecycle: idle until the first pinch update of a gesture,
/// active until the gesture ends and the session is discarded.
#[derive(Debug, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Active(GestureSession),
}

impl GesturePhase {
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        match self {
            Self::Active(session) => Some(session),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Discard the session, if any.
    pub fn end(&mut self) {
        *self = Self::Idle;
    }
}
