//! Viewport transform and page-visibility engine for zoomable paginated
//! document viewers.
//!
//! The engine owns a continuous pan/zoom transform driven by pinch
//! gestures, derives which page the user is looking at from per-page
//! visibility, and schedules cancellable, debounced render work against an
//! embedder-provided decoding collaborator. Presentation and decoding stay
//! behind the traits in [`surface`] and [`doc`].

pub mod debounce;
pub mod doc;
pub mod geometry;
pub mod render;
pub mod surface;
pub mod task;
pub mod viewport;
pub mod visibility;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use doc::{
    AccessFault, DocumentSession, LoadPhase, OutlineNode, OutlineTarget, PageSession,
};
pub use render::{PageRenderer, ThumbnailRenderer};
pub use task::{Cancellable, TaskFault};
pub use viewport::{
    GoToOptions, PageRegistry, PinchUpdate, ViewportEngine, ViewportOptions, ViewportState,
};
pub use visibility::VisibilityTracker;
