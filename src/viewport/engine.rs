//! Viewport transform engine.
//!
//! Owns the zoom/translate pair and is its only writer; everything else
//! reads. Converts pinch updates into a new transform while keeping the
//! content point under the gesture visually fixed, even once the zoom
//! saturates at a bound, and applies every transform as one atomic pass
//! over the embedder surfaces.

use crate::geometry::Point;
use crate::surface::{ContentHost, Region, ScrollHost};
use crate::viewport::gesture::{GestureFault, GesturePhase, GestureSession, PinchUpdate};
use crate::viewport::navigation::scroll_target;
use crate::viewport::registry::PageRegistry;
use crate::viewport::state::{ViewportOptions, ViewportState};

/// Options for [`ViewportEngine::go_to_page`].
#[derive(Clone, Copy, Debug)]
pub struct GoToOptions {
    /// Request an animated scroll instead of an instant jump.
    pub smooth: bool,
}

impl Default for GoToOptions {
    fn default() -> Self {
        Self { smooth: true }
    }
}

/// The transform as written to the surfaces, mirrored separately from the
/// published state so a full transform can be staged and applied in one
/// pass.
#[derive(Clone, Copy, Debug)]
struct AppliedTransform {
    zoom: f32,
    translate: Point,
}

pub struct ViewportEngine<C: ContentHost, H, R> {
    state: ViewportState,
    applied: AppliedTransform,
    gesture: GesturePhase,
    registry: PageRegistry<R>,
    content: C,
    host: H,
}

impl<C: ContentHost, H: ScrollHost, R: Region> ViewportEngine<C, H, R> {
    /// Create an engine over the given surfaces and mirror the initial
    /// transform onto them. Native pinch gestures on the content surface
    /// are suppressed for the lifetime of the engine.
    #[must_use]
    pub fn new(options: ViewportOptions, mut content: C, host: H) -> Self {
        content.set_native_gesture_suppression(true);
        let mut engine = Self {
            state: ViewportState::new(options),
            applied: AppliedTransform {
                zoom: 1.0,
                translate: Point::default(),
            },
            gesture: GesturePhase::Idle,
            registry: PageRegistry::new(),
            content,
            host,
        };
        engine.reconcile_zoom();
        engine.apply_transform();
        engine
    }

    /// Published viewport state. Read-only; mutation goes through the
    /// engine so the surfaces stay in sync.
    #[must_use]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.state.zoom()
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.registry.current_page()
    }

    #[must_use]
    pub fn registry(&self) -> &PageRegistry<R> {
        &self.registry
    }

    #[must_use]
    pub fn gesture_session(&self) -> Option<&GestureSession> {
        self.gesture.session()
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Register or replace the container handle for a page.
    pub fn set_page_ref(&mut self, page_number: usize, region: R) {
        self.registry.set_page_ref(page_number, region);
    }

    /// Update a page's visibility ratio; the current page re-derives
    /// synchronously.
    pub fn set_page_visible(&mut self, page_number: usize, ratio: f32) {
        self.registry.set_page_visible(page_number, ratio);
    }

    /// Change zoom outside a gesture, keeping the viewport's top-left
    /// proportionally anchored.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.state.set_zoom(zoom);
        self.reconcile_zoom();
    }

    /// Updater-function form of [`set_zoom`](Self::set_zoom).
    pub fn update_zoom(&mut self, update: impl FnOnce(f32) -> f32) {
        self.state.update_zoom(update);
        self.reconcile_zoom();
    }

    /// Zoom in by one control step.
    pub fn step_in(&mut self) {
        self.state.step_in();
        self.reconcile_zoom();
    }

    /// Zoom out by one control step.
    pub fn step_out(&mut self) {
        self.state.step_out();
        self.reconcile_zoom();
    }

    /// Handle one pinch update. The gesture session is created lazily on
    /// the first update; a non-first update without a session is a fault.
    pub fn pinch_update(&mut self, update: PinchUpdate) -> Result<(), GestureFault> {
        let session = if update.first {
            let session = self.begin_session(update.origin);
            self.gesture = GesturePhase::Active(session);
            session
        } else {
            match self.gesture.session() {
                Some(session) => *session,
                None => return Err(GestureFault::SessionNotStarted),
            }
        };

        let new_zoom = self.state.clamp_zoom(update.movement * session.origin_zoom);
        // Effective applied scale after clamping; diverges from the raw
        // gesture movement once a zoom bound is hit, which is what keeps
        // the anchor fixed while zoom saturates.
        let real_movement = new_zoom / session.origin_zoom;

        self.applied = AppliedTransform {
            zoom: new_zoom,
            translate: Point::new(
                session.content_position.x * real_movement - session.container_position.x,
                session.content_position.y * real_movement - session.container_position.y,
            ),
        };
        self.apply_transform();
        self.state.set_zoom(new_zoom);
        Ok(())
    }

    /// End the active gesture, discarding its session.
    pub fn pinch_end(&mut self) {
        self.gesture.end();
    }

    /// Scroll the viewport so the page's container lands at its origin.
    /// Returns `false` without side effects when the page is not registered
    /// or its container is gone.
    pub fn go_to_page(&mut self, page_number: usize, options: GoToOptions) -> bool {
        let Some(region) = self.registry.region(page_number) else {
            return false;
        };
        if !region.is_attached() {
            return false;
        }
        let target = scroll_target(self.host.bounds(), region.bounds(), self.host.scroll_offset());
        self.host.scroll_to(target, options.smooth);
        true
    }

    /// Re-issue the wrapper size from the content's current bounds, for
    /// content size changes that happen outside zooming (pages loading in,
    /// layout reflow).
    pub fn sync_wrapper(&mut self) {
        let bounds = self.content.bounds();
        self.content.resize_wrapper(bounds.size());
    }

    fn begin_session(&self, origin: Point) -> GestureSession {
        let content = self.content.bounds();
        let container = self.host.bounds();
        GestureSession {
            content_position: Point::new(origin.x - content.left, origin.y - content.top),
            container_position: Point::new(origin.x - container.left, origin.y - container.top),
            origin_zoom: self.applied.zoom,
            origin_translate: self.applied.translate,
        }
    }

    /// Fold a published zoom change into the applied transform. Scroll
    /// offsets scale by the zoom ratio so button-driven zoom does not jump
    /// the viewport back to the origin.
    fn reconcile_zoom(&mut self) {
        let zoom = self.state.zoom();
        if (zoom - self.applied.zoom).abs() <= f32::EPSILON {
            return;
        }
        let d_zoom = zoom / self.applied.zoom;
        let offset = self.host.scroll_offset();
        self.applied = AppliedTransform {
            zoom,
            translate: Point::new(offset.x * d_zoom, offset.y * d_zoom),
        };
        self.apply_transform();
    }

    /// Write the staged transform out: scale first, then remeasure, then
    /// wrapper resize, then scroll offsets. Resizing the wrapper after the
    /// scale change is what makes the new scroll offsets valid, so the
    /// order is fixed.
    fn apply_transform(&mut self) {
        let AppliedTransform { zoom, translate } = self.applied;
        self.content.set_scale(zoom);
        let bounds = self.content.bounds();
        self.content.resize_wrapper(bounds.size());
        self.host.set_scroll_offset(translate);
        self.state.set_translate(translate);
        log::trace!(
            "applied transform: zoom {zoom:.3}, translate ({:.1}, {:.1})",
            translate.x,
            translate.y
        );
    }
}

impl<C: ContentHost, H, R> Drop for ViewportEngine<C, H, R> {
    fn drop(&mut self) {
        self.content.set_native_gesture_suppression(false);
    }
}
