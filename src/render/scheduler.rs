//! Per-page render scheduling.
//!
//! Decides each page's render fidelity from debounced zoom and visibility
//! and issues cancellable renders against the decoding collaborator. A
//! superseded render is cancelled before its replacement starts, so a
//! stale frame is never presented, even if it settles after the
//! replacement's frame.

use std::time::Instant;

use crate::debounce::{DEBOUNCE_WINDOW, Debounced};
use crate::doc::{PageHandle, RenderSpec};
use crate::surface::{Frame, PaintTarget};
use crate::task::{Cancellable, TaskIds};

/// Fallback render scale for pages that are not visible. Hidden pages stay
/// cheap to refresh without being left blank.
pub const HIDDEN_PAGE_SCALE: f32 = 1.0;

/// Initial cap on the device pixel ratio, so first renders stay bounded on
/// very dense displays. Later display changes pass through uncapped.
pub const MAX_INITIAL_DPR: f32 = 2.0;

/// Schedules full-resolution renders for one page into a paint target.
pub struct PageRenderer<T> {
    page_number: usize,
    target: T,
    dpr: f32,
    zoom: Debounced<f32>,
    visible: Debounced<bool>,
    inflight: Option<Cancellable<Frame>>,
    last_spec: Option<RenderSpec>,
    dirty: bool,
    ids: TaskIds,
}

impl<T: PaintTarget> PageRenderer<T> {
    #[must_use]
    pub fn new(page_number: usize, target: T, device_pixel_ratio: f32) -> Self {
        Self {
            page_number,
            target,
            dpr: device_pixel_ratio.min(MAX_INITIAL_DPR),
            zoom: Debounced::new(1.0, DEBOUNCE_WINDOW),
            visible: Debounced::new(false, DEBOUNCE_WINDOW),
            inflight: None,
            last_spec: None,
            dirty: true,
            ids: TaskIds::new(),
        }
    }

    /// Feed a zoom change; only the value that survives the debounce
    /// window schedules a render.
    pub fn set_zoom(&mut self, zoom: f32, now: Instant) {
        self.zoom.set(zoom, now);
    }

    /// Feed a visibility change; debounced before it drives fidelity so
    /// fast scrolling past the page does not thrash full/low renders.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        self.visible.set(visible, now);
    }

    /// Update the device pixel ratio (display change).
    pub fn set_device_pixel_ratio(&mut self, dpr: f32) {
        if (dpr - self.dpr).abs() > f32::EPSILON {
            self.dpr = dpr;
            self.dirty = true;
        }
    }

    /// Force a fresh render regardless of memoized parameters, e.g. when
    /// the page handle changed.
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.last_spec = None;
    }

    /// Drive the scheduler: settle debounces, restart the render when the
    /// settled inputs changed, and present a finished frame.
    pub fn tick<P: PageHandle>(&mut self, page: &P, now: Instant) {
        let zoom_changed = self.zoom.poll(now);
        let visible_changed = self.visible.poll(now);
        if zoom_changed || visible_changed || self.dirty {
            self.schedule(page);
        }
        self.finish();
    }

    /// Render scale for the current settled inputs.
    #[must_use]
    pub fn render_scale(&self) -> f32 {
        if *self.visible.get() {
            self.dpr * self.zoom.get()
        } else {
            HIDDEN_PAGE_SCALE
        }
    }

    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.inflight.is_some()
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[must_use]
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Cancel the in-flight render, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.inflight.as_mut() {
            task.cancel();
        }
    }

    fn schedule<P: PageHandle>(&mut self, page: &P) {
        self.dirty = false;
        let spec = RenderSpec {
            scale: self.render_scale(),
        };
        if self.last_spec == Some(spec) {
            return;
        }
        self.cancel();

        let base = page.base_size();
        self.target.set_css_size(base);
        self.target.set_device_size(base.scaled(spec.scale));

        let id = self.ids.next_id();
        log::trace!(
            "page {} render {id:?} at scale {:.2}",
            self.page_number,
            spec.scale
        );
        self.inflight = Some(Cancellable::wrap(page.render(spec)));
        self.last_spec = Some(spec);
    }

    fn finish(&mut self) {
        let Some(task) = self.inflight.as_mut() else {
            return;
        };
        match task.try_settle() {
            Some(Ok(frame)) => {
                self.inflight = None;
                if self.target.is_attached() {
                    self.target.present(frame);
                }
            }
            Some(Err(fault)) => {
                self.inflight = None;
                if fault.is_cancellation() {
                    log::trace!("page {} render superseded", self.page_number);
                } else {
                    // One page failing degrades only that page.
                    log::error!("page {} render failed: {fault}", self.page_number);
                }
            }
            None => {}
        }
    }
}

impl<T> Drop for PageRenderer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.inflight.as_mut() {
            task.cancel();
        }
    }
}
