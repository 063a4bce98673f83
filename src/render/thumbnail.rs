//! Thumbnail render pipeline.
//!
//! Same cancel-before-restart pattern as the full-page scheduler, with a
//! fixed target bounding box instead of a CSS pixel size. The pipeline is
//! staged: load the page, then render it; changing inputs cancel whichever
//! stage is in flight.

use std::time::Instant;

use crate::debounce::{DEBOUNCE_WINDOW, Debounced};
use crate::doc::{DocumentHandle, PageHandle, RenderSpec};
use crate::geometry::Size;
use crate::surface::{Frame, PaintTarget};
use crate::task::Cancellable;

/// Render scale multiplier for thumbnails that are scrolled out of view.
pub const HIDDEN_THUMBNAIL_FACTOR: f32 = 0.5;

/// Bounding box a thumbnail must fit into, in logical pixels.
#[derive(Clone, Copy, Debug)]
pub struct ThumbnailOptions {
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            max_width: 400.0,
            max_height: 800.0,
        }
    }
}

enum Stage<P> {
    Idle,
    LoadingPage(Cancellable<P>),
    Rendering { page: P, task: Cancellable<Frame> },
    Done { page: P },
    Failed,
}

/// Renders one page's thumbnail into a paint target.
pub struct ThumbnailRenderer<P, T> {
    page_number: usize,
    options: ThumbnailOptions,
    target: T,
    dpr: f32,
    visible: Debounced<bool>,
    stage: Stage<P>,
    rendered_scale: Option<f32>,
    generation: u64,
}

impl<P: PageHandle, T: PaintTarget> ThumbnailRenderer<P, T> {
    #[must_use]
    pub fn new(page_number: usize, target: T, device_pixel_ratio: f32) -> Self {
        Self::with_options(page_number, target, device_pixel_ratio, ThumbnailOptions::default())
    }

    #[must_use]
    pub fn with_options(
        page_number: usize,
        target: T,
        device_pixel_ratio: f32,
        options: ThumbnailOptions,
    ) -> Self {
        Self {
            page_number,
            options,
            target,
            dpr: device_pixel_ratio,
            visible: Debounced::new(false, DEBOUNCE_WINDOW),
            stage: Stage::Idle,
            rendered_scale: None,
            generation: 0,
        }
    }

    /// Feed a visibility change; debounced before it drives fidelity.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        self.visible.set(visible, now);
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[must_use]
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Drive the pipeline against `doc` at `generation`; a generation move
    /// restarts from the page load.
    pub fn tick<D: DocumentHandle<Page = P>>(&mut self, doc: &D, generation: u64, now: Instant) {
        if generation != self.generation {
            self.restart(doc, generation);
        }
        self.visible.poll(now);

        let stage = std::mem::replace(&mut self.stage, Stage::Idle);
        self.stage = match stage {
            Stage::Idle => {
                Stage::LoadingPage(Cancellable::wrap(doc.load_page(self.page_number)))
            }
            Stage::LoadingPage(mut task) => match task.try_settle() {
                Some(Ok(page)) => self.begin_render(page),
                Some(Err(fault)) => {
                    if fault.is_cancellation() {
                        Stage::Idle
                    } else {
                        log::error!(
                            "thumbnail {}: page load failed: {fault}",
                            self.page_number
                        );
                        Stage::Failed
                    }
                }
                None => Stage::LoadingPage(task),
            },
            Stage::Rendering { page, mut task } => {
                let scale = self.scale_for(page.base_size());
                if self.rendered_scale != Some(scale) {
                    // Fidelity changed mid-render; supersede the old task.
                    task.cancel();
                    self.begin_render(page)
                } else {
                    match task.try_settle() {
                        Some(Ok(frame)) => {
                            if self.target.is_attached() {
                                self.target.present(frame);
                            }
                            Stage::Done { page }
                        }
                        Some(Err(fault)) => {
                            if !fault.is_cancellation() {
                                log::error!(
                                    "thumbnail {}: render failed: {fault}",
                                    self.page_number
                                );
                            }
                            Stage::Done { page }
                        }
                        None => Stage::Rendering { page, task },
                    }
                }
            }
            Stage::Done { page } => {
                let scale = self.scale_for(page.base_size());
                if self.rendered_scale != Some(scale) {
                    self.begin_render(page)
                } else {
                    Stage::Done { page }
                }
            }
            Stage::Failed => Stage::Failed,
        };
    }

    /// Scale that fits the page into the bounding box, combined with the
    /// visible/hidden fidelity factor.
    fn scale_for(&self, base: Size) -> f32 {
        let fit = base.fit_scale(Size::new(self.options.max_width, self.options.max_height));
        let fidelity = if *self.visible.get() {
            self.dpr
        } else {
            HIDDEN_THUMBNAIL_FACTOR
        };
        fit * fidelity
    }

    fn begin_render(&mut self, page: P) -> Stage<P> {
        let scale = self.scale_for(page.base_size());
        self.target.set_device_size(page.base_size().scaled(scale));
        self.rendered_scale = Some(scale);
        let task = Cancellable::wrap(page.render(RenderSpec { scale }));
        Stage::Rendering { page, task }
    }

    fn restart<D: DocumentHandle<Page = P>>(&mut self, doc: &D, generation: u64) {
        self.cancel();
        self.generation = generation;
        self.rendered_scale = None;
        self.stage = Stage::LoadingPage(Cancellable::wrap(doc.load_page(self.page_number)));
    }

    /// Cancel whichever stage is in flight.
    pub fn cancel(&mut self) {
        match &mut self.stage {
            Stage::LoadingPage(task) => task.cancel(),
            Stage::Rendering { task, .. } => task.cancel(),
            Stage::Idle | Stage::Done { .. } | Stage::Failed => {}
        }
    }
}

impl<P, T> Drop for ThumbnailRenderer<P, T> {
    fn drop(&mut self) {
        match &mut self.stage {
            Stage::LoadingPage(task) => task.cancel(),
            Stage::Rendering { task, .. } => task.cancel(),
            Stage::Idle | Stage::Done { .. } | Stage::Failed => {}
        }
    }
}
