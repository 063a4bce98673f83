//! Decoding-collaborator interfaces.
//!
//! The engine consumes the document/page decoding library through these
//! traits only. Loads and renders settle through [`PendingTask`]s; a
//! collaborator that honors cancellation rejects with
//! [`TaskFault::Cancelled`](crate::task::TaskFault::Cancelled).

use crate::doc::outline::{OutlineNode, OutlineTarget};
use crate::geometry::Size;
use crate::surface::Frame;
use crate::task::PendingTask;

/// Accessing a dependent resource before it finished loading. Raised
/// instead of returning a placeholder, so callers are forced to gate on
/// readiness.
#[derive(Debug, thiserror::Error)]
pub enum AccessFault {
    #[error("document is not loaded")]
    DocumentNotReady,

    #[error("page is not loaded")]
    PageNotReady,
}

/// Load progress for a document, in collaborator-defined units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl LoadProgress {
    /// Completed fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.loaded as f64 / self.total as f64) as f32
        }
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.loaded >= self.total && self.total > 0
    }
}

/// An in-flight document open: the eventual handle plus progress events.
/// A collaborator without progress reporting may drop the sender early.
pub struct DocumentLoad<D> {
    pub task: PendingTask<D>,
    pub progress: flume::Receiver<LoadProgress>,
}

/// Parameters for rendering one page into a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSpec {
    /// Device-pixel scale relative to the page's base size.
    pub scale: f32,
}

/// Entry point of the decoding collaborator.
pub trait DocumentService {
    type Doc: DocumentHandle;

    /// Begin loading a document from `source`.
    fn open(&self, source: &str) -> DocumentLoad<Self::Doc>;
}

/// A loaded document.
pub trait DocumentHandle {
    type Page: PageHandle;

    /// Total number of pages.
    fn page_count(&self) -> usize;

    /// Begin loading a page (1-based).
    fn load_page(&self, page_number: usize) -> PendingTask<Self::Page>;

    /// Begin fetching the document outline.
    fn outline(&self) -> PendingTask<Vec<OutlineNode>>;

    /// Resolve an outline target to a 0-based page index.
    fn destination_page(&self, target: &OutlineTarget) -> PendingTask<usize>;
}

/// A loaded page.
pub trait PageHandle {
    /// Page size in logical pixels at scale 1.
    fn base_size(&self) -> Size;

    /// Begin rendering the page; resolves with a frame sized
    /// `base_size x spec.scale` in device pixels.
    fn render(&self, spec: RenderSpec) -> PendingTask<Frame>;
}
