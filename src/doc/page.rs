//! Per-page load lifecycle.

use crate::doc::interface::{AccessFault, DocumentHandle};
use crate::task::Cancellable;

/// Loads one page and keeps it in step with the owning document.
///
/// The session reloads when the document generation moves, cancelling the
/// stale load first; a stale load that settles afterwards is never
/// observed.
pub struct PageSession<P> {
    page_number: usize,
    generation: u64,
    task: Option<Cancellable<P>>,
    page: Option<P>,
    failed: bool,
}

impl<P> PageSession<P> {
    /// Create a session for `page_number` (1-based).
    #[must_use]
    pub fn new(page_number: usize) -> Self {
        Self {
            page_number,
            generation: 0,
            task: None,
            page: None,
            failed: false,
        }
    }

    /// (Re)start loading from `doc` at `generation`. A no-op when that
    /// generation is already loaded, loading, or failed; only a generation
    /// move retries a failed page.
    pub fn sync<D: DocumentHandle<Page = P>>(&mut self, doc: &D, generation: u64) {
        if self.generation == generation
            && (self.page.is_some() || self.task.is_some() || self.failed)
        {
            return;
        }
        self.cancel();
        self.page = None;
        self.failed = false;
        self.generation = generation;
        self.task = Some(Cancellable::wrap(doc.load_page(self.page_number)));
    }

    /// Drive the pending load; true when the page became ready.
    pub fn poll(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        match task.try_settle() {
            Some(Ok(page)) => {
                self.task = None;
                self.page = Some(page);
                true
            }
            Some(Err(fault)) => {
                self.task = None;
                if !fault.is_cancellation() {
                    log::error!("error loading page {}: {fault}", self.page_number);
                    self.failed = true;
                }
                false
            }
            None => false,
        }
    }

    /// The loaded page, or a fail-fast fault before the load settles.
    pub fn page(&self) -> Result<&P, AccessFault> {
        self.page.as_ref().ok_or(AccessFault::PageNotReady)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.page.is_some()
    }

    #[must_use]
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Cancel the in-flight load, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
    }
}

impl<P> Drop for PageSession<P> {
    fn drop(&mut self) {
        self.cancel();
    }
}
