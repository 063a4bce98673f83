//! Document outline (table of contents) and destination resolution.

use crate::doc::interface::DocumentHandle;
use crate::task::Cancellable;

/// Navigation target of an outline entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutlineTarget {
    /// Direct 0-based page index.
    Page(usize),
    /// Named destination, resolved through the document.
    Named(String),
    /// External URI.
    External(String),
}

/// A single outline entry with its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: String,
    pub target: Option<OutlineTarget>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target: None,
            children: Vec::new(),
        }
    }
}

/// Fetches the outline once per document generation.
///
/// Outline failures are never user-facing; the tree just stays empty.
pub struct OutlineSession {
    task: Option<Cancellable<Vec<OutlineNode>>>,
    nodes: Vec<OutlineNode>,
    loaded: bool,
}

impl OutlineSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            task: None,
            nodes: Vec::new(),
            loaded: false,
        }
    }

    /// Start (or restart) fetching from `doc`, cancelling a stale fetch.
    pub fn load<D: DocumentHandle>(&mut self, doc: &D) {
        self.cancel();
        self.nodes.clear();
        self.loaded = false;
        self.task = Some(Cancellable::wrap(doc.outline()));
    }

    /// Drive the pending fetch; true when the tree changed.
    pub fn poll(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return false;
        };
        match task.try_settle() {
            Some(Ok(nodes)) => {
                self.task = None;
                self.nodes = nodes;
                self.loaded = true;
                true
            }
            Some(Err(fault)) => {
                self.task = None;
                if !fault.is_cancellation() {
                    log::debug!("outline load failed: {fault}");
                }
                false
            }
            None => false,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[OutlineNode] {
        &self.nodes
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Cancel any in-flight fetch.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
    }
}

impl Default for OutlineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OutlineSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Resolves an outline destination to the 1-based page number to navigate
/// to. A new resolution supersedes the one in flight.
pub struct DestinationResolver {
    task: Option<Cancellable<usize>>,
}

impl DestinationResolver {
    #[must_use]
    pub fn new() -> Self {
        Self { task: None }
    }

    /// Begin resolving `target` through `doc`.
    pub fn resolve<D: DocumentHandle>(&mut self, doc: &D, target: &OutlineTarget) {
        self.cancel();
        self.task = Some(Cancellable::wrap(doc.destination_page(target)));
    }

    /// The 1-based page number to navigate to, once resolution settles.
    pub fn poll(&mut self) -> Option<usize> {
        let task = self.task.as_mut()?;
        match task.try_settle()? {
            Ok(page_index) => {
                self.task = None;
                Some(page_index + 1)
            }
            Err(fault) => {
                self.task = None;
                if !fault.is_cancellation() {
                    log::debug!("destination resolution failed: {fault}");
                }
                None
            }
        }
    }

    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.task.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
    }
}

impl Default for DestinationResolver {
    fn default() -> Self {
        Self::new()
    }
}
