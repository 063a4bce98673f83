//! Document load lifecycle.

use crate::doc::interface::{AccessFault, DocumentService, LoadProgress};
use crate::task::{Cancellable, TaskId, TaskIds};

/// Load phase of a document session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    /// The load rejected for a reason other than cancellation. Terminal
    /// for the whole viewport until a new open is requested.
    Failed,
}

/// Owns one document's load lifecycle: open, progress, readiness gating.
///
/// Re-opening cancels the previous load; whatever that load later produces
/// is never observed.
pub struct DocumentSession<S: DocumentService> {
    service: S,
    phase: LoadPhase,
    task: Option<Cancellable<S::Doc>>,
    progress_rx: Option<flume::Receiver<LoadProgress>>,
    progress: f32,
    doc: Option<S::Doc>,
    generation: u64,
    ids: TaskIds,
    task_id: Option<TaskId>,
}

impl<S: DocumentService> DocumentSession<S> {
    #[must_use]
    pub fn new(service: S) -> Self {
        Self {
            service,
            phase: LoadPhase::Idle,
            task: None,
            progress_rx: None,
            progress: 0.0,
            doc: None,
            generation: 0,
            ids: TaskIds::new(),
            task_id: None,
        }
    }

    /// Begin loading `source`, superseding any in-flight load.
    pub fn open(&mut self, source: &str) {
        self.cancel();
        let load = self.service.open(source);
        let id = self.ids.next_id();
        log::debug!("document load {id:?} started: {source}");
        self.task = Some(Cancellable::wrap(load.task));
        self.progress_rx = Some(load.progress);
        self.progress = 0.0;
        self.phase = LoadPhase::Loading;
        self.doc = None;
        self.generation += 1;
        self.task_id = Some(id);
    }

    /// Drive the load; true when phase or progress changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = self.drain_progress();

        if let Some(task) = self.task.as_mut() {
            match task.try_settle() {
                Some(Ok(doc)) => {
                    self.task = None;
                    self.doc = Some(doc);
                    self.progress = 1.0;
                    self.phase = LoadPhase::Ready;
                    changed = true;
                }
                Some(Err(fault)) => {
                    self.task = None;
                    if fault.is_cancellation() {
                        log::trace!("document load {:?} cancelled", self.task_id);
                    } else {
                        log::error!("error loading document: {fault}");
                        self.phase = LoadPhase::Failed;
                        changed = true;
                    }
                }
                None => {}
            }
        }

        changed
    }

    fn drain_progress(&mut self) -> bool {
        let Some(rx) = self.progress_rx.as_ref() else {
            return false;
        };
        let mut changed = false;
        while let Ok(event) = rx.try_recv() {
            // The final loaded == total event is dropped; readiness flips
            // the fraction to 1 on its own.
            if event.is_complete() {
                continue;
            }
            let fraction = event.fraction();
            if (fraction - self.progress).abs() > f32::EPSILON {
                self.progress = fraction;
                changed = true;
            }
        }
        changed
    }

    /// The loaded document, or a fail-fast fault before the load settles.
    pub fn document(&self) -> Result<&S::Doc, AccessFault> {
        self.doc.as_ref().ok_or(AccessFault::DocumentNotReady)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Load progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Monotonic id distinguishing successive opens. Page and outline
    /// sessions reload when it moves.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel the in-flight load, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
    }
}

impl<S: DocumentService> Drop for DocumentSession<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
