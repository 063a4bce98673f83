//! Cancellable task coordination.
//!
//! Wraps a pending asynchronous operation so observation of its eventual
//! result can be suppressed after the fact. Cancelling does not stop the
//! underlying work; a collaborator that honors its own cancellation token
//! rejects with [`TaskFault::Cancelled`], which cancellers swallow.

use flume::{Receiver, Sender, TryRecvError};

/// Unique identifier for issued tasks, used to correlate log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Monotonic [`TaskId`] generator.
#[derive(Debug)]
pub struct TaskIds {
    next: u64,
}

impl TaskIds {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next);
        self.next += 1;
        id
    }
}

impl Default for TaskIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a task settled without a value.
#[derive(Debug, thiserror::Error)]
pub enum TaskFault {
    /// The collaborator honored a cancellation token.
    #[error("task was cancelled")]
    Cancelled,

    /// The collaborator dropped its completer without settling.
    #[error("task was abandoned by its worker")]
    Abandoned,

    /// Any other failure, with collaborator-provided detail.
    #[error("{detail}")]
    Failed { detail: String },
}

impl TaskFault {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed { detail: msg.into() }
    }

    /// True for the settlement a canceller is expected to swallow.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Settles the paired [`PendingTask`]. Consumed on use.
pub struct Completer<T> {
    tx: Sender<Result<T, TaskFault>>,
}

impl<T> Completer<T> {
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn reject(self, fault: TaskFault) {
        let _ = self.tx.send(Err(fault));
    }
}

/// A pending asynchronous result, observed by polling.
pub struct PendingTask<T> {
    rx: Receiver<Result<T, TaskFault>>,
}

impl<T> PendingTask<T> {
    fn try_recv(&self) -> Option<Result<T, TaskFault>> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskFault::Abandoned)),
        }
    }
}

/// Create a linked completer/task pair for an in-flight operation.
#[must_use]
pub fn pending<T>() -> (Completer<T>, PendingTask<T>) {
    let (tx, rx) = flume::bounded(1);
    (Completer { tx }, PendingTask { rx })
}

/// A [`PendingTask`] whose settlement can be suppressed after the fact.
///
/// After [`cancel`](Self::cancel), neither a success nor a failure is ever
/// observed through [`try_settle`](Self::try_settle), even if the
/// underlying operation settles later.
pub struct Cancellable<T> {
    task: PendingTask<T>,
    cancelled: bool,
    delivered: bool,
}

impl<T> Cancellable<T> {
    #[must_use]
    pub fn wrap(task: PendingTask<T>) -> Self {
        Self {
            task,
            cancelled: false,
            delivered: false,
        }
    }

    /// Suppress all future observation of the wrapped task. Idempotent;
    /// may be called any number of times, before or after settlement.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Poll for the settlement. Yields it at most once; `None` before the
    /// task settles, after delivery, and always after cancellation.
    pub fn try_settle(&mut self) -> Option<Result<T, TaskFault>> {
        if self.cancelled || self.delivered {
            return None;
        }
        let outcome = self.task.try_recv()?;
        self.delivered = true;
        Some(outcome)
    }
}
