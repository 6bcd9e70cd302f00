use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::domain::TaskId;

/// What a worker needs to run one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub task_id: TaskId,
    pub input_path: PathBuf,
    pub prompt_addon: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("task queue is full")]
    Full,
    #[error("task queue is closed")]
    Closed,
}

/// Producer half. Cloned into every request handler.
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<WorkItem>,
    outstanding: Arc<AtomicUsize>,
}

/// Consumer half shared by the worker pool. Each item goes to exactly one
/// caller of [`TaskQueueConsumer::dequeue`].
#[derive(Clone)]
pub struct TaskQueueConsumer {
    receiver: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    outstanding: Arc<AtomicUsize>,
}

/// A reserved place in the queue. Sending through it cannot fail.
pub struct QueueSlot<'a> {
    permit: mpsc::Permit<'a, WorkItem>,
    outstanding: &'a AtomicUsize,
}

/// Creates a FIFO queue holding at most `capacity` pending items.
pub fn task_queue(capacity: usize) -> (TaskQueue, TaskQueueConsumer) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let outstanding = Arc::new(AtomicUsize::new(0));
    (
        TaskQueue {
            sender,
            outstanding: Arc::clone(&outstanding),
        },
        TaskQueueConsumer {
            receiver: Arc::new(Mutex::new(receiver)),
            outstanding,
        },
    )
}

impl TaskQueue {
    /// Claims a slot without waiting.
    pub fn reserve(&self) -> Result<QueueSlot<'_>, QueueError> {
        match self.sender.try_reserve() {
            Ok(permit) => Ok(QueueSlot {
                permit,
                outstanding: &self.outstanding,
            }),
            Err(mpsc::error::TrySendError::Full(())) => Err(QueueError::Full),
            Err(mpsc::error::TrySendError::Closed(())) => Err(QueueError::Closed),
        }
    }

    /// Appends `item`, waiting for capacity if the queue is full.
    pub async fn enqueue(&self, item: WorkItem) -> Result<(), QueueError> {
        let permit = self.sender.reserve().await.map_err(|_| QueueError::Closed)?;
        QueueSlot {
            permit,
            outstanding: &self.outstanding,
        }
        .send(item);
        Ok(())
    }

    /// Items enqueued and not yet marked done.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

impl QueueSlot<'_> {
    pub fn send(self, item: WorkItem) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.permit.send(item);
    }
}

impl TaskQueueConsumer {
    /// Waits for the next item. Returns `None` once every producer is gone
    /// and the queue is drained.
    pub async fn dequeue(&self) -> Option<WorkItem> {
        let mut receiver = self.receiver.lock().await;
        receiver.recv().await
    }

    /// Marks one dequeued item as finished.
    pub fn task_done(&self) {
        let _ = self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}
