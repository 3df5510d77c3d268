use std::sync::{Mutex, PoisonError};

use crate::output::queue::{ImageWriteQueue, WriteFuture};
use crate::output::task::ImageWriteTask;

/// Queue that keeps every task instead of writing it; futures resolve at once.
#[derive(Debug, Default)]
pub struct RecordingQueue {
    tasks: Mutex<Vec<ImageWriteTask>>,
}

impl RecordingQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the tasks enqueued so far, in enqueue order.
    pub fn tasks(&self) -> Vec<ImageWriteTask> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the recorded tasks.
    pub fn take_tasks(&self) -> Vec<ImageWriteTask> {
        std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ImageWriteQueue for RecordingQueue {
    fn enqueue(&self, task: ImageWriteTask) -> WriteFuture {
        let path = task.output_path.clone();
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task);
        WriteFuture::ready(Ok(path))
    }
}
