use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::output::encode::run_write_task;
use crate::output::task::ImageWriteTask;

/// Default bound on tasks encoding at once before `enqueue` blocks.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Completion handle returned by [`ImageWriteQueue::enqueue`].
#[derive(Debug)]
pub struct WriteFuture {
    rx: Option<mpsc::Receiver<AnnotateResult<PathBuf>>>,
    done: Option<AnnotateResult<PathBuf>>,
}

/// Sending half of a [`WriteFuture`], held by the worker.
#[derive(Debug)]
pub struct WritePromise {
    tx: mpsc::SyncSender<AnnotateResult<PathBuf>>,
}

impl WritePromise {
    /// Resolve the paired future. A dropped future is ignored.
    pub fn complete(self, result: AnnotateResult<PathBuf>) {
        let _ = self.tx.send(result);
    }
}

impl WriteFuture {
    /// Unresolved future plus the promise that resolves it.
    pub fn pending() -> (WritePromise, Self) {
        let (tx, rx) = mpsc::sync_channel(1);
        (
            WritePromise { tx },
            Self {
                rx: Some(rx),
                done: None,
            },
        )
    }

    /// Already-resolved future.
    pub fn ready(result: AnnotateResult<PathBuf>) -> Self {
        Self {
            rx: None,
            done: Some(result),
        }
    }

    /// Non-blocking completion check.
    pub fn is_ready(&mut self) -> bool {
        if self.done.is_some() {
            return true;
        }
        let Some(rx) = self.rx.as_ref() else {
            return false;
        };
        match rx.try_recv() {
            Ok(r) => {
                self.done = Some(r);
                self.rx = None;
                true
            }
            Err(mpsc::TryRecvError::Empty) => false,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.done = Some(Err(dropped()));
                self.rx = None;
                true
            }
        }
    }

    /// Block until the write finishes.
    pub fn wait(self) -> AnnotateResult<PathBuf> {
        if let Some(r) = self.done {
            return r;
        }
        match self.rx {
            Some(rx) => rx.recv().unwrap_or_else(|_| Err(dropped())),
            None => Err(dropped()),
        }
    }
}

fn dropped() -> AnnotateError {
    AnnotateError::codec("image write task was dropped before completing")
}

/// Asynchronous image writer: takes ownership of tasks and reports completion via futures.
pub trait ImageWriteQueue: Send + Sync {
    /// Hand `task` to the queue.
    fn enqueue(&self, task: ImageWriteTask) -> WriteFuture;

    /// Block until every task enqueued so far has completed.
    fn flush(&self) {}
}

#[derive(Debug, Default)]
struct InFlight {
    count: Mutex<usize>,
    cv: Condvar,
}

impl InFlight {
    fn acquire(&self, max: usize) {
        let mut n = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *n >= max {
            n = self.cv.wait(n).unwrap_or_else(PoisonError::into_inner);
        }
        *n += 1;
    }

    fn release(&self) {
        let mut n = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *n = n.saturating_sub(1);
        self.cv.notify_all();
    }

    fn wait_idle(&self) {
        let mut n = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *n > 0 {
            n = self.cv.wait(n).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn current(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`ImageWriteQueue`] that encodes on a dedicated rayon pool.
pub struct ThreadedImageWriteQueue {
    pool: rayon::ThreadPool,
    in_flight: Arc<InFlight>,
    max_in_flight: usize,
}

impl std::fmt::Debug for ThreadedImageWriteQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadedImageWriteQueue")
            .field("threads", &self.pool.current_num_threads())
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}

impl ThreadedImageWriteQueue {
    /// Queue with `threads` workers (rayon default when `None`) and an in-flight bound.
    pub fn new(threads: Option<usize>, max_in_flight: usize) -> AnnotateResult<Self> {
        if max_in_flight == 0 {
            return Err(AnnotateError::config("max_in_flight must be >= 1"));
        }
        Ok(Self {
            pool: build_thread_pool(threads)?,
            in_flight: Arc::new(InFlight::default()),
            max_in_flight,
        })
    }

    /// Queue with rayon's default thread count and [`DEFAULT_MAX_IN_FLIGHT`].
    pub fn with_defaults() -> AnnotateResult<Self> {
        Self::new(None, DEFAULT_MAX_IN_FLIGHT)
    }

    /// Tasks currently encoding or waiting for a worker.
    pub fn in_flight(&self) -> usize {
        self.in_flight.current()
    }
}

impl ImageWriteQueue for ThreadedImageWriteQueue {
    fn enqueue(&self, task: ImageWriteTask) -> WriteFuture {
        self.in_flight.acquire(self.max_in_flight);
        let (promise, future) = WriteFuture::pending();
        let in_flight = Arc::clone(&self.in_flight);
        self.pool.spawn(move || {
            let path = task.output_path.clone();
            let result = run_write_task(task);
            if let Err(e) = &result {
                tracing::warn!(path = %path.display(), error = %e, "image write failed");
            }
            promise.complete(result);
            in_flight.release();
        });
        future
    }

    fn flush(&self) {
        self.in_flight.wait_idle();
    }
}

fn build_thread_pool(threads: Option<usize>) -> AnnotateResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(AnnotateError::config("threads must be >= 1"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("annorender-write-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| AnnotateError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/output/queue.rs"]
mod tests;
