/*!
 * Background worker pool
 *
 * One pool is built by the host and shared by every transition that needs to
 * leave the UI thread. Tasks are fire-and-forget; a panicking task is logged
 * and never takes the process down.
 */

use std::any::Any;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::{ChadError, Result};

/// Upper bound for auto-detected worker counts
const MAX_AUTO_WORKERS: usize = 8;

pub struct WorkerPool {
    pool: rayon::ThreadPool,
    pending: Arc<PendingState>,
    workers: usize,
}

/// Count of submitted tasks that have not finished yet
struct PendingState {
    count: Mutex<usize>,
    idle: Condvar,
}

impl PendingState {
    fn enter(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn leave(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Decrements the pending count even if the task unwinds
struct PendingGuard(Arc<PendingState>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.leave();
    }
}

impl WorkerPool {
    /// Create a pool with `workers` threads (0 = auto-detect)
    pub fn new(workers: usize) -> Result<Self> {
        let workers = if workers == 0 {
            detect_workers()
        } else {
            workers
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("chadtree-worker-{}", i))
            .panic_handler(|payload| {
                tracing::error!(
                    panic = %panic_message(payload.as_ref()),
                    "background task panicked"
                );
            })
            .build()
            .map_err(|e| ChadError::Pool(e.to_string()))?;

        tracing::debug!(workers, "worker pool started");

        Ok(Self {
            pool,
            pending: Arc::new(PendingState {
                count: Mutex::new(0),
                idle: Condvar::new(),
            }),
            workers,
        })
    }

    /// Queue `task` and return immediately
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pending.enter();
        let guard = PendingGuard(self.pending.clone());
        self.pool.spawn(move || {
            let _guard = guard;
            task();
        });
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Tasks submitted but not yet finished
    pub fn pending(&self) -> usize {
        *self
            .pending
            .count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until every submitted task has finished
    pub fn wait_idle(&self) {
        let mut count = self
            .pending
            .count
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .pending
                .idle
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`wait_idle`](Self::wait_idle) but gives up after `timeout`.
    /// Returns whether the pool went idle.
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self
            .pending
            .count
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            count = self
                .pending
                .idle
                .wait_timeout(count, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

/// Opening files is I/O bound and rare; a handful of threads is plenty
pub fn detect_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to detect available parallelism, using 1 worker");
            1
        })
        .min(MAX_AUTO_WORKERS)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
