//! Fire-and-forget worker pool for non-UI work.
//!
//! Tasks run on a dedicated tokio multi-thread runtime. A non-zero key de-duplicates: while a
//! task with that key is outstanding, further submissions with the same key are skipped. A task
//! that panics is a fatal fault: it is logged as critical and the fault handler runs, which by
//! default aborts the process.

use std::{
    collections::HashSet,
    panic::{self, AssertUnwindSafe},
    process,
    sync::Arc,
};

use parking_lot::Mutex;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error, trace};

use crate::Result;

/// Worker threads in the default pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Called after a task panicked and was logged.
pub type FaultHandler = Arc<dyn Fn() + Send + Sync>;

/// Default fault handler.
fn abort_process() {
    process::abort()
}

/// Removes a key from the pending set when the task finishes, panicking or not.
struct PendingGuard {
    /// Shared pending set.
    pending: Arc<Mutex<HashSet<u64>>>,
    /// Key to release; zero means none.
    key: u64,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.key != 0 {
            self.pending.lock().remove(&self.key);
        }
    }
}

/// A fixed-size pool running closures off the UI thread.
pub struct TaskPool {
    /// Runtime owning the worker threads.
    runtime: Runtime,
    /// Keys of outstanding de-duplicated tasks.
    pending: Arc<Mutex<HashSet<u64>>>,
    /// Runs after a task panic.
    on_fault: FaultHandler,
}

impl TaskPool {
    /// A pool with [`DEFAULT_WORKERS`] workers that aborts the process on a task panic.
    pub fn new() -> Result<Self> {
        Self::with_workers(DEFAULT_WORKERS)
    }

    /// A pool running at most `workers` tasks at once.
    pub fn with_workers(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .max_blocking_threads(workers)
            .thread_name("emuview-task")
            .enable_time()
            .build()?;
        debug!(workers, "task pool started");
        Ok(Self {
            runtime,
            pending: Arc::new(Mutex::new(HashSet::new())),
            on_fault: Arc::new(abort_process),
        })
    }

    /// Replace the action taken after a task panic.
    #[must_use]
    pub fn with_fault_handler(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_fault = Arc::new(handler);
        self
    }

    /// Queue `task`. Returns false when `key` is non-zero and a task with the same key is still
    /// outstanding; the task is then dropped without running.
    pub fn submit(&self, task: impl FnOnce() + Send + 'static, key: u64) -> bool {
        if key != 0 && !self.pending.lock().insert(key) {
            trace!(key, "task already pending; skipped");
            return false;
        }
        let guard = PendingGuard {
            pending: self.pending.clone(),
            key,
        };
        let on_fault = self.on_fault.clone();
        self.runtime.spawn_blocking(move || {
            let _guard = guard;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(critical = true, key, panic = %message, "task panicked");
                on_fault();
            }
        });
        true
    }

    /// Whether a task with `key` is outstanding.
    pub fn is_pending(&self, key: u64) -> bool {
        key != 0 && self.pending.lock().contains(&key)
    }

    /// Number of outstanding keyed tasks.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
