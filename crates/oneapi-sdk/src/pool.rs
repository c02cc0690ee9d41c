//! Worker pool backing blocking and callback calls.

use std::future::Future;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::error::{OneApiError, Result};

/// Thread name prefix for pool workers.
const THREAD_NAME: &str = "oneapi-worker";

/// Multi-thread tokio runtime owned by the client.
#[derive(Debug)]
pub(crate) struct WorkerPool {
    /// Handle used to run and spawn work.
    handle: Handle,
    /// Owned runtime; taken on drop.
    runtime: Option<Runtime>,
}

impl WorkerPool {
    /// Starts a pool with `worker_threads` threads.
    ///
    /// # Errors
    ///
    /// Returns `OneApiError::Configuration` if `worker_threads` is zero or the
    /// runtime fails to start.
    pub(crate) fn new(worker_threads: usize) -> Result<Self> {
        if worker_threads == 0 {
            return Err(OneApiError::Configuration(String::from(
                "worker_threads must be at least 1",
            )));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name(THREAD_NAME)
            .enable_all()
            .build()
            .map_err(|e| {
                OneApiError::Configuration(format!("failed to start worker pool: {e}"))
            })?;

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    /// Runs `future` to completion, blocking the current thread.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.handle.block_on(future)
    }

    /// Spawns `future` onto the pool.
    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Dropping a runtime blocks, which panics inside async contexts.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
