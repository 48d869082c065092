//! Lifecycle-scoped background writes.
//!
//! A [`TaskScope`] runs submitted futures one at a time, in submission order,
//! on a single worker task. Callers do not wait for the result; failures are
//! logged. Dropping the scope cancels whatever has not run yet.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// An ordered, cancellable queue of background writes.
#[derive(Debug)]
pub struct TaskScope {
    name: &'static str,
    tx: mpsc::UnboundedSender<Job>,
    worker: JoinHandle<()>,
    cancelled: AtomicBool,
}

impl TaskScope {
    /// Start a scope. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job.await;
            }
            debug!(scope = name, "task scope drained");
        });
        Self {
            name,
            tx,
            worker,
            cancelled: AtomicBool::new(false),
        }
    }

    /// The scope's name, used in log output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Submit a future to run after everything submitted before it.
    ///
    /// Returns `true` if the scope accepted the work, `false` once it has been
    /// cancelled. An error from the future is logged and otherwise dropped.
    pub fn launch<F, T>(&self, future: F) -> bool
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let name = self.name;
        if self.is_cancelled() {
            warn!(scope = name, "task scope cancelled; dropping write");
            return false;
        }
        let job: Job = Box::pin(async move {
            if let Err(e) = future.await {
                warn!(scope = name, error = %e, "background write failed");
            }
        });
        self.tx.send(job).is_ok()
    }

    /// Wait until everything submitted so far has run.
    pub async fn settle(&self) {
        if self.is_cancelled() {
            return;
        }
        let (done, wait) = oneshot::channel();
        let marker: Job = Box::pin(async move {
            let _ = done.send(());
        });
        if self.tx.send(marker).is_ok() {
            let _ = wait.await;
        }
    }

    /// Stop accepting work and cancel anything not yet run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.worker.abort();
    }

    /// Whether the scope was cancelled or its worker has stopped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire) || self.worker.is_finished()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_runs_in_submission_order() {
        let scope = TaskScope::new("test");
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5u64 {
            let seen = Arc::clone(&seen);
            assert!(scope.launch(async move {
                // Later jobs finish faster, so only ordering keeps them in line.
                tokio::time::sleep(Duration::from_millis(10 * (5 - i))).await;
                seen.lock().unwrap().push(i);
                Ok::<_, Error>(())
            }));
        }
        scope.settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_scope() {
        crate::logging::init_test_logging();
        let scope = TaskScope::new("test");
        let ran = Arc::new(Mutex::new(false));

        assert!(scope.launch(async { Err::<(), _>(Error::internal("boom")) }));
        let flag = Arc::clone(&ran);
        assert!(scope.launch(async move {
            *flag.lock().unwrap() = true;
            Ok::<_, Error>(())
        }));
        scope.settle().await;

        assert!(*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_cancelled_scope_rejects_work() {
        let scope = TaskScope::new("test");
        scope.cancel();

        // Rejected straight away, before the aborted worker has wound down.
        assert!(scope.is_cancelled());
        assert!(!scope.launch(async { Ok::<_, Error>(()) }));
        // Settling a cancelled scope returns immediately.
        scope.settle().await;
    }

    #[tokio::test]
    async fn test_cancel_drops_queued_work() {
        let scope = TaskScope::new("test");
        let ran = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&ran);
        assert!(scope.launch(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            *flag.lock().unwrap() = true;
            Ok::<_, Error>(())
        }));
        scope.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!*ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_name() {
        assert_eq!(TaskScope::new("vehicles").name(), "vehicles");
    }
}
