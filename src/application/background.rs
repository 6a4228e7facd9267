// src/application/background.rs
use crate::application::context::CallContext;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;

const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_millis(500);

/// Best-effort work detached from the request that triggered it.
///
/// Each task runs under its own deadline rather than the caller's, so it can
/// outlive the request. Failures are only visible in logs; the tasks report
/// them themselves and this type only logs timeouts and panics.
#[derive(Clone)]
pub struct BackgroundTasks {
    tasks: Arc<Mutex<JoinSet<()>>>,
    timeout: Duration,
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new(DEFAULT_TASK_TIMEOUT)
    }
}

impl BackgroundTasks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(JoinSet::new())),
            timeout,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&self, label: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ctx = CallContext::with_timeout(self.timeout);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        // reap finished tasks so the set does not grow without bound
        while let Some(done) = tasks.try_join_next() {
            log_join_failure(done);
        }
        tasks.spawn(async move {
            if ctx.bound(task).await.is_err() {
                tracing::warn!(task = label, "background cache task timed out");
            }
        });
    }

    pub fn pending(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Waits for every task spawned so far, including tasks spawned while
    /// draining. Dropping the returned future early leaves the remaining
    /// tasks running to their own deadline; they are just no longer tracked.
    pub async fn drain(&self) {
        loop {
            let mut batch = Draining({
                let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *tasks)
            });
            if batch.0.is_empty() {
                return;
            }
            while let Some(done) = batch.0.join_next().await {
                log_join_failure(done);
            }
        }
    }
}

/// A batch taken out of the shared set. Dropping a `JoinSet` aborts its
/// tasks, so an abandoned batch detaches them instead.
struct Draining(JoinSet<()>);

impl Drop for Draining {
    fn drop(&mut self) {
        self.0.detach_all();
    }
}

fn log_join_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        if err.is_panic() {
            tracing::error!(error = %err, "background cache task panicked");
        }
    }
}
