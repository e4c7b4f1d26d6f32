//! Scheduler backed by the tokio blocking thread pool.

use tokio::runtime::Handle;

use crate::executor::{Job, Scheduler};

/// Runs each job with [`Handle::spawn_blocking`].
#[derive(Debug, Clone)]
pub struct BlockingScheduler {
    handle: Handle,
}

impl BlockingScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for BlockingScheduler {
    fn schedule(&self, job: Job) {
        // Detached: the job reports through its own channels. A runtime that
        // is shutting down drops the job, which the command sees as a rejection.
        drop(self.handle.spawn_blocking(job));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_runs_job_off_the_async_worker() {
        let scheduler = BlockingScheduler::new(Handle::current());
        let caller = std::thread::current().id();
        let (tx, rx) = oneshot::channel();

        scheduler.schedule(Box::new(move || {
            let _ = tx.send(std::thread::current().id());
        }));

        let worker = rx.await.unwrap();
        assert_ne!(worker, caller);
    }
}
