//! Scheduler that gives every job its own OS thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::executor::{Job, Scheduler};

/// Spawns one named thread per job (`<prefix>-<n>`).
#[derive(Debug)]
pub struct ThreadScheduler {
    prefix: String,
    spawned: AtomicUsize,
}

impl ThreadScheduler {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            spawned: AtomicUsize::new(0),
        }
    }

    /// Number of threads spawned so far.
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, job: Job) {
        let n = self.spawned.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}", self.prefix, n);

        if let Err(e) = thread::Builder::new().name(name.clone()).spawn(job) {
            tracing::error!(thread = %name, error = %e, "Failed to spawn worker thread");
        }
    }
}
