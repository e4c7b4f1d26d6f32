//! Worker pool shared by commands.
//!
//! # Responsibilities
//! - Own (or borrow) the tokio runtime that drives timers and observed runs
//! - Hand operations to a [`Scheduler`]
//! - Provide a process-wide pool for commands built without one
//!
//! # Design Decisions
//! - Cloning is cheap; every clone shares the runtime and scheduler
//! - An owned runtime shuts down in the background when the last clone drops,
//!   so dropping a pool inside async code never panics

use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock};

use tokio::runtime::{Builder, Handle, Runtime};

use crate::config::PoolConfig;
use crate::executor::{BlockingScheduler, Scheduler, ThreadScheduler};

static SHARED: OnceLock<WorkerPool> = OnceLock::new();

/// Runtime handle plus the scheduler operations run on.
#[derive(Clone)]
pub struct WorkerPool {
    name: Arc<str>,
    handle: Handle,
    scheduler: Arc<dyn Scheduler>,
    _runtime: Option<Arc<OwnedRuntime>>,
}

impl WorkerPool {
    /// Build a pool with its own multi-threaded runtime.
    pub fn new(config: &PoolConfig) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .max_blocking_threads(config.max_blocking_threads)
            .thread_name(config.thread_name.clone())
            .enable_time()
            .build()?;
        let handle = runtime.handle().clone();

        let scheduler: Arc<dyn Scheduler> = if config.thread_per_call {
            Arc::new(ThreadScheduler::new(format!("{}-op", config.thread_name)))
        } else {
            Arc::new(BlockingScheduler::new(handle.clone()))
        };

        tracing::debug!(
            pool = %config.thread_name,
            worker_threads = config.worker_threads,
            max_blocking_threads = config.max_blocking_threads,
            thread_per_call = config.thread_per_call,
            "Worker pool started"
        );

        Ok(Self {
            name: Arc::from(config.thread_name.as_str()),
            handle,
            scheduler,
            _runtime: Some(Arc::new(OwnedRuntime(Some(runtime)))),
        })
    }

    /// Borrow an existing runtime; operations go to its blocking pool.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            name: Arc::from("borrowed"),
            scheduler: Arc::new(BlockingScheduler::new(handle.clone())),
            handle,
            _runtime: None,
        }
    }

    /// Pool on the runtime the caller is running in.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::from_handle(Handle::current())
    }

    /// Process-wide pool built from [`PoolConfig::default`] on first use.
    pub fn shared() -> io::Result<Self> {
        if let Some(pool) = SHARED.get() {
            return Ok(pool.clone());
        }
        let pool = Self::new(&PoolConfig::default())?;
        // A concurrent initializer may win; the losing pool shuts down on drop.
        Ok(SHARED.get_or_init(|| pool).clone())
    }

    /// Pool for a command that was built without one: the caller's runtime
    /// when there is one, the shared pool otherwise.
    pub(crate) fn ambient() -> io::Result<Self> {
        match Handle::try_current() {
            Ok(handle) => Ok(Self::from_handle(handle)),
            Err(_) => Self::shared(),
        }
    }

    /// Replace the scheduler, keeping the runtime.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("owns_runtime", &self._runtime.is_some())
            .finish()
    }
}

struct OwnedRuntime(Option<Runtime>);

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}
