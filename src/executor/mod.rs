//! Worker execution subsystem.
//!
//! # Data Flow
//! ```text
//! Command run:
//!     → pool.rs (WorkerPool: runtime handle + scheduler)
//!     → Scheduler::schedule(job)
//!         → blocking.rs (tokio blocking thread pool)
//!         → thread.rs (dedicated OS thread per job)
//!     → job reports start and completion over its own channels
//! ```
//!
//! # Design Decisions
//! - Operations may block on I/O, so they never run on the async workers
//! - Timers and the execution race live on the tokio runtime, not on the worker
//! - The scheduler is a trait object so tests can hold jobs and release them by hand

pub mod blocking;
pub mod pool;
pub mod thread;

pub use blocking::BlockingScheduler;
pub use pool::WorkerPool;
pub use thread::ThreadScheduler;

/// A unit of work handed to a scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs on a worker separate from the caller.
///
/// Implementations must accept concurrent calls from many commands at once.
/// Dropping a job without running it is how a scheduler rejects work; the
/// waiting command observes this as [`FailureKind::Rejected`].
///
/// [`FailureKind::Rejected`]: crate::resilience::FailureKind::Rejected
pub trait Scheduler: Send + Sync + 'static {
    fn schedule(&self, job: Job);
}
