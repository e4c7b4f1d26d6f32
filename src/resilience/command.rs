//! Protected command.
//!
//! # Responsibilities
//! - Compose an operation, an optional fallback and execution settings
//! - Run the operation through the timeout race on a worker pool
//! - Apply the fallback policy to the race outcome
//!
//! # Entry Points
//! ```text
//! execute()  blocks the calling thread until the run settles
//! call()     same contract, awaited from async code
//! observe()  returns immediately; the run is already in flight
//! ```
//!
//! # Design Decisions
//! - Entry points consume the command, so one command is one run
//! - The fallback cannot fail; its signature returns `R`, not a `Result`
//! - The fallback runs after the race settles and is not bounded by the budget
//! - `execute` runs the fallback on the calling thread; `call` and `observe`
//!   run it on the blocking pool

use std::panic;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::config::ExecutionConfig;
use crate::executor::{Scheduler, WorkerPool};
use crate::observability::metrics;
use crate::resilience::error::{BoxError, ExecutionError, FailureKind, RejectedError};
use crate::resilience::key::{CommandKey, GroupKey};
use crate::resilience::observation::Observation;
use crate::resilience::outcome::ExecutionOutcome;
use crate::resilience::timeouts::{self, Operation};

/// Substitute result producer.
pub type Fallback<R> = Box<dyn FnOnce() -> R + Send + 'static>;

/// One protected call.
pub struct Command<R> {
    run: Run<R>,
    operation: Operation<R>,
    pool: Option<WorkerPool>,
}

/// Builder for [`Command`].
pub struct CommandBuilder<R> {
    key: CommandKey,
    group: GroupKey,
    operation: Operation<R>,
    fallback: Option<Fallback<R>>,
    config: ExecutionConfig,
    pool: Option<WorkerPool>,
}

impl<R: Send + 'static> CommandBuilder<R> {
    pub fn key(mut self, key: impl Into<CommandKey>) -> Self {
        self.key = key.into();
        self
    }

    pub fn group(mut self, group: impl Into<GroupKey>) -> Self {
        self.group = group.into();
        self
    }

    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Run on this pool instead of the caller's runtime or the shared pool.
    pub fn pool(mut self, pool: WorkerPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn build(self) -> Command<R> {
        Command {
            run: Run {
                key: self.key,
                group: self.group,
                fallback: self.fallback,
                config: self.config,
            },
            operation: self.operation,
            pool: self.pool,
        }
    }
}

impl<R: Send + 'static> Command<R> {
    pub fn builder<F>(operation: F) -> CommandBuilder<R>
    where
        F: FnOnce() -> Result<R, BoxError> + Send + 'static,
    {
        CommandBuilder {
            key: CommandKey::default(),
            group: GroupKey::default(),
            operation: Box::new(operation),
            fallback: None,
            config: ExecutionConfig::default(),
            pool: None,
        }
    }

    /// Command with default settings and no fallback.
    pub fn new<F>(operation: F) -> Self
    where
        F: FnOnce() -> Result<R, BoxError> + Send + 'static,
    {
        Self::builder(operation).build()
    }

    pub fn key(&self) -> &CommandKey {
        &self.run.key
    }

    pub fn group(&self) -> &GroupKey {
        &self.run.group
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.run.config
    }

    pub fn has_fallback(&self) -> bool {
        self.run.fallback.is_some()
    }

    /// Run and block the calling thread until the outcome is known.
    ///
    /// The fallback, when it runs, runs on the calling thread.
    ///
    /// # Panics
    /// Panics when called from within an async context; use [`Command::call`]
    /// there.
    pub fn execute(self) -> Result<R, ExecutionError> {
        let Command {
            run,
            operation,
            pool,
        } = self;

        match resolve_pool(pool) {
            Ok(pool) => pool
                .handle()
                .block_on(run.drive(operation, pool.scheduler().clone(), None)),
            Err(outcome) => run.conclude(outcome, Instant::now()),
        }
    }

    /// Run and wait for the outcome from async code.
    ///
    /// The fallback, when it runs, runs on the pool's blocking threads.
    pub async fn call(self) -> Result<R, ExecutionError> {
        let Command {
            run,
            operation,
            pool,
        } = self;

        match resolve_pool(pool) {
            Ok(pool) => {
                let handle = pool.handle().clone();
                run.drive(operation, pool.scheduler().clone(), Some(handle))
                    .await
            }
            Err(outcome) => run.conclude(outcome, Instant::now()),
        }
    }
}

impl<R> Command<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Start the run in the background and return a handle to its outcome.
    ///
    /// Never blocks. The operation runs once whether the handle is awaited
    /// once, many times or not at all. The fallback runs on the pool's
    /// blocking threads, never on an async worker.
    pub fn observe(self) -> Observation<R> {
        let Command {
            run,
            operation,
            pool,
        } = self;

        match resolve_pool(pool) {
            Ok(pool) => {
                let scheduler = pool.scheduler().clone();
                let handle = pool.handle().clone();
                // The observation keeps the pool, and with it the runtime, alive.
                let (tx, observation) = Observation::channel(run.key.clone(), Some(pool));
                let offload = handle.clone();
                handle.spawn(async move {
                    let settled = run.drive(operation, scheduler, Some(offload)).await;
                    // Nobody left to tell is fine; the run still happened once.
                    let _ = tx.send(Some(settled));
                });
                observation
            }
            Err(outcome) => {
                let (tx, observation) = Observation::channel(run.key.clone(), None);
                let _ = tx.send(Some(run.conclude(outcome, Instant::now())));
                observation
            }
        }
    }
}

/// Everything about a run except the operation itself.
struct Run<R> {
    key: CommandKey,
    group: GroupKey,
    fallback: Option<Fallback<R>>,
    config: ExecutionConfig,
}

impl<R: Send + 'static> Run<R> {
    /// Dispatch, race and conclude. With `offload` set the fallback runs on
    /// that runtime's blocking pool, otherwise on the current thread.
    async fn drive(
        self,
        operation: Operation<R>,
        scheduler: Arc<dyn Scheduler>,
        offload: Option<Handle>,
    ) -> Result<R, ExecutionError> {
        let started = Instant::now();
        let dispatched = timeouts::dispatch(scheduler.as_ref(), operation);
        let outcome = timeouts::race(dispatched, self.config.budget()).await;

        let Some(handle) = offload else {
            return self.conclude(outcome, started);
        };

        let key = self.key.clone();
        match self.settle(outcome, started) {
            Settled::Done(result) => result,
            Settled::Fallback(fallback) => match handle.spawn_blocking(fallback).await {
                Ok(value) => Ok(value),
                Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
                Err(e) => Err(ExecutionError::new(
                    key,
                    FailureKind::Rejected,
                    Arc::new(RejectedError::new(format!("fallback did not run: {}", e))),
                )),
            },
        }
    }

    fn conclude(self, outcome: ExecutionOutcome<R>, started: Instant) -> Result<R, ExecutionError> {
        match self.settle(outcome, started) {
            Settled::Done(result) => result,
            Settled::Fallback(fallback) => Ok(fallback()),
        }
    }

    /// Log and count the outcome, and pick the fallback when one applies.
    fn settle(self, outcome: ExecutionOutcome<R>, started: Instant) -> Settled<R> {
        let elapsed = started.elapsed();

        let (kind, cause) = match outcome {
            ExecutionOutcome::Success(value) => {
                tracing::debug!(
                    command = %self.key,
                    group = %self.group,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Command succeeded"
                );
                metrics::record_execution(self.key.as_str(), "success", None, elapsed);
                return Settled::Done(Ok(value));
            }
            ExecutionOutcome::Failure { kind, cause } => (kind, cause),
        };

        let fallback = if self.config.fallback_enabled {
            self.fallback
        } else {
            None
        };

        match fallback {
            Some(fallback) => {
                tracing::warn!(
                    command = %self.key,
                    group = %self.group,
                    kind = %kind,
                    error = %cause,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Command failed, serving fallback"
                );
                metrics::record_execution(self.key.as_str(), "fallback", Some(kind), elapsed);
                Settled::Fallback(fallback)
            }
            None => {
                tracing::warn!(
                    command = %self.key,
                    group = %self.group,
                    kind = %kind,
                    error = %cause,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Command failed and no fallback available"
                );
                metrics::record_execution(self.key.as_str(), "failure", Some(kind), elapsed);
                Settled::Done(Err(ExecutionError::new(self.key, kind, cause)))
            }
        }
    }
}

enum Settled<R> {
    Done(Result<R, ExecutionError>),
    Fallback(Fallback<R>),
}

/// Explicit pool, else the ambient one. Failing to get a pool at all is a
/// rejection of the run.
fn resolve_pool<R>(pool: Option<WorkerPool>) -> Result<WorkerPool, ExecutionOutcome<R>> {
    match pool {
        Some(pool) => Ok(pool),
        None => WorkerPool::ambient().map_err(|e| {
            ExecutionOutcome::failure(
                FailureKind::Rejected,
                RejectedError::new(format!("no worker pool available: {}", e)),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_call_success() {
        let value = Command::builder(|| Ok(42u32))
            .key("Answer")
            .build()
            .call()
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_call_error_keeps_message() {
        let err = Command::<u32>::new(|| Err("inventory offline".into()))
            .call()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::UpstreamError);
        assert_eq!(err.root_cause().to_string(), "inventory offline");
        assert_eq!(err.to_string(), "Command failed and no fallback available.");
    }

    #[tokio::test]
    async fn test_disabled_fallback_is_skipped() {
        let config = ExecutionConfig {
            fallback_enabled: false,
            ..ExecutionConfig::default()
        };
        let command = Command::builder(|| Err("down".into()))
            .fallback(|| 1u32)
            .config(config)
            .build();
        assert!(command.has_fallback());

        let err = command.call().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UpstreamError);
    }

    #[tokio::test]
    async fn test_disabled_timeout_waits_for_operation() {
        let config = ExecutionConfig {
            timeout: Duration::from_millis(10),
            timeout_enabled: false,
            ..ExecutionConfig::default()
        };
        let value = Command::builder(|| {
            std::thread::sleep(Duration::from_millis(100));
            Ok("slow but fine")
        })
        .config(config)
        .build()
        .call()
        .await
        .unwrap();
        assert_eq!(value, "slow but fine");
    }

    #[test]
    fn test_sub_millisecond_budget_allows_fast_operation() {
        let pool = WorkerPool::new(&crate::config::PoolConfig::default()).unwrap();
        let value = Command::builder(|| Ok(1u32))
            .config(ExecutionConfig::with_timeout(Duration::from_micros(900)))
            .pool(pool)
            .build()
            .execute();
        assert_eq!(value.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_async_fallback_leaves_runtime_thread() {
        let runtime_thread = std::thread::current().id();

        let called = Command::builder(|| Err("down".into()))
            .fallback(|| std::thread::current().id())
            .build()
            .call()
            .await
            .unwrap();
        assert_ne!(called, runtime_thread);

        let observed = Command::builder(|| Err("down".into()))
            .fallback(|| std::thread::current().id())
            .build()
            .observe()
            .first()
            .await
            .unwrap();
        assert_ne!(observed, runtime_thread);
    }

    #[tokio::test]
    async fn test_blocking_fallback_does_not_stall_current_thread_runtime() {
        let observation = Command::builder(|| Err("down".into()))
            .fallback(|| {
                std::thread::sleep(Duration::from_millis(300));
                "late"
            })
            .build()
            .observe();

        // The single runtime thread stays free to drive other tasks.
        let ticking = std::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(ticking.elapsed() < Duration::from_millis(200));
        assert_eq!(observation.first().await.unwrap(), "late");
    }

    #[tokio::test]
    async fn test_fallback_runs_once_after_timeout() {
        let fallbacks = Arc::new(AtomicUsize::new(0));
        let counted = fallbacks.clone();
        let started = Instant::now();

        let value = Command::builder(|| {
            std::thread::sleep(Duration::from_millis(500));
            Ok("primary")
        })
        .fallback(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            "fallback"
        })
        .config(ExecutionConfig::with_timeout(Duration::from_millis(50)))
        .build()
        .call()
        .await
        .unwrap();

        assert_eq!(value, "fallback");
        assert_eq!(fallbacks.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_execute_on_owned_pool() {
        let pool = WorkerPool::new(&crate::config::PoolConfig::default()).unwrap();
        let command = Command::builder(|| Ok(vec!["a".to_string()]))
            .key("Listing")
            .group("catalog")
            .pool(pool)
            .build();

        assert_eq!(command.key().as_str(), "Listing");
        assert_eq!(command.group().as_str(), "catalog");
        assert_eq!(command.config().timeout, Duration::from_secs(1));
        assert_eq!(command.execute().unwrap(), vec!["a".to_string()]);
    }
}
