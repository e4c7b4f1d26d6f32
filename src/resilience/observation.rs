//! Non-blocking handle to a running command.

use std::sync::Arc;

use tokio::sync::watch;

use crate::executor::WorkerPool;
use crate::resilience::error::{ExecutionError, FailureKind, RejectedError};
use crate::resilience::key::CommandKey;

type Settled<R> = Option<Result<R, ExecutionError>>;

/// Handle returned by [`Command::observe`](crate::resilience::Command::observe).
///
/// The run is already in flight when the handle is returned. It settles
/// exactly once, and every clone and every subscription sees that same
/// outcome. Subscribing never starts another run.
#[derive(Debug, Clone)]
pub struct Observation<R> {
    command: CommandKey,
    settled: watch::Receiver<Settled<R>>,
    pool: Option<WorkerPool>,
}

impl<R> Observation<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub(crate) fn channel(
        command: CommandKey,
        pool: Option<WorkerPool>,
    ) -> (watch::Sender<Settled<R>>, Self) {
        let (tx, rx) = watch::channel(None);
        let observation = Self {
            command,
            settled: rx,
            pool,
        };
        (tx, observation)
    }

    pub fn command(&self) -> &CommandKey {
        &self.command
    }

    /// The outcome if the run has already settled.
    pub fn try_first(&self) -> Option<Result<R, ExecutionError>> {
        self.settled.borrow().clone()
    }

    /// Wait for the outcome.
    pub async fn first(&self) -> Result<R, ExecutionError> {
        let mut settled = self.settled.clone();
        let outcome = match settled.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| Err(self.abandoned()))
    }

    /// Wait for the outcome from synchronous code.
    ///
    /// # Panics
    /// Panics when called from within an async context.
    pub fn blocking_first(&self) -> Result<R, ExecutionError> {
        if let Some(outcome) = self.try_first() {
            return outcome;
        }
        match &self.pool {
            Some(pool) => pool.handle().block_on(self.first()),
            None => Err(self.abandoned()),
        }
    }

    fn abandoned(&self) -> ExecutionError {
        ExecutionError::new(
            self.command.clone(),
            FailureKind::Rejected,
            Arc::new(RejectedError::new("command run ended without an outcome")),
        )
    }
}
