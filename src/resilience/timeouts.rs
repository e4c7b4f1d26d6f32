//! Timeout enforcement.
//!
//! # Responsibilities
//! - Dispatch the operation to a worker and learn when it started and finished
//! - Race the worker against a budget timer started at the worker's start instant
//! - Discard the outcome of a worker that lost the race
//!
//! # Design Decisions
//! - Uses Tokio's timer facilities
//! - The worker stamps its start and finish instants; the verdict compares the
//!   finish instant with the deadline instead of trusting poll order
//! - Finishing exactly on the deadline counts as a timeout
//! - Every run owns fresh one-shot channels, so an abandoned worker can only
//!   send into a closed channel

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{self, Instant};

use crate::executor::Scheduler;
use crate::resilience::error::{BoxError, FailureKind, OperationPanicked, RejectedError, TimeoutError};
use crate::resilience::outcome::ExecutionOutcome;

/// The caller-supplied unit of work.
pub type Operation<R> = Box<dyn FnOnce() -> Result<R, BoxError> + Send + 'static>;

/// What the worker reports when the operation returns.
pub(crate) struct Completion<R> {
    finished_at: Instant,
    result: Result<R, BoxError>,
}

/// Receiving side of a dispatched operation.
pub(crate) struct Dispatch<R> {
    started: oneshot::Receiver<Instant>,
    completed: oneshot::Receiver<Completion<R>>,
}

/// Hand `operation` to the scheduler.
pub(crate) fn dispatch<R>(scheduler: &dyn Scheduler, operation: Operation<R>) -> Dispatch<R>
where
    R: Send + 'static,
{
    let (started_tx, started_rx) = oneshot::channel();
    let (completed_tx, completed_rx) = oneshot::channel();

    scheduler.schedule(Box::new(move || {
        // The run is gone before the worker picked the job up.
        if started_tx.send(Instant::now()).is_err() {
            return;
        }

        let result = match panic::catch_unwind(AssertUnwindSafe(operation)) {
            Ok(result) => result,
            Err(payload) => Err(Box::new(OperationPanicked::from_payload(payload)) as BoxError),
        };

        let _ = completed_tx.send(Completion {
            finished_at: Instant::now(),
            result,
        });
    }));

    Dispatch {
        started: started_rx,
        completed: completed_rx,
    }
}

/// Wait for the dispatched operation, bounded by `budget` when one is set.
pub(crate) async fn race<R>(dispatch: Dispatch<R>, budget: Option<Duration>) -> ExecutionOutcome<R> {
    let started_at = match dispatch.started.await {
        Ok(instant) => instant,
        Err(_) => {
            return ExecutionOutcome::failure(
                FailureKind::Rejected,
                RejectedError::new("worker pool dropped the operation before it started"),
            );
        }
    };

    match budget {
        Some(budget) => resolve_before(started_at + budget, budget, dispatch.completed).await,
        None => match dispatch.completed.await {
            Ok(done) => settle(done.result),
            Err(_) => worker_lost(),
        },
    }
}

async fn resolve_before<R>(
    deadline: Instant,
    budget: Duration,
    mut completed: oneshot::Receiver<Completion<R>>,
) -> ExecutionOutcome<R> {
    tokio::select! {
        biased;
        _ = time::sleep_until(deadline) => {
            // The worker may have reported just before the timer was polled.
            match completed.try_recv() {
                Ok(done) => judge(done, deadline, budget),
                Err(_) => timed_out(budget),
            }
        }
        done = &mut completed => match done {
            Ok(done) => judge(done, deadline, budget),
            Err(_) => worker_lost(),
        },
    }
}

fn judge<R>(done: Completion<R>, deadline: Instant, budget: Duration) -> ExecutionOutcome<R> {
    if done.finished_at >= deadline {
        return timed_out(budget);
    }
    settle(done.result)
}

fn settle<R>(result: Result<R, BoxError>) -> ExecutionOutcome<R> {
    match result {
        Ok(value) => ExecutionOutcome::Success(value),
        Err(e) => ExecutionOutcome::Failure {
            kind: FailureKind::UpstreamError,
            cause: Arc::from(e),
        },
    }
}

fn timed_out<R>(budget: Duration) -> ExecutionOutcome<R> {
    ExecutionOutcome::failure(FailureKind::Timeout, TimeoutError { budget })
}

fn worker_lost<R>() -> ExecutionOutcome<R> {
    ExecutionOutcome::failure(
        FailureKind::Rejected,
        RejectedError::new("worker exited without reporting a result"),
    )
}
