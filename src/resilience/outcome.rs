//! Terminal state of one run, before the fallback policy applies.

use std::error::Error as StdError;
use std::sync::Arc;

use crate::resilience::error::{Cause, FailureKind};

/// What the execution race produced.
#[derive(Debug)]
pub enum ExecutionOutcome<R> {
    Success(R),
    Failure { kind: FailureKind, cause: Cause },
}

impl<R> ExecutionOutcome<R> {
    pub fn failure<E>(kind: FailureKind, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ExecutionOutcome::Failure {
            kind,
            cause: Arc::new(cause),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success(_))
    }

    /// Failure kind, `None` on success.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ExecutionOutcome::Success(_) => None,
            ExecutionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}
