//! Failure taxonomy and the uniform execution error.
//!
//! # Responsibilities
//! - Classify why a run failed (upstream error, timeout, rejection)
//! - Carry the original cause unchanged through the outer wrapper
//! - Give callers one error type to branch on
//!
//! # Design Decisions
//! - The cause is shared (`Arc`) so an outcome can be replayed to many observers
//! - An `ExecutionError` only exists when no fallback ran; a served fallback
//!   never surfaces an error

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::resilience::key::CommandKey;

/// Error type produced by operations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Shared handle to the original failure.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Why a command run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The operation returned an error (or panicked).
    UpstreamError,
    /// The operation did not finish within its budget.
    Timeout,
    /// The worker pool dropped the operation before it started.
    Rejected,
}

impl FailureKind {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UpstreamError => "upstream_error",
            FailureKind::Timeout => "timeout",
            FailureKind::Rejected => "rejected",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            FailureKind::UpstreamError => "failed",
            FailureKind::Timeout => "timed-out",
            FailureKind::Rejected => "could not be scheduled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cause attached to [`FailureKind::Timeout`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("execution exceeded its budget of {}ms", .budget.as_millis())]
pub struct TimeoutError {
    pub budget: Duration,
}

/// Cause attached to [`FailureKind::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation rejected: {reason}")]
pub struct RejectedError {
    pub reason: String,
}

impl RejectedError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Cause reported when the operation panicked on its worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation panicked: {message}")]
pub struct OperationPanicked {
    pub message: String,
}

impl OperationPanicked {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

/// The single error a caller sees when a command fails and no fallback ran.
#[derive(Debug, Clone, Error)]
#[error("{} {} and no fallback available.", .command, .kind.verb())]
pub struct ExecutionError {
    command: CommandKey,
    kind: FailureKind,
    #[source]
    cause: Cause,
}

impl ExecutionError {
    pub fn new(command: CommandKey, kind: FailureKind, cause: Cause) -> Self {
        Self {
            command,
            kind,
            cause,
        }
    }

    pub fn command(&self) -> &CommandKey {
        &self.command
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }

    /// The error that caused this failure, unwrapped once.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }

    /// Downcast the direct cause to a concrete error type.
    pub fn cause_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }

    /// Innermost error of the cause chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = &*self.cause;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}
