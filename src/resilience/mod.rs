//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Command::execute / call / observe
//!     → command.rs (resolve worker pool, own the run)
//!     → timeouts.rs (dispatch operation, race it against the budget timer)
//!     → outcome.rs (Success | Failure { kind, cause })
//!     → command.rs (serve fallback, or wrap the failure)
//!     → error.rs (ExecutionError carrying kind + original cause)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every run has a deadline unless explicitly disabled
//! - Timeout errors are distinct from upstream errors
//! - Abandoned workers keep running but their outcome is discarded

pub mod command;
pub mod error;
pub mod key;
pub mod observation;
pub mod outcome;
pub mod timeouts;

pub use command::{Command, CommandBuilder, Fallback};
pub use error::{
    BoxError, Cause, ExecutionError, FailureKind, OperationPanicked, RejectedError, TimeoutError,
};
pub use key::{CommandKey, GroupKey};
pub use observation::Observation;
pub use outcome::ExecutionOutcome;
pub use timeouts::Operation;
