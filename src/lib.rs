//! Protected command execution.
//!
//! Runs an operation on a worker under a time budget and substitutes a
//! fallback result when the operation fails or runs out of time.
//!
//! ```no_run
//! use std::time::Duration;
//! use command_guard::{Command, ExecutionConfig};
//!
//! let greeting = Command::builder(|| Ok("hello from downstream".to_string()))
//!     .key("Greeting")
//!     .fallback(|| "hello from fallback".to_string())
//!     .config(ExecutionConfig::with_timeout(Duration::from_millis(500)))
//!     .build()
//!     .execute()
//!     .unwrap();
//! ```

pub mod config;
pub mod executor;
pub mod observability;
pub mod orders;
pub mod resilience;

pub use config::{ExecutionConfig, GuardConfig};
pub use executor::{Scheduler, WorkerPool};
pub use resilience::{BoxError, Command, CommandBuilder, ExecutionError, FailureKind, Observation};
