//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (budgets > 0, thread counts > 0)
//! - Reject unknown log levels
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{ExecutionConfig, GuardConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("command '{0}' has a zero timeout_ms with timeouts enabled")]
    ZeroTimeout(String),

    #[error("pool.worker_threads must be greater than zero")]
    ZeroWorkerThreads,

    #[error("pool.max_blocking_threads must be greater than zero")]
    ZeroBlockingThreads,

    #[error("pool.thread_name must not be empty")]
    EmptyThreadName,

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_execution("default", &config.command, &mut errors);
    let mut overrides: Vec<_> = config.commands.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));
    for (name, execution) in overrides {
        check_execution(name, execution, &mut errors);
    }

    if config.pool.worker_threads == 0 {
        errors.push(ValidationError::ZeroWorkerThreads);
    }
    if config.pool.max_blocking_threads == 0 {
        errors.push(ValidationError::ZeroBlockingThreads);
    }
    if config.pool.thread_name.trim().is_empty() {
        errors.push(ValidationError::EmptyThreadName);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_execution(name: &str, execution: &ExecutionConfig, errors: &mut Vec<ValidationError>) {
    if execution.timeout_enabled && execution.timeout.is_zero() {
        errors.push(ValidationError::ZeroTimeout(name.to_string()));
    }
}
