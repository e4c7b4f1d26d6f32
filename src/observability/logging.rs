//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem
//! - Take the level from configuration, overridable through `RUST_LOG`
//!
//! # Design Decisions
//! - Uses the tracing crate; commands log with `command`, `group`, `kind` fields
//! - Initialization is fallible so embedding applications keep their own subscriber

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive derived from configuration.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("command_guard={}", config.log_level)
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
