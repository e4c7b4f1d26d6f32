//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for protected
//! commands. All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Execution settings applied to every command without an override.
    pub command: ExecutionConfig,

    /// Per-command overrides keyed by command key. An override replaces the
    /// defaults as a whole; fields it omits take the built-in defaults.
    pub commands: HashMap<String, ExecutionConfig>,

    /// Worker pool settings.
    pub pool: PoolConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GuardConfig {
    /// Execution settings for the given command key.
    pub fn execution_for(&self, command: &str) -> ExecutionConfig {
        self.commands
            .get(command)
            .cloned()
            .unwrap_or_else(|| self.command.clone())
    }
}

/// Execution settings for one command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Time budget for the operation, measured from the moment it starts on
    /// its worker. Written as whole milliseconds (`timeout_ms`) in config files.
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Enforce the time budget. When disabled the run waits for the operation.
    pub timeout_enabled: bool,

    /// Serve the configured fallback on failure.
    pub fallback_enabled: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            timeout_enabled: true,
            fallback_enabled: true,
        }
    }
}

impl ExecutionConfig {
    /// Default settings with the given budget.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Effective budget, `None` when timeouts are disabled.
    pub fn budget(&self) -> Option<Duration> {
        self.timeout_enabled.then_some(self.timeout)
    }
}

/// `Duration` as whole milliseconds. Sub-millisecond budgets round up so a
/// serialized budget is never shorter than the one it came from.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = value.as_nanos().div_ceil(1_000_000);
        serializer.serialize_u64(millis.try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Async worker threads driving timers and observed runs.
    pub worker_threads: usize,

    /// Upper bound on threads running operations.
    pub max_blocking_threads: usize,

    /// Thread name prefix.
    pub thread_name: String,

    /// Run every operation on a freshly spawned OS thread instead of the
    /// blocking pool.
    pub thread_per_call: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            max_blocking_threads: 10,
            thread_name: "command-guard".to_string(),
            thread_per_call: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GuardConfig::default();
        assert_eq!(config.command.timeout, Duration::from_millis(1000));
        assert_eq!(config.command.budget(), Some(Duration::from_secs(1)));
        assert!(config.command.fallback_enabled);
        assert_eq!(config.pool.max_blocking_threads, 10);
    }

    #[test]
    fn test_execution_override() {
        let mut config = GuardConfig::default();
        config.commands.insert(
            "CreateOrderCommand".to_string(),
            ExecutionConfig::with_timeout(Duration::from_millis(2000)),
        );

        assert_eq!(
            config.execution_for("CreateOrderCommand").timeout,
            Duration::from_secs(2)
        );
        assert_eq!(config.execution_for("Other").timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_disabled_timeout_has_no_budget() {
        let config = ExecutionConfig {
            timeout_enabled: false,
            ..ExecutionConfig::default()
        };
        assert_eq!(config.budget(), None);
    }

    #[test]
    fn test_sub_millisecond_budget_is_kept() {
        let config = ExecutionConfig::with_timeout(Duration::from_micros(900));
        assert_eq!(config.budget(), Some(Duration::from_micros(900)));

        let config = ExecutionConfig::with_timeout(Duration::from_micros(1500));
        assert_eq!(config.budget(), Some(Duration::from_micros(1500)));
    }

    #[test]
    fn test_timeout_serializes_as_millis() {
        let config = ExecutionConfig::with_timeout(Duration::from_micros(1500));
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("timeout_ms = 2"), "{text}");

        let parsed: ExecutionConfig = toml::from_str("timeout_ms = 40").unwrap();
        assert_eq!(parsed.timeout, Duration::from_millis(40));
    }

    #[test]
    fn test_partial_toml() {
        let config: GuardConfig = toml::from_str(
            r#"
            [command]
            timeout_ms = 250

            [commands.CreateOrderCommand]
            fallback_enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.command.timeout, Duration::from_millis(250));
        assert!(config.command.timeout_enabled);
        let order = config.execution_for("CreateOrderCommand");
        assert_eq!(order.timeout, Duration::from_secs(1));
        assert!(!order.fallback_enabled);
        assert_eq!(config.observability.log_level, "info");
    }
}
