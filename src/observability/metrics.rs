//! Metrics emission.
//!
//! # Responsibilities
//! - Count command runs by outcome
//! - Record run latency
//!
//! # Metrics
//! - `command_executions_total` (counter): runs by command, outcome and failure kind
//! - `command_execution_duration_seconds` (histogram): time from dispatch to verdict
//!
//! # Design Decisions
//! - Emission only, through the `metrics` facade; with no recorder installed
//!   these calls are no-ops
//! - Labels for command key, outcome (success, fallback, failure) and kind

use std::time::Duration;

use crate::resilience::FailureKind;

/// Record one finished command run.
pub fn record_execution(
    command: &str,
    outcome: &'static str,
    kind: Option<FailureKind>,
    elapsed: Duration,
) {
    let kind = kind.map(|k| k.as_str()).unwrap_or("none");

    ::metrics::counter!(
        "command_executions_total",
        "command" => command.to_string(),
        "outcome" => outcome,
        "kind" => kind
    )
    .increment(1);

    ::metrics::histogram!(
        "command_execution_duration_seconds",
        "command" => command.to_string()
    )
    .record(elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder() {
        record_execution("CreateOrderCommand", "success", None, Duration::from_millis(3));
        record_execution(
            "CreateOrderCommand",
            "failure",
            Some(FailureKind::Timeout),
            Duration::from_millis(2000),
        );
    }
}
