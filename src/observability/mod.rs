//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every command run produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log output (stdout)
//!     → Whatever metrics recorder the embedding application installs
//! ```

pub mod logging;
pub mod metrics;
