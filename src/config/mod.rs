//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → ExecutionConfig handed to each Command at construction
//!     → PoolConfig handed to WorkerPool::new
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a command keeps the settings it was built with
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ExecutionConfig;
pub use schema::GuardConfig;
pub use schema::ObservabilityConfig;
pub use schema::PoolConfig;
