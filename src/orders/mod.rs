//! Order creation collaborator.
//!
//! # Data Flow
//! ```text
//! caller
//!     → command.rs (CreateOrderCommand, with or without fallback)
//!     → service.rs (ExternalOrderService::create_order on a worker)
//!     → order.rs (Order value)
//! ```
//!
//! # Design Decisions
//! - The downstream service is a trait so tests and the CLI can simulate it
//! - The fallback builds the order locally for asynchronous processing

pub mod command;
pub mod order;
pub mod service;

pub use command::{create_order, create_order_with_fallback, CREATE_ORDER_COMMAND, CREATE_ORDER_GROUP};
pub use order::Order;
pub use service::{CreateOrderService, ExternalOrderService, ServiceUnavailable, SimulatedOrderService};
