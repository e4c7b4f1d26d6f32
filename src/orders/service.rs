//! Downstream order service.

use std::time::Duration;

use thiserror::Error;

use crate::orders::order::Order;
use crate::resilience::BoxError;

/// The remote dependency that creates orders.
pub trait ExternalOrderService: Send + Sync {
    fn create_order(&self, products: &[String]) -> Result<Order, BoxError>;
}

/// Error returned by a service that is down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceUnavailable(pub String);

/// Unprotected direct call to the order service.
pub struct CreateOrderService<S> {
    order_service: S,
}

impl<S: ExternalOrderService> CreateOrderService<S> {
    pub fn new(order_service: S) -> Self {
        Self { order_service }
    }

    pub fn create(&self, products: &[String]) -> Result<Order, BoxError> {
        self.order_service.create_order(products)
    }
}

/// Order service with configurable latency and failure.
#[derive(Debug, Clone, Default)]
pub struct SimulatedOrderService {
    delay: Duration,
    failure: Option<String>,
}

impl SimulatedOrderService {
    pub fn new(delay: Duration, failure: Option<String>) -> Self {
        Self { delay, failure }
    }

    /// Service that answers after `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self::new(delay, None)
    }

    /// Service that fails immediately with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Duration::ZERO, Some(message.into()))
    }
}

impl ExternalOrderService for SimulatedOrderService {
    fn create_order(&self, products: &[String]) -> Result<Order, BoxError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if let Some(message) = &self.failure {
            return Err(Box::new(ServiceUnavailable(message.clone())));
        }
        Ok(Order::new(products.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_call() {
        let service = CreateOrderService::new(SimulatedOrderService::default());
        let products = vec!["Teclado Microsoft".to_string()];

        let order = service.create(&products).unwrap();
        assert_eq!(order.products, products);
    }

    #[test]
    fn test_failing_service_message() {
        let service = SimulatedOrderService::failing("The externalOrderService is not working");
        let err = service.create_order(&[]).unwrap_err();
        assert_eq!(err.to_string(), "The externalOrderService is not working");
    }
}
