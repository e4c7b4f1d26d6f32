//! Protected order creation.

use std::sync::Arc;

use crate::orders::order::Order;
use crate::orders::service::ExternalOrderService;
use crate::resilience::{Command, CommandBuilder};

pub const CREATE_ORDER_COMMAND: &str = "CreateOrderCommand";
pub const CREATE_ORDER_GROUP: &str = "createOrderCommand";

/// Order creation through `service`, without a fallback.
pub fn create_order(
    service: Arc<dyn ExternalOrderService>,
    products: Vec<String>,
) -> CommandBuilder<Order> {
    Command::builder(move || service.create_order(&products))
        .key(CREATE_ORDER_COMMAND)
        .group(CREATE_ORDER_GROUP)
}

/// Order creation that falls back to a locally built order.
pub fn create_order_with_fallback(
    service: Arc<dyn ExternalOrderService>,
    products: Vec<String>,
) -> CommandBuilder<Order> {
    let queued = products.clone();
    create_order(service, products).fallback(move || {
        let order = Order::new(queued);
        tracing::info!(
            order_id = %order.id,
            products = order.products.len(),
            "Created static order to be processed asynchronously"
        );
        order
    })
}
