//! Order value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An order for a list of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub products: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// New order with a fresh id, created now.
    pub fn new(products: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            products,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order() {
        let before = Utc::now();
        let order = Order::new(vec!["Playstation 4".to_string()]);

        assert!(!order.id.is_nil());
        assert_eq!(order.products, vec!["Playstation 4"]);
        assert!(order.created_at >= before);
        assert_ne!(order.id, Order::new(Vec::new()).id);
    }

    #[test]
    fn test_json_shape() {
        let order = Order::new(vec!["TV Phillips".to_string()]);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["id"], order.id.to_string());
        assert_eq!(json["products"][0], "TV Phillips");
        assert!(json["created_at"].is_string());
    }
}
