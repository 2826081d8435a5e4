//! Orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cloudmart_core::{OrderId, OrderStatus, OwnerId, ProductId};

use super::CartEntry;

/// One line of an order.
///
/// Prices are not captured; the line only records what was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartEntry> for OrderLine {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product_id.clone(),
            quantity: entry.quantity,
        }
    }
}

/// An immutable order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: OwnerId,
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a confirmed order from cart entries.
    #[must_use]
    pub fn confirmed(user_id: OwnerId, entries: &[CartEntry], created_at: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::generate(),
            user_id,
            items: entries.iter().map(OrderLine::from).collect(),
            status: OrderStatus::Confirmed,
            created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_order_copies_lines_in_order() {
        let owner = OwnerId::shared();
        let entries = vec![
            CartEntry::new(owner.clone(), ProductId::new("3"), 2),
            CartEntry::new(owner.clone(), ProductId::new("1"), 1),
        ];

        let order = Order::confirmed(owner, &entries, Utc::now());

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_id.as_str(), "3");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[1].product_id.as_str(), "1");
    }

    #[test]
    fn test_order_wire_shape() {
        let order = Order::confirmed(OwnerId::shared(), &[], Utc::now());
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["status"], "confirmed");
        assert_eq!(value["user_id"], "demo_user");
        assert!(value["items"].as_array().unwrap().is_empty());
        assert!(value["created_at"].as_str().unwrap().contains('T'));
    }
}
