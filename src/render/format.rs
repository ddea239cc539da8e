//! Display strings for the dashboard regions.

use crate::model::{LatestOrder, OrderHistoryEntry, OrderItem};

/// `"{name} x {quantity}"`
pub fn cart_item_line(item: &OrderItem) -> String {
    format!("{} x {}", item.name, item.quantity)
}

/// `"Total ₹{total} placed on {timestamp}"`
pub fn latest_order_summary(order: &LatestOrder) -> String {
    format!("Total ₹{} placed on {}", order.total, order.timestamp)
}

/// `"₹{total} on {timestamp}"`
pub fn history_line(entry: &OrderHistoryEntry) -> String {
    format!("₹{} on {}", entry.total, entry.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Timestamp};
    use serde_json::Number;

    #[test]
    fn formats_each_region() {
        let item = OrderItem {
            name: "Pen".to_string(),
            quantity: 2,
        };
        assert_eq!(cart_item_line(&item), "Pen x 2");

        let order = LatestOrder {
            items: vec![item],
            total: Amount::Number(Number::from(50)),
            timestamp: Timestamp("2024-01-01".to_string()),
        };
        assert_eq!(latest_order_summary(&order), "Total ₹50 placed on 2024-01-01");

        let entry = OrderHistoryEntry {
            total: Amount::Text("99.90".to_string()),
            timestamp: Timestamp("2023-12-01".to_string()),
        };
        assert_eq!(history_line(&entry), "₹99.90 on 2023-12-01");
    }
}
