use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CustomerId, OrderId, OrderItemId, OrderStatus, ProductId};

/// Placeholder shown for orders placed without a customer record.
pub const MISSING_EMAIL: &str = "—";

/// Row of the order table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListItem {
    pub id: OrderId,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub customer_email: String,
}

/// Entry in the "recent orders" widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub total: f64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentOrders {
    pub items: Vec<RecentOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCustomerRef {
    pub id: CustomerId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProductRef {
    pub id: ProductId,
    pub sku: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailItem {
    pub id: OrderItemId,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount: f64,
    pub product: OrderProductRef,
}

/// Full order with customer and line items, items ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
    pub customer: Option<OrderCustomerRef>,
    pub items: Vec<OrderDetailItem>,
}

/// Body of a status change and its echo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub id: OrderId,
    pub status: OrderStatus,
}

pub const LIST_ORDERS: &str = "list_orders";
pub const LIST_RECENT_ORDERS: &str = "list_recent_orders";
pub const GET_ORDER: &str = "get_order";
pub const PATCH_ORDER_STATUS: &str = "update_order_status";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_detail_json_shape() {
        let detail = OrderDetail {
            id: OrderId::new("ord_1"),
            created_at: DateTime::parse_from_rfc3339("2025-03-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            status: OrderStatus::Paid,
            subtotal: 20.0,
            tax: 2.4,
            shipping: 9.99,
            total: 32.39,
            customer: None,
            items: vec![OrderDetailItem {
                id: OrderItemId::new("itm_1"),
                quantity: 2,
                unit_price: 10.0,
                discount: 0.0,
                product: OrderProductRef {
                    id: ProductId::new("prd_1"),
                    sku: Some("SKU-1".into()),
                    title: "Tee".into(),
                },
            }],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["status"], "PAID");
        assert_eq!(json["createdAt"], "2025-03-01T10:00:00Z");
        assert!(json["customer"].is_null());
        assert_eq!(json["items"][0]["unitPrice"], 10.0);
        assert_eq!(json["items"][0]["product"]["sku"], "SKU-1");
    }
}
