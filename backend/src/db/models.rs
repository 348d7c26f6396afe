//! Shared data models re-exported for database layer consumers, plus the
//! filter types the list queries take.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

pub use crate::api::{
    CustomerListItem, DailyRevenue, OrderCustomerRef, OrderDetail, OrderDetailItem,
    OrderListItem, OrderProductRef, RecentOrder, TopProduct,
};
pub use crate::models::{
    Customer, CustomerId, CustomerSnapshot, Order, OrderId, OrderItem, OrderItemId, OrderStatus,
    PageRequest, Paged, Product, ProductId, SortDir, TenantId,
};

/// Sortable customer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSort {
    #[default]
    TotalSpent,
    OrdersCount,
    CreatedAt,
}

impl CustomerSort {
    /// Unknown keys fall back to `totalSpent`.
    pub fn lenient(value: Option<&str>) -> Self {
        match value {
            Some("ordersCount") => Self::OrdersCount,
            Some("createdAt") => Self::CreatedAt,
            _ => Self::TotalSpent,
        }
    }
}

/// Sortable order columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSort {
    #[default]
    CreatedAt,
    Total,
    Status,
}

impl OrderSort {
    /// Unknown keys fall back to `createdAt`.
    pub fn lenient(value: Option<&str>) -> Self {
        match value {
            Some("total") => Self::Total,
            Some("status") => Self::Status,
            _ => Self::CreatedAt,
        }
    }
}

/// Customer list query after normalisation.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the email.
    pub query: Option<String>,
    /// Restrict to these ids (segment filter). `Some(empty)` matches nothing.
    pub ids: Option<HashSet<CustomerId>>,
    pub sort: CustomerSort,
    pub dir: SortDir,
    pub page: PageRequest,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&customer.id) {
                return false;
            }
        }
        match &self.query {
            Some(q) => contains_ignore_case(&customer.email, q),
            None => true,
        }
    }
}

/// Order list query after normalisation.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Case-insensitive substring of the order id or the customer email.
    pub query: Option<String>,
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    pub sort: OrderSort,
    pub dir: SortDir,
    pub page: PageRequest,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order, customer_email: Option<&str>) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(from) = self.from {
            if order.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if order.created_at >= to {
                return false;
            }
        }
        match &self.query {
            Some(q) => {
                contains_ignore_case(order.id.as_str(), q)
                    || customer_email.is_some_and(|email| contains_ignore_case(email, q))
            }
            None => true,
        }
    }
}

/// Trimmed, non-empty search term or `None`.
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(id: &str, status: OrderStatus, day: u32) -> Order {
        Order {
            id: OrderId::new(id),
            tenant_id: TenantId::new("t"),
            customer_id: None,
            subtotal: 10.0,
            tax: 1.2,
            shipping: 0.0,
            total: 11.2,
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_sort_keys_are_lenient() {
        assert_eq!(CustomerSort::lenient(Some("ordersCount")), CustomerSort::OrdersCount);
        assert_eq!(CustomerSort::lenient(Some("bogus")), CustomerSort::TotalSpent);
        assert_eq!(OrderSort::lenient(Some("status")), OrderSort::Status);
        assert_eq!(OrderSort::lenient(None), OrderSort::CreatedAt);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(Some("  ada ")), Some("ada".to_string()));
        assert_eq!(normalize_query(Some("   ")), None);
        assert_eq!(normalize_query(None), None);
    }

    #[test]
    fn test_order_filter_bounds_are_half_open() {
        let filter = OrderFilter {
            from: Some(Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2025, 1, 4, 12, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!filter.matches(&order("a", OrderStatus::Paid, 1), None));
        assert!(filter.matches(&order("b", OrderStatus::Paid, 2), None));
        assert!(filter.matches(&order("c", OrderStatus::Paid, 3), None));
        assert!(!filter.matches(&order("d", OrderStatus::Paid, 4), None));
    }

    #[test]
    fn test_order_filter_query_matches_id_or_email() {
        let filter = OrderFilter {
            query: Some("ADA@".into()),
            ..Default::default()
        };
        let o = order("ord_42", OrderStatus::Pending, 5);
        assert!(filter.matches(&o, Some("ada@example.com")));
        assert!(!filter.matches(&o, Some("bob@example.com")));
        assert!(!filter.matches(&o, None));

        let by_id = OrderFilter {
            query: Some("ORD_4".into()),
            ..Default::default()
        };
        assert!(by_id.matches(&o, None));
    }

    #[test]
    fn test_order_filter_status() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        };
        assert!(filter.matches(&order("x", OrderStatus::Cancelled, 1), None));
        assert!(!filter.matches(&order("y", OrderStatus::Paid, 1), None));
    }
}
