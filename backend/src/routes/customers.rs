use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CustomerId;

/// Row of the customer table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListItem {
    pub id: CustomerId,
    pub email: String,
    pub orders_count: i64,
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
}

/// Tenant-wide customer counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub total: usize,
    /// Customers with at most one order.
    pub new_count: usize,
    /// Customers with more than one order.
    pub returning: usize,
    /// Mean lifetime spend, 0 for an empty tenant.
    pub ltv_avg: f64,
}

pub const LIST_CUSTOMERS: &str = "list_customers";
pub const GET_CUSTOMER_SUMMARY: &str = "get_customer_summary";
