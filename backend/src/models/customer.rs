use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CustomerId, TenantId};

/// A storefront customer with denormalised lifetime totals.
///
/// `total_spent` and `orders_count` are maintained from the order table
/// (see `db::seed` and the Postgres refresh query) rather than computed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub tenant_id: TenantId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: f64,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Point-in-time view of a customer used by segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub total_spent: f64,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerSnapshot {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.clone(),
            total_spent: c.total_spent,
            orders_count: c.orders_count,
            created_at: c.created_at,
        }
    }
}
