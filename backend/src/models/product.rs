use serde::{Deserialize, Serialize};

use super::ids::{ProductId, TenantId};

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub sku: Option<String>,
    pub title: String,
    pub price: f64,
    pub cost: f64,
    pub inventory: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}
