use serde::{Deserialize, Serialize};

use crate::models::ProductId;

/// Product ranked by revenue across all of a tenant's order lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub id: ProductId,
    pub title: String,
    pub sku: Option<String>,
    pub units: i64,
    pub revenue: f64,
    pub price: f64,
    pub cost: f64,
    pub inventory: i32,
    pub margin_pct: f64,
}

impl TopProduct {
    /// Gross margin as a percentage of price; 0 when the product is free.
    pub fn margin_pct(price: f64, cost: f64) -> f64 {
        if price == 0.0 {
            0.0
        } else {
            (price - cost) / price * 100.0
        }
    }
}

/// Maximum number of rows returned by the top products query.
pub const TOP_PRODUCTS_LIMIT: usize = 25;

pub const GET_TOP_PRODUCTS: &str = "get_top_products";
