use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Double, Integer, Nullable, Text};
use std::str::FromStr;

use super::schema::{customers, order_items, orders, products, tenants};
use crate::db::models::{
    Customer, CustomerListItem, CustomerSnapshot, Order, OrderItem, OrderStatus, Product,
    TopProduct,
};
use crate::db::repository::{RepositoryError, RepositoryResult};

/// NUMERIC column value as transported in the API.
pub fn numeric_to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Money value rounded to cents for a NUMERIC(12, 2) column.
pub fn f64_to_numeric(value: f64) -> RepositoryResult<BigDecimal> {
    if !value.is_finite() {
        return Err(RepositoryError::validation(format!(
            "Non-finite money value: {}",
            value
        )));
    }
    BigDecimal::from_str(&format!("{:.2}", value))
        .map_err(|e| RepositoryError::validation(format!("Invalid money value {}: {}", value, e)))
}

pub fn parse_status(value: &str) -> RepositoryResult<OrderStatus> {
    OrderStatus::from_str(value).map_err(RepositoryError::internal)
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tenants)]
pub struct NewTenantRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: String,
    pub email: String,
    pub total_spent: BigDecimal,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CustomerRow {
    pub fn into_list_item(self) -> CustomerListItem {
        CustomerListItem {
            id: self.id.into(),
            email: self.email,
            orders_count: self.orders_count,
            total_spent: numeric_to_f64(&self.total_spent),
            created_at: self.created_at,
        }
    }

    pub fn into_snapshot(self) -> CustomerSnapshot {
        CustomerSnapshot {
            id: self.id.into(),
            total_spent: numeric_to_f64(&self.total_spent),
            orders_count: self.orders_count,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    pub id: String,
    pub tenant_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: BigDecimal,
    pub orders_count: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Customer> for NewCustomerRow {
    type Error = RepositoryError;

    fn try_from(c: &Customer) -> RepositoryResult<Self> {
        Ok(Self {
            id: c.id.to_string(),
            tenant_id: c.tenant_id.to_string(),
            email: c.email.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            total_spent: f64_to_numeric(c.total_spent)?,
            orders_count: c.orders_count,
            created_at: c.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: String,
    pub tenant_id: String,
    pub sku: Option<String>,
    pub title: String,
    pub price: BigDecimal,
    pub cost: BigDecimal,
    pub inventory: i32,
    pub tags: Vec<String>,
}

impl TryFrom<&Product> for NewProductRow {
    type Error = RepositoryError;

    fn try_from(p: &Product) -> RepositoryResult<Self> {
        Ok(Self {
            id: p.id.to_string(),
            tenant_id: p.tenant_id.to_string(),
            sku: p.sku.clone(),
            title: p.title.clone(),
            price: f64_to_numeric(p.price)?,
            cost: f64_to_numeric(p.cost)?,
            inventory: p.inventory,
            tags: p.tags.clone(),
        })
    }
}

/// Order header as read for the detail view.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: String,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: String,
    pub tenant_id: String,
    pub customer_id: Option<String>,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Order> for NewOrderRow {
    type Error = RepositoryError;

    fn try_from(o: &Order) -> RepositoryResult<Self> {
        Ok(Self {
            id: o.id.to_string(),
            tenant_id: o.tenant_id.to_string(),
            customer_id: o.customer_id.as_ref().map(|c| c.to_string()),
            subtotal: f64_to_numeric(o.subtotal)?,
            tax: f64_to_numeric(o.tax)?,
            shipping: f64_to_numeric(o.shipping)?,
            total: f64_to_numeric(o.total)?,
            status: o.status.as_str().to_string(),
            created_at: o.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub discount: BigDecimal,
}

impl TryFrom<&OrderItem> for NewOrderItemRow {
    type Error = RepositoryError;

    fn try_from(i: &OrderItem) -> RepositoryResult<Self> {
        Ok(Self {
            id: i.id.to_string(),
            order_id: i.order_id.to_string(),
            product_id: i.product_id.to_string(),
            quantity: i.quantity,
            unit_price: f64_to_numeric(i.unit_price)?,
            discount: f64_to_numeric(i.discount)?,
        })
    }
}

#[derive(Debug, Clone, QueryableByName)]
pub struct DailyRevenueRow {
    #[diesel(sql_type = Date)]
    pub day: NaiveDate,
    #[diesel(sql_type = Double)]
    pub revenue: f64,
}

#[derive(Debug, Clone, QueryableByName)]
pub struct TopProductRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub sku: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub units: i64,
    #[diesel(sql_type = Double)]
    pub revenue: f64,
    #[diesel(sql_type = Double)]
    pub price: f64,
    #[diesel(sql_type = Double)]
    pub cost: f64,
    #[diesel(sql_type = Integer)]
    pub inventory: i32,
}

impl From<TopProductRow> for TopProduct {
    fn from(row: TopProductRow) -> Self {
        TopProduct {
            margin_pct: TopProduct::margin_pct(row.price, row.cost),
            id: row.id.into(),
            title: row.title,
            sku: row.sku,
            units: row.units,
            revenue: row.revenue,
            price: row.price,
            cost: row.cost,
            inventory: row.inventory,
        }
    }
}
