//! Small hand-built storefronts shared by the service tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::db::repositories::LocalRepository;
use crate::models::*;

pub fn tenant() -> TenantId {
    TenantId::new("tenant_test")
}

/// Fixed reference instant used as "now".
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn customer(
    id: &str,
    email: &str,
    spent: f64,
    orders: i64,
    created_at: DateTime<Utc>,
) -> Customer {
    Customer {
        id: CustomerId::new(id),
        tenant_id: tenant(),
        email: email.to_string(),
        first_name: None,
        last_name: None,
        total_spent: spent,
        orders_count: orders,
        created_at,
    }
}

pub fn order(
    id: &str,
    customer: Option<&str>,
    total: f64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
) -> Order {
    Order {
        id: OrderId::new(id),
        tenant_id: tenant(),
        customer_id: customer.map(CustomerId::new),
        subtotal: total,
        tax: 0.0,
        shipping: 0.0,
        total,
        status,
        created_at,
    }
}

pub fn product(id: &str, price: f64, cost: f64) -> Product {
    Product {
        id: ProductId::new(id),
        tenant_id: tenant(),
        sku: Some(format!("SKU-{}", id)),
        title: format!("Product {}", id),
        price,
        cost,
        inventory: 5,
        tags: vec![],
    }
}

pub fn item(id: &str, order: &str, product: &str, quantity: i32, unit_price: f64) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(id),
        order_id: OrderId::new(order),
        product_id: ProductId::new(product),
        quantity,
        unit_price,
        discount: 0.0,
    }
}

/// Six customers with spread-out spend, order counts and signup dates.
///
/// Against this population `whale`, `steady` and `regular` score high,
/// `casual` scores mid, `lapsed` and `ghost` score low.
pub fn customers_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.insert_customer(customer("whale", "whale@example.com", 900.0, 9, days_ago(2)));
    repo.insert_customer(customer("steady", "steady@example.com", 400.0, 4, days_ago(40)));
    repo.insert_customer(customer("regular", "regular@shop.io", 250.0, 3, days_ago(10)));
    repo.insert_customer(customer("casual", "casual@example.com", 80.0, 2, days_ago(30)));
    repo.insert_customer(customer("lapsed", "lapsed@example.com", 20.0, 1, days_ago(300)));
    repo.insert_customer(customer("ghost", "ghost@shop.io", 0.0, 0, days_ago(400)));
    repo
}
