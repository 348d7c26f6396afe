//! Deterministic demo storefront.
//!
//! Generates a tenant with a product catalog, a customer base and roughly a
//! year and a half of daily orders whose volume follows weekday and seasonal
//! patterns. The same seed and anchor day always produce the same dataset.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

use crate::models::{
    Customer, CustomerId, Order, OrderId, OrderItem, OrderItemId, OrderStatus, Product, ProductId,
    TenantId,
};

pub const DEFAULT_SEED: u64 = 42;

const TAX_RATE: f64 = 0.12;
const FREE_SHIPPING_OVER: f64 = 100.0;
const FLAT_SHIPPING: f64 = 9.99;
const BASE_DAILY_ORDERS: f64 = 20.0;

/// Knobs for [`DemoDataset::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub tenant_id: TenantId,
    pub products: usize,
    pub customers: usize,
    /// Length of the order history, counted back from the anchor day.
    pub months: u32,
    /// Customers sign up spread evenly over this many days after the history starts.
    pub signup_span_days: i64,
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tenant_id: TenantId::new(crate::models::DEMO_TENANT),
            products: 50,
            customers: 500,
            months: 18,
            signup_span_days: 365,
            seed: DEFAULT_SEED,
        }
    }
}

/// Complete data for one tenant, ready to be written by a repository.
#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub tenant_id: TenantId,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
}

impl DemoDataset {
    /// Generate a dataset whose history ends on the UTC day containing `today`.
    pub fn generate(config: &DemoConfig, today: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let tenant = config.tenant_id.clone();

        let products: Vec<Product> = (0..config.products)
            .map(|i| demo_product(&tenant, i))
            .collect();

        let end_day = today.date_naive();
        let start_day = end_day
            .checked_sub_months(Months::new(config.months))
            .unwrap_or(end_day);
        let start = midnight(start_day);

        let signup_step = if config.customers > 1 {
            config.signup_span_days as f64 / (config.customers - 1) as f64
        } else {
            0.0
        };
        let mut customers: Vec<Customer> = (0..config.customers)
            .map(|i| {
                let offset_days = (i as f64 * signup_step).floor() as i64;
                demo_customer(&tenant, i, start + Duration::days(offset_days))
            })
            .collect();

        let mut orders = Vec::new();
        let mut order_items = Vec::new();
        let mut next_order = 1usize;
        let mut next_item = 1usize;

        let mut day = start_day;
        while day <= end_day && !products.is_empty() {
            let base = BASE_DAILY_ORDERS * weekday_factor(day) * seasonal_factor(day);
            let sd = (base * 0.25).max(1.0);
            let count = normal_sample(&mut rng, base, sd).round().max(0.0) as usize;
            let day_start = midnight(day);

            // Customers are ordered by signup, so the eligible ones form a prefix
            let eligible = customers
                .partition_point(|c| c.created_at <= day_start + Duration::hours(23));

            for _ in 0..count {
                let hour = rng.gen_range(0..24);
                let created_at = day_start + Duration::hours(hour);
                let customer_id = if eligible > 0 {
                    Some(customers[rng.gen_range(0..eligible)].id.clone())
                } else {
                    None
                };

                let order_id = OrderId::new(format!("ord_{}", next_order));
                next_order += 1;

                let lines = rng.gen_range(1..=3);
                let mut chosen = HashSet::new();
                let mut subtotal = 0.0;
                for _ in 0..lines {
                    let idx = rng.gen_range(0..products.len());
                    if !chosen.insert(idx) {
                        continue;
                    }
                    let product = &products[idx];
                    let quantity = rng.gen_range(1..=2);
                    subtotal += product.price * quantity as f64;
                    order_items.push(OrderItem {
                        id: OrderItemId::new(format!("item_{}", next_item)),
                        order_id: order_id.clone(),
                        product_id: product.id.clone(),
                        quantity,
                        unit_price: product.price,
                        discount: 0.0,
                    });
                    next_item += 1;
                }

                let subtotal = round_cents(subtotal);
                let tax = round_cents(subtotal * TAX_RATE);
                let shipping = if subtotal > FREE_SHIPPING_OVER {
                    0.0
                } else {
                    FLAT_SHIPPING
                };
                orders.push(Order {
                    id: order_id,
                    tenant_id: tenant.clone(),
                    customer_id,
                    subtotal,
                    tax,
                    shipping,
                    total: round_cents(subtotal + tax + shipping),
                    status: random_status(&mut rng),
                    created_at,
                });
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        refresh_customer_totals(&mut customers, &orders);

        Self {
            tenant_id: tenant,
            products,
            customers,
            orders,
            order_items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.products.is_empty() && self.orders.is_empty()
    }
}

/// Recompute each customer's lifetime spend and order count from `orders`.
///
/// Every status counts, cancelled orders included.
pub fn refresh_customer_totals(customers: &mut [Customer], orders: &[Order]) {
    let mut totals: HashMap<&CustomerId, (f64, i64)> = HashMap::new();
    for order in orders {
        if let Some(id) = &order.customer_id {
            let entry = totals.entry(id).or_insert((0.0, 0));
            entry.0 += order.total;
            entry.1 += 1;
        }
    }
    for customer in customers.iter_mut() {
        let (spent, count) = totals.get(&customer.id).copied().unwrap_or((0.0, 0));
        customer.total_spent = round_cents(spent);
        customer.orders_count = count;
    }
}

fn demo_product(tenant: &TenantId, i: usize) -> Product {
    Product {
        id: ProductId::new(format!("prod_{}", i + 1)),
        tenant_id: tenant.clone(),
        sku: Some(format!("SKU-{}", 1000 + i)),
        title: format!("Product {}", i + 1),
        price: (1999 + (i % 10) * 250) as f64 / 100.0,
        cost: (900 + (i % 8) * 150) as f64 / 100.0,
        inventory: 50 + (i % 30) as i32,
        tags: vec![if i % 2 == 1 { "summer" } else { "winter" }.to_string()],
    }
}

fn demo_customer(tenant: &TenantId, i: usize, created_at: DateTime<Utc>) -> Customer {
    Customer {
        id: CustomerId::new(format!("cust_{}", i + 1)),
        tenant_id: tenant.clone(),
        email: format!("customer{}@example.com", i + 1),
        first_name: Some(format!("First{}", i + 1)),
        last_name: Some(format!("Last{}", i + 1)),
        total_spent: 0.0,
        orders_count: 0,
        created_at,
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN))
}

fn weekday_factor(day: NaiveDate) -> f64 {
    match day.weekday() {
        Weekday::Sat | Weekday::Sun => 1.2,
        _ => 1.0,
    }
}

fn seasonal_factor(day: NaiveDate) -> f64 {
    match day.month() {
        11 | 12 => 1.5,
        6 | 7 => 1.3,
        _ => 1.0,
    }
}

/// 60% paid, 20% cancelled, 20% pending.
fn random_status(rng: &mut StdRng) -> OrderStatus {
    let r: f64 = rng.gen();
    if r < 0.6 {
        OrderStatus::Paid
    } else if r < 0.8 {
        OrderStatus::Cancelled
    } else {
        OrderStatus::Pending
    }
}

/// Box-Muller draw from N(mean, sd).
fn normal_sample(rng: &mut StdRng, mean: f64, sd: f64) -> f64 {
    // gen() is in [0, 1); shift to (0, 1] so ln never sees zero
    let u = 1.0 - rng.gen::<f64>();
    let v: f64 = rng.gen();
    mean + sd * (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
