//! In-memory local repository implementation.
//!
//! Stores every tenant's rows in plain vectors behind a `parking_lot::RwLock`.
//! Filtering, sorting and pagination are done in Rust with the same
//! semantics as the SQL queries in the Postgres repository, which makes this
//! backend suitable for unit tests, demos and local development.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::db::models::*;
use crate::db::repository::dataset::DatasetCounts;
use crate::db::repository::*;
use crate::db::seed::DemoDataset;
use crate::routes::orders::MISSING_EMAIL;

/// In-memory local repository.
///
/// # Example
/// ```
/// use shoplytics::db::repositories::LocalRepository;
/// use shoplytics::db::seed::{DemoConfig, DemoDataset};
///
/// let repo = LocalRepository::new();
/// let dataset = DemoDataset::generate(&DemoConfig::default(), chrono::Utc::now());
/// repo.load_dataset(&dataset);
/// assert_eq!(repo.customer_count(), 500);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    tenants: HashMap<TenantId, TenantData>,
    // Connection health
    is_healthy: bool,
}

#[derive(Default)]
struct TenantData {
    customers: Vec<Customer>,
    products: HashMap<ProductId, Product>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

impl TenantData {
    fn email_of(&self, customer_id: Option<&CustomerId>) -> Option<&str> {
        let id = customer_id?;
        self.customers
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.email.as_str())
    }
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            tenants: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    pub fn insert_customer(&self, customer: Customer) {
        let mut data = self.data.write();
        data.tenants
            .entry(customer.tenant_id.clone())
            .or_default()
            .customers
            .push(customer);
    }

    pub fn insert_product(&self, product: Product) {
        let mut data = self.data.write();
        data.tenants
            .entry(product.tenant_id.clone())
            .or_default()
            .products
            .insert(product.id.clone(), product);
    }

    /// Add an order together with its line items.
    ///
    /// Customer totals are not touched; call [`DemoDataset`] helpers or set
    /// them on the inserted customers directly.
    pub fn insert_order(&self, order: Order, items: Vec<OrderItem>) {
        let mut data = self.data.write();
        let tenant = data.tenants.entry(order.tenant_id.clone()).or_default();
        tenant.items.extend(items);
        tenant.orders.push(order);
    }

    /// Replace the dataset's tenant with its contents.
    pub fn load_dataset(&self, dataset: &DemoDataset) -> DatasetCounts {
        let tenant = TenantData {
            customers: dataset.customers.clone(),
            products: dataset
                .products
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect(),
            orders: dataset.orders.clone(),
            items: dataset.order_items.clone(),
        };
        let counts = DatasetCounts {
            products: tenant.products.len(),
            customers: tenant.customers.len(),
            orders: tenant.orders.len(),
            order_items: tenant.items.len(),
        };
        self.data
            .write()
            .tenants
            .insert(dataset.tenant_id.clone(), tenant);
        counts
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        self.data.write().tenants.clear();
    }

    pub fn customer_count(&self) -> usize {
        self.data
            .read()
            .tenants
            .values()
            .map(|t| t.customers.len())
            .sum()
    }

    pub fn order_count(&self) -> usize {
        self.data
            .read()
            .tenants
            .values()
            .map(|t| t.orders.len())
            .sum()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    /// Run `f` against a tenant's data; unknown tenants read as empty.
    fn with_tenant<T>(
        &self,
        tenant: &TenantId,
        f: impl FnOnce(&TenantData) -> T,
    ) -> RepositoryResult<T> {
        self.check_health()?;
        let data = self.data.read();
        let empty = TenantData::default();
        Ok(f(data.tenants.get(tenant).unwrap_or(&empty)))
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_customers(a: &Customer, b: &Customer, sort: CustomerSort) -> Ordering {
    match sort {
        CustomerSort::TotalSpent => a.total_spent.total_cmp(&b.total_spent),
        CustomerSort::OrdersCount => a.orders_count.cmp(&b.orders_count),
        CustomerSort::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn compare_orders(a: &Order, b: &Order, sort: OrderSort) -> Ordering {
    match sort {
        OrderSort::CreatedAt => a.created_at.cmp(&b.created_at),
        OrderSort::Total => a.total.total_cmp(&b.total),
        OrderSort::Status => a.status.cmp(&b.status),
    }
}

#[async_trait]
impl CustomerRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_customers(
        &self,
        tenant: &TenantId,
        filter: &CustomerFilter,
    ) -> RepositoryResult<Paged<CustomerListItem>> {
        self.with_tenant(tenant, |t| {
            let mut matching: Vec<&Customer> =
                t.customers.iter().filter(|c| filter.matches(c)).collect();
            // Ties broken by id so pages are stable
            matching.sort_by(|a, b| {
                filter
                    .dir
                    .apply(compare_customers(a, b, filter.sort))
                    .then_with(|| a.id.cmp(&b.id))
            });
            let items = filter
                .page
                .slice(&matching)
                .into_iter()
                .map(|c| CustomerListItem {
                    id: c.id.clone(),
                    email: c.email.clone(),
                    orders_count: c.orders_count,
                    total_spent: c.total_spent,
                    created_at: c.created_at,
                })
                .collect();
            Paged::new(matching.len(), filter.page, items)
        })
    }

    async fn fetch_customer_snapshots(
        &self,
        tenant: &TenantId,
    ) -> RepositoryResult<Vec<CustomerSnapshot>> {
        self.with_tenant(tenant, |t| {
            t.customers.iter().map(CustomerSnapshot::from).collect()
        })
    }
}

#[async_trait]
impl OrderRepository for LocalRepository {
    async fn list_orders(
        &self,
        tenant: &TenantId,
        filter: &OrderFilter,
    ) -> RepositoryResult<Paged<OrderListItem>> {
        self.with_tenant(tenant, |t| {
            let mut matching: Vec<(&Order, Option<&str>)> = t
                .orders
                .iter()
                .map(|o| (o, t.email_of(o.customer_id.as_ref())))
                .filter(|(o, email)| filter.matches(o, *email))
                .collect();
            matching.sort_by(|(a, _), (b, _)| {
                filter
                    .dir
                    .apply(compare_orders(a, b, filter.sort))
                    .then_with(|| a.id.cmp(&b.id))
            });
            let items = filter
                .page
                .slice(&matching)
                .into_iter()
                .map(|(o, email)| OrderListItem {
                    id: o.id.clone(),
                    total: o.total,
                    status: o.status,
                    created_at: o.created_at,
                    customer_email: email.unwrap_or(MISSING_EMAIL).to_string(),
                })
                .collect();
            Paged::new(matching.len(), filter.page, items)
        })
    }

    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<RecentOrder>> {
        self.with_tenant(tenant, |t| {
            let mut orders: Vec<&Order> = t.orders.iter().collect();
            orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
            orders
                .into_iter()
                .take(limit)
                .map(|o| RecentOrder {
                    id: o.id.clone(),
                    created_at: o.created_at,
                    total: o.total,
                    email: t
                        .email_of(o.customer_id.as_ref())
                        .unwrap_or(MISSING_EMAIL)
                        .to_string(),
                })
                .collect()
        })
    }

    async fn get_order(&self, tenant: &TenantId, id: &OrderId) -> RepositoryResult<OrderDetail> {
        let detail = self.with_tenant(tenant, |t| {
            let order = t.orders.iter().find(|o| &o.id == id)?;
            let customer = order.customer_id.as_ref().and_then(|cid| {
                t.customers.iter().find(|c| &c.id == cid).map(|c| OrderCustomerRef {
                    id: c.id.clone(),
                    email: c.email.clone(),
                })
            });
            let mut items: Vec<OrderDetailItem> = t
                .items
                .iter()
                .filter(|i| &i.order_id == id)
                .map(|i| {
                    let product = t.products.get(&i.product_id);
                    OrderDetailItem {
                        id: i.id.clone(),
                        quantity: i.quantity,
                        unit_price: i.unit_price,
                        discount: i.discount,
                        product: OrderProductRef {
                            id: i.product_id.clone(),
                            sku: product.and_then(|p| p.sku.clone()),
                            title: product.map(|p| p.title.clone()).unwrap_or_default(),
                        },
                    }
                })
                .collect();
            items.sort_by(|a, b| a.id.cmp(&b.id));
            Some(OrderDetail {
                id: order.id.clone(),
                created_at: order.created_at,
                status: order.status,
                subtotal: order.subtotal,
                tax: order.tax,
                shipping: order.shipping,
                total: order.total,
                customer,
                items,
            })
        })?;
        detail.ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Order {} not found", id),
                ErrorContext::new("get_order")
                    .with_entity("order")
                    .with_entity_id(id),
            )
        })
    }

    async fn update_order_status(
        &self,
        tenant: &TenantId,
        id: &OrderId,
        status: OrderStatus,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        let order = data
            .tenants
            .get_mut(tenant)
            .and_then(|t| t.orders.iter_mut().find(|o| &o.id == id));
        match order {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Order {} not found", id),
                ErrorContext::new("update_order_status")
                    .with_entity("order")
                    .with_entity_id(id),
            )),
        }
    }

    async fn order_totals_between(
        &self,
        tenant: &TenantId,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<f64>> {
        self.with_tenant(tenant, |t| {
            t.orders
                .iter()
                .filter(|o| o.created_at >= from && to.map_or(true, |to| o.created_at < to))
                .map(|o| o.total)
                .collect()
        })
    }
}

#[async_trait]
impl AnalyticsRepository for LocalRepository {
    async fn daily_revenue(
        &self,
        tenant: &TenantId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<DailyRevenue>> {
        self.with_tenant(tenant, |t| {
            let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            for order in t.orders.iter().filter(|o| o.created_at >= since) {
                *days.entry(order.created_at.date_naive()).or_insert(0.0) += order.total;
            }
            days.into_iter()
                .map(|(date, revenue)| DailyRevenue::new(date, revenue))
                .collect()
        })
    }

    async fn top_products(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<TopProduct>> {
        self.with_tenant(tenant, |t| {
            let tenant_orders: std::collections::HashSet<&OrderId> =
                t.orders.iter().map(|o| &o.id).collect();
            let mut sales: HashMap<&ProductId, (i64, f64)> = HashMap::new();
            for item in t.items.iter().filter(|i| tenant_orders.contains(&i.order_id)) {
                let entry = sales.entry(&item.product_id).or_insert((0, 0.0));
                entry.0 += item.quantity as i64;
                entry.1 += item.quantity as f64 * item.unit_price;
            }
            let mut rows: Vec<TopProduct> = sales
                .into_iter()
                .filter_map(|(id, (units, revenue))| {
                    let p = t.products.get(id)?;
                    Some(TopProduct {
                        id: p.id.clone(),
                        title: p.title.clone(),
                        sku: p.sku.clone(),
                        units,
                        revenue,
                        price: p.price,
                        cost: p.cost,
                        inventory: p.inventory,
                        margin_pct: TopProduct::margin_pct(p.price, p.cost),
                    })
                })
                .collect();
            rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then_with(|| a.id.cmp(&b.id)));
            rows.truncate(limit);
            rows
        })
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn store_dataset(&self, dataset: &DemoDataset) -> RepositoryResult<DatasetCounts> {
        self.check_health()?;
        Ok(self.load_dataset(dataset))
    }

    async fn clear_tenant(&self, tenant: &TenantId) -> RepositoryResult<usize> {
        self.check_health()?;
        Ok(self
            .data
            .write()
            .tenants
            .remove(tenant)
            .map_or(0, |t| t.orders.len()))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod local_tests;
