//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! Money columns are `NUMERIC(12, 2)`; they are read as `BigDecimal` and
//! handed to the rest of the crate as `f64`.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Integer, Text, Timestamptz};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::models::{
    CustomerFilter, CustomerListItem, CustomerSnapshot, CustomerSort, DailyRevenue,
    OrderCustomerRef, OrderDetail, OrderDetailItem, OrderFilter, OrderId, OrderListItem,
    OrderProductRef, OrderSort, OrderStatus, Paged, RecentOrder, SortDir, TenantId, TopProduct,
};
use crate::db::repository::dataset::DatasetCounts;
use crate::db::repository::{
    AnalyticsRepository, CustomerRepository, DatasetRepository, ErrorContext, OrderRepository,
    RepositoryError, RepositoryResult,
};
use crate::db::seed::DemoDataset;
use crate::routes::orders::MISSING_EMAIL;

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Rows per INSERT statement; keeps bind parameters well under Postgres' 65535 limit.
const INSERT_CHUNK: usize = 1000;

const STATUS_RANK_SQL: &str =
    "CASE orders.status WHEN 'PENDING' THEN 0 WHEN 'PAID' THEN 1 ELSE 2 END";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times with exponential backoff when the
    /// pool cannot hand out a connection or the error is marked retryable.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("Retrying database operation after error: {}", e);
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Current pool state and query counters.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Returns (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }

    /// Recompute `total_spent` / `orders_count` for a tenant from its orders.
    pub async fn refresh_customer_totals(&self, tenant: &TenantId) -> RepositoryResult<usize> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| refresh_totals(conn, &tenant)).await
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// `%term%` with LIKE metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// LIMIT/OFFSET value; sizes beyond `i64::MAX` saturate.
fn sql_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn refresh_totals(conn: &mut PgConnection, tenant: &str) -> RepositoryResult<usize> {
    sql_query(
        r#"
        UPDATE customers c
        SET total_spent = s.total,
            orders_count = s.count
        FROM (
            SELECT c2.id, COALESCE(SUM(o.total), 0) AS total, COUNT(o.id) AS count
            FROM customers c2
            LEFT JOIN orders o ON o.customer_id = c2.id
            WHERE c2.tenant_id = $1
            GROUP BY c2.id
        ) s
        WHERE c.id = s.id
        "#,
    )
    .bind::<Text, _>(tenant)
    .execute(conn)
    .map_err(map_diesel_error)
}

fn customers_query<'a>(
    tenant: &'a str,
    filter: &'a CustomerFilter,
) -> customers::BoxedQuery<'a, Pg> {
    let mut query = customers::table
        .filter(customers::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(q) = &filter.query {
        query = query.filter(customers::email.ilike(like_pattern(q)));
    }
    if let Some(ids) = &filter.ids {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        query = query.filter(customers::id.eq_any(ids));
    }
    query
}

type OrdersWithCustomers = diesel::dsl::LeftJoin<orders::table, customers::table>;

fn orders_query<'a>(
    tenant: &'a str,
    filter: &'a OrderFilter,
) -> diesel::dsl::IntoBoxed<'a, OrdersWithCustomers, Pg> {
    let mut query = orders::table
        .left_join(customers::table)
        .filter(orders::tenant_id.eq(tenant))
        .into_boxed();
    if let Some(q) = &filter.query {
        let pattern = like_pattern(q);
        query = query.filter(
            orders::id
                .ilike(pattern.clone())
                .or(customers::email.ilike(pattern).is_not_distinct_from(true)),
        );
    }
    if let Some(status) = filter.status {
        query = query.filter(orders::status.eq(status.as_str()));
    }
    if let Some(from) = filter.from {
        query = query.filter(orders::created_at.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(orders::created_at.lt(to));
    }
    query
}

#[async_trait]
impl CustomerRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_customers(
        &self,
        tenant: &TenantId,
        filter: &CustomerFilter,
    ) -> RepositoryResult<Paged<CustomerListItem>> {
        let tenant = tenant.to_string();
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let total: i64 = customers_query(&tenant, &filter)
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;

            let query = customers_query(&tenant, &filter);
            let query = match (filter.sort, filter.dir) {
                (CustomerSort::TotalSpent, SortDir::Asc) => {
                    query.order(customers::total_spent.asc())
                }
                (CustomerSort::TotalSpent, SortDir::Desc) => {
                    query.order(customers::total_spent.desc())
                }
                (CustomerSort::OrdersCount, SortDir::Asc) => {
                    query.order(customers::orders_count.asc())
                }
                (CustomerSort::OrdersCount, SortDir::Desc) => {
                    query.order(customers::orders_count.desc())
                }
                (CustomerSort::CreatedAt, SortDir::Asc) => query.order(customers::created_at.asc()),
                (CustomerSort::CreatedAt, SortDir::Desc) => {
                    query.order(customers::created_at.desc())
                }
            };
            let rows: Vec<CustomerRow> = query
                .then_order_by(customers::id.asc())
                .limit(sql_limit(filter.page.page_size))
                .offset(sql_limit(filter.page.offset()))
                .select(CustomerRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;

            Ok(Paged::new(
                total as usize,
                filter.page,
                rows.into_iter().map(CustomerRow::into_list_item).collect(),
            ))
        })
        .await
    }

    async fn fetch_customer_snapshots(
        &self,
        tenant: &TenantId,
    ) -> RepositoryResult<Vec<CustomerSnapshot>> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| {
            let rows: Vec<CustomerRow> = customers::table
                .filter(customers::tenant_id.eq(&tenant))
                .select(CustomerRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(CustomerRow::into_snapshot).collect())
        })
        .await
    }
}

#[async_trait]
impl OrderRepository for PostgresRepository {
    async fn list_orders(
        &self,
        tenant: &TenantId,
        filter: &OrderFilter,
    ) -> RepositoryResult<Paged<OrderListItem>> {
        let tenant = tenant.to_string();
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let total: i64 = orders_query(&tenant, &filter)
                .count()
                .get_result(conn)
                .map_err(map_diesel_error)?;

            let query = orders_query(&tenant, &filter);
            let query = match (filter.sort, filter.dir) {
                (OrderSort::CreatedAt, SortDir::Asc) => query.order(orders::created_at.asc()),
                (OrderSort::CreatedAt, SortDir::Desc) => query.order(orders::created_at.desc()),
                (OrderSort::Total, SortDir::Asc) => query.order(orders::total.asc()),
                (OrderSort::Total, SortDir::Desc) => query.order(orders::total.desc()),
                (OrderSort::Status, SortDir::Asc) => {
                    query.order(sql::<Integer>(STATUS_RANK_SQL).asc())
                }
                (OrderSort::Status, SortDir::Desc) => {
                    query.order(sql::<Integer>(STATUS_RANK_SQL).desc())
                }
            };
            let rows: Vec<(String, bigdecimal::BigDecimal, String, DateTime<Utc>, Option<String>)> =
                query
                    .then_order_by(orders::id.asc())
                    .limit(sql_limit(filter.page.page_size))
                    .offset(sql_limit(filter.page.offset()))
                    .select((
                        orders::id,
                        orders::total,
                        orders::status,
                        orders::created_at,
                        customers::email.nullable(),
                    ))
                    .load(conn)
                    .map_err(map_diesel_error)?;

            let items = rows
                .into_iter()
                .map(|(id, total, status, created_at, email)| {
                    Ok(OrderListItem {
                        id: id.into(),
                        total: numeric_to_f64(&total),
                        status: parse_status(&status)?,
                        created_at,
                        customer_email: email.unwrap_or_else(|| MISSING_EMAIL.to_string()),
                    })
                })
                .collect::<RepositoryResult<Vec<_>>>()?;

            Ok(Paged::new(total as usize, filter.page, items))
        })
        .await
    }

    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<RecentOrder>> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| {
            let rows: Vec<(String, DateTime<Utc>, bigdecimal::BigDecimal, Option<String>)> =
                orders::table
                    .left_join(customers::table)
                    .filter(orders::tenant_id.eq(&tenant))
                    .order((orders::created_at.desc(), orders::id.asc()))
                    .limit(sql_limit(limit))
                    .select((
                        orders::id,
                        orders::created_at,
                        orders::total,
                        customers::email.nullable(),
                    ))
                    .load(conn)
                    .map_err(map_diesel_error)?;

            Ok(rows
                .into_iter()
                .map(|(id, created_at, total, email)| RecentOrder {
                    id: id.into(),
                    created_at,
                    total: numeric_to_f64(&total),
                    email: email.unwrap_or_else(|| MISSING_EMAIL.to_string()),
                })
                .collect())
        })
        .await
    }

    async fn get_order(&self, tenant: &TenantId, id: &OrderId) -> RepositoryResult<OrderDetail> {
        let tenant = tenant.to_string();
        let id = id.to_string();
        self.with_conn(move |conn| {
            let header: Option<(OrderRow, Option<String>, Option<String>)> = orders::table
                .left_join(customers::table)
                .filter(orders::tenant_id.eq(&tenant))
                .filter(orders::id.eq(&id))
                .select((
                    OrderRow::as_select(),
                    customers::id.nullable(),
                    customers::email.nullable(),
                ))
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?;

            let (order, customer_id, customer_email) = header.ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Order {} not found", id),
                    ErrorContext::new("get_order")
                        .with_entity("order")
                        .with_entity_id(&id),
                )
            })?;

            let item_rows: Vec<(
                String,
                i32,
                bigdecimal::BigDecimal,
                bigdecimal::BigDecimal,
                String,
                Option<String>,
                String,
            )> = order_items::table
                .inner_join(products::table)
                .filter(order_items::order_id.eq(&id))
                .order(order_items::id.asc())
                .select((
                    order_items::id,
                    order_items::quantity,
                    order_items::unit_price,
                    order_items::discount,
                    products::id,
                    products::sku,
                    products::title,
                ))
                .load(conn)
                .map_err(map_diesel_error)?;

            let items = item_rows
                .into_iter()
                .map(
                    |(item_id, quantity, unit_price, discount, product_id, sku, title)| {
                        OrderDetailItem {
                            id: item_id.into(),
                            quantity,
                            unit_price: numeric_to_f64(&unit_price),
                            discount: numeric_to_f64(&discount),
                            product: OrderProductRef {
                                id: product_id.into(),
                                sku,
                                title,
                            },
                        }
                    },
                )
                .collect();

            let customer = match (customer_id, customer_email) {
                (Some(id), Some(email)) => Some(OrderCustomerRef {
                    id: id.into(),
                    email,
                }),
                _ => None,
            };

            Ok(OrderDetail {
                id: order.id.into(),
                created_at: order.created_at,
                status: parse_status(&order.status)?,
                subtotal: numeric_to_f64(&order.subtotal),
                tax: numeric_to_f64(&order.tax),
                shipping: numeric_to_f64(&order.shipping),
                total: numeric_to_f64(&order.total),
                customer,
                items,
            })
        })
        .await
    }

    async fn update_order_status(
        &self,
        tenant: &TenantId,
        id: &OrderId,
        status: OrderStatus,
    ) -> RepositoryResult<()> {
        let tenant = tenant.to_string();
        let id = id.to_string();
        self.with_conn(move |conn| {
            // Tenant scoping and update happen in one statement
            let updated = diesel::update(
                orders::table
                    .filter(orders::tenant_id.eq(&tenant))
                    .filter(orders::id.eq(&id)),
            )
            .set(orders::status.eq(status.as_str()))
            .execute(conn)
            .map_err(map_diesel_error)?;

            if updated == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Order {} not found", id),
                    ErrorContext::new("update_order_status")
                        .with_entity("order")
                        .with_entity_id(&id),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn order_totals_between(
        &self,
        tenant: &TenantId,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<f64>> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| {
            let mut query = orders::table
                .filter(orders::tenant_id.eq(&tenant))
                .filter(orders::created_at.ge(from))
                .select(orders::total)
                .into_boxed();
            if let Some(to) = to {
                query = query.filter(orders::created_at.lt(to));
            }
            let totals: Vec<bigdecimal::BigDecimal> =
                query.load(conn).map_err(map_diesel_error)?;
            Ok(totals.iter().map(numeric_to_f64).collect())
        })
        .await
    }
}

#[async_trait]
impl AnalyticsRepository for PostgresRepository {
    async fn daily_revenue(
        &self,
        tenant: &TenantId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<DailyRevenue>> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| {
            let rows: Vec<DailyRevenueRow> = sql_query(
                r#"
                SELECT (created_at AT TIME ZONE 'UTC')::date AS day,
                       SUM(total)::float8 AS revenue
                FROM orders
                WHERE tenant_id = $1 AND created_at >= $2
                GROUP BY 1
                ORDER BY 1
                "#,
            )
            .bind::<Text, _>(&tenant)
            .bind::<Timestamptz, _>(since)
            .load(conn)
            .map_err(map_diesel_error)?;

            Ok(rows
                .into_iter()
                .map(|r| DailyRevenue::new(r.day, r.revenue))
                .collect())
        })
        .await
    }

    async fn top_products(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<TopProduct>> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| {
            let rows: Vec<TopProductRow> = sql_query(
                r#"
                SELECT p.id, p.title, p.sku,
                       SUM(oi.quantity)::int8 AS units,
                       SUM(oi.quantity * oi.unit_price)::float8 AS revenue,
                       p.price::float8 AS price,
                       p.cost::float8 AS cost,
                       p.inventory
                FROM order_items oi
                JOIN products p ON p.id = oi.product_id
                JOIN orders o ON o.id = oi.order_id
                WHERE o.tenant_id = $1
                GROUP BY p.id, p.title, p.sku, p.price, p.cost, p.inventory
                ORDER BY revenue DESC, p.id
                LIMIT $2
                "#,
            )
            .bind::<Text, _>(&tenant)
            .bind::<BigInt, _>(sql_limit(limit))
            .load(conn)
            .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(TopProduct::from).collect())
        })
        .await
    }
}

fn delete_tenant_rows(conn: &mut PgConnection, tenant: &str) -> QueryResult<usize> {
    let tenant_orders = orders::table
        .filter(orders::tenant_id.eq(tenant))
        .select(orders::id);
    diesel::delete(order_items::table.filter(order_items::order_id.eq_any(tenant_orders)))
        .execute(conn)?;
    let removed =
        diesel::delete(orders::table.filter(orders::tenant_id.eq(tenant))).execute(conn)?;
    diesel::delete(customers::table.filter(customers::tenant_id.eq(tenant))).execute(conn)?;
    diesel::delete(products::table.filter(products::tenant_id.eq(tenant))).execute(conn)?;
    Ok(removed)
}

fn convert_all<'a, T: 'a, R>(items: &'a [T]) -> RepositoryResult<Vec<R>>
where
    R: TryFrom<&'a T, Error = RepositoryError>,
{
    items.iter().map(R::try_from).collect()
}

#[async_trait]
impl DatasetRepository for PostgresRepository {
    async fn store_dataset(&self, dataset: &DemoDataset) -> RepositoryResult<DatasetCounts> {
        let tenant = dataset.tenant_id.to_string();
        let products_rows: Vec<NewProductRow> = convert_all(&dataset.products)?;
        let customer_rows: Vec<NewCustomerRow> = convert_all(&dataset.customers)?;
        let order_rows: Vec<NewOrderRow> = convert_all(&dataset.orders)?;
        let item_rows: Vec<NewOrderItemRow> = convert_all(&dataset.order_items)?;

        let counts = DatasetCounts {
            products: products_rows.len(),
            customers: customer_rows.len(),
            orders: order_rows.len(),
            order_items: item_rows.len(),
        };

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                delete_tenant_rows(tx, &tenant)?;

                diesel::insert_into(tenants::table)
                    .values(&NewTenantRow {
                        id: tenant.clone(),
                        name: "Demo Store".to_string(),
                    })
                    .on_conflict_do_nothing()
                    .execute(tx)?;

                for chunk in products_rows.chunks(INSERT_CHUNK) {
                    diesel::insert_into(products::table).values(chunk).execute(tx)?;
                }
                for chunk in customer_rows.chunks(INSERT_CHUNK) {
                    diesel::insert_into(customers::table).values(chunk).execute(tx)?;
                }
                for chunk in order_rows.chunks(INSERT_CHUNK) {
                    diesel::insert_into(orders::table).values(chunk).execute(tx)?;
                }
                for chunk in item_rows.chunks(INSERT_CHUNK) {
                    diesel::insert_into(order_items::table).values(chunk).execute(tx)?;
                }
                Ok::<_, diesel::result::Error>(())
            })
            .map_err(map_diesel_error)?;

            refresh_totals(conn, &tenant)?;
            Ok(counts)
        })
        .await
    }

    async fn clear_tenant(&self, tenant: &TenantId) -> RepositoryResult<usize> {
        let tenant = tenant.to_string();
        self.with_conn(move |conn| {
            conn.transaction(|tx| delete_tenant_rows(tx, &tenant))
                .map_err(map_diesel_error)
        })
        .await
    }
}
