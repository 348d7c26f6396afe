//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. All requests are served for the tenant
//! configured in [`AppState`].

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;

use super::dto::{
    CustomerListItem, CustomerListQuery, CustomerSummary, DailyRevenue, ForecastQuery,
    ForecastResponse, HealthResponse, KpiQuery, KpiSummary, OrderDetail, OrderListItem,
    OrderListQuery, OrderStatusUpdate, Paged, RecentOrders, RecentOrdersQuery, SalesQuery,
    SegmentsResponse, StatusUpdateRequest, TopProduct,
};
use super::error::{AppError, BAD_STATUS, EXPECTED_JSON};
use super::state::AppState;
use crate::db::repository::RepositoryError;
use crate::db::services as db_services;
use crate::models::{OrderId, RangePreset};
use crate::routes::{customers, dashboard, insights, orders, products};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the repository
/// answers. Responds 503 when it does not.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (ok, database) = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => (true, "connected".to_string()),
        Ok(false) => (false, "disconnected".to_string()),
        Err(e) => (false, format!("error: {}", e)),
    };
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            ok,
            status: if ok { "ok" } else { "degraded" }.to_string(),
            version: "v1".to_string(),
            database,
        }),
    )
}

// =============================================================================
// Dashboard
// =============================================================================

/// GET /v1/kpis?range=30d|90d
pub async fn get_kpis(
    State(state): State<AppState>,
    Query(query): Query<KpiQuery>,
) -> HandlerResult<KpiSummary> {
    let preset = RangePreset::lenient(query.range.as_deref());
    let kpis = services::kpis::compute_kpis(
        state.repository.as_ref(),
        &state.tenant(),
        preset,
        Utc::now(),
        state.settings.sessions_per_day,
    )
    .await
    .map_err(|e| AppError::from(e).during(dashboard::GET_KPIS))?;
    Ok(Json(kpis))
}

/// GET /v1/sales?days=N&fill=true
pub async fn get_sales(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> HandlerResult<Vec<DailyRevenue>> {
    let series = services::sales::sales_series(
        state.repository.as_ref(),
        &state.tenant(),
        services::sales::sales_days(query.days),
        Utc::now(),
        query.fill.unwrap_or(false),
    )
    .await
    .map_err(|e| AppError::from(e).during(dashboard::GET_SALES))?;
    Ok(Json(series))
}

// =============================================================================
// Customers
// =============================================================================

/// GET /v1/customers?page&pageSize&sort&dir&q&segment
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> HandlerResult<Paged<CustomerListItem>> {
    let page = services::customers::list_customers(
        state.repository.as_ref(),
        &state.tenant(),
        &query,
        Utc::now(),
    )
    .await
    .map_err(|e| AppError::from(e).during(customers::LIST_CUSTOMERS))?;
    Ok(Json(page))
}

/// GET /v1/customers/summary
pub async fn get_customer_summary(State(state): State<AppState>) -> HandlerResult<CustomerSummary> {
    let summary = services::customers::customer_summary(state.repository.as_ref(), &state.tenant())
        .await
        .map_err(|e| AppError::from(e).during(customers::GET_CUSTOMER_SUMMARY))?;
    Ok(Json(summary))
}

// =============================================================================
// Orders
// =============================================================================

/// GET /v1/orders?page&pageSize&sort&dir&q&status&from&to
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> HandlerResult<Paged<OrderListItem>> {
    let page = services::orders::list_orders(state.repository.as_ref(), &state.tenant(), &query)
        .await
        .map_err(|e| AppError::from(e).during(orders::LIST_ORDERS))?;
    Ok(Json(page))
}

/// GET /v1/orders/recent?limit
pub async fn recent_orders(
    State(state): State<AppState>,
    Query(query): Query<RecentOrdersQuery>,
) -> HandlerResult<RecentOrders> {
    let recent =
        services::orders::recent_orders(state.repository.as_ref(), &state.tenant(), query.limit)
            .await
            .map_err(|e| AppError::from(e).during(orders::LIST_RECENT_ORDERS))?;
    Ok(Json(recent))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<OrderDetail> {
    let detail = services::orders::get_order(
        state.repository.as_ref(),
        &state.tenant(),
        &OrderId::new(id),
    )
    .await
    .map_err(|e| AppError::from(e).during(orders::GET_ORDER))?;
    Ok(Json(detail))
}

/// PATCH /v1/orders/{id}
///
/// Body `{ "status": "PAID" }`. The request must declare a JSON content
/// type; a body that does not parse reads as a missing status.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<OrderStatusUpdate> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return Err(AppError::bad_request(
            EXPECTED_JSON,
            "Content-Type must be application/json",
        ));
    }
    let request: StatusUpdateRequest = serde_json::from_slice(&body).unwrap_or_default();

    let update = services::orders::update_status(
        state.repository.as_ref(),
        &state.tenant(),
        &OrderId::new(id),
        request.status.as_deref(),
    )
    .await
    .map_err(|e| match e {
        RepositoryError::ValidationError { message, .. } => {
            AppError::bad_request(BAD_STATUS, message)
        }
        other => AppError::from(other).during(orders::PATCH_ORDER_STATUS),
    })?;
    Ok(Json(update))
}

// =============================================================================
// Products
// =============================================================================

/// GET /v1/products/top
pub async fn top_products(State(state): State<AppState>) -> HandlerResult<Vec<TopProduct>> {
    let top = services::products::top_products(state.repository.as_ref(), &state.tenant())
        .await
        .map_err(|e| AppError::from(e).during(products::GET_TOP_PRODUCTS))?;
    Ok(Json(top))
}

// =============================================================================
// Insights
// =============================================================================

/// GET /v1/insights/segments
pub async fn get_segments(State(state): State<AppState>) -> HandlerResult<SegmentsResponse> {
    let segments =
        services::insights::segments(state.repository.as_ref(), &state.tenant(), Utc::now())
            .await
            .map_err(|e| AppError::from(e).during(insights::GET_SEGMENTS))?;
    Ok(Json(segments))
}

/// GET /v1/insights/forecast?alpha&horizon
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> HandlerResult<ForecastResponse> {
    let params = services::insights::ForecastOverrides::parse(
        query.alpha.as_deref(),
        query.horizon.as_deref(),
    )
    .and_then(|overrides| overrides.apply(state.settings.forecast_params()))
    .map_err(AppError::from)?;

    let forecast = services::insights::forecast(
        state.repository.as_ref(),
        &state.tenant(),
        Utc::now(),
        state.settings.forecast_history_days,
        params,
    )
    .await
    .map_err(|e| AppError::from(e).during(insights::GET_FORECAST))?;
    Ok(Json(forecast))
}
