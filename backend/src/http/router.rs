//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Order detail reflects writes immediately; never cache it.
    let order_detail = Router::new()
        .route(
            "/orders/{id}",
            get(handlers::get_order).patch(handlers::update_order_status),
        )
        .route_layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Dashboard
        .route("/kpis", get(handlers::get_kpis))
        .route("/sales", get(handlers::get_sales))
        // Customers
        .route("/customers", get(handlers::list_customers))
        .route("/customers/summary", get(handlers::get_customer_summary))
        // Orders
        .route("/orders", get(handlers::list_orders))
        .route("/orders/recent", get(handlers::recent_orders))
        .merge(order_detail)
        // Products
        .route("/products/top", get(handlers::top_products))
        // Insights
        .route("/insights/segments", get(handlers::get_segments))
        .route("/insights/forecast", get(handlers::get_forecast));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
