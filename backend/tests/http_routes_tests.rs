//! Router tests: real requests through the axum router over a demo tenant.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use shoplytics::db::repositories::LocalRepository;
use shoplytics::db::AnalyticsSettings;
use shoplytics::http::{create_router, AppState};
use support::{demo_repo_at, demo_tenant};

fn app() -> (Router, LocalRepository) {
    let (repo, _) = demo_repo_at(Utc::now());
    let settings = AnalyticsSettings {
        tenant_id: demo_tenant().to_string(),
        ..AnalyticsSettings::default()
    };
    let state = AppState::with_settings(Arc::new(repo.clone()), settings);
    (create_router(state), repo)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn patch(uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(Method::PATCH).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (router, repo) = app();
    let (status, body) = get(router.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["database"], "connected");

    repo.set_healthy(false);
    let (status, body) = get(router, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_kpis_shape() {
    let (router, _) = app();
    let (status, body) = get(router.clone(), "/v1/kpis?range=90d").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "90d");
    assert!(body["orders"].as_u64().unwrap() > 0);
    for key in [
        "revenue",
        "aov",
        "conversion",
        "deltaRevenuePct",
        "deltaOrdersPct",
        "deltaAovPct",
        "deltaConversionPct",
    ] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }

    let (_, body) = get(router, "/v1/kpis?range=1y").await;
    assert_eq!(body["range"], "30d");
}

#[tokio::test]
async fn test_sales_series() {
    let (router, _) = app();
    let (status, body) = get(router.clone(), "/v1/sales?days=7").await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert!(!points.is_empty() && points.len() <= 8);
    let date = points[0]["date"].as_str().unwrap();
    assert_eq!(date.len(), 10);

    let (_, body) = get(router, "/v1/sales?days=7&fill=true").await;
    assert_eq!(body.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_customers_list_and_summary() {
    let (router, _) = app();
    let (status, body) =
        get(router.clone(), "/v1/customers?pageSize=5&sort=ordersCount&dir=asc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 80);
    assert_eq!(body["pageSize"], 5);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    let counts: Vec<i64> = items.iter().map(|c| c["ordersCount"].as_i64().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));

    let (status, body) = get(router.clone(), "/v1/customers/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 80);
    assert_eq!(
        body["newCount"].as_u64().unwrap() + body["returning"].as_u64().unwrap(),
        80
    );
    assert!(body["ltvAvg"].as_f64().unwrap() > 0.0);

    let (_, segments) = get(router.clone(), "/v1/insights/segments").await;
    let high = segments["buckets"]["high"].as_u64().unwrap();
    let (_, body) = get(router, "/v1/customers?segment=high&pageSize=100").await;
    assert_eq!(body["total"].as_u64().unwrap(), high);
}

#[tokio::test]
async fn test_orders_list_and_recent() {
    let (router, _) = app();
    let (status, body) = get(router.clone(), "/v1/orders?status=PAID&pageSize=3&sort=total").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|o| o["status"] == "PAID"));
    assert!(items[0].get("customerEmail").is_some());

    let (status, body) = get(router, "/v1/orders/recent?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_order_detail_and_status_update() {
    let (router, _) = app();

    let response = router
        .clone()
        .oneshot(Request::get("/v1/orders/ord_1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

    let (status, body) = send(
        router.clone(),
        patch("/v1/orders/ord_1", Some("application/json"), r#"{"status":"CANCELLED"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "ord_1");
    assert_eq!(body["status"], "CANCELLED");

    let (_, body) = get(router, "/v1/orders/ord_1").await;
    assert_eq!(body["status"], "CANCELLED");
    assert!(!body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_update_errors() {
    let (router, _) = app();

    let (status, body) =
        send(router.clone(), patch("/v1/orders/ord_1", None, r#"{"status":"PAID"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "expected_json");

    let (status, body) = send(
        router.clone(),
        patch("/v1/orders/ord_1", Some("application/json"), r#"{"status":"shipped"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_status");

    let (status, body) = send(
        router.clone(),
        patch("/v1/orders/ord_1", Some("application/json"), "not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_status");

    let (status, body) = send(
        router,
        patch("/v1/orders/missing", Some("application/json"), r#"{"status":"PAID"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_top_products() {
    let (router, _) = app();
    let (status, body) = get(router, "/v1/products/top").await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert!(!products.is_empty() && products.len() <= 12);
    assert!(products[0].get("marginPct").is_some());
}

#[tokio::test]
async fn test_forecast() {
    let (router, _) = app();
    let (status, body) = get(router.clone(), "/v1/insights/forecast?horizon=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 7);
    assert_eq!(body["band"].as_array().unwrap().len(), 7);
    assert!(!body["last90"].as_array().unwrap().is_empty());

    let (status, body) = get(router.clone(), "/v1/insights/forecast?alpha=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_params");

    let (status, _) = get(router, "/v1/insights/forecast?horizon=10000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_forecast_rejects_malformed_numbers_as_json() {
    let (router, _) = app();
    for uri in [
        "/v1/insights/forecast?horizon=-1",
        "/v1/insights/forecast?alpha=abc",
        "/v1/insights/forecast?horizon=1.5",
    ] {
        let (status, body) = get(router.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "invalid_params", "{}", uri);
    }
}

#[tokio::test]
async fn test_malformed_paging_falls_back_to_defaults() {
    let (router, _) = app();
    let (status, body) = get(router.clone(), "/v1/orders?page=abc&pageSize=xyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 20);

    let (status, body) = get(router.clone(), "/v1/orders/recent?limit=lots").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let (status, body) = get(router, "/v1/sales?days=week&fill=maybe").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().is_some());
}

#[tokio::test]
async fn test_customers_page_far_past_the_end() {
    let (router, _) = app();
    let (status, body) =
        get(router, "/v1/customers?page=9223372036854775807&pageSize=100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 80);
    assert!(body["items"].as_array().unwrap().is_empty());
}
