//! # Shoplytics Backend
//!
//! Analytics backend for a multi-tenant storefront dashboard.
//!
//! The crate reads a tenant's customers, products and orders from a
//! repository and turns them into the figures the dashboard shows. A REST
//! API is exposed via Axum for the web frontend.
//!
//! ## Features
//!
//! - **KPIs**: revenue, orders, AOV and conversion with period-over-period deltas
//! - **Sales**: daily revenue series
//! - **Customers**: paged customer table, new/returning summary
//! - **Segmentation**: quantile-based recency/spend/frequency scoring
//! - **Forecasting**: exponential smoothing projection with a confidence band
//! - **Orders**: paged order table, order detail, status updates
//! - **Demo data**: deterministic generator for a sample tenant
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`algorithms`]: Pure quantile, segmentation and forecasting transforms
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`db`]: Repository pattern, storage backends, configuration and seeding
//! - [`services`]: Dashboard business logic on top of the repository
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific response types and route names
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
