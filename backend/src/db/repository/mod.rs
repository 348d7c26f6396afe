//! Repository trait definitions for storefront data access.
//!
//! Each trait covers one slice of the dashboard's reads (and the few writes
//! it makes). Implementations live in [`crate::db::repositories`].
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`customer`]: Customer listing and segmentation inputs
//! - [`order`]: Order listing, detail and status updates
//! - [`analytics`]: Aggregates behind the sales chart and product ranking
//! - [`dataset`]: Bulk loading of a tenant's data (demo seeding)
//!
//! # Convenience Trait Bound
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let snapshots = repo.fetch_customer_snapshots(&tenant).await?;
//!     let series = repo.daily_revenue(&tenant, since).await?;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod customer;
pub mod dataset;
pub mod error;
pub mod order;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use analytics::AnalyticsRepository;
pub use customer::CustomerRepository;
pub use dataset::DatasetRepository;
pub use order::OrderRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all four
/// repository traits.
pub trait FullRepository:
    CustomerRepository + OrderRepository + AnalyticsRepository + DatasetRepository
{
}

impl<T> FullRepository for T where
    T: CustomerRepository + OrderRepository + AnalyticsRepository + DatasetRepository
{
}
