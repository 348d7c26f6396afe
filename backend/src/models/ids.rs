//! String identifiers for the storefront entities.
//!
//! Keys are opaque strings (`cust_42`, `ord_1337`, ...) so they round-trip
//! unchanged between the database, the JSON API and the UI.

crate::define_id_type!(TenantId);
crate::define_id_type!(CustomerId);
crate::define_id_type!(ProductId);
crate::define_id_type!(OrderId);
crate::define_id_type!(OrderItemId);

/// Tenant used by the demo dataset and as the configuration default.
pub const DEMO_TENANT: &str = "tenant_demo";
