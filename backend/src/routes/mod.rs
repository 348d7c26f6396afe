pub mod customers;
pub mod dashboard;
pub mod insights;
pub mod orders;
pub mod products;

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        // Route names tag handler failures in logs and error codes
        assert_eq!(super::dashboard::GET_KPIS, "get_kpis");
        assert_eq!(super::dashboard::GET_SALES, "get_sales");
        assert_eq!(super::customers::LIST_CUSTOMERS, "list_customers");
        assert_eq!(super::customers::GET_CUSTOMER_SUMMARY, "get_customer_summary");
        assert_eq!(super::orders::LIST_ORDERS, "list_orders");
        assert_eq!(super::orders::LIST_RECENT_ORDERS, "list_recent_orders");
        assert_eq!(super::orders::GET_ORDER, "get_order");
        assert_eq!(super::orders::PATCH_ORDER_STATUS, "update_order_status");
        assert_eq!(super::products::GET_TOP_PRODUCTS, "get_top_products");
        assert_eq!(super::insights::GET_SEGMENTS, "get_segments");
        assert_eq!(super::insights::GET_FORECAST, "get_forecast");
    }
}
