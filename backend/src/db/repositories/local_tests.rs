#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::db::models::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::*;
    use crate::db::seed::{DemoConfig, DemoDataset};

    fn tenant() -> TenantId {
        TenantId::new("tenant_test")
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn customer(id: &str, email: &str, spent: f64, orders: i64, day: u32) -> Customer {
        Customer {
            id: CustomerId::new(id),
            tenant_id: tenant(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            total_spent: spent,
            orders_count: orders,
            created_at: at(day, 0),
        }
    }

    fn order(id: &str, customer: Option<&str>, total: f64, status: OrderStatus, day: u32) -> Order {
        Order {
            id: OrderId::new(id),
            tenant_id: tenant(),
            customer_id: customer.map(CustomerId::new),
            subtotal: total,
            tax: 0.0,
            shipping: 0.0,
            total,
            status,
            created_at: at(day, 12),
        }
    }

    fn item(id: &str, order: &str, product: &str, quantity: i32, unit_price: f64) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(id),
            order_id: OrderId::new(order),
            product_id: ProductId::new(product),
            quantity,
            unit_price,
            discount: 0.0,
        }
    }

    fn product(id: &str, price: f64, cost: f64) -> Product {
        Product {
            id: ProductId::new(id),
            tenant_id: tenant(),
            sku: Some(format!("SKU-{}", id)),
            title: format!("Product {}", id),
            price,
            cost,
            inventory: 10,
            tags: vec![],
        }
    }

    fn fixture() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.insert_customer(customer("c1", "ada@example.com", 300.0, 3, 1));
        repo.insert_customer(customer("c2", "bob@example.com", 50.0, 1, 2));
        repo.insert_customer(customer("c3", "ADAM@shop.io", 120.0, 2, 3));
        repo.insert_product(product("p1", 20.0, 5.0));
        repo.insert_product(product("p2", 40.0, 30.0));
        repo.insert_product(product("p3", 10.0, 1.0));
        repo.insert_order(
            order("o1", Some("c1"), 100.0, OrderStatus::Paid, 5),
            vec![item("i2", "o1", "p1", 2, 20.0), item("i1", "o1", "p2", 1, 40.0)],
        );
        repo.insert_order(
            order("o2", Some("c2"), 50.0, OrderStatus::Pending, 5),
            vec![item("i3", "o2", "p2", 1, 40.0)],
        );
        repo.insert_order(
            order("o3", None, 25.0, OrderStatus::Cancelled, 7),
            vec![item("i4", "o3", "p1", 1, 20.0)],
        );
        repo
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = repo.fetch_customer_snapshots(&tenant()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unknown_tenant_reads_empty() {
        let repo = fixture();
        let other = TenantId::new("someone_else");
        assert!(repo.fetch_customer_snapshots(&other).await.unwrap().is_empty());
        assert!(repo.daily_revenue(&other, at(1, 0)).await.unwrap().is_empty());
        let err = repo.get_order(&other, &OrderId::new("o1")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_customers_sorts_and_pages() {
        let repo = fixture();
        let filter = CustomerFilter {
            page: PageRequest::from_raw(Some(1), Some(2)),
            ..Default::default()
        };
        let page = repo.list_customers(&tenant(), &filter).await.unwrap();
        assert_eq!(page.total, 3);
        let ids: Vec<_> = page.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);

        let asc = CustomerFilter {
            sort: CustomerSort::CreatedAt,
            dir: SortDir::Asc,
            page: PageRequest::from_raw(Some(2), Some(2)),
            ..Default::default()
        };
        let page = repo.list_customers(&tenant(), &asc).await.unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "c3");
    }

    #[tokio::test]
    async fn test_list_customers_query_and_ids() {
        let repo = fixture();
        let filter = CustomerFilter {
            query: Some("ada".into()),
            ..Default::default()
        };
        let page = repo.list_customers(&tenant(), &filter).await.unwrap();
        assert_eq!(page.total, 2);

        let restricted = CustomerFilter {
            ids: Some([CustomerId::new("c2")].into_iter().collect()),
            ..Default::default()
        };
        let page = repo.list_customers(&tenant(), &restricted).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].email, "bob@example.com");

        let nothing = CustomerFilter {
            ids: Some(Default::default()),
            ..Default::default()
        };
        let page = repo.list_customers(&tenant(), &nothing).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_filters() {
        let repo = fixture();
        let all = repo.list_orders(&tenant(), &OrderFilter::default()).await.unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.items[0].id.as_str(), "o3");
        assert_eq!(all.items[0].customer_email, "—");

        let by_email = OrderFilter {
            query: Some("BOB".into()),
            ..Default::default()
        };
        let page = repo.list_orders(&tenant(), &by_email).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id.as_str(), "o2");

        let window = OrderFilter {
            from: Some(at(5, 0)),
            to: Some(at(7, 0)),
            sort: OrderSort::Total,
            dir: SortDir::Asc,
            ..Default::default()
        };
        let page = repo.list_orders(&tenant(), &window).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o2", "o1"]);

        let cancelled = OrderFilter {
            status: Some(OrderStatus::Cancelled),
            ..Default::default()
        };
        assert_eq!(repo.list_orders(&tenant(), &cancelled).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_recent_orders_newest_first() {
        let repo = fixture();
        let recent = repo.recent_orders(&tenant(), 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id.as_str(), "o3");
        assert_eq!(recent[0].email, "—");
        assert_eq!(recent[1].email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_get_order_detail() {
        let repo = fixture();
        let detail = repo.get_order(&tenant(), &OrderId::new("o1")).await.unwrap();
        assert_eq!(detail.status, OrderStatus::Paid);
        assert_eq!(detail.customer.as_ref().unwrap().email, "ada@example.com");
        let item_ids: Vec<_> = detail.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(item_ids, vec!["i1", "i2"]);
        assert_eq!(detail.items[0].product.title, "Product p2");

        let missing = repo.get_order(&tenant(), &OrderId::new("nope")).await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_update_order_status() {
        let repo = fixture();
        let id = OrderId::new("o2");
        repo.update_order_status(&tenant(), &id, OrderStatus::Paid)
            .await
            .unwrap();
        let detail = repo.get_order(&tenant(), &id).await.unwrap();
        assert_eq!(detail.status, OrderStatus::Paid);

        let err = repo
            .update_order_status(&tenant(), &OrderId::new("zzz"), OrderStatus::Paid)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_order_totals_between_half_open() {
        let repo = fixture();
        let mut totals = repo
            .order_totals_between(&tenant(), at(5, 12), Some(at(7, 12)))
            .await
            .unwrap();
        totals.sort_by(f64::total_cmp);
        assert_eq!(totals, vec![50.0, 100.0]);

        let open = repo
            .order_totals_between(&tenant(), at(6, 0), None)
            .await
            .unwrap();
        assert_eq!(open, vec![25.0]);
    }

    #[tokio::test]
    async fn test_daily_revenue_groups_by_day() {
        let repo = fixture();
        let series = repo.daily_revenue(&tenant(), at(1, 0)).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date.to_string(), "2025-03-05");
        assert_eq!(series[0].revenue, 150.0);
        assert_eq!(series[1].revenue, 25.0);

        let later = repo.daily_revenue(&tenant(), at(6, 0)).await.unwrap();
        assert_eq!(later.len(), 1);
    }

    #[tokio::test]
    async fn test_top_products_by_revenue() {
        let repo = fixture();
        let top = repo.top_products(&tenant(), 25).await.unwrap();
        // p3 never sold
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id.as_str(), "p2");
        assert_eq!(top[0].units, 2);
        assert_eq!(top[0].revenue, 80.0);
        assert!((top[0].margin_pct - 25.0).abs() < 1e-9);
        assert_eq!(top[1].revenue, 60.0);

        let one = repo.top_products(&tenant(), 1).await.unwrap();
        assert_eq!(one.len(), 1);
    }

    #[tokio::test]
    async fn test_store_and_clear_dataset() {
        let repo = LocalRepository::new();
        let config = DemoConfig {
            products: 5,
            customers: 20,
            months: 1,
            signup_span_days: 10,
            ..Default::default()
        };
        let dataset = DemoDataset::generate(&config, Utc::now() - Duration::days(1));
        let counts = repo.store_dataset(&dataset).await.unwrap();
        assert_eq!(counts.customers, 20);
        assert_eq!(counts.orders, dataset.orders.len());
        assert_eq!(repo.order_count(), dataset.orders.len());

        let removed = repo.clear_tenant(&dataset.tenant_id).await.unwrap();
        assert_eq!(removed, dataset.orders.len());
        assert_eq!(repo.customer_count(), 0);
    }
}
