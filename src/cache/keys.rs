//! Cache key builders
//!
//! Keys are colon-delimited and scoped by their first segment, which is what
//! lets `sales:*`-style invalidation reach every key of one domain.

pub fn products(page: u32, limit: u32) -> String {
    format!("products:{}:{}", page, limit)
}

pub fn product_count() -> String {
    "product:count".to_string()
}

pub fn best_selling_products(count: u32) -> String {
    format!("products:bestselling:{}", count)
}

pub fn products_by_category(category_id: &str) -> String {
    format!("products:category:{}", category_id)
}

pub fn categories() -> String {
    "categories:all".to_string()
}

pub fn orders(page: u32, limit: u32) -> String {
    format!("orders:{}:{}", page, limit)
}

pub fn orders_minimal(page: u32, limit: u32) -> String {
    format!("orders:minimal:{}:{}", page, limit)
}

pub fn order_count() -> String {
    "orders:count".to_string()
}

pub fn recent_orders_dashboard(count: u32) -> String {
    format!("orders:dashboard:{}", count)
}

/// Sales page; missing date bounds are rendered as `all`.
pub fn sales(page: u32, limit: u32, start_date: Option<&str>, end_date: Option<&str>) -> String {
    format!(
        "sales:{}:{}:{}:{}",
        page,
        limit,
        start_date.unwrap_or("all"),
        end_date.unwrap_or("all")
    )
}

pub fn sales_count() -> String {
    "sales:count".to_string()
}

pub fn sales_report(from: &str, to: &str) -> String {
    format!("sales:report:{}:{}", from, to)
}

pub fn analytics_overview() -> String {
    "analytics:overview".to_string()
}

pub fn analytics_sales_7days() -> String {
    "analytics:sales:7days".to_string()
}

pub fn analytics_revenue_6months() -> String {
    "analytics:revenue:6months".to_string()
}
