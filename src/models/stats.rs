use serde::Serialize;

/// Count of rows per enum value, e.g. orders per status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerStats {
    pub total_customers: i64,
    pub active_customers: i64,
    pub inactive_customers: i64,
    pub suspended_customers: i64,
    pub role_counts: Vec<StatusCount>,
}

/// Revenue over paid orders only.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueStats {
    pub total_revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderStats {
    pub total_orders: i64,
    pub status_counts: Vec<StatusCount>,
    pub pay_status_counts: Vec<StatusCount>,
    pub shipping_status_counts: Vec<StatusCount>,
}

/// Paid revenue grouped by a calendar period (week/month/year).
#[derive(Debug, Clone, Serialize)]
pub struct PeriodRevenue {
    pub period: String,
    pub total_revenue: f64,
}
