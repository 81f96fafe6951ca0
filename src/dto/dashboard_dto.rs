use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_leads: i64,
    pub total_brokers: i64,
    /// Enquiries de cliente `pending` más transport enquiries `open`
    pub open_enquiries: i64,
    pub pending_quotes: i64,
    pub active_customer_orders: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecentActivityQuery {
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

/// Entrada del feed de actividad reciente
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActivityItem {
    pub kind: String,
    pub id: Uuid,
    pub title: String,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}
