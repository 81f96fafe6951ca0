use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::dashboard_dto::ActivityItem;
use crate::utils::errors::AppError;

pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_leads(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.count("SELECT COUNT(*) FROM leads WHERE user_id = $1", user_id).await
    }

    pub async fn count_brokers(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.count("SELECT COUNT(*) FROM brokers WHERE user_id = $1", user_id).await
    }

    pub async fn count_pending_enquiries(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.count(
            "SELECT COUNT(*) FROM enquiries WHERE user_id = $1 AND status = 'pending'",
            user_id,
        )
        .await
    }

    pub async fn count_open_transport_enquiries(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.count(
            "SELECT COUNT(*) FROM transport_broker_rate_enquiries WHERE user_id = $1 AND status = 'open'",
            user_id,
        )
        .await
    }

    pub async fn count_pending_quotes(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.count(
            "SELECT COUNT(*) FROM quotes WHERE user_id = $1 AND status = 'pending'",
            user_id,
        )
        .await
    }

    pub async fn count_active_customer_orders(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.count(
            "SELECT COUNT(*) FROM customer_orders WHERE user_id = $1 AND status = 'active'",
            user_id,
        )
        .await
    }

    async fn count(&self, sql: &str, user_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Últimos leads, enquiries, quotes y transport enquiries mezclados por fecha
    pub async fn recent_activity(&self, user_id: Uuid, limit: i64) -> Result<Vec<ActivityItem>, AppError> {
        let items = sqlx::query_as::<_, ActivityItem>(
            r#"
            SELECT * FROM (
                (SELECT 'lead' AS kind, id, name AS title, NULL::text AS status, created_at
                 FROM leads WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2)
                UNION ALL
                (SELECT 'enquiry' AS kind, id,
                        COALESCE(from_location, '?') || ' → ' || COALESCE(to_location, '?') AS title,
                        status::text AS status, created_at
                 FROM enquiries WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2)
                UNION ALL
                (SELECT 'quote' AS kind, id, quotation_amount::text AS title, status::text AS status, created_at
                 FROM quotes WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2)
                UNION ALL
                (SELECT 'transport_enquiry' AS kind, id, cargo_type AS title, status::text AS status, created_at
                 FROM transport_broker_rate_enquiries WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2)
            ) activity
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
