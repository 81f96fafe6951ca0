use sqlx::PgPool;
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::models::lead::{Lead, LeadSource};
use crate::utils::errors::AppError;

pub const LEAD_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "l.created_at"),
    ("name", "l.name"),
    ("source", "l.source"),
    ("updated_at", "l.updated_at"),
];

const LEAD_FILTERS: &str = r#"
    WHERE l.user_id = $1
      AND ($2::text IS NULL OR l.name ILIKE $2 OR l.phone ILIKE $2 OR l.referrer ILIKE $2)
      AND ($3::lead_source IS NULL OR l.source = $3)
      AND ($4::timestamptz IS NULL OR l.created_at >= $4)
      AND ($5::timestamptz IS NULL OR l.created_at < $5)
"#;

pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, lead: &Lead) -> Result<Lead, AppError> {
        let created = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                id, user_id, name, phone, alternate_phone, source, referrer, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(lead.id)
        .bind(lead.user_id)
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.alternate_phone)
        .bind(lead.source)
        .bind(&lead.referrer)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Lead {} creado", created.id);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lead)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        source: Option<LeadSource>,
        params: &ListParams,
    ) -> Result<(Vec<Lead>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM leads l {}", LEAD_FILTERS))
            .bind(user_id)
            .bind(&search)
            .bind(source)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT l.* FROM leads l {} {} LIMIT $6 OFFSET $7",
            LEAD_FILTERS,
            order_clause(&params.sort, "l.id")
        );
        let leads = sqlx::query_as::<_, Lead>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(source)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((leads, total))
    }

    pub async fn has_enquiries(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM enquiries WHERE lead_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn update(&self, lead: &Lead) -> Result<Lead, AppError> {
        let updated = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET name = $3, phone = $4, alternate_phone = $5, source = $6, referrer = $7, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(lead.id)
        .bind(lead.user_id)
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.alternate_phone)
        .bind(lead.source)
        .bind(&lead.referrer)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
