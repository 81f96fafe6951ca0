use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::dto::enquiry_dto::EnquiryListItem;
use crate::models::enquiry::{Enquiry, EnquiryStatus};
use crate::utils::errors::AppError;

pub const ENQUIRY_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "e.created_at"),
    ("updated_at", "e.updated_at"),
    ("status", "e.status"),
    ("cargo_weight", "e.cargo_weight"),
    ("from_location", "e.from_location"),
    ("to_location", "e.to_location"),
];

const ENQUIRY_FILTERS: &str = r#"
    WHERE e.user_id = $1
      AND ($2::text IS NULL OR e.from_location ILIKE $2 OR e.to_location ILIKE $2
           OR e.cargo_type ILIKE $2 OR e.remarks ILIKE $2 OR l.name ILIKE $2)
      AND ($3::enquiry_status IS NULL OR e.status = $3)
      AND ($4::uuid IS NULL OR e.lead_id = $4)
      AND ($5::timestamptz IS NULL OR e.created_at >= $5)
      AND ($6::timestamptz IS NULL OR e.created_at < $6)
"#;

pub struct EnquiryRepository {
    pool: PgPool,
}

impl EnquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, enquiry: &Enquiry) -> Result<Enquiry, AppError> {
        let created = sqlx::query_as::<_, Enquiry>(
            r#"
            INSERT INTO enquiries (
                id, user_id, lead_id, from_location, to_location, cargo_type, cargo_weight,
                remarks, source, referrer, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(enquiry.id)
        .bind(enquiry.user_id)
        .bind(enquiry.lead_id)
        .bind(&enquiry.from_location)
        .bind(&enquiry.to_location)
        .bind(&enquiry.cargo_type)
        .bind(enquiry.cargo_weight)
        .bind(&enquiry.remarks)
        .bind(enquiry.source)
        .bind(&enquiry.referrer)
        .bind(enquiry.status)
        .bind(enquiry.created_at)
        .bind(enquiry.updated_at)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Enquiry {} creada para lead {}", created.id, created.lead_id);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Enquiry>, AppError> {
        let enquiry = sqlx::query_as::<_, Enquiry>("SELECT * FROM enquiries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(enquiry)
    }

    pub async fn find_with_lead(&self, id: Uuid, user_id: Uuid) -> Result<Option<EnquiryListItem>, AppError> {
        let enquiry = sqlx::query_as::<_, EnquiryListItem>(
            r#"
            SELECT e.*, l.name AS lead_name
            FROM enquiries e
            JOIN leads l ON l.id = e.lead_id
            WHERE e.id = $1 AND e.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enquiry)
    }

    /// Bloquea la fila de la enquiry dentro de una transacción
    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<Option<Enquiry>, AppError> {
        let enquiry = sqlx::query_as::<_, Enquiry>(
            "SELECT * FROM enquiries WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(enquiry)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<EnquiryStatus>,
        lead_id: Option<Uuid>,
        params: &ListParams,
    ) -> Result<(Vec<EnquiryListItem>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM enquiries e JOIN leads l ON l.id = e.lead_id {}",
            ENQUIRY_FILTERS
        ))
        .bind(user_id)
        .bind(&search)
        .bind(status)
        .bind(lead_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT e.*, l.name AS lead_name
            FROM enquiries e
            JOIN leads l ON l.id = e.lead_id
            {} {} LIMIT $7 OFFSET $8
            "#,
            ENQUIRY_FILTERS,
            order_clause(&params.sort, "e.id")
        );
        let items = sqlx::query_as::<_, EnquiryListItem>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(status)
            .bind(lead_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    /// Se llama con la enquiry ya bloqueada por `lock_by_id`
    pub async fn update(conn: &mut PgConnection, enquiry: &Enquiry) -> Result<Enquiry, AppError> {
        let updated = sqlx::query_as::<_, Enquiry>(
            r#"
            UPDATE enquiries
            SET from_location = $3, to_location = $4, cargo_type = $5, cargo_weight = $6,
                remarks = $7, source = $8, referrer = $9, status = $10, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(enquiry.id)
        .bind(enquiry.user_id)
        .bind(&enquiry.from_location)
        .bind(&enquiry.to_location)
        .bind(&enquiry.cargo_type)
        .bind(enquiry.cargo_weight)
        .bind(&enquiry.remarks)
        .bind(enquiry.source)
        .bind(&enquiry.referrer)
        .bind(enquiry.status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: EnquiryStatus,
    ) -> Result<Enquiry, AppError> {
        let updated = sqlx::query_as::<_, Enquiry>(
            "UPDATE enquiries SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

        log::debug!("Enquiry {} → {}", id, status);
        Ok(updated)
    }

    /// Borra la enquiry; quotes, pedidos y links caen en cascada
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM enquiries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
