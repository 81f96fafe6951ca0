use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::enquiry_transport_link_dto::LinkedTransportEnquiryRow;
use crate::models::enquiry_transport_link::EnquiryTransportLink;
use crate::utils::errors::AppError;

pub struct EnquiryTransportLinkRepository {
    pool: PgPool,
}

impl EnquiryTransportLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, link: &EnquiryTransportLink) -> Result<EnquiryTransportLink, AppError> {
        let created = sqlx::query_as::<_, EnquiryTransportLink>(
            r#"
            INSERT INTO enquiry_transport_links (
                id, user_id, enquiry_id, transport_enquiry_id, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(link.id)
        .bind(link.user_id)
        .bind(link.enquiry_id)
        .bind(link.transport_enquiry_id)
        .bind(&link.notes)
        .bind(link.created_at)
        .bind(link.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        log::debug!(
            "Link {}: enquiry {} ↔ transport enquiry {}",
            created.id,
            created.enquiry_id,
            created.transport_enquiry_id
        );
        Ok(created)
    }

    pub async fn exists(&self, enquiry_id: Uuid, transport_enquiry_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enquiry_transport_links WHERE enquiry_id = $1 AND transport_enquiry_id = $2)",
        )
        .bind(enquiry_id)
        .bind(transport_enquiry_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Transport enquiries enlazadas, el link más reciente primero
    pub async fn list_for_enquiry(
        &self,
        enquiry_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<LinkedTransportEnquiryRow>, AppError> {
        let rows = sqlx::query_as::<_, LinkedTransportEnquiryRow>(
            r#"
            SELECT etl.id AS link_id, etl.notes AS link_notes, etl.created_at AS linked_at,
                   te.*, r.name AS route_name
            FROM enquiry_transport_links etl
            JOIN transport_broker_rate_enquiries te ON te.id = etl.transport_enquiry_id
            JOIN transport_routes r ON r.id = te.route_id
            WHERE etl.enquiry_id = $1 AND etl.user_id = $2
            ORDER BY etl.created_at DESC, etl.id DESC
            "#,
        )
        .bind(enquiry_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM enquiry_transport_links WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
