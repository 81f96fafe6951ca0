use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{contains_pattern, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::dto::transport_enquiry_dto::TransportEnquiryRow;
use crate::models::transport_enquiry::{TransportEnquiry, TransportEnquiryStatus};
use crate::utils::errors::AppError;

pub const TRANSPORT_ENQUIRY_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "te.created_at"),
    ("transport_date", "te.transport_date"),
    ("cargo_type", "te.cargo_type"),
    ("cargo_weight", "te.cargo_weight"),
    ("status", "te.status"),
    ("route_name", "r.name"),
];

const ROW_SELECT: &str = r#"
    SELECT te.*, r.name AS route_name
    FROM transport_broker_rate_enquiries te
    JOIN transport_routes r ON r.id = te.route_id
"#;

/// Filtros compartidos por el listado y por `available`. `from_date`/`to_date`
/// se aplican sobre `transport_date` (columna DATE, ambos extremos inclusivos).
const TRANSPORT_ENQUIRY_FILTERS: &str = r#"
      AND ($2::text IS NULL OR te.cargo_type ILIKE $2 OR r.name ILIKE $2 OR te.remarks ILIKE $2)
      AND ($3::transport_rate_enquiry_status IS NULL OR te.status = $3)
      AND ($4::text IS NULL OR te.cargo_type ILIKE $4)
      AND ($5::date IS NULL OR te.transport_date >= $5)
      AND ($6::date IS NULL OR te.transport_date <= $6)
      AND ($7::uuid IS NULL OR te.route_id = $7)
"#;

/// Filtros tipados del listado de transport enquiries
#[derive(Debug, Clone, Default)]
pub struct TransportEnquiryQuery {
    pub status: Option<TransportEnquiryStatus>,
    pub cargo_type: Option<String>,
    pub route_id: Option<Uuid>,
}

pub struct TransportEnquiryRepository {
    pool: PgPool,
}

impl TransportEnquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, enquiry: &TransportEnquiry) -> Result<TransportEnquiry, AppError> {
        let created = sqlx::query_as::<_, TransportEnquiry>(
            r#"
            INSERT INTO transport_broker_rate_enquiries (
                id, user_id, route_id, cargo_type, cargo_weight, transport_date,
                remarks, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(enquiry.id)
        .bind(enquiry.user_id)
        .bind(enquiry.route_id)
        .bind(&enquiry.cargo_type)
        .bind(enquiry.cargo_weight)
        .bind(enquiry.transport_date)
        .bind(&enquiry.remarks)
        .bind(enquiry.status)
        .bind(enquiry.created_at)
        .bind(enquiry.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        log::debug!("Transport enquiry {} creada en ruta {}", created.id, created.route_id);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<TransportEnquiry>, AppError> {
        let enquiry = sqlx::query_as::<_, TransportEnquiry>(
            "SELECT * FROM transport_broker_rate_enquiries WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enquiry)
    }

    pub async fn find_row(&self, id: Uuid, user_id: Uuid) -> Result<Option<TransportEnquiryRow>, AppError> {
        let row = sqlx::query_as::<_, TransportEnquiryRow>(&format!(
            "{} WHERE te.id = $1 AND te.user_id = $2",
            ROW_SELECT
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TransportEnquiry>, AppError> {
        let enquiry = sqlx::query_as::<_, TransportEnquiry>(
            "SELECT * FROM transport_broker_rate_enquiries WHERE id = $1 AND user_id = $2 FOR UPDATE",
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
        filter: &TransportEnquiryQuery,
        params: &ListParams,
    ) -> Result<(Vec<TransportEnquiryRow>, i64), AppError> {
        self.list_where("te.user_id = $1", user_id, None, filter, params).await
    }

    /// Transport enquiries del usuario aún no enlazadas con `enquiry_id`
    pub async fn available_for(
        &self,
        user_id: Uuid,
        enquiry_id: Uuid,
        filter: &TransportEnquiryQuery,
        params: &ListParams,
    ) -> Result<(Vec<TransportEnquiryRow>, i64), AppError> {
        self.list_where(
            r#"te.user_id = $1 AND NOT EXISTS (
                SELECT 1 FROM enquiry_transport_links etl
                WHERE etl.transport_enquiry_id = te.id AND etl.enquiry_id = $8)"#,
            user_id,
            Some(enquiry_id),
            filter,
            params,
        )
        .await
    }

    async fn list_where(
        &self,
        scope: &str,
        user_id: Uuid,
        linked_enquiry_id: Option<Uuid>,
        filter: &TransportEnquiryQuery,
        params: &ListParams,
    ) -> Result<(Vec<TransportEnquiryRow>, i64), AppError> {
        let search = search_pattern(params);
        let cargo_type = filter
            .cargo_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern);
        let (limit, offset) = limit_offset(params);
        // $8 sólo se referencia desde el scope de `available_for`
        let (limit_slot, offset_slot) = if linked_enquiry_id.is_some() { (9, 10) } else { (8, 9) };

        let count_sql = format!(
            r#"
            SELECT COUNT(*)
            FROM transport_broker_rate_enquiries te
            JOIN transport_routes r ON r.id = te.route_id
            WHERE {} {}
            "#,
            scope, TRANSPORT_ENQUIRY_FILTERS
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(user_id)
            .bind(&search)
            .bind(filter.status)
            .bind(&cargo_type)
            .bind(params.dates.from)
            .bind(params.dates.to)
            .bind(filter.route_id);
        if let Some(enquiry_id) = linked_enquiry_id {
            count_query = count_query.bind(enquiry_id);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let sql = format!(
            "{} WHERE {} {} {} LIMIT ${} OFFSET ${}",
            ROW_SELECT,
            scope,
            TRANSPORT_ENQUIRY_FILTERS,
            order_clause(&params.sort, "te.id"),
            limit_slot,
            offset_slot
        );
        let mut query = sqlx::query_as::<_, TransportEnquiryRow>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(filter.status)
            .bind(&cargo_type)
            .bind(params.dates.from)
            .bind(params.dates.to)
            .bind(filter.route_id);
        if let Some(enquiry_id) = linked_enquiry_id {
            query = query.bind(enquiry_id);
        }
        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        Ok((rows, total))
    }

    /// Búsqueda por nombre de ruta o por el nombre de alguna de sus paradas
    pub async fn search_by_route(&self, user_id: Uuid, route: &str) -> Result<Vec<TransportEnquiryRow>, AppError> {
        let pattern = contains_pattern(route.trim());
        let rows = sqlx::query_as::<_, TransportEnquiryRow>(&format!(
            r#"
            {}
            WHERE te.user_id = $1
              AND (r.name ILIKE $2 OR EXISTS (
                    SELECT 1 FROM transport_route_locations rl
                    WHERE rl.route_id = r.id AND rl.remarks ILIKE $2))
            ORDER BY te.created_at DESC, te.id DESC
            LIMIT 100
            "#,
            ROW_SELECT
        ))
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update(conn: &mut PgConnection, enquiry: &TransportEnquiry) -> Result<TransportEnquiry, AppError> {
        let updated = sqlx::query_as::<_, TransportEnquiry>(
            r#"
            UPDATE transport_broker_rate_enquiries
            SET route_id = $3, cargo_type = $4, cargo_weight = $5, transport_date = $6,
                remarks = $7, status = $8, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(enquiry.id)
        .bind(enquiry.user_id)
        .bind(enquiry.route_id)
        .bind(&enquiry.cargo_type)
        .bind(enquiry.cargo_weight)
        .bind(enquiry.transport_date)
        .bind(&enquiry.remarks)
        .bind(enquiry.status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn set_status(conn: &mut PgConnection, id: Uuid, status: TransportEnquiryStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE transport_broker_rate_enquiries SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *conn)
            .await?;

        log::debug!("Transport enquiry {} → {}", id, status);
        Ok(())
    }

    /// Pujas y links caen en cascada; los pedidos conservan la fila con la referencia a NULL
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transport_broker_rate_enquiries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
