use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::models::bid::{Bid, BidWithBroker};
use crate::utils::errors::AppError;

pub const BID_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "b.created_at"),
    ("rate", "b.rate"),
    ("updated_at", "b.updated_at"),
];

const BID_SELECT: &str = r#"
    SELECT b.*, br.company_name AS broker_company_name, br.person_name AS broker_person_name
    FROM transport_rate_bids b
    JOIN brokers br ON br.id = b.broker_id
"#;

const BID_FILTERS: &str = r#"
    WHERE b.user_id = $1
      AND ($2::text IS NULL OR br.company_name ILIKE $2 OR br.person_name ILIKE $2)
      AND ($3::uuid IS NULL OR b.transport_enquiry_id = $3)
      AND ($4::uuid IS NULL OR b.broker_id = $4)
      AND ($5::timestamptz IS NULL OR b.created_at >= $5)
      AND ($6::timestamptz IS NULL OR b.created_at < $6)
"#;

pub struct BidRepository {
    pool: PgPool,
}

impl BidRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, bid: &Bid) -> Result<Bid, AppError> {
        let created = sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO transport_rate_bids (
                id, user_id, transport_enquiry_id, broker_id, rate, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(bid.id)
        .bind(bid.user_id)
        .bind(bid.transport_enquiry_id)
        .bind(bid.broker_id)
        .bind(bid.rate)
        .bind(bid.created_at)
        .bind(bid.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        log::debug!(
            "Puja {} de broker {} para transport enquiry {}: {}",
            created.id,
            created.broker_id,
            created.transport_enquiry_id,
            created.rate
        );
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<BidWithBroker>, AppError> {
        let bid = sqlx::query_as::<_, BidWithBroker>(&format!("{} WHERE b.id = $1 AND b.user_id = $2", BID_SELECT))
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bid)
    }

    pub async fn find_in(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<Option<Bid>, AppError> {
        let bid = sqlx::query_as::<_, Bid>("SELECT * FROM transport_rate_bids WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(bid)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        transport_enquiry_id: Option<Uuid>,
        broker_id: Option<Uuid>,
        params: &ListParams,
    ) -> Result<(Vec<BidWithBroker>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM transport_rate_bids b JOIN brokers br ON br.id = b.broker_id {}",
            BID_FILTERS
        ))
        .bind(user_id)
        .bind(&search)
        .bind(transport_enquiry_id)
        .bind(broker_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "{} {} {} LIMIT $7 OFFSET $8",
            BID_SELECT,
            BID_FILTERS,
            order_clause(&params.sort, "b.id")
        );
        let bids = sqlx::query_as::<_, BidWithBroker>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(transport_enquiry_id)
            .bind(broker_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((bids, total))
    }

    /// Todas las pujas de varias transport enquiries, para el ranking
    pub async fn for_transport_enquiries(&self, ids: &[Uuid]) -> Result<Vec<BidWithBroker>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let bids = sqlx::query_as::<_, BidWithBroker>(&format!(
            "{} WHERE b.transport_enquiry_id = ANY($1) ORDER BY b.rate, b.created_at, b.id",
            BID_SELECT
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(bids)
    }

    pub async fn update_rate(&self, id: Uuid, user_id: Uuid, rate: Decimal) -> Result<Option<Bid>, AppError> {
        let updated = sqlx::query_as::<_, Bid>(
            r#"
            UPDATE transport_rate_bids
            SET rate = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(rate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Los pedidos creados desde esta puja conservan la fila con `bid_id` a NULL
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transport_rate_bids WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
