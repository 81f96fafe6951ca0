use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::models::quote::{Quote, QuoteStatus};
use crate::utils::errors::AppError;

pub const QUOTE_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "q.created_at"),
    ("updated_at", "q.updated_at"),
    ("quotation_amount", "q.quotation_amount"),
    ("status", "q.status"),
];

const QUOTE_FILTERS: &str = r#"
    WHERE q.user_id = $1
      AND ($2::text IS NULL OR q.costing ILIKE $2)
      AND ($3::quote_status IS NULL OR q.status = $3)
      AND ($4::uuid IS NULL OR q.enquiry_id = $4)
      AND ($5::timestamptz IS NULL OR q.created_at >= $5)
      AND ($6::timestamptz IS NULL OR q.created_at < $6)
"#;

pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, quote: &Quote) -> Result<Quote, AppError> {
        let created = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (
                id, user_id, enquiry_id, costing, quotation_amount, margin_percentage,
                base_amount, is_custom_amount, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(quote.id)
        .bind(quote.user_id)
        .bind(quote.enquiry_id)
        .bind(&quote.costing)
        .bind(quote.quotation_amount)
        .bind(quote.margin_percentage)
        .bind(quote.base_amount)
        .bind(quote.is_custom_amount)
        .bind(quote.status)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Quote {} creado: {}", created.id, created.quotation_amount);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quote)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<QuoteStatus>,
        enquiry_id: Option<Uuid>,
        params: &ListParams,
    ) -> Result<(Vec<Quote>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM quotes q {}", QUOTE_FILTERS))
            .bind(user_id)
            .bind(&search)
            .bind(status)
            .bind(enquiry_id)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT q.* FROM quotes q {} {} LIMIT $7 OFFSET $8",
            QUOTE_FILTERS,
            order_clause(&params.sort, "q.id")
        );
        let quotes = sqlx::query_as::<_, Quote>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(status)
            .bind(enquiry_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((quotes, total))
    }

    pub async fn list_for_enquiry(&self, enquiry_id: Uuid, user_id: Uuid) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE enquiry_id = $1 AND user_id = $2 ORDER BY created_at DESC",
        )
        .bind(enquiry_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// Quotes de la enquiry leídos dentro de la transacción de promoción
    pub async fn list_for_enquiry_in(conn: &mut PgConnection, enquiry_id: Uuid) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE enquiry_id = $1 ORDER BY created_at",
        )
        .bind(enquiry_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(quotes)
    }

    pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(quote)
    }

    /// Indica si el quote respalda un pedido de cliente
    pub async fn backs_customer_order(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customer_orders WHERE quote_id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(exists)
    }

    /// Suma de los pedidos de transporte de la enquiry y cuántos son
    pub async fn transport_order_total(&self, enquiry_id: Uuid, user_id: Uuid) -> Result<(Decimal, i64), AppError> {
        let (total, count): (Option<Decimal>, i64) = sqlx::query_as(
            "SELECT SUM(amount), COUNT(*) FROM transport_orders WHERE enquiry_id = $1 AND user_id = $2",
        )
        .bind(enquiry_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((total.unwrap_or(Decimal::ZERO), count))
    }

    pub async fn update(conn: &mut PgConnection, quote: &Quote) -> Result<Quote, AppError> {
        let updated = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET costing = $3, quotation_amount = $4, margin_percentage = $5, base_amount = $6,
                is_custom_amount = $7, status = $8, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(quote.id)
        .bind(quote.user_id)
        .bind(&quote.costing)
        .bind(quote.quotation_amount)
        .bind(quote.margin_percentage)
        .bind(quote.base_amount)
        .bind(quote.is_custom_amount)
        .bind(quote.status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
