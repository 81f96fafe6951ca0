use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::dto::customer_order_dto::CustomerOrderListItem;
use crate::models::customer_order::{CustomerOrder, CustomerOrderStatus};
use crate::utils::errors::AppError;

pub const CUSTOMER_ORDER_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "co.created_at"),
    ("updated_at", "co.updated_at"),
    ("status", "co.status"),
    ("quotation_amount", "q.quotation_amount"),
];

const CUSTOMER_ORDER_FILTERS: &str = r#"
    WHERE co.user_id = $1
      AND ($2::text IS NULL OR co.notes ILIKE $2 OR l.name ILIKE $2
           OR e.from_location ILIKE $2 OR e.to_location ILIKE $2)
      AND ($3::customer_order_status IS NULL OR co.status = $3)
      AND ($4::timestamptz IS NULL OR co.created_at >= $4)
      AND ($5::timestamptz IS NULL OR co.created_at < $5)
"#;

const CUSTOMER_ORDER_JOINS: &str = r#"
    FROM customer_orders co
    JOIN enquiries e ON e.id = co.enquiry_id
    JOIN leads l ON l.id = e.lead_id
    JOIN quotes q ON q.id = co.quote_id
"#;

pub struct CustomerOrderRepository {
    pool: PgPool,
}

impl CustomerOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, order: &CustomerOrder) -> Result<CustomerOrder, AppError> {
        let created = sqlx::query_as::<_, CustomerOrder>(
            r#"
            INSERT INTO customer_orders (id, user_id, enquiry_id, quote_id, status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.enquiry_id)
        .bind(order.quote_id)
        .bind(order.status)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        log::debug!("Pedido de cliente {} creado para enquiry {}", created.id, created.enquiry_id);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<CustomerOrder>, AppError> {
        let order = sqlx::query_as::<_, CustomerOrder>(
            "SELECT * FROM customer_orders WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_by_enquiry(&self, enquiry_id: Uuid) -> Result<Option<CustomerOrder>, AppError> {
        let order = sqlx::query_as::<_, CustomerOrder>("SELECT * FROM customer_orders WHERE enquiry_id = $1")
            .bind(enquiry_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    pub async fn exists_for_enquiry_in(conn: &mut PgConnection, enquiry_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customer_orders WHERE enquiry_id = $1)")
            .bind(enquiry_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(exists)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<CustomerOrderStatus>,
        params: &ListParams,
    ) -> Result<(Vec<CustomerOrderListItem>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) {} {}",
            CUSTOMER_ORDER_JOINS, CUSTOMER_ORDER_FILTERS
        ))
        .bind(user_id)
        .bind(&search)
        .bind(status)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT co.*, l.name AS lead_name, e.from_location, e.to_location, q.quotation_amount
            {} {} {} LIMIT $6 OFFSET $7
            "#,
            CUSTOMER_ORDER_JOINS,
            CUSTOMER_ORDER_FILTERS,
            order_clause(&params.sort, "co.id")
        );
        let items = sqlx::query_as::<_, CustomerOrderListItem>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(status)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    pub async fn update(&self, order: &CustomerOrder) -> Result<CustomerOrder, AppError> {
        let updated = sqlx::query_as::<_, CustomerOrder>(
            r#"
            UPDATE customer_orders
            SET status = $3, notes = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.status)
        .bind(&order.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Borra el pedido dentro de una transacción y devuelve la fila borrada
    pub async fn delete_in(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<Option<CustomerOrder>, AppError> {
        let deleted = sqlx::query_as::<_, CustomerOrder>(
            "DELETE FROM customer_orders WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(deleted)
    }
}
