use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::dto::transport_order_dto::TransportOrderListItem;
use crate::models::transport_order::TransportOrder;
use crate::utils::errors::AppError;

pub const TRANSPORT_ORDER_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "o.created_at"),
    ("amount", "o.amount"),
    ("route_name", "r.name"),
];

const TRANSPORT_ORDER_JOINS: &str = r#"
    FROM transport_orders o
    JOIN transport_routes r ON r.id = o.route_id
    JOIN brokers br ON br.id = o.broker_id
"#;

const TRANSPORT_ORDER_FILTERS: &str = r#"
    WHERE o.user_id = $1
      AND ($2::text IS NULL OR o.notes ILIKE $2 OR r.name ILIKE $2
           OR br.company_name ILIKE $2 OR br.person_name ILIKE $2)
      AND ($3::uuid IS NULL OR o.enquiry_id = $3)
      AND ($4::uuid IS NULL OR o.broker_id = $4)
      AND ($5::timestamptz IS NULL OR o.created_at >= $5)
      AND ($6::timestamptz IS NULL OR o.created_at < $6)
"#;

pub struct TransportOrderRepository {
    pool: PgPool,
}

impl TransportOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, order: &TransportOrder) -> Result<TransportOrder, AppError> {
        let created = sqlx::query_as::<_, TransportOrder>(
            r#"
            INSERT INTO transport_orders (
                id, user_id, enquiry_id, broker_id, route_id, transport_enquiry_id, bid_id,
                amount, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.enquiry_id)
        .bind(order.broker_id)
        .bind(order.route_id)
        .bind(order.transport_enquiry_id)
        .bind(order.bid_id)
        .bind(order.amount)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        log::debug!("Pedido de transporte {} creado: {}", created.id, created.amount);
        Ok(created)
    }

    pub async fn exists_for_transport_enquiry(
        conn: &mut PgConnection,
        transport_enquiry_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM transport_orders WHERE transport_enquiry_id = $1)",
        )
        .bind(transport_enquiry_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(exists)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<TransportOrderListItem>, AppError> {
        let order = sqlx::query_as::<_, TransportOrderListItem>(&format!(
            r#"
            SELECT o.*, r.name AS route_name,
                   br.company_name AS broker_company_name, br.person_name AS broker_person_name
            {}
            WHERE o.id = $1 AND o.user_id = $2
            "#,
            TRANSPORT_ORDER_JOINS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn list_for_enquiry(&self, enquiry_id: Uuid, user_id: Uuid) -> Result<Vec<TransportOrder>, AppError> {
        let orders = sqlx::query_as::<_, TransportOrder>(
            "SELECT * FROM transport_orders WHERE enquiry_id = $1 AND user_id = $2 ORDER BY created_at",
        )
        .bind(enquiry_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        enquiry_id: Option<Uuid>,
        broker_id: Option<Uuid>,
        params: &ListParams,
    ) -> Result<(Vec<TransportOrderListItem>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) {} {}",
            TRANSPORT_ORDER_JOINS, TRANSPORT_ORDER_FILTERS
        ))
        .bind(user_id)
        .bind(&search)
        .bind(enquiry_id)
        .bind(broker_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT o.*, r.name AS route_name,
                   br.company_name AS broker_company_name, br.person_name AS broker_person_name
            {} {} {} LIMIT $7 OFFSET $8
            "#,
            TRANSPORT_ORDER_JOINS,
            TRANSPORT_ORDER_FILTERS,
            order_clause(&params.sort, "o.id")
        );
        let orders = sqlx::query_as::<_, TransportOrderListItem>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(enquiry_id)
            .bind(broker_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((orders, total))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transport_orders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
