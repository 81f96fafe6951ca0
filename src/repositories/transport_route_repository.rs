use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::dto::transport_order_dto::RouteOption;
use crate::models::transport_route::{TransportRoute, TransportRouteLocation};
use crate::utils::errors::AppError;

pub const ROUTE_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "r.created_at"),
    ("name", "r.name"),
    ("updated_at", "r.updated_at"),
];

const ROUTE_FILTERS: &str = r#"
    WHERE r.user_id = $1
      AND ($2::text IS NULL OR r.name ILIKE $2 OR EXISTS (
            SELECT 1 FROM transport_route_locations rl
            WHERE rl.route_id = r.id AND rl.remarks ILIKE $2))
      AND ($3::timestamptz IS NULL OR r.created_at >= $3)
      AND ($4::timestamptz IS NULL OR r.created_at < $4)
"#;

pub struct TransportRouteRepository {
    pool: PgPool,
}

impl TransportRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, route: &TransportRoute) -> Result<TransportRoute, AppError> {
        let created = sqlx::query_as::<_, TransportRoute>(
            r#"
            INSERT INTO transport_routes (id, user_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(route.user_id)
        .bind(&route.name)
        .bind(route.created_at)
        .bind(route.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn update_name(conn: &mut PgConnection, id: Uuid, name: &str) -> Result<TransportRoute, AppError> {
        let updated = sqlx::query_as::<_, TransportRoute>(
            "UPDATE transport_routes SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    /// Sustituye las paradas de la ruta por `locations`, en ese orden
    pub async fn replace_locations(
        conn: &mut PgConnection,
        route_id: Uuid,
        locations: &[TransportRouteLocation],
    ) -> Result<Vec<TransportRouteLocation>, AppError> {
        sqlx::query("DELETE FROM transport_route_locations WHERE route_id = $1")
            .bind(route_id)
            .execute(&mut *conn)
            .await?;

        let mut saved = Vec::with_capacity(locations.len());
        for location in locations {
            let row = sqlx::query_as::<_, TransportRouteLocation>(
                r#"
                INSERT INTO transport_route_locations (id, route_id, position, stop_type, remarks)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(location.id)
            .bind(route_id)
            .bind(location.position)
            .bind(location.stop_type)
            .bind(&location.remarks)
            .fetch_one(&mut *conn)
            .await?;
            saved.push(row);
        }

        log::debug!("Ruta {}: {} paradas guardadas", route_id, saved.len());
        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<TransportRoute>, AppError> {
        let route = sqlx::query_as::<_, TransportRoute>(
            "SELECT * FROM transport_routes WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn exists(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM transport_routes WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn locations_for(&self, route_ids: &[Uuid]) -> Result<Vec<TransportRouteLocation>, AppError> {
        let locations = sqlx::query_as::<_, TransportRouteLocation>(
            "SELECT * FROM transport_route_locations WHERE route_id = ANY($1) ORDER BY route_id, position",
        )
        .bind(route_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    pub async fn options(&self, user_id: Uuid) -> Result<Vec<RouteOption>, AppError> {
        let options = sqlx::query_as::<_, RouteOption>(
            "SELECT id, name FROM transport_routes WHERE user_id = $1 ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    pub async fn list(&self, user_id: Uuid, params: &ListParams) -> Result<(Vec<TransportRoute>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM transport_routes r {}", ROUTE_FILTERS))
            .bind(user_id)
            .bind(&search)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT r.* FROM transport_routes r {} {} LIMIT $5 OFFSET $6",
            ROUTE_FILTERS,
            order_clause(&params.sort, "r.id")
        );
        let routes = sqlx::query_as::<_, TransportRoute>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((routes, total))
    }

    /// Las rutas usadas por transport enquiries o pedidos no se pueden borrar (FK → 409)
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transport_routes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
