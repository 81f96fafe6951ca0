use sqlx::PgPool;
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::models::vehicle_type::VehicleType;
use crate::utils::errors::AppError;

pub const VEHICLE_TYPE_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "v.created_at"),
    ("name", "v.name"),
    ("updated_at", "v.updated_at"),
];

const VEHICLE_TYPE_FILTERS: &str = r#"
    WHERE v.user_id = $1
      AND ($2::text IS NULL OR v.name ILIKE $2 OR v.description ILIKE $2)
      AND ($3::timestamptz IS NULL OR v.created_at >= $3)
      AND ($4::timestamptz IS NULL OR v.created_at < $4)
"#;

pub struct VehicleTypeRepository {
    pool: PgPool,
}

impl VehicleTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// El nombre es único por usuario sin distinguir mayúsculas (índice
    /// `idx_vehicle_types_user_name`); un duplicado llega como Conflict.
    pub async fn create(&self, vehicle_type: &VehicleType) -> Result<VehicleType, AppError> {
        let created = sqlx::query_as::<_, VehicleType>(
            r#"
            INSERT INTO vehicle_types (id, user_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(vehicle_type.id)
        .bind(vehicle_type.user_id)
        .bind(&vehicle_type.name)
        .bind(&vehicle_type.description)
        .bind(vehicle_type.created_at)
        .bind(vehicle_type.updated_at)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Tipo de vehículo {} creado: {}", created.id, created.name);
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<VehicleType>, AppError> {
        let vehicle_type = sqlx::query_as::<_, VehicleType>("SELECT * FROM vehicle_types WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle_type)
    }

    pub async fn list(&self, user_id: Uuid, params: &ListParams) -> Result<(Vec<VehicleType>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM vehicle_types v {}", VEHICLE_TYPE_FILTERS))
            .bind(user_id)
            .bind(&search)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT v.* FROM vehicle_types v {} {} LIMIT $5 OFFSET $6",
            VEHICLE_TYPE_FILTERS,
            order_clause(&params.sort, "v.id")
        );
        let vehicle_types = sqlx::query_as::<_, VehicleType>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((vehicle_types, total))
    }

    pub async fn update(&self, vehicle_type: &VehicleType) -> Result<VehicleType, AppError> {
        let updated = sqlx::query_as::<_, VehicleType>(
            r#"
            UPDATE vehicle_types
            SET name = $3, description = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(vehicle_type.id)
        .bind(vehicle_type.user_id)
        .bind(&vehicle_type.name)
        .bind(&vehicle_type.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicle_types WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
