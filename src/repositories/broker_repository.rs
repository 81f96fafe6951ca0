use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::filters::{created_bounds, limit_offset, order_clause, search_pattern};
use crate::dto::common_dto::ListParams;
use crate::dto::transport_order_dto::BrokerOption;
use crate::models::broker::{Broker, BrokerRegion, BrokerVehicleType};
use crate::utils::errors::AppError;

pub const BROKER_SORTABLE: &[(&str, &str)] = &[
    ("created_at", "b.created_at"),
    ("company_name", "b.company_name"),
    ("person_name", "b.person_name"),
    ("city", "b.city"),
    ("updated_at", "b.updated_at"),
];

const BROKER_FILTERS: &str = r#"
    WHERE b.user_id = $1
      AND ($2::text IS NULL OR b.company_name ILIKE $2 OR b.person_name ILIKE $2
           OR b.phone ILIKE $2 OR b.city ILIKE $2
           OR EXISTS (SELECT 1 FROM broker_vehicle_types v WHERE v.broker_id = b.id AND v.vehicle_type ILIKE $2)
           OR EXISTS (SELECT 1 FROM broker_regions r WHERE r.broker_id = b.id
                      AND (r.region ILIKE $2 OR r.state ILIKE $2 OR r.city ILIKE $2)))
      AND ($3::timestamptz IS NULL OR b.created_at >= $3)
      AND ($4::timestamptz IS NULL OR b.created_at < $4)
"#;

pub struct BrokerRepository {
    pool: PgPool,
}

impl BrokerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, broker: &Broker) -> Result<Broker, AppError> {
        let created = sqlx::query_as::<_, Broker>(
            r#"
            INSERT INTO brokers (
                id, user_id, company_name, person_name, phone, alternate_phone,
                city, remarks, referrer, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(broker.id)
        .bind(broker.user_id)
        .bind(&broker.company_name)
        .bind(&broker.person_name)
        .bind(&broker.phone)
        .bind(&broker.alternate_phone)
        .bind(&broker.city)
        .bind(&broker.remarks)
        .bind(&broker.referrer)
        .bind(broker.created_at)
        .bind(broker.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn update_in(conn: &mut PgConnection, broker: &Broker) -> Result<Broker, AppError> {
        let updated = sqlx::query_as::<_, Broker>(
            r#"
            UPDATE brokers
            SET company_name = $3, person_name = $4, phone = $5, alternate_phone = $6,
                city = $7, remarks = $8, referrer = $9, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(broker.id)
        .bind(broker.user_id)
        .bind(&broker.company_name)
        .bind(&broker.person_name)
        .bind(&broker.phone)
        .bind(&broker.alternate_phone)
        .bind(&broker.city)
        .bind(&broker.remarks)
        .bind(&broker.referrer)
        .fetch_one(&mut *conn)
        .await?;

        Ok(updated)
    }

    pub async fn replace_regions(
        conn: &mut PgConnection,
        broker_id: Uuid,
        regions: &[BrokerRegion],
    ) -> Result<Vec<BrokerRegion>, AppError> {
        sqlx::query("DELETE FROM broker_regions WHERE broker_id = $1")
            .bind(broker_id)
            .execute(&mut *conn)
            .await?;

        let mut saved = Vec::with_capacity(regions.len());
        for region in regions {
            let row = sqlx::query_as::<_, BrokerRegion>(
                "INSERT INTO broker_regions (id, broker_id, region, state, city) VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(region.id)
            .bind(broker_id)
            .bind(&region.region)
            .bind(&region.state)
            .bind(&region.city)
            .fetch_one(&mut *conn)
            .await?;
            saved.push(row);
        }

        Ok(saved)
    }

    pub async fn replace_vehicle_types(
        conn: &mut PgConnection,
        broker_id: Uuid,
        vehicle_types: &[BrokerVehicleType],
    ) -> Result<Vec<BrokerVehicleType>, AppError> {
        sqlx::query("DELETE FROM broker_vehicle_types WHERE broker_id = $1")
            .bind(broker_id)
            .execute(&mut *conn)
            .await?;

        let mut saved = Vec::with_capacity(vehicle_types.len());
        for vehicle in vehicle_types {
            let row = sqlx::query_as::<_, BrokerVehicleType>(
                "INSERT INTO broker_vehicle_types (id, broker_id, vehicle_type) VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(vehicle.id)
            .bind(broker_id)
            .bind(&vehicle.vehicle_type)
            .fetch_one(&mut *conn)
            .await?;
            saved.push(row);
        }

        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Broker>, AppError> {
        let broker = sqlx::query_as::<_, Broker>("SELECT * FROM brokers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(broker)
    }

    pub async fn exists(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM brokers WHERE id = $1 AND user_id = $2)")
            .bind(id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn regions_for(&self, broker_ids: &[Uuid]) -> Result<Vec<BrokerRegion>, AppError> {
        let regions = sqlx::query_as::<_, BrokerRegion>(
            "SELECT * FROM broker_regions WHERE broker_id = ANY($1) ORDER BY broker_id, region, state, city",
        )
        .bind(broker_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(regions)
    }

    pub async fn vehicle_types_for(&self, broker_ids: &[Uuid]) -> Result<Vec<BrokerVehicleType>, AppError> {
        let vehicle_types = sqlx::query_as::<_, BrokerVehicleType>(
            "SELECT * FROM broker_vehicle_types WHERE broker_id = ANY($1) ORDER BY broker_id, vehicle_type",
        )
        .bind(broker_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicle_types)
    }

    /// Todos los brokers del usuario para los selectores, por nombre
    pub async fn options(&self, user_id: Uuid) -> Result<Vec<BrokerOption>, AppError> {
        let options = sqlx::query_as::<_, BrokerOption>(
            r#"
            SELECT id, company_name, person_name, phone, city
            FROM brokers
            WHERE user_id = $1
            ORDER BY COALESCE(company_name, person_name) NULLS LAST, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    pub async fn list(&self, user_id: Uuid, params: &ListParams) -> Result<(Vec<Broker>, i64), AppError> {
        let search = search_pattern(params);
        let (from, to) = created_bounds(params);
        let (limit, offset) = limit_offset(params);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM brokers b {}", BROKER_FILTERS))
            .bind(user_id)
            .bind(&search)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT b.* FROM brokers b {} {} LIMIT $5 OFFSET $6",
            BROKER_FILTERS,
            order_clause(&params.sort, "b.id")
        );
        let brokers = sqlx::query_as::<_, Broker>(&sql)
            .bind(user_id)
            .bind(&search)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((brokers, total))
    }

    /// Brokers con pedidos de transporte no se pueden borrar (FK → 409);
    /// sus pujas, regiones y vehículos caen en cascada
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM brokers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
