use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::vehicle_type_dto::{CreateVehicleTypeRequest, UpdateVehicleTypeRequest};
use crate::models::vehicle_type::VehicleType;
use crate::repositories::vehicle_type_repository::{VehicleTypeRepository, VEHICLE_TYPE_SORTABLE};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct VehicleTypeController {
    repository: VehicleTypeRepository,
}

impl VehicleTypeController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleTypeRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateVehicleTypeRequest,
    ) -> Result<ApiResponse<VehicleType>, AppError> {
        request.validate()?;

        let now = Utc::now();
        let vehicle_type = VehicleType {
            id: Uuid::new_v4(),
            user_id,
            name: request.name.trim().to_string(),
            description: normalize_text(request.description),
            created_at: now,
            updated_at: now,
        };

        let vehicle_type = self.repository.create(&vehicle_type).await?;
        tracing::info!("🚚 Tipo de vehículo {} '{}' creado", vehicle_type.id, vehicle_type.name);

        Ok(ApiResponse::success_with_message(vehicle_type, "Vehicle type created successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<VehicleType, AppError> {
        self.repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle type", id))
    }

    pub async fn list(&self, user_id: Uuid, query: ListQuery) -> Result<Paginated<VehicleType>, AppError> {
        let params = query.to_params(VEHICLE_TYPE_SORTABLE)?;
        let (vehicle_types, total) = self.repository.list(user_id, &params).await?;
        Ok(Paginated::new(vehicle_types, params.page, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateVehicleTypeRequest,
    ) -> Result<ApiResponse<VehicleType>, AppError> {
        request.validate()?;

        let current = self.get_by_id(id, user_id).await?;
        let vehicle_type = VehicleType {
            name: request
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or(current.name),
            description: merge_text(request.description, current.description),
            ..current
        };

        let vehicle_type = self.repository.update(&vehicle_type).await?;
        Ok(ApiResponse::success_with_message(vehicle_type, "Vehicle type updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Vehicle type", id));
        }
        Ok(())
    }
}
