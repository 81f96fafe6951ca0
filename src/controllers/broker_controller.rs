use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::group_by;
use crate::dto::broker_dto::{BrokerRegionInput, BrokerResponse, CreateBrokerRequest, UpdateBrokerRequest};
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::models::broker::{Broker, BrokerRegion, BrokerVehicleType};
use crate::repositories::broker_repository::{BrokerRepository, BROKER_SORTABLE};
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::{merge_text, normalize_text};

pub struct BrokerController {
    pool: PgPool,
    repository: BrokerRepository,
}

fn build_regions(broker_id: Uuid, inputs: Vec<BrokerRegionInput>) -> Vec<BrokerRegion> {
    inputs
        .into_iter()
        .map(|input| BrokerRegion {
            id: Uuid::new_v4(),
            broker_id,
            region: normalize_text(input.region),
            state: normalize_text(input.state),
            city: normalize_text(input.city),
        })
        // Una región sin ningún dato no aporta nada
        .filter(|region| region.region.is_some() || region.state.is_some() || region.city.is_some())
        .collect()
}

fn build_vehicle_types(broker_id: Uuid, inputs: Vec<String>) -> Vec<BrokerVehicleType> {
    let mut vehicle_types: Vec<BrokerVehicleType> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let vehicle_type = input.trim().to_string();
        if vehicle_types.iter().any(|v| v.vehicle_type.eq_ignore_ascii_case(&vehicle_type)) {
            continue;
        }
        vehicle_types.push(BrokerVehicleType {
            id: Uuid::new_v4(),
            broker_id,
            vehicle_type,
        });
    }
    vehicle_types
}

impl BrokerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BrokerRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(&self, user_id: Uuid, request: CreateBrokerRequest) -> Result<ApiResponse<BrokerResponse>, AppError> {
        request.validate()?;
        if !request.has_name() {
            return Err(validation_error("company_name", "Either company name or person name is required"));
        }

        let now = Utc::now();
        let broker = Broker {
            id: Uuid::new_v4(),
            user_id,
            company_name: normalize_text(request.company_name),
            person_name: normalize_text(request.person_name),
            phone: normalize_text(request.phone),
            alternate_phone: normalize_text(request.alternate_phone),
            city: normalize_text(request.city),
            remarks: normalize_text(request.remarks),
            referrer: normalize_text(request.referrer),
            created_at: now,
            updated_at: now,
        };
        let regions = build_regions(broker.id, request.regions);
        let vehicle_types = build_vehicle_types(broker.id, request.vehicle_types);

        let mut tx = self.pool.begin().await?;
        let broker = BrokerRepository::insert(&mut tx, &broker).await?;
        let regions = BrokerRepository::replace_regions(&mut tx, broker.id, &regions).await?;
        let vehicle_types = BrokerRepository::replace_vehicle_types(&mut tx, broker.id, &vehicle_types).await?;
        tx.commit().await?;

        tracing::info!("🚛 Broker {} '{}' creado", broker.id, broker.display_name());
        Ok(ApiResponse::success_with_message(
            BrokerResponse::new(broker, regions, vehicle_types),
            "Broker created successfully",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<BrokerResponse, AppError> {
        let broker = self
            .repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Broker", id))?;

        let ids = [id];
        let (regions, vehicle_types) = futures::try_join!(
            self.repository.regions_for(&ids),
            self.repository.vehicle_types_for(&ids)
        )?;
        Ok(BrokerResponse::new(broker, regions, vehicle_types))
    }

    pub async fn regions(&self, id: Uuid, user_id: Uuid) -> Result<Vec<BrokerRegion>, AppError> {
        self.ensure_exists(id, user_id).await?;
        self.repository.regions_for(&[id]).await
    }

    pub async fn vehicle_types(&self, id: Uuid, user_id: Uuid) -> Result<Vec<BrokerVehicleType>, AppError> {
        self.ensure_exists(id, user_id).await?;
        self.repository.vehicle_types_for(&[id]).await
    }

    async fn ensure_exists(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.exists(id, user_id).await? {
            return Err(not_found_error("Broker", id));
        }
        Ok(())
    }

    pub async fn list(&self, user_id: Uuid, query: ListQuery) -> Result<Paginated<BrokerResponse>, AppError> {
        let params = query.to_params(BROKER_SORTABLE)?;
        let (brokers, total) = self.repository.list(user_id, &params).await?;

        let ids: Vec<Uuid> = brokers.iter().map(|broker| broker.id).collect();
        let (regions, vehicle_types) = futures::try_join!(
            self.repository.regions_for(&ids),
            self.repository.vehicle_types_for(&ids)
        )?;
        let mut regions = group_by(regions, |region| region.broker_id);
        let mut vehicle_types = group_by(vehicle_types, |vehicle| vehicle.broker_id);

        Ok(Paginated::new(brokers, params.page, total).map(|broker| {
            let broker_regions = regions.remove(&broker.id).unwrap_or_default();
            let broker_vehicles = vehicle_types.remove(&broker.id).unwrap_or_default();
            BrokerResponse::new(broker, broker_regions, broker_vehicles)
        }))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateBrokerRequest,
    ) -> Result<ApiResponse<BrokerResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Broker", id))?;

        let broker = Broker {
            company_name: merge_text(request.company_name, current.company_name),
            person_name: merge_text(request.person_name, current.person_name),
            phone: merge_text(request.phone, current.phone),
            alternate_phone: merge_text(request.alternate_phone, current.alternate_phone),
            city: merge_text(request.city, current.city),
            remarks: merge_text(request.remarks, current.remarks),
            referrer: merge_text(request.referrer, current.referrer),
            ..current
        };
        if broker.company_name.is_none() && broker.person_name.is_none() {
            return Err(validation_error("company_name", "Either company name or person name is required"));
        }

        let mut tx = self.pool.begin().await?;
        BrokerRepository::update_in(&mut tx, &broker).await?;
        if let Some(regions) = request.regions {
            let regions = build_regions(id, regions);
            BrokerRepository::replace_regions(&mut tx, id, &regions).await?;
        }
        if let Some(vehicle_types) = request.vehicle_types {
            let vehicle_types = build_vehicle_types(id, vehicle_types);
            BrokerRepository::replace_vehicle_types(&mut tx, id, &vehicle_types).await?;
        }
        tx.commit().await?;

        let response = self.get_by_id(id, user_id).await?;
        Ok(ApiResponse::success_with_message(response, "Broker updated successfully"))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Broker", id));
        }
        tracing::info!("🗑️  Broker {} eliminado", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_regions_are_dropped() {
        let broker_id = Uuid::new_v4();
        let regions = build_regions(
            broker_id,
            vec![
                BrokerRegionInput {
                    region: Some("North".into()),
                    state: Some(" Punjab ".into()),
                    city: None,
                },
                BrokerRegionInput {
                    region: Some("   ".into()),
                    ..Default::default()
                },
            ],
        );

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].broker_id, broker_id);
        assert_eq!(regions[0].state.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_vehicle_types_are_deduplicated() {
        let vehicle_types = build_vehicle_types(
            Uuid::new_v4(),
            vec!["Trailer".into(), " trailer".into(), "Container 20ft".into()],
        );

        let names: Vec<&str> = vehicle_types.iter().map(|v| v.vehicle_type.as_str()).collect();
        assert_eq!(names, vec!["Trailer", "Container 20ft"]);
    }
}
