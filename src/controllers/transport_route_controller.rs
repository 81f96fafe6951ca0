use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::group_by;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::transport_route_dto::{
    CreateTransportRouteRequest, RouteLocationInput, TransportRouteResponse, UpdateTransportRouteRequest,
};
use crate::models::transport_route::{TransportRoute, TransportRouteLocation};
use crate::repositories::transport_route_repository::{TransportRouteRepository, ROUTE_SORTABLE};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::normalize_text;

pub struct TransportRouteController {
    pool: PgPool,
    repository: TransportRouteRepository,
}

/// Paradas numeradas desde 1 en el orden recibido
fn build_locations(route_id: Uuid, inputs: Vec<RouteLocationInput>) -> Vec<TransportRouteLocation> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| TransportRouteLocation {
            id: Uuid::new_v4(),
            route_id,
            position: index as i32 + 1,
            stop_type: input.stop_type,
            remarks: normalize_text(input.remarks),
        })
        .collect()
}

impl TransportRouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TransportRouteRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateTransportRouteRequest,
    ) -> Result<ApiResponse<TransportRouteResponse>, AppError> {
        request.validate()?;

        let now = Utc::now();
        let route = TransportRoute {
            id: Uuid::new_v4(),
            user_id,
            name: request.name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        let locations = build_locations(route.id, request.locations);

        let mut tx = self.pool.begin().await?;
        let route = TransportRouteRepository::insert(&mut tx, &route).await?;
        let locations = TransportRouteRepository::replace_locations(&mut tx, route.id, &locations).await?;
        tx.commit().await?;

        tracing::info!("🛣️  Ruta {} '{}' creada con {} paradas", route.id, route.name, locations.len());
        Ok(ApiResponse::success_with_message(
            TransportRouteResponse { route, locations },
            "Transport route created successfully",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Uuid) -> Result<TransportRouteResponse, AppError> {
        let route = self
            .repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport route", id))?;
        let locations = self.repository.locations_for(&[route.id]).await?;

        Ok(TransportRouteResponse { route, locations })
    }

    pub async fn list(&self, user_id: Uuid, query: ListQuery) -> Result<Paginated<TransportRouteResponse>, AppError> {
        let params = query.to_params(ROUTE_SORTABLE)?;
        let (routes, total) = self.repository.list(user_id, &params).await?;

        let ids: Vec<Uuid> = routes.iter().map(|route| route.id).collect();
        let mut locations = group_by(self.repository.locations_for(&ids).await?, |l| l.route_id);

        let items = routes
            .into_iter()
            .map(|route| TransportRouteResponse {
                locations: locations.remove(&route.id).unwrap_or_default(),
                route,
            })
            .collect();
        Ok(Paginated::new(items, params.page, total))
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateTransportRouteRequest,
    ) -> Result<ApiResponse<TransportRouteResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Transport route", id))?;
        let name = request
            .name
            .map(|name| name.trim().to_string())
            .unwrap_or(current.name);

        let mut tx = self.pool.begin().await?;
        let route = TransportRouteRepository::update_name(&mut tx, id, &name).await?;
        let replaced = match request.locations {
            Some(inputs) => {
                let locations = build_locations(id, inputs);
                Some(TransportRouteRepository::replace_locations(&mut tx, id, &locations).await?)
            }
            None => None,
        };
        tx.commit().await?;

        let locations = match replaced {
            Some(locations) => locations,
            None => self.repository.locations_for(&[id]).await?,
        };
        Ok(ApiResponse::success_with_message(
            TransportRouteResponse { route, locations },
            "Transport route updated successfully",
        ))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id, user_id).await? {
            return Err(not_found_error("Transport route", id));
        }
        Ok(())
    }
}
