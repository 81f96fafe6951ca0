use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::broker_controller::BrokerController;
use crate::dto::broker_dto::{BrokerResponse, CreateBrokerRequest, UpdateBrokerRequest};
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::middleware::AuthenticatedUser;
use crate::models::broker::{BrokerRegion, BrokerVehicleType};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_broker_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brokers).post(create_broker))
        .route("/:id", get(get_broker).put(update_broker).delete(delete_broker))
        .route("/:id/regions", get(get_broker_regions))
        .route("/:id/vehicle-types", get(get_broker_vehicle_types))
}

async fn create_broker(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateBrokerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BrokerResponse>>), AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_brokers(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Paginated<BrokerResponse>>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let brokers = controller.list(user.user_id, query).await?;
    Ok(Json(ApiResponse::success(brokers)))
}

async fn get_broker(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BrokerResponse>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let broker = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(broker)))
}

async fn update_broker(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBrokerRequest>,
) -> Result<Json<ApiResponse<BrokerResponse>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_broker(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Broker deleted successfully")))
}

async fn get_broker_regions(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BrokerRegion>>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let regions = controller.regions(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(regions)))
}

async fn get_broker_vehicle_types(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<BrokerVehicleType>>>, AppError> {
    let controller = BrokerController::new(state.pool.clone());
    let vehicle_types = controller.vehicle_types(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(vehicle_types)))
}
