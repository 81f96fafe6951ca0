use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_type_controller::VehicleTypeController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::vehicle_type_dto::{CreateVehicleTypeRequest, UpdateVehicleTypeRequest};
use crate::middleware::AuthenticatedUser;
use crate::models::vehicle_type::VehicleType;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_type_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicle_types).post(create_vehicle_type))
        .route(
            "/:id",
            get(get_vehicle_type).put(update_vehicle_type).delete(delete_vehicle_type),
        )
}

async fn create_vehicle_type(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleTypeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleType>>), AppError> {
    let controller = VehicleTypeController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicle_types(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Paginated<VehicleType>>>, AppError> {
    let controller = VehicleTypeController::new(state.pool.clone());
    let vehicle_types = controller.list(user.user_id, query).await?;
    Ok(Json(ApiResponse::success(vehicle_types)))
}

async fn get_vehicle_type(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleType>>, AppError> {
    let controller = VehicleTypeController::new(state.pool.clone());
    let vehicle_type = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(vehicle_type)))
}

async fn update_vehicle_type(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleTypeRequest>,
) -> Result<Json<ApiResponse<VehicleType>>, AppError> {
    let controller = VehicleTypeController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle_type(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleTypeController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Vehicle type deleted successfully")))
}
