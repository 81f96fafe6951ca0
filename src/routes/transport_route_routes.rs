use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::transport_route_controller::TransportRouteController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::transport_route_dto::{
    CreateTransportRouteRequest, TransportRouteResponse, UpdateTransportRouteRequest,
};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transport_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/:id", get(get_route).put(update_route).delete(delete_route))
}

async fn create_route(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTransportRouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransportRouteResponse>>), AppError> {
    let controller = TransportRouteController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_routes(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Paginated<TransportRouteResponse>>>, AppError> {
    let controller = TransportRouteController::new(state.pool.clone());
    let routes = controller.list(user.user_id, query).await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn get_route(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransportRouteResponse>>, AppError> {
    let controller = TransportRouteController::new(state.pool.clone());
    let route = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(route)))
}

async fn update_route(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransportRouteRequest>,
) -> Result<Json<ApiResponse<TransportRouteResponse>>, AppError> {
    let controller = TransportRouteController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TransportRouteController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Transport route deleted successfully")))
}
