use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::transport_order_controller::TransportOrderController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::transport_order_dto::{
    BrokerOption, CreateTransportOrderFromBidRequest, CreateTransportOrderRequest, RouteOption, TransportOrderFilter,
    TransportOrderListItem,
};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transport_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transport_orders).post(create_transport_order))
        .route("/from-bid", post(create_from_bid))
        .route("/brokers", get(list_broker_options))
        .route("/routes", get(list_route_options))
        .route("/:id", get(get_transport_order).delete(delete_transport_order))
}

async fn create_transport_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTransportOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransportOrderListItem>>), AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn create_from_bid(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTransportOrderFromBidRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransportOrderListItem>>), AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    let response = controller.from_bid(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// Selectores del formulario de pedidos
async fn list_broker_options(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BrokerOption>>>, AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    let brokers = controller.broker_options(user.user_id).await?;
    Ok(Json(ApiResponse::success(brokers)))
}

async fn list_route_options(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RouteOption>>>, AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    let routes = controller.route_options(user.user_id).await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn list_transport_orders(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<TransportOrderFilter>,
) -> Result<Json<ApiResponse<Paginated<TransportOrderListItem>>>, AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    let orders = controller.list(user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn get_transport_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransportOrderListItem>>, AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    let order = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(order)))
}

async fn delete_transport_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TransportOrderController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Transport order deleted successfully")))
}
