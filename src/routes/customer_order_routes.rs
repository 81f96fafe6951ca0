use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::customer_order_controller::CustomerOrderController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::customer_order_dto::{
    CreateCustomerOrderRequest, CustomerOrderDetailResponse, CustomerOrderListItem, PromotionResponse,
    UpdateCustomerOrderRequest,
};
use crate::middleware::AuthenticatedUser;
use crate::models::customer_order::CustomerOrder;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customer_orders).post(create_customer_order))
        .route(
            "/:id",
            get(get_customer_order)
                .put(update_customer_order)
                .delete(delete_customer_order),
        )
}

// Crear un customer order es promover su enquiry
async fn create_customer_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PromotionResponse>>), AppError> {
    let controller = CustomerOrderController::new(state.pool.clone());
    let response = controller.promote(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_customer_orders(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Paginated<CustomerOrderListItem>>>, AppError> {
    let controller = CustomerOrderController::new(state.pool.clone());
    let orders = controller.list(user.user_id, query).await?;
    Ok(Json(ApiResponse::success(orders)))
}

async fn get_customer_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CustomerOrderDetailResponse>>, AppError> {
    let controller = CustomerOrderController::new(state.pool.clone());
    let order = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(order)))
}

async fn update_customer_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerOrderRequest>,
) -> Result<Json<ApiResponse<CustomerOrder>>, AppError> {
    let controller = CustomerOrderController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_customer_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CustomerOrderController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Customer order deleted successfully")))
}
