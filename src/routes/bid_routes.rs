use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::bid_controller::BidController;
use crate::dto::bid_dto::{BidFilter, BidResponse, CreateBidRequest, UpdateBidRequest};
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_bid_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bids).post(create_bid))
        .route("/:id", get(get_bid).put(update_bid).delete(delete_bid))
}

async fn create_bid(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateBidRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BidResponse>>), AppError> {
    let controller = BidController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_bids(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<BidFilter>,
) -> Result<Json<ApiResponse<Paginated<BidResponse>>>, AppError> {
    let controller = BidController::new(state.pool.clone());
    let bids = controller.list(user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(bids)))
}

async fn get_bid(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BidResponse>>, AppError> {
    let controller = BidController::new(state.pool.clone());
    let bid = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(bid)))
}

async fn update_bid(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBidRequest>,
) -> Result<Json<ApiResponse<BidResponse>>, AppError> {
    let controller = BidController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_bid(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BidController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Bid deleted successfully")))
}
