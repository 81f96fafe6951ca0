use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::transport_enquiry_controller::TransportEnquiryController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::transport_enquiry_dto::{
    CreateTransportEnquiryRequest, RouteSearchQuery, TransportEnquiryFilter, TransportEnquiryRankingResponse,
    TransportEnquiryResponse, UpdateTransportEnquiryRequest,
};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transport_enquiry_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transport_enquiries).post(create_transport_enquiry))
        .route("/search/by-route", get(search_by_route))
        .route(
            "/:id",
            get(get_transport_enquiry)
                .put(update_transport_enquiry)
                .delete(delete_transport_enquiry),
        )
        .route("/:id/ranking", get(get_ranking))
}

async fn create_transport_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTransportEnquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransportEnquiryResponse>>), AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_transport_enquiries(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<TransportEnquiryFilter>,
) -> Result<Json<ApiResponse<Paginated<TransportEnquiryResponse>>>, AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    let enquiries = controller.list(user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(enquiries)))
}

async fn search_by_route(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<RouteSearchQuery>,
) -> Result<Json<ApiResponse<Vec<TransportEnquiryResponse>>>, AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    let enquiries = controller.search_by_route(user.user_id, query).await?;
    Ok(Json(ApiResponse::success(enquiries)))
}

async fn get_transport_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransportEnquiryResponse>>, AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    let enquiry = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(enquiry)))
}

/// Todas las pujas ordenadas con sus etiquetas L1/L2
async fn get_ranking(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TransportEnquiryRankingResponse>>, AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    let ranking = controller.ranking(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(ranking)))
}

async fn update_transport_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransportEnquiryRequest>,
) -> Result<Json<ApiResponse<TransportEnquiryResponse>>, AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_transport_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TransportEnquiryController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Transport enquiry deleted successfully")))
}
