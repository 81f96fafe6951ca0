use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::enquiry_transport_link_controller::EnquiryTransportLinkController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::enquiry_transport_link_dto::{
    CreateLinkedTransportEnquiryRequest, LinkCreatedResponse, LinkTransportEnquiryRequest, LinkedTransportEnquiry,
};
use crate::dto::transport_enquiry_dto::{TransportEnquiryFilter, TransportEnquiryResponse};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

// GET /:id recibe un enquiry_id y DELETE /:id un link_id
pub fn create_enquiry_transport_link_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_with_new_transport_enquiry))
        .route("/link", post(link_transport_enquiry))
        .route("/available/:enquiry_id", get(list_available))
        .route("/:id", get(list_linked).delete(delete_link))
}

async fn list_linked(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<LinkedTransportEnquiry>>>, AppError> {
    let controller = EnquiryTransportLinkController::new(state.pool.clone());
    let linked = controller.list(enquiry_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(linked)))
}

async fn list_available(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<TransportEnquiryFilter>,
) -> Result<Json<ApiResponse<Paginated<TransportEnquiryResponse>>>, AppError> {
    let controller = EnquiryTransportLinkController::new(state.pool.clone());
    let available = controller.available(enquiry_id, user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(available)))
}

async fn create_with_new_transport_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateLinkedTransportEnquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkCreatedResponse>>), AppError> {
    let controller = EnquiryTransportLinkController::new(state.pool.clone());
    let response = controller.create_with_new_transport_enquiry(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn link_transport_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<LinkTransportEnquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkCreatedResponse>>), AppError> {
    let controller = EnquiryTransportLinkController::new(state.pool.clone());
    let response = controller.link(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn delete_link(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(link_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EnquiryTransportLinkController::new(state.pool.clone());
    controller.delete(link_id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Link removed successfully")))
}
