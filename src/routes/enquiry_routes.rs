use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::customer_order_controller::CustomerOrderController;
use crate::controllers::enquiry_controller::EnquiryController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::customer_order_dto::{CreateCustomerOrderRequest, PromotionResponse};
use crate::dto::enquiry_dto::{
    CreateEnquiryRequest, EnquiryDetailResponse, EnquiryFilter, EnquiryListItem, PromoteEnquiryRequest,
    UpdateEnquiryRequest,
};
use crate::middleware::AuthenticatedUser;
use crate::models::enquiry::Enquiry;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_enquiry_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enquiries).post(create_enquiry))
        .route("/:id", get(get_enquiry).put(update_enquiry).delete(delete_enquiry))
        .route("/:id/promote", post(promote_enquiry))
}

async fn create_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateEnquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Enquiry>>), AppError> {
    let controller = EnquiryController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_enquiries(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<EnquiryFilter>,
) -> Result<Json<ApiResponse<Paginated<EnquiryListItem>>>, AppError> {
    let controller = EnquiryController::new(state.pool.clone());
    let enquiries = controller.list(user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(enquiries)))
}

async fn get_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EnquiryDetailResponse>>, AppError> {
    let controller = EnquiryController::new(state.pool.clone());
    let enquiry = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(enquiry)))
}

async fn update_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEnquiryRequest>,
) -> Result<Json<ApiResponse<Enquiry>>, AppError> {
    let controller = EnquiryController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EnquiryController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Enquiry deleted successfully")))
}

/// Promueve la enquiry a customer order usando su quote aceptada
async fn promote_enquiry(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PromoteEnquiryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PromotionResponse>>), AppError> {
    let controller = CustomerOrderController::new(state.pool.clone());
    let request = CreateCustomerOrderRequest {
        enquiry_id: id,
        quote_id: request.quote_id,
        notes: request.notes,
    };
    let response = controller.promote(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
