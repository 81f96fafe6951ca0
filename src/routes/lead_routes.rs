use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::lead_controller::LeadController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::lead_dto::{CreateLeadRequest, LeadFilter, UpdateLeadRequest};
use crate::middleware::AuthenticatedUser;
use crate::models::lead::Lead;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_lead_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        .route("/:id", get(get_lead).put(update_lead).delete(delete_lead))
}

async fn create_lead(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Lead>>), AppError> {
    let controller = LeadController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_leads(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<ApiResponse<Paginated<Lead>>>, AppError> {
    let controller = LeadController::new(state.pool.clone());
    let leads = controller.list(user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(leads)))
}

async fn get_lead(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let controller = LeadController::new(state.pool.clone());
    let lead = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(lead)))
}

async fn update_lead(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLeadRequest>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let controller = LeadController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_lead(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = LeadController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Lead deleted successfully")))
}
