use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::quote_controller::QuoteController;
use crate::dto::common_dto::{ApiResponse, ListQuery, Paginated};
use crate::dto::quote_dto::{BaseAmountResponse, CreateQuoteRequest, QuoteFilter, UpdateQuoteRequest};
use crate::middleware::AuthenticatedUser;
use crate::models::quote::Quote;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_quote_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes).post(create_quote))
        .route("/base-amount/:enquiry_id", get(get_base_amount))
        .route("/:id", get(get_quote).put(update_quote).delete(delete_quote))
}

async fn create_quote(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Quote>>), AppError> {
    let controller = QuoteController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_quotes(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<QuoteFilter>,
) -> Result<Json<ApiResponse<Paginated<Quote>>>, AppError> {
    let controller = QuoteController::new(state.pool.clone());
    let quotes = controller.list(user.user_id, query, filter).await?;
    Ok(Json(ApiResponse::success(quotes)))
}

/// Suma de los transport orders de la enquiry, base de las quotes calculadas
async fn get_base_amount(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
) -> Result<Json<ApiResponse<BaseAmountResponse>>, AppError> {
    let controller = QuoteController::new(state.pool.clone());
    let base = controller.base_amount(enquiry_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(base)))
}

async fn get_quote(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Quote>>, AppError> {
    let controller = QuoteController::new(state.pool.clone());
    let quote = controller.get_by_id(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(quote)))
}

async fn update_quote(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateQuoteRequest>,
) -> Result<Json<ApiResponse<Quote>>, AppError> {
    let controller = QuoteController::new(state.pool.clone());
    let response = controller.update(id, user.user_id, request).await?;
    Ok(Json(response))
}

async fn delete_quote(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = QuoteController::new(state.pool.clone());
    controller.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("Quote deleted successfully")))
}
