use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::dashboard_dto::{ActivityItem, DashboardStats, RecentActivityQuery};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/recent-activity", get(get_recent_activity))
}

async fn get_stats(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let stats = controller.stats(user.user_id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn get_recent_activity(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<RecentActivityQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityItem>>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let activity = controller.recent_activity(user.user_id, query).await?;
    Ok(Json(ApiResponse::success(activity)))
}
