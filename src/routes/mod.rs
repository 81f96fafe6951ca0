//! Rutas HTTP
//!
//! Un router por recurso; `create_app_router` los monta bajo `/api` detrás
//! de autenticación JWT y rate limiting.

pub mod bid_routes;
pub mod broker_routes;
pub mod customer_order_routes;
pub mod dashboard_routes;
pub mod enquiry_routes;
pub mod enquiry_transport_link_routes;
pub mod lead_routes;
pub mod quote_routes;
pub mod transport_enquiry_routes;
pub mod transport_order_routes;
pub mod transport_route_routes;
pub mod vehicle_type_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_middleware, cors_layer, rate_limit_middleware};
use crate::state::AppState;

pub fn create_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/leads", lead_routes::create_lead_router())
        .nest("/enquiries", enquiry_routes::create_enquiry_router())
        .nest("/quotes", quote_routes::create_quote_router())
        .nest("/customer-orders", customer_order_routes::create_customer_order_router())
        .nest("/transport-routes", transport_route_routes::create_transport_route_router())
        .nest(
            "/transport-broker-rate-enquiries",
            transport_enquiry_routes::create_transport_enquiry_router(),
        )
        .nest("/transport-rate-bids", bid_routes::create_bid_router())
        .nest("/transport-orders", transport_order_routes::create_transport_order_router())
        .nest("/brokers", broker_routes::create_broker_router())
        .nest("/vehicle-types", vehicle_type_routes::create_vehicle_type_router())
        .nest(
            "/enquiry-transport-links",
            enquiry_transport_link_routes::create_enquiry_transport_link_router(),
        )
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        // El último layer se ejecuta primero: rate limit antes que auth
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
}

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", create_api_router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "logistics-backoffice",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
