//! Back-office de intermediación logística
//!
//! Leads, enquiries, quotes y customer orders del lado cliente; rutas,
//! transport enquiries, pujas de brokers y transport orders del lado
//! transporte. API REST sobre axum y PostgreSQL.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
