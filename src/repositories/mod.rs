//! Acceso a datos
//!
//! Un repositorio por tabla principal. Todas las consultas van acotadas al
//! `user_id` de la sesión. Las funciones asociadas que reciben
//! `&mut PgConnection` se usan dentro de transacciones.

pub mod bid_repository;
pub mod broker_repository;
pub mod customer_order_repository;
pub mod dashboard_repository;
pub mod enquiry_repository;
pub mod enquiry_transport_link_repository;
pub mod filters;
pub mod lead_repository;
pub mod quote_repository;
pub mod transport_enquiry_repository;
pub mod transport_order_repository;
pub mod transport_route_repository;
pub mod vehicle_type_repository;
