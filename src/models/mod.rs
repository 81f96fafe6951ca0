//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod bid;
pub mod broker;
pub mod customer_order;
pub mod enquiry;
pub mod enquiry_transport_link;
pub mod lead;
pub mod quote;
pub mod transport_enquiry;
pub mod transport_order;
pub mod transport_route;
pub mod vehicle_type;

/// Error al convertir texto en un estado o enum del dominio
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
