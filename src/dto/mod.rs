//! Data Transfer Objects
//!
//! Cuerpos de petición validados con `validator` y read models de respuesta.

pub mod bid_dto;
pub mod broker_dto;
pub mod common_dto;
pub mod customer_order_dto;
pub mod dashboard_dto;
pub mod enquiry_dto;
pub mod enquiry_transport_link_dto;
pub mod lead_dto;
pub mod quote_dto;
pub mod transport_enquiry_dto;
pub mod transport_order_dto;
pub mod transport_route_dto;
pub mod vehicle_type_dto;

pub use common_dto::{ApiResponse, ListParams, ListQuery, PageRequest, Paginated, Pagination};
