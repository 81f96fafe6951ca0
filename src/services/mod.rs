//! Services module
//!
//! Reglas de negocio puras: cálculo de cotizaciones, ranking de pujas y
//! promoción de enquiries a pedidos. No acceden a la base de datos.

pub mod bid_ranking;
pub mod order_promotion;
pub mod quote_calculator;
