//! Modelo de TransportOrder
//!
//! Pedido a un broker para mover la carga de una enquiry de cliente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pedido de transporte - mapea a la tabla transport_orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enquiry_id: Uuid,
    pub broker_id: Uuid,
    pub route_id: Uuid,
    pub transport_enquiry_id: Option<Uuid>,
    pub bid_id: Option<Uuid>,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
