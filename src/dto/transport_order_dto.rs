use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::transport_order::TransportOrder;
use crate::utils::validation::validate_positive_amount;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransportOrderRequest {
    pub enquiry_id: Uuid,
    pub broker_id: Uuid,
    pub route_id: Uuid,
    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
}

/// Pedido a partir de una puja: broker, ruta e importe salen de la puja
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransportOrderFromBidRequest {
    pub enquiry_id: Uuid,
    pub bid_id: Uuid,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportOrderFilter {
    pub enquiry_id: Option<Uuid>,
    pub broker_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransportOrderListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: TransportOrder,
    pub route_name: String,
    pub broker_company_name: Option<String>,
    pub broker_person_name: Option<String>,
}

/// Opción de broker para el selector del formulario de pedidos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BrokerOption {
    pub id: Uuid,
    pub company_name: Option<String>,
    pub person_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RouteOption {
    pub id: Uuid,
    pub name: String,
}
