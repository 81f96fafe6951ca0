//! Modelo de Bid (puja de un broker)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Puja - mapea a la tabla transport_rate_bids
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transport_enquiry_id: Uuid,
    pub broker_id: Uuid,
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Puja con los datos del broker, lo que necesita el ranking L1/L2
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BidWithBroker {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub bid: Bid,
    pub broker_company_name: Option<String>,
    pub broker_person_name: Option<String>,
}
