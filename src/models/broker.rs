//! Modelo de Broker
//!
//! Broker de camiones con sus regiones de servicio y tipos de vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Broker - mapea a la tabla brokers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Broker {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: Option<String>,
    pub person_name: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub city: Option<String>,
    pub remarks: Option<String>,
    pub referrer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Broker {
    pub fn display_name(&self) -> String {
        crate::services::bid_ranking::broker_display_name(
            self.id,
            self.company_name.as_deref(),
            self.person_name.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BrokerRegion {
    pub id: Uuid,
    pub broker_id: Uuid,
    pub region: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BrokerVehicleType {
    pub id: Uuid,
    pub broker_id: Uuid,
    pub vehicle_type: String,
}
