//! Modelo de VehicleType
//!
//! Catálogo de tipos de camión del usuario (p. ej. "32 ft MXL", "Trailer 40 ft").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de vehículo - mapea a la tabla vehicle_types
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleType {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
