//! Modelo de TransportRoute
//!
//! Ruta con nombre y paradas ordenadas de carga/descarga.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ParseEnumError;

/// Tipo de parada - mapea al ENUM transport_route_location_type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "transport_route_location_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StopType {
    Load,
    Unload,
    #[default]
    Unknown,
}

impl StopType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopType::Load => "load",
            StopType::Unload => "unload",
            StopType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "load" => Ok(StopType::Load),
            "unload" => Ok(StopType::Unload),
            "unknown" => Ok(StopType::Unknown),
            _ => Err(ParseEnumError {
                kind: "stop type",
                value: s.to_string(),
                expected: "load, unload, unknown",
            }),
        }
    }
}

/// Ruta - mapea a la tabla transport_routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportRoute {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parada de una ruta - mapea a transport_route_locations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportRouteLocation {
    pub id: Uuid,
    pub route_id: Uuid,
    pub position: i32,
    pub stop_type: StopType,
    pub remarks: Option<String>, // Nombre del lugar
}
