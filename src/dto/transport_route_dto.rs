use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::transport_route::{StopType, TransportRoute, TransportRouteLocation};
use crate::utils::validation::validate_required_text;

/// Parada en el orden en que se recorre
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RouteLocationInput {
    #[serde(default)]
    pub stop_type: StopType,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransportRouteRequest {
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub name: String,
    #[validate(custom = "validate_locations")]
    #[serde(default)]
    pub locations: Vec<RouteLocationInput>,
}

// Con `locations` presente se reemplazan todas las paradas
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTransportRouteRequest {
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub name: Option<String>,
    #[validate(custom = "validate_locations")]
    pub locations: Option<Vec<RouteLocationInput>>,
}

fn validate_locations(locations: &[RouteLocationInput]) -> Result<(), ValidationError> {
    if locations.len() > 50 {
        return Err(ValidationError::new("too_many_locations"));
    }
    for location in locations {
        if location.validate().is_err() {
            return Err(ValidationError::new("invalid_location"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportRouteResponse {
    #[serde(flatten)]
    pub route: TransportRoute,
    pub locations: Vec<TransportRouteLocation>,
}
