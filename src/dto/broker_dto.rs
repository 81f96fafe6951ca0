use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::broker::{Broker, BrokerRegion, BrokerVehicleType};
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BrokerRegionInput {
    #[validate(length(max = 128))]
    pub region: Option<String>,
    #[validate(length(max = 128))]
    pub state: Option<String>,
    #[validate(length(max = 128))]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateBrokerRequest {
    #[validate(length(max = 256))]
    pub company_name: Option<String>,
    #[validate(length(max = 256))]
    pub person_name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(custom = "validate_phone")]
    pub alternate_phone: Option<String>,
    #[validate(length(max = 1024))]
    pub city: Option<String>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
    #[validate(length(max = 128))]
    pub referrer: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_regions")]
    pub regions: Vec<BrokerRegionInput>,
    #[serde(default)]
    #[validate(custom = "validate_vehicle_types")]
    pub vehicle_types: Vec<String>,
}

impl CreateBrokerRequest {
    /// Un broker necesita al menos nombre de empresa o de persona
    pub fn has_name(&self) -> bool {
        [&self.company_name, &self.person_name]
            .iter()
            .any(|name| name.as_deref().map(str::trim).is_some_and(|n| !n.is_empty()))
    }
}

// Con `regions` o `vehicle_types` presentes se reemplaza la lista completa
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrokerRequest {
    #[validate(length(max = 256))]
    pub company_name: Option<String>,
    #[validate(length(max = 256))]
    pub person_name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(custom = "validate_phone")]
    pub alternate_phone: Option<String>,
    #[validate(length(max = 1024))]
    pub city: Option<String>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
    #[validate(length(max = 128))]
    pub referrer: Option<String>,
    #[validate(custom = "validate_regions")]
    pub regions: Option<Vec<BrokerRegionInput>>,
    #[validate(custom = "validate_vehicle_types")]
    pub vehicle_types: Option<Vec<String>>,
}

fn validate_regions(regions: &[BrokerRegionInput]) -> Result<(), ValidationError> {
    if regions.iter().any(|region| region.validate().is_err()) {
        return Err(ValidationError::new("invalid_region"));
    }
    Ok(())
}

fn validate_vehicle_types(vehicle_types: &[String]) -> Result<(), ValidationError> {
    if vehicle_types
        .iter()
        .any(|vehicle| vehicle.trim().is_empty() || vehicle.len() > 256)
    {
        return Err(ValidationError::new("invalid_vehicle_type"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct BrokerResponse {
    #[serde(flatten)]
    pub broker: Broker,
    pub display_name: String,
    pub regions: Vec<BrokerRegion>,
    pub vehicle_types: Vec<BrokerVehicleType>,
}

impl BrokerResponse {
    pub fn new(broker: Broker, regions: Vec<BrokerRegion>, vehicle_types: Vec<BrokerVehicleType>) -> Self {
        Self {
            display_name: broker.display_name(),
            broker,
            regions,
            vehicle_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_needs_a_name() {
        let request = CreateBrokerRequest::default();
        assert!(!request.has_name());

        let request = CreateBrokerRequest {
            person_name: Some("Ravi Kumar".into()),
            ..Default::default()
        };
        assert!(request.has_name());

        let request = CreateBrokerRequest {
            company_name: Some("   ".into()),
            ..Default::default()
        };
        assert!(!request.has_name());
    }

    #[test]
    fn test_vehicle_types_must_not_be_blank() {
        let request = CreateBrokerRequest {
            company_name: Some("Patel Transport".into()),
            vehicle_types: vec!["32ft MXL".into(), " ".into()],
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_phone_is_checked() {
        let request = CreateBrokerRequest {
            company_name: Some("Patel Transport".into()),
            phone: Some("abc".into()),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = CreateBrokerRequest {
            company_name: Some("Patel Transport".into()),
            phone: Some("+91 98765 43210".into()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
