use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_required_text;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleTypeRequest {
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub name: String,
    #[validate(length(max = 512))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleTypeRequest {
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub description: Option<String>,
}
