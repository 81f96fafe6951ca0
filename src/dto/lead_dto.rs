use serde::Deserialize;
use validator::Validate;

use crate::models::lead::LeadSource;
use crate::utils::validation::{validate_phone, validate_required_text};

// Request para dar de alta un lead
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(custom = "validate_phone")]
    pub alternate_phone: Option<String>,
    #[serde(default)]
    pub source: LeadSource,
    #[validate(length(max = 128))]
    pub referrer: Option<String>,
}

// Request de actualización parcial: los campos ausentes se conservan
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLeadRequest {
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub name: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(custom = "validate_phone")]
    pub alternate_phone: Option<String>,
    pub source: Option<LeadSource>,
    #[validate(length(max = 128))]
    pub referrer: Option<String>,
}

/// Filtros propios del listado de leads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    pub source: Option<LeadSource>,
}
