use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::customer_order::CustomerOrder;
use crate::models::enquiry::{Enquiry, EnquiryStatus};
use crate::models::lead::LeadSource;
use crate::models::quote::Quote;
use crate::models::transport_order::TransportOrder;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEnquiryRequest {
    pub lead_id: Uuid,
    #[validate(length(max = 256))]
    pub from_location: Option<String>,
    #[validate(length(max = 256))]
    pub to_location: Option<String>,
    #[validate(length(max = 256))]
    pub cargo_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub cargo_weight: Option<f64>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
    pub source: Option<LeadSource>,
    #[validate(length(max = 256))]
    pub referrer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEnquiryRequest {
    #[validate(length(max = 256))]
    pub from_location: Option<String>,
    #[validate(length(max = 256))]
    pub to_location: Option<String>,
    #[validate(length(max = 256))]
    pub cargo_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub cargo_weight: Option<f64>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
    pub source: Option<LeadSource>,
    #[validate(length(max = 256))]
    pub referrer: Option<String>,
    pub status: Option<EnquiryStatus>,
}

/// Filtros propios del listado de enquiries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryFilter {
    pub lead_id: Option<Uuid>,
}

/// Promoción a pedido de cliente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PromoteEnquiryRequest {
    pub quote_id: Option<Uuid>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

/// Fila de listado: enquiry con el nombre de su lead
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnquiryListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub enquiry: Enquiry,
    pub lead_name: String,
}

/// Detalle con todo lo que cuelga de la enquiry
#[derive(Debug, Clone, Serialize)]
pub struct EnquiryDetailResponse {
    #[serde(flatten)]
    pub enquiry: Enquiry,
    pub lead_name: String,
    pub quotes: Vec<Quote>,
    pub customer_order: Option<CustomerOrder>,
    pub transport_orders: Vec<TransportOrder>,
}
