use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::enquiry_transport_link::EnquiryTransportLink;
use crate::models::transport_enquiry::TransportEnquiry;
use crate::services::bid_ranking::RankingSummary;
use crate::utils::validation::validate_required_text;

/// Enlaza una transport enquiry existente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LinkTransportEnquiryRequest {
    pub enquiry_id: Uuid,
    pub transport_enquiry_id: Uuid,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

/// Crea una transport enquiry nueva y la enlaza en la misma transacción
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLinkedTransportEnquiryRequest {
    pub enquiry_id: Uuid,
    pub route_id: Uuid,
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub cargo_type: String,
    #[validate(range(min = 0.0))]
    pub cargo_weight: Option<f64>,
    pub transport_date: Option<NaiveDate>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

/// Fila de transport enquiry enlazada
#[derive(Debug, Clone, FromRow)]
pub struct LinkedTransportEnquiryRow {
    pub link_id: Uuid,
    pub link_notes: Option<String>,
    pub linked_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub transport_enquiry: TransportEnquiry,
    pub route_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkedTransportEnquiry {
    pub link_id: Uuid,
    pub notes: Option<String>,
    pub linked_at: DateTime<Utc>,
    pub transport_enquiry: TransportEnquiry,
    pub route_name: String,
    #[serde(flatten)]
    pub ranking: RankingSummary,
}

impl LinkedTransportEnquiry {
    pub fn new(row: LinkedTransportEnquiryRow, ranking: RankingSummary) -> Self {
        Self {
            link_id: row.link_id,
            notes: row.link_notes,
            linked_at: row.linked_at,
            transport_enquiry: row.transport_enquiry,
            route_name: row.route_name,
            ranking,
        }
    }
}

/// Respuesta de creación: el link y, si se creó, la transport enquiry nueva
#[derive(Debug, Clone, Serialize)]
pub struct LinkCreatedResponse {
    pub link: EnquiryTransportLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_enquiry: Option<TransportEnquiry>,
}
