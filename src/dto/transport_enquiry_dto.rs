use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::transport_enquiry::{TransportEnquiry, TransportEnquiryStatus};
use crate::services::bid_ranking::{RankedBid, RankingSummary};
use crate::utils::validation::validate_required_text;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransportEnquiryRequest {
    pub route_id: Uuid,
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub cargo_type: String,
    #[validate(range(min = 0.0))]
    pub cargo_weight: Option<f64>,
    pub transport_date: Option<NaiveDate>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTransportEnquiryRequest {
    pub route_id: Option<Uuid>,
    #[validate(length(max = 256), custom = "validate_required_text")]
    pub cargo_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub cargo_weight: Option<f64>,
    pub transport_date: Option<NaiveDate>,
    #[validate(length(max = 1024))]
    pub remarks: Option<String>,
    pub status: Option<TransportEnquiryStatus>,
}

/// Filtros propios del listado de transport enquiries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportEnquiryFilter {
    pub route_id: Option<Uuid>,
    pub cargo_type: Option<String>,
}

/// Búsqueda por nombre de ruta (`/search/by-route?route=...`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RouteSearchQuery {
    #[validate(length(min = 1, max = 256))]
    pub route: String,
}

/// Fila de transport enquiry con el nombre de la ruta
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransportEnquiryRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub enquiry: TransportEnquiry,
    pub route_name: String,
}

/// Read model: transport enquiry con ruta y L1/L2 recalculados
#[derive(Debug, Clone, Serialize)]
pub struct TransportEnquiryResponse {
    #[serde(flatten)]
    pub enquiry: TransportEnquiry,
    pub route_name: String,
    #[serde(flatten)]
    pub ranking: RankingSummary,
}

impl TransportEnquiryResponse {
    pub fn new(row: TransportEnquiryRow, ranking: RankingSummary) -> Self {
        Self {
            enquiry: row.enquiry,
            route_name: row.route_name,
            ranking,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportEnquiryRankingResponse {
    pub transport_enquiry_id: Uuid,
    pub bids: Vec<RankedBid>,
    #[serde(flatten)]
    pub summary: RankingSummary,
}
