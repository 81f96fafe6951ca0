use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::quote::QuoteStatus;
use crate::services::quote_calculator::QuotePricing;

// Request para crear un quote: `pricing` decide si es calculado o con importe propio
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    pub enquiry_id: Uuid,
    #[validate(length(max = 128))]
    pub costing: Option<String>,
    pub pricing: QuotePricing,
    pub status: Option<QuoteStatus>,
}

// Actualización: sin `pricing` se recalcula con la fórmula actual del quote
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
    #[validate(length(max = 128))]
    pub costing: Option<String>,
    pub pricing: Option<QuotePricing>,
    pub status: Option<QuoteStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteFilter {
    pub enquiry_id: Option<Uuid>,
}

/// Base derivada de los pedidos de transporte de una enquiry
#[derive(Debug, Clone, Serialize)]
pub struct BaseAmountResponse {
    pub enquiry_id: Uuid,
    pub base_amount: Decimal,
    pub transport_order_count: i64,
}
