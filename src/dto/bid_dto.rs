use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bid::{Bid, BidWithBroker};
use crate::services::bid_ranking::broker_display_name;
use crate::utils::validation::validate_positive_amount;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBidRequest {
    pub transport_enquiry_id: Uuid,
    pub broker_id: Uuid,
    #[validate(custom = "validate_positive_amount")]
    pub rate: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBidRequest {
    #[validate(custom = "validate_positive_amount")]
    pub rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidFilter {
    pub transport_enquiry_id: Option<Uuid>,
    pub broker_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BidResponse {
    #[serde(flatten)]
    pub bid: Bid,
    pub broker_name: String,
}

impl From<BidWithBroker> for BidResponse {
    fn from(row: BidWithBroker) -> Self {
        let broker_name = broker_display_name(
            row.bid.broker_id,
            row.broker_company_name.as_deref(),
            row.broker_person_name.as_deref(),
        );
        Self {
            bid: row.bid,
            broker_name,
        }
    }
}
