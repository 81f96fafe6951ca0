use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::customer_order::{CustomerOrder, CustomerOrderStatus};
use crate::models::enquiry::Enquiry;
use crate::models::quote::Quote;

// POST /customer-orders: promoción explícita de una enquiry
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerOrderRequest {
    pub enquiry_id: Uuid,
    pub quote_id: Option<Uuid>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerOrderRequest {
    pub status: Option<CustomerOrderStatus>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

/// Fila de listado con los datos de la enquiry y el importe del quote
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerOrderListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: CustomerOrder,
    pub lead_name: String,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub quotation_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerOrderDetailResponse {
    #[serde(flatten)]
    pub order: CustomerOrder,
    pub enquiry: Enquiry,
    pub quote: Quote,
}

/// Resultado de promover una enquiry
#[derive(Debug, Clone, Serialize)]
pub struct PromotionResponse {
    pub customer_order: CustomerOrder,
    pub enquiry: Enquiry,
}
