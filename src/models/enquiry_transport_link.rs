//! Modelo de EnquiryTransportLink
//!
//! Une una enquiry de cliente con una transport enquiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Link - mapea a la tabla enquiry_transport_links
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnquiryTransportLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enquiry_id: Uuid,
    pub transport_enquiry_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
