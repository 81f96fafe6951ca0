//! Modelo de Enquiry
//!
//! Petición de transporte de un cliente. El estado sólo pasa a `accepted`
//! al promoverse a pedido de cliente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::lead::LeadSource;
use super::ParseEnumError;

/// Estado de la enquiry - mapea al ENUM enquiry_status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "enquiry_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl EnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::Accepted => "accepted",
            EnquiryStatus::Rejected => "rejected",
        }
    }

    /// Transiciones permitidas al editar una enquiry. `accepted` sólo se
    /// alcanza promoviendo y sólo se abandona borrando el pedido de cliente.
    pub fn can_transition_to(self, next: EnquiryStatus) -> bool {
        use EnquiryStatus::*;
        match (self, next) {
            (current, next) if current == next => true,
            (Pending, Rejected) | (Rejected, Pending) => true,
            _ => false,
        }
    }
}

impl fmt::Display for EnquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnquiryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(EnquiryStatus::Pending),
            "accepted" => Ok(EnquiryStatus::Accepted),
            "rejected" => Ok(EnquiryStatus::Rejected),
            _ => Err(ParseEnumError {
                kind: "enquiry status",
                value: s.to_string(),
                expected: "pending, accepted, rejected",
            }),
        }
    }
}

/// Enquiry principal - mapea a la tabla enquiries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enquiry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lead_id: Uuid,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub cargo_type: Option<String>,
    pub cargo_weight: Option<f64>, // Toneladas métricas (MT)
    pub remarks: Option<String>,
    pub source: LeadSource,
    pub referrer: Option<String>,
    pub status: EnquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use EnquiryStatus::*;

    #[test]
    fn test_manual_transitions() {
        assert!(Pending.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Pending));
        assert!(Accepted.can_transition_to(Accepted));
    }

    #[test]
    fn test_accepted_is_reserved_for_promotion() {
        assert!(!Pending.can_transition_to(Accepted));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Rejected));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("ACCEPTED".parse::<EnquiryStatus>().unwrap(), Accepted);
        assert!("open".parse::<EnquiryStatus>().is_err());
    }
}
