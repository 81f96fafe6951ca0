//! Modelo de TransportBrokerRateEnquiry
//!
//! Petición de tarifas a brokers para una ruta y una carga concretas.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ParseEnumError;

/// Estado de la transport enquiry - mapea al ENUM transport_rate_enquiry_status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "transport_rate_enquiry_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransportEnquiryStatus {
    #[default]
    Open,
    Bidding,
    Quoted,
    Closed,
}

impl TransportEnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportEnquiryStatus::Open => "open",
            TransportEnquiryStatus::Bidding => "bidding",
            TransportEnquiryStatus::Quoted => "quoted",
            TransportEnquiryStatus::Closed => "closed",
        }
    }

    /// Cerrada = ya hay una puja adjudicada
    pub fn is_closed(self) -> bool {
        self == TransportEnquiryStatus::Closed
    }

    pub fn accepts_bids(self) -> bool {
        !self.is_closed()
    }

    /// Cambio manual vía update: `closed` sólo se alcanza (y se abandona)
    /// adjudicando una puja
    pub fn can_set_manually(self, next: TransportEnquiryStatus) -> bool {
        self == next || !(self.is_closed() || next.is_closed())
    }

    /// Estado tras registrar una puja
    pub fn after_bid(self) -> TransportEnquiryStatus {
        match self {
            TransportEnquiryStatus::Open => TransportEnquiryStatus::Bidding,
            other => other,
        }
    }
}

impl fmt::Display for TransportEnquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportEnquiryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(TransportEnquiryStatus::Open),
            "bidding" => Ok(TransportEnquiryStatus::Bidding),
            "quoted" => Ok(TransportEnquiryStatus::Quoted),
            "closed" => Ok(TransportEnquiryStatus::Closed),
            _ => Err(ParseEnumError {
                kind: "transport enquiry status",
                value: s.to_string(),
                expected: "open, bidding, quoted, closed",
            }),
        }
    }
}

/// Transport enquiry - mapea a la tabla transport_broker_rate_enquiries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportEnquiry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub route_id: Uuid,
    pub cargo_type: String,
    pub cargo_weight: Option<f64>,
    pub transport_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub status: TransportEnquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::TransportEnquiryStatus::*;

    #[test]
    fn test_first_bid_moves_open_to_bidding() {
        assert_eq!(Open.after_bid(), Bidding);
        assert_eq!(Bidding.after_bid(), Bidding);
        assert_eq!(Quoted.after_bid(), Quoted);
    }

    #[test]
    fn test_closed_only_through_award() {
        assert!(Open.can_set_manually(Quoted));
        assert!(Bidding.can_set_manually(Open));
        assert!(Closed.can_set_manually(Closed));
        assert!(!Bidding.can_set_manually(Closed));
        assert!(!Closed.can_set_manually(Open));
    }

    #[test]
    fn test_closed_rejects_bids() {
        assert!(!Closed.accepts_bids());
        assert!(Open.accepts_bids());
        assert!(Quoted.accepts_bids());
    }
}
