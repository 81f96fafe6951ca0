//! Modelo de CustomerOrder
//!
//! Pedido de cliente creado al promover una enquiry con un quote aceptado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ParseEnumError;

/// Estado del pedido - mapea al ENUM customer_order_status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "customer_order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerOrderStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl CustomerOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerOrderStatus::Active => "active",
            CustomerOrderStatus::Completed => "completed",
            CustomerOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, CustomerOrderStatus::Active)
    }

    /// active → completed | cancelled; los estados terminales son finales
    pub fn can_transition_to(self, next: CustomerOrderStatus) -> bool {
        self == next || (self == CustomerOrderStatus::Active && next.is_terminal())
    }
}

impl fmt::Display for CustomerOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerOrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(CustomerOrderStatus::Active),
            "completed" => Ok(CustomerOrderStatus::Completed),
            "cancelled" => Ok(CustomerOrderStatus::Cancelled),
            _ => Err(ParseEnumError {
                kind: "customer order status",
                value: s.to_string(),
                expected: "active, completed, cancelled",
            }),
        }
    }
}

/// CustomerOrder principal - mapea a la tabla customer_orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enquiry_id: Uuid,
    pub quote_id: Uuid,
    pub status: CustomerOrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::CustomerOrderStatus::*;

    #[test]
    fn test_active_can_finish_either_way() {
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Active));
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(!Completed.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Completed));
    }
}
