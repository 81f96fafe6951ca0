//! Modelo de Lead
//!
//! Contacto comercial del que nacen las enquiries de clientes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ParseEnumError;

/// Origen del lead - mapea al ENUM lead_source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "lead_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    IndiaMart,
    JustDial,
    Referral,
    #[default]
    Unknown,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::IndiaMart => "india_mart",
            LeadSource::JustDial => "just_dial",
            LeadSource::Referral => "referral",
            LeadSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "india_mart" => Ok(LeadSource::IndiaMart),
            "just_dial" => Ok(LeadSource::JustDial),
            "referral" => Ok(LeadSource::Referral),
            "unknown" => Ok(LeadSource::Unknown),
            _ => Err(ParseEnumError {
                kind: "lead source",
                value: s.to_string(),
                expected: "india_mart, just_dial, referral, unknown",
            }),
        }
    }
}

/// Lead principal - mapea a la tabla leads
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub source: LeadSource,
    pub referrer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        assert_eq!("india_mart".parse::<LeadSource>().unwrap(), LeadSource::IndiaMart);
        assert_eq!("Just_Dial".parse::<LeadSource>().unwrap(), LeadSource::JustDial);
        assert!("newspaper".parse::<LeadSource>().is_err());
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&LeadSource::IndiaMart).unwrap(), "\"india_mart\"");
        assert_eq!(LeadSource::default(), LeadSource::Unknown);
    }
}
