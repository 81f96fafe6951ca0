//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Teléfono: dígitos con separadores opcionales y prefijo internacional opcional
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").unwrap();
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono: entre 8 y 15 dígitos
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_REGEX.is_match(value.trim()) || !(8..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + Serialize>(value: T, min: T, max: T) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + num_traits::Zero + Serialize>(value: T) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Mayor importe que cabe en una columna NUMERIC(14, 2)
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Validador para `#[validate(custom = ...)]` sobre importes. Se valida el
/// valor ya redondeado a 2 decimales, que es el que guarda la columna.
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    validate_positive(rounded)?;
    validate_range(rounded, Decimal::ZERO, max_amount())
}

/// Validador para `#[validate(custom = ...)]` sobre textos obligatorios
pub fn validate_required_text(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)
}

/// Recorta un texto opcional; vacío equivale a ausente
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Actualización parcial de un texto opcional: ausente conserva, vacío borra
pub fn merge_text(update: Option<String>, current: Option<String>) -> Option<String> {
    match update {
        None => current,
        Some(value) => normalize_text(Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_validate_date() {
        assert_eq!(
            validate_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(validate_date("2024/01/15").is_err());
        assert!(validate_date("2024-02-30").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Mumbai").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("022-2345-6789").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("98765abc10").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(dec("15"), Decimal::ZERO, dec("100")).is_ok());
        assert!(validate_range(dec("100"), Decimal::ZERO, dec("100")).is_ok());
        assert!(validate_range(dec("-0.01"), Decimal::ZERO, dec("100")).is_err());
        assert!(validate_range(dec("100.5"), Decimal::ZERO, dec("100")).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
        assert!(validate_positive_amount(&dec("0.01")).is_ok());
        assert!(validate_positive_amount(&Decimal::ZERO).is_err());
    }

    #[test]
    fn test_amount_is_checked_after_rounding() {
        assert!(validate_positive_amount(&dec("0.004")).is_err());
        assert!(validate_positive_amount(&dec("0.005")).is_ok());
        assert!(validate_positive_amount(&dec("999999999999.99")).is_ok());
        assert!(validate_positive_amount(&dec("1000000000000")).is_err());
        assert!(validate_positive_amount(&dec("999999999999.995")).is_err());
    }

    #[test]
    fn test_text_normalization() {
        assert_eq!(normalize_text(Some("  Nagpur ".into())).as_deref(), Some("Nagpur"));
        assert_eq!(normalize_text(Some("   ".into())), None);
        assert_eq!(merge_text(None, Some("old".into())).as_deref(), Some("old"));
        assert_eq!(merge_text(Some("".into()), Some("old".into())), None);
        assert_eq!(merge_text(Some("new".into()), Some("old".into())).as_deref(), Some("new"));
    }
}
