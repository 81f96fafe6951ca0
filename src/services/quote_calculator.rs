//! Cálculo del importe de un quote
//!
//! Un quote calculado es `base + base * margin / 100` redondeado a 2
//! decimales (mitad alejándose de cero). Un quote con importe propio ignora
//! base y margen, que se guardan como NULL.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{max_amount, validate_positive_amount, validate_range};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Forma de fijar el precio de un quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QuotePricing {
    /// Base + margen. Sin `base_amount` la base es la suma de los pedidos
    /// de transporte de la enquiry.
    Calculated {
        margin_percentage: Decimal,
        #[serde(default)]
        base_amount: Option<Decimal>,
    },
    Custom { amount: Decimal },
}

impl QuotePricing {
    /// Indica si hay que derivar la base de los pedidos de transporte
    pub fn needs_derived_base(&self) -> bool {
        matches!(self, QuotePricing::Calculated { base_amount: None, .. })
    }
}

/// Importes que se persisten en la fila del quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuoteAmounts {
    pub quotation_amount: Decimal,
    pub margin_percentage: Option<Decimal>,
    pub base_amount: Option<Decimal>,
    pub is_custom_amount: bool,
}

/// Redondeo a precisión de moneda
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `base + base * margin / 100`, redondeado
pub fn quotation_amount(base_amount: Decimal, margin_percentage: Decimal) -> Decimal {
    round_currency(base_amount + base_amount * margin_percentage / HUNDRED)
}

pub fn validate_margin(margin_percentage: Decimal) -> AppResult<()> {
    validate_range(margin_percentage, Decimal::ZERO, HUNDRED)
        .map_err(|_| validation_error("margin_percentage", "margin_percentage must be between 0 and 100"))
}

/// Valida la forma del precio sin tocar la base de datos. Los importes se
/// comprueban ya redondeados: 0.004 se guardaría como 0.00.
pub fn validate_pricing(pricing: &QuotePricing) -> AppResult<()> {
    match *pricing {
        QuotePricing::Calculated { margin_percentage, base_amount } => {
            validate_margin(margin_percentage)?;
            if let Some(base) = base_amount {
                validate_positive_amount(&base).map_err(|_| {
                    validation_error("base_amount", "base_amount must be positive and at most 999999999999.99")
                })?;
            }
            Ok(())
        }
        QuotePricing::Custom { amount } => validate_positive_amount(&amount)
            .map_err(|_| validation_error("amount", "custom amount must be positive and at most 999999999999.99")),
    }
}

/// Resuelve los importes. `derived_base` es la suma de los pedidos de
/// transporte y sólo se usa cuando el quote calculado no trae base.
pub fn resolve_amounts(pricing: &QuotePricing, derived_base: Option<Decimal>) -> AppResult<QuoteAmounts> {
    validate_pricing(pricing)?;

    match *pricing {
        QuotePricing::Custom { amount } => Ok(QuoteAmounts {
            quotation_amount: round_currency(amount),
            margin_percentage: None,
            base_amount: None,
            is_custom_amount: true,
        }),
        QuotePricing::Calculated { margin_percentage, base_amount } => {
            let base = match base_amount.or(derived_base).map(round_currency) {
                Some(base) if base > Decimal::ZERO => base,
                _ => {
                    return Err(validation_error(
                        "base_amount",
                        "No transport orders found for this enquiry. Add transport orders or provide base_amount",
                    ))
                }
            };
            let amount = quotation_amount(base, margin_percentage);
            if amount > max_amount() {
                return Err(validation_error(
                    "quotation_amount",
                    "quotation amount exceeds 999999999999.99",
                ));
            }
            Ok(QuoteAmounts {
                quotation_amount: amount,
                margin_percentage: Some(margin_percentage),
                base_amount: Some(base),
                is_custom_amount: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_calculated_quote() {
        assert_eq!(quotation_amount(dec("10000"), dec("15")), dec("11500"));
        assert_eq!(quotation_amount(dec("0"), dec("50")), dec("0"));
        assert_eq!(quotation_amount(dec("1234.56"), dec("0")), dec("1234.56"));
        assert_eq!(quotation_amount(dec("100"), dec("100")), dec("200"));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // 333.33 * 1.125 = 374.99625
        assert_eq!(quotation_amount(dec("333.33"), dec("12.5")), dec("375.00"));
        // 10.01 * 1.05 = 10.5105
        assert_eq!(quotation_amount(dec("10.01"), dec("5")), dec("10.51"));
        assert_eq!(round_currency(dec("2.005")), dec("2.01"));
        assert_eq!(round_currency(dec("-2.005")), dec("-2.01"));
    }

    #[test]
    fn test_custom_ignores_margin_and_base() {
        let amounts = resolve_amounts(&QuotePricing::Custom { amount: dec("9999.5") }, Some(dec("100"))).unwrap();
        assert_eq!(amounts.quotation_amount, dec("9999.5"));
        assert!(amounts.is_custom_amount);
        assert_eq!(amounts.margin_percentage, None);
        assert_eq!(amounts.base_amount, None);
    }

    #[test]
    fn test_derived_base_is_used_when_missing() {
        let pricing = QuotePricing::Calculated { margin_percentage: dec("15"), base_amount: None };
        assert!(pricing.needs_derived_base());

        let amounts = resolve_amounts(&pricing, Some(dec("10000"))).unwrap();
        assert_eq!(amounts.quotation_amount, dec("11500"));
        assert_eq!(amounts.base_amount, Some(dec("10000")));
        assert_eq!(amounts.margin_percentage, Some(dec("15")));
        assert!(!amounts.is_custom_amount);
    }

    #[test]
    fn test_explicit_base_wins_over_derived() {
        let pricing = QuotePricing::Calculated { margin_percentage: dec("10"), base_amount: Some(dec("500")) };
        let amounts = resolve_amounts(&pricing, Some(dec("10000"))).unwrap();
        assert_eq!(amounts.quotation_amount, dec("550"));
    }

    #[test]
    fn test_missing_base_is_a_validation_error() {
        let pricing = QuotePricing::Calculated { margin_percentage: dec("10"), base_amount: None };
        assert!(matches!(resolve_amounts(&pricing, None), Err(AppError::Validation(_))));
        assert!(matches!(resolve_amounts(&pricing, Some(Decimal::ZERO)), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_invalid_inputs() {
        let out_of_range = QuotePricing::Calculated { margin_percentage: dec("100.01"), base_amount: Some(dec("1")) };
        assert!(validate_pricing(&out_of_range).is_err());

        let negative = QuotePricing::Calculated { margin_percentage: dec("-1"), base_amount: Some(dec("1")) };
        assert!(validate_pricing(&negative).is_err());

        assert!(validate_pricing(&QuotePricing::Custom { amount: Decimal::ZERO }).is_err());
    }

    #[test]
    fn test_amounts_that_round_to_zero_are_rejected() {
        let custom = QuotePricing::Custom { amount: dec("0.004") };
        assert!(matches!(resolve_amounts(&custom, None), Err(AppError::Validation(_))));

        let calculated = QuotePricing::Calculated { margin_percentage: Decimal::ZERO, base_amount: Some(dec("0.004")) };
        assert!(matches!(resolve_amounts(&calculated, None), Err(AppError::Validation(_))));

        // Una base derivada casi nula tampoco sirve
        let derived = QuotePricing::Calculated { margin_percentage: dec("10"), base_amount: None };
        assert!(matches!(resolve_amounts(&derived, Some(dec("0.001"))), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_amounts_beyond_column_range_are_rejected() {
        let custom = QuotePricing::Custom { amount: dec("1000000000000") };
        assert!(validate_pricing(&custom).is_err());

        // La base cabe pero base + margen no
        let calculated = QuotePricing::Calculated {
            margin_percentage: dec("100"),
            base_amount: Some(dec("600000000000")),
        };
        assert!(validate_pricing(&calculated).is_ok());
        assert!(matches!(resolve_amounts(&calculated, None), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_pricing_wire_format() {
        let pricing: QuotePricing =
            serde_json::from_str(r#"{"mode":"calculated","margin_percentage":"15"}"#).unwrap();
        assert_eq!(pricing, QuotePricing::Calculated { margin_percentage: dec("15"), base_amount: None });

        let pricing: QuotePricing = serde_json::from_str(r#"{"mode":"custom","amount":"2500.75"}"#).unwrap();
        assert_eq!(pricing, QuotePricing::Custom { amount: dec("2500.75") });

        assert!(serde_json::from_str::<QuotePricing>(r#"{"mode":"discount","amount":"1"}"#).is_err());
    }
}
