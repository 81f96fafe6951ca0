//! Reglas de promoción de una enquiry a pedido de cliente
//!
//! Estas funciones no tocan la base de datos: el controller carga el estado,
//! pide aquí la decisión y aplica los efectos dentro de una transacción.

use uuid::Uuid;

use crate::models::customer_order::CustomerOrderStatus;
use crate::models::enquiry::{Enquiry, EnquiryStatus};
use crate::models::quote::{Quote, QuoteStatus};
use crate::utils::errors::{conflict_error, not_found_error, validation_error, AppResult};

/// Resultado de la planificación: qué quote respalda el nuevo pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPlan {
    pub enquiry_id: Uuid,
    pub quote_id: Uuid,
}

/// Decide si `enquiry` puede promoverse y con qué quote.
///
/// * la enquiry no puede estar `rejected` ni tener ya un pedido
/// * hace falta al menos un quote `accepted`
/// * con `requested_quote_id` el quote debe pertenecer a la enquiry y estar aceptado
/// * sin él, debe haber exactamente un quote aceptado
pub fn plan_promotion(
    enquiry: &Enquiry,
    quotes: &[Quote],
    has_existing_order: bool,
    requested_quote_id: Option<Uuid>,
) -> AppResult<PromotionPlan> {
    if has_existing_order {
        return Err(conflict_error(format!(
            "Enquiry {} already has a customer order",
            enquiry.id
        )));
    }

    if enquiry.status == EnquiryStatus::Rejected {
        return Err(conflict_error(format!(
            "Enquiry {} is rejected and cannot be promoted",
            enquiry.id
        )));
    }

    let accepted: Vec<&Quote> = quotes
        .iter()
        .filter(|quote| quote.enquiry_id == enquiry.id && quote.status == QuoteStatus::Accepted)
        .collect();

    let quote_id = match requested_quote_id {
        Some(quote_id) => {
            let quote = quotes
                .iter()
                .find(|quote| quote.id == quote_id && quote.enquiry_id == enquiry.id)
                .ok_or_else(|| not_found_error("Quote", quote_id))?;
            if quote.status != QuoteStatus::Accepted {
                return Err(conflict_error(format!(
                    "Quote {} is {} and cannot back a customer order",
                    quote.id, quote.status
                )));
            }
            quote.id
        }
        None => match accepted.as_slice() {
            [] => {
                return Err(conflict_error(format!(
                    "Enquiry {} has no accepted quote",
                    enquiry.id
                )))
            }
            [only] => only.id,
            _ => {
                return Err(validation_error(
                    "quote_id",
                    "Several accepted quotes exist for this enquiry; quote_id is required",
                ))
            }
        },
    };

    Ok(PromotionPlan {
        enquiry_id: enquiry.id,
        quote_id,
    })
}

/// Cambio de estado manual de una enquiry
pub fn check_enquiry_transition(current: EnquiryStatus, next: EnquiryStatus) -> AppResult<()> {
    if current.can_transition_to(next) {
        return Ok(());
    }
    let message = match (current, next) {
        (_, EnquiryStatus::Accepted) => {
            "An enquiry becomes accepted only by promoting it to a customer order".to_string()
        }
        (EnquiryStatus::Accepted, _) => {
            "An accepted enquiry keeps its status while its customer order exists".to_string()
        }
        _ => format!("Enquiry cannot move from {} to {}", current, next),
    };
    Err(conflict_error(message))
}

/// Cambio de estado de un pedido de cliente
pub fn check_order_transition(current: CustomerOrderStatus, next: CustomerOrderStatus) -> AppResult<()> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(conflict_error(format!(
            "Customer order cannot move from {} to {}",
            current, next
        )))
    }
}

/// Un quote que respalda un pedido no puede dejar de estar aceptado
pub fn check_quote_status_change(current: QuoteStatus, next: QuoteStatus, backs_order: bool) -> AppResult<()> {
    if backs_order && current == QuoteStatus::Accepted && next != QuoteStatus::Accepted {
        return Err(conflict_error(
            "Quote backs a customer order and must stay accepted",
        ));
    }
    Ok(())
}

pub fn check_quote_deletable(backs_order: bool) -> AppResult<()> {
    if backs_order {
        return Err(conflict_error(
            "Quote backs a customer order and cannot be deleted",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::LeadSource;
    use crate::utils::errors::AppError;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn enquiry(status: EnquiryStatus) -> Enquiry {
        Enquiry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            lead_id: Uuid::new_v4(),
            from_location: Some("Mumbai".into()),
            to_location: Some("Pune".into()),
            cargo_type: Some("Steel coils".into()),
            cargo_weight: Some(18.5),
            remarks: None,
            source: LeadSource::IndiaMart,
            referrer: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quote(enquiry: &Enquiry, status: QuoteStatus) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            user_id: enquiry.user_id,
            enquiry_id: enquiry.id,
            costing: None,
            quotation_amount: Decimal::new(11500, 0),
            margin_percentage: Some(Decimal::new(15, 0)),
            base_amount: Some(Decimal::new(10000, 0)),
            is_custom_amount: false,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_single_accepted_quote_is_chosen() {
        let enquiry = enquiry(EnquiryStatus::Pending);
        let quotes = vec![
            quote(&enquiry, QuoteStatus::Rejected),
            quote(&enquiry, QuoteStatus::Accepted),
            quote(&enquiry, QuoteStatus::Pending),
        ];

        let plan = plan_promotion(&enquiry, &quotes, false, None).unwrap();
        assert_eq!(plan.quote_id, quotes[1].id);
        assert_eq!(plan.enquiry_id, enquiry.id);
    }

    #[test]
    fn test_no_accepted_quote_is_a_conflict() {
        let enquiry = enquiry(EnquiryStatus::Pending);
        let quotes = vec![quote(&enquiry, QuoteStatus::Pending)];

        assert!(matches!(
            plan_promotion(&enquiry, &quotes, false, None),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            plan_promotion(&enquiry, &[], false, None),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_several_accepted_quotes_need_disambiguation() {
        let enquiry = enquiry(EnquiryStatus::Pending);
        let quotes = vec![
            quote(&enquiry, QuoteStatus::Accepted),
            quote(&enquiry, QuoteStatus::Accepted),
        ];

        assert!(matches!(
            plan_promotion(&enquiry, &quotes, false, None),
            Err(AppError::Validation(_))
        ));

        let plan = plan_promotion(&enquiry, &quotes, false, Some(quotes[1].id)).unwrap();
        assert_eq!(plan.quote_id, quotes[1].id);
    }

    #[test]
    fn test_requested_quote_must_belong_and_be_accepted() {
        let enquiry = enquiry(EnquiryStatus::Pending);
        let quotes = vec![
            quote(&enquiry, QuoteStatus::Accepted),
            quote(&enquiry, QuoteStatus::Pending),
        ];

        assert!(matches!(
            plan_promotion(&enquiry, &quotes, false, Some(Uuid::new_v4())),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            plan_promotion(&enquiry, &quotes, false, Some(quotes[1].id)),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_promotion_is_one_way() {
        let enquiry = enquiry(EnquiryStatus::Accepted);
        let quotes = vec![quote(&enquiry, QuoteStatus::Accepted)];
        assert!(matches!(
            plan_promotion(&enquiry, &quotes, true, None),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_rejected_enquiry_cannot_be_promoted() {
        let enquiry = enquiry(EnquiryStatus::Rejected);
        let quotes = vec![quote(&enquiry, QuoteStatus::Accepted)];
        assert!(matches!(
            plan_promotion(&enquiry, &quotes, false, None),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_transition_checks() {
        assert!(check_enquiry_transition(EnquiryStatus::Pending, EnquiryStatus::Rejected).is_ok());
        assert!(check_enquiry_transition(EnquiryStatus::Pending, EnquiryStatus::Accepted).is_err());
        assert!(check_enquiry_transition(EnquiryStatus::Accepted, EnquiryStatus::Rejected).is_err());

        assert!(check_order_transition(CustomerOrderStatus::Active, CustomerOrderStatus::Completed).is_ok());
        assert!(check_order_transition(CustomerOrderStatus::Cancelled, CustomerOrderStatus::Active).is_err());
    }

    #[test]
    fn test_quote_backing_an_order_is_locked() {
        assert!(check_quote_status_change(QuoteStatus::Accepted, QuoteStatus::Rejected, true).is_err());
        assert!(check_quote_status_change(QuoteStatus::Accepted, QuoteStatus::Accepted, true).is_ok());
        assert!(check_quote_status_change(QuoteStatus::Accepted, QuoteStatus::Rejected, false).is_ok());
        assert!(check_quote_deletable(true).is_err());
        assert!(check_quote_deletable(false).is_ok());
    }
}
