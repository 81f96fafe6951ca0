//! Escenarios de negocio de punta a punta sobre las reglas puras:
//! cotizar una enquiry, promoverla y adjudicar el transporte por L1.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use logistics_backoffice::models::bid::{Bid, BidWithBroker};
use logistics_backoffice::models::enquiry::{Enquiry, EnquiryStatus};
use logistics_backoffice::models::lead::LeadSource;
use logistics_backoffice::models::quote::{Quote, QuoteStatus};
use logistics_backoffice::models::transport_enquiry::TransportEnquiryStatus;
use logistics_backoffice::services::bid_ranking::{rank_bids, summarize};
use logistics_backoffice::services::order_promotion::{check_enquiry_transition, plan_promotion};
use logistics_backoffice::services::quote_calculator::{resolve_amounts, QuotePricing};
use logistics_backoffice::utils::errors::AppError;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn enquiry() -> Enquiry {
    let now = Utc::now();
    Enquiry {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        lead_id: Uuid::new_v4(),
        from_location: Some("Mumbai".into()),
        to_location: Some("Delhi".into()),
        cargo_type: Some("Steel coils".into()),
        cargo_weight: Some(18.5),
        remarks: None,
        source: LeadSource::Referral,
        referrer: Some("Anil".into()),
        status: EnquiryStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

fn quote_for(enquiry: &Enquiry, pricing: QuotePricing, derived_base: Option<Decimal>, status: QuoteStatus) -> Quote {
    let amounts = resolve_amounts(&pricing, derived_base).unwrap();
    let now = Utc::now();
    Quote {
        id: Uuid::new_v4(),
        user_id: enquiry.user_id,
        enquiry_id: enquiry.id,
        costing: None,
        quotation_amount: amounts.quotation_amount,
        margin_percentage: amounts.margin_percentage,
        base_amount: amounts.base_amount,
        is_custom_amount: amounts.is_custom_amount,
        status,
        created_at: now,
        updated_at: now,
    }
}

fn bid(transport_enquiry_id: Uuid, rate: &str, minutes: i64, company: &str) -> BidWithBroker {
    let placed = Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap() + Duration::minutes(minutes);
    BidWithBroker {
        bid: Bid {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            transport_enquiry_id,
            broker_id: Uuid::new_v4(),
            rate: dec(rate),
            created_at: placed,
            updated_at: placed,
        },
        broker_company_name: Some(company.to_string()),
        broker_person_name: None,
    }
}

#[test]
fn test_quote_from_transport_orders_then_promote() {
    let enquiry = enquiry();

    // Base derivada de los transport orders: 10000 con 15% de margen
    let calculated = quote_for(
        &enquiry,
        QuotePricing::Calculated {
            margin_percentage: dec("15"),
            base_amount: None,
        },
        Some(dec("10000")),
        QuoteStatus::Accepted,
    );
    assert_eq!(calculated.quotation_amount, dec("11500"));
    assert_eq!(calculated.base_amount, Some(dec("10000")));

    let custom = quote_for(
        &enquiry,
        QuotePricing::Custom { amount: dec("12999.999") },
        Some(dec("10000")),
        QuoteStatus::Pending,
    );
    assert!(custom.is_custom_amount);
    assert_eq!(custom.quotation_amount, dec("13000.00"));
    assert_eq!(custom.margin_percentage, None);

    let plan = plan_promotion(&enquiry, &[calculated.clone(), custom], false, None).unwrap();
    assert_eq!(plan.quote_id, calculated.id);
    assert_eq!(plan.enquiry_id, enquiry.id);

    // Una vez promovida ya no se puede volver a promover
    let err = plan_promotion(&enquiry, &[calculated], true, None).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn test_promotion_needs_an_accepted_quote() {
    let enquiry = enquiry();
    let pending = quote_for(
        &enquiry,
        QuotePricing::Custom { amount: dec("5000") },
        None,
        QuoteStatus::Pending,
    );

    let err = plan_promotion(&enquiry, &[pending.clone()], false, None).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = plan_promotion(&enquiry, &[pending.clone()], false, Some(pending.id)).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn test_calculated_quote_without_any_base_is_rejected() {
    let pricing = QuotePricing::Calculated {
        margin_percentage: dec("10"),
        base_amount: None,
    };
    assert!(matches!(resolve_amounts(&pricing, None), Err(AppError::Validation(_))));
    assert!(matches!(
        resolve_amounts(&pricing, Some(Decimal::ZERO)),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_enquiry_only_accepted_through_promotion() {
    assert!(check_enquiry_transition(EnquiryStatus::Pending, EnquiryStatus::Rejected).is_ok());
    assert!(check_enquiry_transition(EnquiryStatus::Rejected, EnquiryStatus::Pending).is_ok());
    assert!(matches!(
        check_enquiry_transition(EnquiryStatus::Pending, EnquiryStatus::Accepted),
        Err(AppError::Conflict(_))
    ));
}

#[test]
fn test_bidding_round_picks_l1_and_l2() {
    let transport_enquiry_id = Uuid::new_v4();

    let mut status = TransportEnquiryStatus::Open;
    assert!(status.accepts_bids());
    status = status.after_bid();
    assert_eq!(status, TransportEnquiryStatus::Bidding);

    let bids = vec![
        bid(transport_enquiry_id, "2000", 0, "Sharma Roadways"),
        bid(transport_enquiry_id, "1500", 5, "Patel Freight"),
        bid(transport_enquiry_id, "1800", 10, "Singh Carriers"),
    ];

    let summary = summarize(&bids);
    assert_eq!(summary.l1_rate, Some(dec("1500")));
    assert_eq!(summary.l1_broker.as_deref(), Some("Patel Freight"));
    assert_eq!(summary.l2_rate, Some(dec("1800")));
    assert_eq!(summary.l2_broker.as_deref(), Some("Singh Carriers"));
    assert_eq!(summary.bid_count, 3);

    let ranked = rank_bids(bids);
    let rates: Vec<Decimal> = ranked.iter().map(|r| r.rate).collect();
    assert!(rates.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(ranked[0].label, Some("L1"));
    assert_eq!(ranked[1].label, Some("L2"));
    assert_eq!(ranked[2].label, None);

    // Adjudicada la puja L1 la enquiry queda cerrada
    assert!(!TransportEnquiryStatus::Closed.accepts_bids());
}
