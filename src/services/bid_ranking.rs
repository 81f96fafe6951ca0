//! Ranking de pujas L1/L2
//!
//! Las pujas se ordenan por tarifa ascendente; a igual tarifa gana la más
//! antigua y después el id menor. L1 es la primera, L2 la segunda. El
//! resumen se recalcula en cada lectura.

use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::bid::BidWithBroker;

/// Nombre visible de un broker: empresa, si no persona, si no `Broker {id}`
pub fn broker_display_name(id: Uuid, company_name: Option<&str>, person_name: Option<&str>) -> String {
    let non_empty = |value: Option<&str>| value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    non_empty(company_name)
        .or_else(|| non_empty(person_name))
        .unwrap_or_else(|| format!("Broker {}", id))
}

fn compare_bids(a: &BidWithBroker, b: &BidWithBroker) -> Ordering {
    a.bid
        .rate
        .cmp(&b.bid.rate)
        .then_with(|| a.bid.created_at.cmp(&b.bid.created_at))
        .then_with(|| a.bid.id.cmp(&b.bid.id))
}

/// Puja dentro del ranking (posición 1 = L1)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBid {
    pub position: usize,
    pub label: Option<&'static str>,
    pub bid_id: Uuid,
    pub broker_id: Uuid,
    pub broker_name: String,
    pub rate: Decimal,
}

/// Campos derivados que acompañan a cada transport enquiry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingSummary {
    pub l1_rate: Option<Decimal>,
    pub l1_broker: Option<String>,
    pub l2_rate: Option<Decimal>,
    pub l2_broker: Option<String>,
    pub bid_count: usize,
}

pub fn rank_bids(mut bids: Vec<BidWithBroker>) -> Vec<RankedBid> {
    bids.sort_by(compare_bids);
    bids.into_iter()
        .enumerate()
        .map(|(index, bid)| RankedBid {
            position: index + 1,
            label: match index {
                0 => Some("L1"),
                1 => Some("L2"),
                _ => None,
            },
            bid_id: bid.bid.id,
            broker_id: bid.bid.broker_id,
            broker_name: broker_display_name(
                bid.bid.broker_id,
                bid.broker_company_name.as_deref(),
                bid.broker_person_name.as_deref(),
            ),
            rate: bid.bid.rate,
        })
        .collect()
}

pub fn summarize(bids: &[BidWithBroker]) -> RankingSummary {
    let mut ordered: Vec<&BidWithBroker> = bids.iter().collect();
    ordered.sort_by(|a, b| compare_bids(a, b));

    let name = |bid: &BidWithBroker| {
        broker_display_name(
            bid.bid.broker_id,
            bid.broker_company_name.as_deref(),
            bid.broker_person_name.as_deref(),
        )
    };

    let l1 = ordered.first().copied();
    let l2 = ordered.get(1).copied();
    RankingSummary {
        l1_rate: l1.map(|bid| bid.bid.rate),
        l1_broker: l1.map(name),
        l2_rate: l2.map(|bid| bid.bid.rate),
        l2_broker: l2.map(name),
        bid_count: bids.len(),
    }
}

/// Resumen por transport enquiry a partir de las pujas de varias enquiries
pub fn summarize_by_enquiry(bids: Vec<BidWithBroker>) -> HashMap<Uuid, RankingSummary> {
    let mut grouped: HashMap<Uuid, Vec<BidWithBroker>> = HashMap::new();
    for bid in bids {
        grouped.entry(bid.bid.transport_enquiry_id).or_default().push(bid);
    }
    grouped
        .into_iter()
        .map(|(enquiry_id, bids)| (enquiry_id, summarize(&bids)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bid::Bid;
    use chrono::{Duration, TimeZone, Utc};

    fn bid(rate: i64, minutes: i64, company: Option<&str>) -> BidWithBroker {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        BidWithBroker {
            bid: Bid {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                transport_enquiry_id: Uuid::nil(),
                broker_id: Uuid::new_v4(),
                rate: Decimal::new(rate, 0),
                created_at: base + Duration::minutes(minutes),
                updated_at: base + Duration::minutes(minutes),
            },
            broker_company_name: company.map(str::to_string),
            broker_person_name: None,
        }
    }

    #[test]
    fn test_l1_l2_selection() {
        let bids = vec![
            bid(2000, 0, Some("Sharma Roadways")),
            bid(1500, 1, Some("Patel Transport")),
            bid(1800, 2, Some("Gupta Carriers")),
        ];

        let summary = summarize(&bids);
        assert_eq!(summary.l1_rate, Some(Decimal::new(1500, 0)));
        assert_eq!(summary.l1_broker.as_deref(), Some("Patel Transport"));
        assert_eq!(summary.l2_rate, Some(Decimal::new(1800, 0)));
        assert_eq!(summary.l2_broker.as_deref(), Some("Gupta Carriers"));
        assert_eq!(summary.bid_count, 3);

        let ranked = rank_bids(bids);
        let rates: Vec<Decimal> = ranked.iter().map(|r| r.rate).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ranked[0].label, Some("L1"));
        assert_eq!(ranked[1].label, Some("L2"));
        assert_eq!(ranked[2].label, None);
        assert_eq!(ranked[2].position, 3);
    }

    #[test]
    fn test_ties_prefer_the_earlier_bid() {
        let late = bid(1500, 10, Some("Late"));
        let early = bid(1500, 5, Some("Early"));
        let summary = summarize(&[late, early]);
        assert_eq!(summary.l1_broker.as_deref(), Some("Early"));
        assert_eq!(summary.l2_broker.as_deref(), Some("Late"));
    }

    #[test]
    fn test_ties_on_time_fall_back_to_id() {
        let mut a = bid(900, 0, Some("A"));
        let mut b = bid(900, 0, Some("B"));
        a.bid.id = Uuid::from_u128(2);
        b.bid.id = Uuid::from_u128(1);
        let ranked = rank_bids(vec![a, b]);
        assert_eq!(ranked[0].broker_name, "B");
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(summarize(&[]), RankingSummary::default());

        let summary = summarize(&[bid(700, 0, None)]);
        assert_eq!(summary.l1_rate, Some(Decimal::new(700, 0)));
        assert!(summary.l1_broker.unwrap().starts_with("Broker "));
        assert_eq!(summary.l2_rate, None);
        assert_eq!(summary.bid_count, 1);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let id = Uuid::nil();
        assert_eq!(broker_display_name(id, Some("ACME"), Some("Ravi")), "ACME");
        assert_eq!(broker_display_name(id, Some("  "), Some("Ravi")), "Ravi");
        assert_eq!(
            broker_display_name(id, None, None),
            "Broker 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_grouping_by_enquiry() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut a = bid(100, 0, Some("A"));
        a.bid.transport_enquiry_id = first;
        let mut b = bid(90, 0, Some("B"));
        b.bid.transport_enquiry_id = second;
        let mut c = bid(80, 0, Some("C"));
        c.bid.transport_enquiry_id = first;

        let summaries = summarize_by_enquiry(vec![a, b, c]);
        assert_eq!(summaries[&first].l1_broker.as_deref(), Some("C"));
        assert_eq!(summaries[&first].bid_count, 2);
        assert_eq!(summaries[&second].bid_count, 1);
    }
}
