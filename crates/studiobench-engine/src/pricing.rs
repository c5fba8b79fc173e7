//! Price normalization.
//!
//! The per-class figure derived here is a heuristic for comparing offers of
//! different shapes. Unlimited memberships assume a fixed reference usage,
//! so the result approximates a per-visit cost rather than measuring it.

use serde::Serialize;
use studiobench_core::{Offer, OfferType, PriceUnit, Sessions, UsageLimit};

const DAYS_PER_WEEK: f64 = 7.0;
const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Normalized per-class price of an offer.
///
/// Returns `None` when no positive figure can be derived (missing price,
/// missing or zero sessions on a pack, unsupported offer type).
#[must_use]
pub fn price_per_class(offer: &Offer, unlimited_classes_per_month: u32) -> Option<f64> {
    let price = offer.price_eur.filter(|p| *p > 0.0)?;
    let sessions = offer.sessions_included.and_then(Sessions::positive_count);

    let per_class = match offer.offer_type? {
        OfferType::DropIn => price,
        OfferType::Pack | OfferType::Intro | OfferType::Bundle => price / sessions?,
        OfferType::Membership | OfferType::Subscription => {
            let unlimited = matches!(offer.usage_limit_type, Some(UsageLimit::Unlimited));
            match sessions {
                Some(count) if !unlimited => price / count,
                _ => {
                    let monthly = if offer.price_unit == Some(PriceUnit::Year) {
                        price / MONTHS_PER_YEAR
                    } else {
                        price
                    };
                    monthly / f64::from(unlimited_classes_per_month.max(1))
                }
            }
        }
        OfferType::Unknown => return None,
    };

    Some(per_class).filter(|p| p.is_finite() && *p > 0.0)
}

/// Price used for market statistics: the backend's per-class price, else the list price.
#[must_use]
pub fn market_price(offer: &Offer) -> Option<f64> {
    offer
        .price_per_class
        .or(offer.price_eur)
        .filter(|p| p.is_finite())
}

/// List price scaled to a 30-day month.
#[must_use]
pub fn monthly_equivalent(offer: &Offer) -> Option<f64> {
    let price = offer.price_eur?;
    let days = offer.duration_days.filter(|d| *d > 0.0)?;
    Some(price / days * DAYS_PER_MONTH)
}

/// How often a customer can visit on an offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisitRate {
    Unlimited,
    /// Sessions without an expiry.
    OpenEnded,
    Periodic { per_week: f64, per_month: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisitCadence {
    /// Only packs, bundles and memberships have a cadence.
    pub rate: Option<VisitRate>,
    pub price_per_visit: Option<f64>,
}

#[must_use]
pub fn visit_cadence(offer: &Offer) -> VisitCadence {
    let eligible = matches!(
        offer.offer_type,
        Some(OfferType::Pack | OfferType::Bundle | OfferType::Membership)
    );
    if !eligible {
        return VisitCadence {
            rate: None,
            price_per_visit: offer.price_per_class,
        };
    }

    let sessions = offer.sessions_included.and_then(Sessions::positive_count);
    let is_membership = offer.offer_type == Some(OfferType::Membership);

    let rate = match sessions {
        None if is_membership => Some(VisitRate::Unlimited),
        None => None,
        Some(count) => Some(match offer.duration_days.filter(|d| *d > 0.0) {
            Some(days) => VisitRate::Periodic {
                per_week: count / (days / DAYS_PER_WEEK),
                per_month: count / (days / DAYS_PER_MONTH),
            },
            None => VisitRate::OpenEnded,
        }),
    };

    let price = offer.price_eur.or(offer.price_per_class);
    let price_per_visit = match (sessions, price) {
        (Some(count), Some(price)) => Some(price / count),
        _ => offer.price_per_class,
    };

    VisitCadence {
        rate,
        price_per_visit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(offer_type: OfferType, price: f64) -> Offer {
        Offer {
            offer_type: Some(offer_type),
            price_eur: Some(price),
            ..Offer::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn drop_in_is_raw_price() {
        assert_eq!(price_per_class(&offer(OfferType::DropIn, 22.0), 12), Some(22.0));
    }

    #[test]
    fn pack_divides_by_sessions() {
        let pack = Offer {
            sessions_included: Some(Sessions::Count(10.0)),
            ..offer(OfferType::Pack, 180.0)
        };
        assert_eq!(price_per_class(&pack, 12), Some(18.0));
    }

    #[test]
    fn pack_without_sessions_has_no_price() {
        assert_eq!(price_per_class(&offer(OfferType::Pack, 180.0), 12), None);
        let zero = Offer {
            sessions_included: Some(Sessions::Count(0.0)),
            ..offer(OfferType::Intro, 30.0)
        };
        assert_eq!(price_per_class(&zero, 12), None);
    }

    #[test]
    fn unlimited_membership_uses_reference_usage() {
        let monthly = Offer {
            usage_limit_type: Some(UsageLimit::Unlimited),
            sessions_included: Some(Sessions::Count(30.0)),
            ..offer(OfferType::Membership, 120.0)
        };
        assert_eq!(price_per_class(&monthly, 12), Some(10.0));
    }

    #[test]
    fn annual_membership_is_spread_over_twelve_months() {
        let annual = Offer {
            price_unit: Some(PriceUnit::Year),
            ..offer(OfferType::Membership, 1440.0)
        };
        assert_eq!(price_per_class(&annual, 12), Some(10.0));
    }

    #[test]
    fn limited_membership_divides_by_sessions() {
        let limited = Offer {
            sessions_included: Some(Sessions::Count(8.0)),
            ..offer(OfferType::Membership, 96.0)
        };
        assert_eq!(price_per_class(&limited, 12), Some(12.0));
    }

    #[test]
    fn unknown_type_or_missing_price_has_no_price() {
        assert_eq!(price_per_class(&offer(OfferType::Unknown, 20.0), 12), None);
        assert_eq!(price_per_class(&offer(OfferType::DropIn, 0.0), 12), None);
        assert_eq!(price_per_class(&Offer::default(), 12), None);
    }

    #[test]
    fn market_price_prefers_per_class_figure() {
        let with_both = Offer {
            price_per_class: Some(15.0),
            ..offer(OfferType::Pack, 150.0)
        };
        assert_eq!(market_price(&with_both), Some(15.0));
        assert_eq!(market_price(&offer(OfferType::Pack, 150.0)), Some(150.0));
        assert_eq!(market_price(&Offer::default()), None);
    }

    #[test]
    fn monthly_equivalent_scales_to_thirty_days() {
        let four_weeks = Offer {
            duration_days: Some(28.0),
            ..offer(OfferType::Membership, 112.0)
        };
        assert!(close(monthly_equivalent(&four_weeks).unwrap_or_default(), 120.0));
        assert_eq!(monthly_equivalent(&offer(OfferType::Membership, 112.0)), None);
    }

    #[test]
    fn cadence_for_pack_with_duration() {
        let pack = Offer {
            sessions_included: Some(Sessions::Count(10.0)),
            duration_days: Some(70.0),
            ..offer(OfferType::Pack, 150.0)
        };
        let cadence = visit_cadence(&pack);
        match cadence.rate {
            Some(VisitRate::Periodic {
                per_week,
                per_month,
            }) => {
                assert!(close(per_week, 1.0));
                assert!(close(per_month, 10.0 / (70.0 / 30.0)));
            }
            other => panic!("expected periodic rate, got {other:?}"),
        }
        assert_eq!(cadence.price_per_visit, Some(15.0));
    }

    #[test]
    fn cadence_for_open_ended_pack() {
        let pack = Offer {
            sessions_included: Some(Sessions::Count(5.0)),
            ..offer(OfferType::Bundle, 100.0)
        };
        assert_eq!(visit_cadence(&pack).rate, Some(VisitRate::OpenEnded));
    }

    #[test]
    fn cadence_for_membership_without_sessions_is_unlimited() {
        let membership = offer(OfferType::Membership, 129.0);
        let cadence = visit_cadence(&membership);
        assert_eq!(cadence.rate, Some(VisitRate::Unlimited));
        assert_eq!(cadence.price_per_visit, None);
    }

    #[test]
    fn cadence_not_applicable_to_drop_in() {
        let single = Offer {
            price_per_class: Some(22.0),
            ..offer(OfferType::DropIn, 22.0)
        };
        let cadence = visit_cadence(&single);
        assert_eq!(cadence.rate, None);
        assert_eq!(cadence.price_per_visit, Some(22.0));
    }
}
