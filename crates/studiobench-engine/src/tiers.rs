use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use studiobench_core::{Competitor, EngineConfig, Offer, OfferType, Tier};

use crate::market::PriceStats;
use crate::pricing::price_per_class;

/// Per-class price statistics for one tier and offer type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummaryRow {
    pub tier: Tier,
    pub offer_type: OfferType,
    #[serde(flatten)]
    pub stats: PriceStats,
}

/// Group competitor offers by tier and offer type.
///
/// Offers of competitors without a tier, offers without a type and offers
/// without a normalized price are skipped.
#[must_use]
pub fn tier_summary(
    offers: &[Offer],
    competitors: &[Competitor],
    config: &EngineConfig,
) -> Vec<TierSummaryRow> {
    let tiers: HashMap<&str, Tier> = competitors
        .iter()
        .filter_map(|c| Some((c.competitor_id.as_deref()?, c.tier?)))
        .collect();

    let mut groups: BTreeMap<(Tier, OfferType), Vec<f64>> = BTreeMap::new();
    for offer in offers.iter().filter(|o| !o.is_own(&config.own_studio_id)) {
        let Some(tier) = offer
            .competitor_id
            .as_deref()
            .and_then(|id| tiers.get(id).copied())
        else {
            continue;
        };
        let Some(offer_type) = offer.offer_type else {
            continue;
        };
        if let Some(price) = price_per_class(offer, config.unlimited_classes_per_month) {
            groups.entry((tier, offer_type)).or_default().push(price);
        }
    }

    groups
        .into_iter()
        .filter_map(|((tier, offer_type), prices)| {
            PriceStats::from_prices(prices).map(|stats| TierSummaryRow {
                tier,
                offer_type,
                stats,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(id: &str, tier: Tier) -> Competitor {
        Competitor {
            competitor_id: Some(id.to_string()),
            tier: Some(tier),
            ..Competitor::default()
        }
    }

    fn drop_in(competitor_id: &str, price: f64) -> Offer {
        Offer {
            competitor_id: Some(competitor_id.to_string()),
            offer_type: Some(OfferType::DropIn),
            price_eur: Some(price),
            ..Offer::default()
        }
    }

    #[test]
    fn groups_by_tier_and_type_in_order() {
        let competitors = vec![
            competitor("a", Tier::Two),
            competitor("b", Tier::One),
            competitor("c", Tier::One),
        ];
        let offers = vec![
            drop_in("a", 18.0),
            drop_in("b", 20.0),
            drop_in("c", 26.0),
            Offer {
                offer_type: Some(OfferType::Pack),
                ..drop_in("b", 100.0)
            },
            drop_in("our-studio", 30.0),
            drop_in("unknown", 40.0),
        ];
        let rows = tier_summary(&offers, &competitors, &EngineConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tier, Tier::One);
        assert_eq!(rows[0].offer_type, OfferType::DropIn);
        assert_eq!(rows[0].stats.count, 2);
        assert_eq!(rows[0].stats.median, 23.0);
        assert_eq!(rows[1].tier, Tier::Two);
    }

    #[test]
    fn empty_inputs_give_no_rows() {
        assert!(tier_summary(&[], &[], &EngineConfig::default()).is_empty());
    }
}
