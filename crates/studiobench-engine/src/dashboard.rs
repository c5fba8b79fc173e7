//! One pass of every engine output over a snapshot.

use std::collections::HashSet;

use serde::Serialize;
use studiobench_core::{EngineConfig, Offer, Snapshot};

use crate::market::{competitor_benchmark, market_buckets, BenchmarkDelta, MarketBucket};
use crate::pins::PinSet;
use crate::ranking::{rank_competitors, Ranking};
use crate::recommendation::{overall_position, recommend_all, PositionSummary, Recommendation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub market: Vec<MarketBucket>,
    pub ranking: Ranking,
    pub recommendations: Vec<Recommendation>,
    pub position: Option<PositionSummary>,
    pub competitor_benchmark: Vec<BenchmarkDelta>,
}

/// Every offer in the snapshot, with own-studio profile packages standing in
/// for own offers when none are listed.
#[must_use]
pub fn all_offers(snapshot: &Snapshot, config: &EngineConfig) -> (Vec<Offer>, Vec<Offer>) {
    let own = snapshot.own_offers(&config.own_studio_id);
    let mut all: Vec<Offer> = snapshot
        .competitor_offers(&config.own_studio_id)
        .cloned()
        .collect();
    all.extend(own.iter().cloned());
    (own, all)
}

/// Build the full report for one snapshot.
///
/// The competitor benchmark covers pinned competitors, the currently
/// selected one and, when it has offers, the own studio.
#[must_use]
pub fn build_dashboard(
    snapshot: &Snapshot,
    pins: &PinSet,
    selected_id: Option<&str>,
    config: &EngineConfig,
) -> DashboardReport {
    let (own_offers, offers) = all_offers(snapshot, config);

    let mut selected: HashSet<String> = pins.ids().iter().cloned().collect();
    if let Some(id) = selected_id.map(str::trim).filter(|id| !id.is_empty()) {
        selected.insert(id.to_string());
    }
    if !own_offers.is_empty() {
        selected.insert(config.own_studio_id.clone());
    }

    let report = DashboardReport {
        market: market_buckets(&offers),
        ranking: rank_competitors(&snapshot.competitors, &own_offers, &offers, config),
        recommendations: recommend_all(&own_offers, &offers, config),
        position: overall_position(&own_offers, &offers, config),
        competitor_benchmark: competitor_benchmark(&offers, &selected),
    };

    tracing::debug!(
        offers = offers.len(),
        own_offers = own_offers.len(),
        buckets = report.market.len(),
        ranked = report.ranking.top.len(),
        benchmark_rows = report.competitor_benchmark.len(),
        "built dashboard report"
    );

    report
}

#[cfg(test)]
mod tests {
    use studiobench_core::{Competitor, HeatLevel, OfferType, OwnPackage, OwnStudioProfile};

    use super::*;

    fn drop_in(competitor_id: &str, price: f64) -> Offer {
        Offer {
            competitor_id: Some(competitor_id.to_string()),
            offer_type: Some(OfferType::DropIn),
            class_type: Some("hot_yoga".to_string()),
            heat: Some(HeatLevel::Hot),
            class_length_min: Some(60.0),
            price_eur: Some(price),
            ..Offer::default()
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            offers: vec![
                drop_in("our-studio", 22.0),
                drop_in("comp-1", 20.0),
                drop_in("comp-2", 18.0),
                drop_in("comp-3", 22.0),
            ],
            competitors: vec![
                Competitor {
                    competitor_id: Some("comp-1".to_string()),
                    name: Some("Hot Flow".to_string()),
                    ..Competitor::default()
                },
                Competitor {
                    competitor_id: Some("comp-2".to_string()),
                    name: Some("Bikram Loft".to_string()),
                    ..Competitor::default()
                },
            ],
            ..Snapshot::default()
        }
    }

    #[test]
    fn empty_snapshot_gives_empty_report() {
        let report = build_dashboard(
            &Snapshot::default(),
            &PinSet::new(10),
            None,
            &EngineConfig::default(),
        );
        assert!(report.market.is_empty());
        assert!(report.ranking.top.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.position.is_none());
        assert!(report.competitor_benchmark.is_empty());
    }

    #[test]
    fn full_snapshot_fills_every_section() {
        let config = EngineConfig::default();
        let pins = PinSet::from_ids(["comp-1"], config.pin_limit);
        let report = build_dashboard(&snapshot(), &pins, Some("comp-2"), &config);
        assert_eq!(report.market.len(), 1);
        assert_eq!(report.ranking.top.len(), 2);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.position.is_some());
        // comp-1, comp-2 and the own studio
        assert_eq!(report.competitor_benchmark.len(), 3);
    }

    #[test]
    fn offers_only_snapshot_still_reports_market() {
        let mut offers_only = snapshot();
        offers_only.competitors.clear();
        let report = build_dashboard(
            &offers_only,
            &PinSet::new(10),
            None,
            &EngineConfig::default(),
        );
        assert_eq!(report.market.len(), 1);
        assert!(report.ranking.top.is_empty());
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn profile_packages_stand_in_for_own_offers() {
        let mut snap = snapshot();
        snap.offers.retain(|o| !o.is_own("our-studio"));
        snap.own_studio = Some(OwnStudioProfile {
            name: Some("Own".to_string()),
            packages: vec![OwnPackage {
                name: Some("Trial week".to_string()),
                price_eur: Some(25.0),
                notes: None,
            }],
            ..OwnStudioProfile::default()
        });
        let config = EngineConfig::default();
        let (own, all) = all_offers(&snap, &config);
        assert_eq!(own.len(), 1);
        assert_eq!(all.len(), 4);
        let report = build_dashboard(&snap, &PinSet::new(10), None, &config);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn rerunning_gives_the_same_report() {
        let config = EngineConfig::default();
        let pins = PinSet::from_ids(["comp-2"], config.pin_limit);
        let first = build_dashboard(&snapshot(), &pins, None, &config);
        let second = build_dashboard(&snapshot(), &pins, None, &config);
        assert_eq!(first, second);
    }
}
