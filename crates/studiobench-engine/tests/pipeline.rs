//! End-to-end engine runs over backend-shaped JSON rows.

use studiobench_core::{Competitor, EngineConfig, Offer, Snapshot};
use studiobench_engine::{
    build_dashboard, comparability, market_buckets, rank_competitors, recommend, PinSet, Verdict,
};

const OFFERS: &str = r#"[
  {"competitor_id": "our-studio", "studio": "Own Studio", "offer_type": "drop_in",
   "class_type": "hot_yoga", "heat": "hot", "class_length_min": "60", "price_eur": "22",
   "sessions_included": "", "duration_days": ""},
  {"competitor_id": "comp-001", "studio": "Hot Flow", "offer_type": "drop_in",
   "class_type": "hot_yoga", "heat": "hot", "class_length_min": "60", "price_eur": "20"},
  {"competitor_id": "comp-002", "studio": "Bikram Loft", "offer_type": "drop_in",
   "class_type": "bikram", "heat": "hot", "class_length_min": "60", "price_eur": "18"},
  {"competitor_id": "comp-003", "studio": "Zen Den", "offer_type": "drop_in",
   "class_type": "hot_yoga", "heat": "hot", "class_length_min": "75", "price_eur": "22"},
  {"competitor_id": "comp-003", "studio": "Zen Den", "offer_type": "membership",
   "class_type": "yin", "heat": "", "class_length_min": "75", "price_eur": "129",
   "sessions_included": "unlimited", "usage_limit_type": "unlimited",
   "contract_type": "month_to_month", "price_unit": "month"},
  {"competitor_id": "", "studio": "Reformer Lab", "offer_type": "pack",
   "class_type": "reformer", "heat": "none", "class_length_min": "50",
   "sessions_included": "10", "price_eur": "250", "price_per_class": "25"}
]"#;

const COMPETITORS: &str = r#"[
  {"competitor_id": "comp-001", "name": "Hot Flow", "tier": "Tier 1", "segment": "hot yoga",
   "distance_walk_min": "12", "distance_bike_min": "4"},
  {"competitor_id": "comp-002", "name": "", "brand": "Bikram Loft", "tier": "Tier 3",
   "segment": "bikram", "distance_walk_min": "30", "distance_bike_min": "28"},
  {"competitor_id": "comp-003", "name": "Zen Den", "tier": "Tier 3", "segment": "boutique",
   "distance_walk_min": "", "distance_bike_min": ""},
  {"name": "Reformer Lab", "tier": "", "segment": "pilates"},
  {"competitor_id": "comp-009", "name": "No Offers Yet", "tier": "Tier 1", "segment": "hot yoga"}
]"#;

fn snapshot() -> Snapshot {
    Snapshot {
        offers: serde_json::from_str::<Vec<Offer>>(OFFERS).expect("offers decode"),
        competitors: serde_json::from_str::<Vec<Competitor>>(COMPETITORS)
            .expect("competitors decode"),
        ..Snapshot::default()
    }
}

#[test]
fn sheet_rows_decode_leniently() {
    let snap = snapshot();
    assert_eq!(snap.offers.len(), 6);
    assert_eq!(snap.competitors.len(), 5);
    assert_eq!(snap.offers[0].sessions_included, None);
    assert_eq!(snap.offers[5].competitor_id, None);
    assert_eq!(snap.competitors[1].display_name(), "Bikram Loft");
}

#[test]
fn comparability_is_symmetric_and_bounded_over_real_rows() {
    let snap = snapshot();
    for a in &snap.offers {
        for b in &snap.offers {
            let ab = comparability(a, b);
            assert!(ab <= 100);
            assert_eq!(ab, comparability(b, a));
        }
    }
}

#[test]
fn ranking_over_real_rows() {
    let snap = snapshot();
    let config = EngineConfig::default();
    let own = snap.own_offers(&config.own_studio_id);
    let ranking = rank_competitors(&snap.competitors, &own, &snap.offers, &config);

    let names: Vec<&str> = ranking
        .top
        .iter()
        .map(|r| r.competitor.display_name())
        .collect();
    // the competitor without offers never appears
    assert!(!names.contains(&"No Offers Yet"));
    assert_eq!(names[0], "Hot Flow");
    assert_eq!(ranking.top[0].score, 100);
    // name-joined offers count for a competitor without an id
    assert!(names.contains(&"Reformer Lab"));
}

#[test]
fn recommendation_over_real_rows() {
    let snap = snapshot();
    let config = EngineConfig::default();
    let own = snap.own_offers(&config.own_studio_id);
    let rec = recommend(&own[0], &snap.offers, &config);
    // Hot Flow 20 (100), Bikram Loft 18 (90), Zen Den drop-in 22 (90)
    assert_eq!(rec.comparable_count, 3);
    let market = rec.market.expect("market stats");
    assert_eq!(market.median, 20.0);
    assert_eq!(rec.verdict, Verdict::SlightlyAboveMarket);
    assert_eq!(rec.target_price, Some(20.0));
}

#[test]
fn market_buckets_over_real_rows() {
    let snap = snapshot();
    let buckets = market_buckets(&snap.offers);
    let first = &buckets[0];
    assert_eq!(first.key.offer_type, "drop_in");
    let reformer = buckets
        .iter()
        .find(|b| b.key.class_type == "reformer")
        .expect("reformer bucket");
    assert_eq!(reformer.stats.median, 25.0);
}

#[test]
fn dashboard_is_repeatable_and_serializes() {
    let snap = snapshot();
    let config = EngineConfig::default();
    let pins = PinSet::from_ids(["comp-002"], config.pin_limit);
    let first = build_dashboard(&snap, &pins, Some("comp-003"), &config);
    let second = build_dashboard(&snap, &pins, Some("comp-003"), &config);
    assert_eq!(first, second);

    let json = serde_json::to_value(&first).expect("report serializes");
    assert!(json["ranking"]["top"].is_array());
    assert_eq!(json["position"]["position"], "Premium");
}
