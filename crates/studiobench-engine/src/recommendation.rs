//! Per-offer pricing recommendations and the overall market position.

use serde::Serialize;
use studiobench_core::{EngineConfig, Offer};

use crate::comparability::comparability;
use crate::market::PriceStats;
use crate::pricing::price_per_class;

/// Deviation from the median (percent) still considered competitive.
const COMPETITIVE_BAND_PCT: f64 = 5.0;
/// Deviation beyond which an offer is well above or below the market.
const WIDE_BAND_PCT: f64 = 15.0;
const LOWER_TARGET_FACTOR: f64 = 0.95;
const RAISE_TARGET_FACTOR: f64 = 1.05;
/// Average price deviation that separates premium and value positions.
const POSITION_BAND_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Competitive,
    WellAboveMarket,
    SlightlyAboveMarket,
    WellBelowMarket,
    SlightlyBelowMarket,
    /// No competitor offer met the comparability threshold with a usable price.
    NoComparableOffers,
    /// Comparables exist but the own offer has no per-class price.
    UnpricedOffer,
}

impl Verdict {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Competitive => "Competitive",
            Verdict::WellAboveMarket => "Above market",
            Verdict::SlightlyAboveMarket => "Slightly above market",
            Verdict::WellBelowMarket => "Below market",
            Verdict::SlightlyBelowMarket => "Slightly below market",
            Verdict::NoComparableOffers => "No comparable offers found",
            Verdict::UnpricedOffer => "Own price unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Suggested per-class price range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub offer_label: String,
    pub own_offer: Offer,
    pub comparable_count: usize,
    /// Per-class statistics of the comparable offers.
    pub market: Option<PriceStats>,
    pub own_price_per_class: Option<f64>,
    pub delta_percent: Option<f64>,
    pub verdict: Verdict,
    pub action: String,
    /// Price the owner should move toward (the current price when competitive).
    pub target_price: Option<f64>,
    pub suggested_range: Option<PriceRange>,
    pub confidence: Confidence,
}

/// Recommend a price for one own offer.
///
/// Comparable offers are the non-own offers scoring at least the configured
/// threshold against `own`; only those with a positive per-class price count.
#[must_use]
pub fn recommend(own: &Offer, offers: &[Offer], config: &EngineConfig) -> Recommendation {
    let classes = config.unlimited_classes_per_month;
    let prices: Vec<f64> = offers
        .iter()
        .filter(|o| !o.is_own(&config.own_studio_id))
        .filter(|o| comparability(own, o) >= config.recommendation_threshold)
        .filter_map(|o| price_per_class(o, classes))
        .collect();

    let own_price = price_per_class(own, classes);
    let base = Recommendation {
        offer_label: own.label(),
        own_offer: own.clone(),
        comparable_count: prices.len(),
        market: None,
        own_price_per_class: own_price,
        delta_percent: None,
        verdict: Verdict::NoComparableOffers,
        action: "Collect more competitor offers of this shape".to_string(),
        target_price: None,
        suggested_range: None,
        confidence: Confidence::Low,
    };

    let Some(stats) = PriceStats::from_prices(prices) else {
        return base;
    };

    let confidence = if stats.count >= config.high_confidence_min_comparables {
        Confidence::High
    } else {
        Confidence::Medium
    };

    let Some(own_price) = own_price else {
        return Recommendation {
            market: Some(stats),
            verdict: Verdict::UnpricedOffer,
            action: format!(
                "Market median is EUR {:.2} per class; add a price to compare",
                stats.median
            ),
            target_price: Some(stats.median),
            confidence,
            ..base
        };
    };

    let median = stats.median;
    let delta_percent = (own_price - median) / median * 100.0;
    let (verdict, action, range) = classify(delta_percent, own_price, median);
    let target_price = if verdict == Verdict::Competitive {
        own_price
    } else {
        median
    };

    Recommendation {
        market: Some(stats),
        delta_percent: Some(delta_percent),
        verdict,
        action,
        target_price: Some(target_price),
        suggested_range: Some(range),
        confidence,
        ..base
    }
}

fn classify(delta_percent: f64, own_price: f64, median: f64) -> (Verdict, String, PriceRange) {
    if delta_percent.abs() < COMPETITIVE_BAND_PCT {
        (
            Verdict::Competitive,
            "Maintain current pricing".to_string(),
            PriceRange {
                low: own_price,
                high: own_price,
            },
        )
    } else if delta_percent > WIDE_BAND_PCT {
        let low = median * LOWER_TARGET_FACTOR;
        (
            Verdict::WellAboveMarket,
            format!("Consider reducing to EUR {low:.2}-{median:.2} per class"),
            PriceRange { low, high: median },
        )
    } else if delta_percent > 0.0 {
        (
            Verdict::SlightlyAboveMarket,
            format!("Consider EUR {median:.2} per class or emphasize premium value"),
            PriceRange {
                low: median,
                high: median,
            },
        )
    } else if delta_percent < -WIDE_BAND_PCT {
        let high = median * RAISE_TARGET_FACTOR;
        (
            Verdict::WellBelowMarket,
            format!("Opportunity to increase to EUR {median:.2}-{high:.2} per class"),
            PriceRange { low: median, high },
        )
    } else {
        (
            Verdict::SlightlyBelowMarket,
            format!("Consider increasing to EUR {median:.2} per class"),
            PriceRange {
                low: median,
                high: median,
            },
        )
    }
}

/// Recommend prices for every own offer, in input order.
#[must_use]
pub fn recommend_all(
    own_offers: &[Offer],
    offers: &[Offer],
    config: &EngineConfig,
) -> Vec<Recommendation> {
    own_offers
        .iter()
        .map(|own| recommend(own, offers, config))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketPosition {
    Premium,
    #[serde(rename = "Mid-Market")]
    MidMarket,
    Value,
}

impl MarketPosition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MarketPosition::Premium => "Premium",
            MarketPosition::MidMarket => "Mid-Market",
            MarketPosition::Value => "Value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSummary {
    pub own_average: f64,
    pub market_average: f64,
    pub delta_percent: f64,
    pub position: MarketPosition,
}

/// Mean own per-class price against the mean competitor per-class price.
///
/// Returns `None` when either side has no priced offers.
#[must_use]
pub fn overall_position(
    own_offers: &[Offer],
    offers: &[Offer],
    config: &EngineConfig,
) -> Option<PositionSummary> {
    let classes = config.unlimited_classes_per_month;
    let own_average = mean(own_offers.iter().filter_map(|o| price_per_class(o, classes)))?;
    let market_average = mean(
        offers
            .iter()
            .filter(|o| !o.is_own(&config.own_studio_id))
            .filter_map(|o| price_per_class(o, classes)),
    )?;

    let delta_percent = (own_average - market_average) / market_average * 100.0;
    let position = if delta_percent > POSITION_BAND_PCT {
        MarketPosition::Premium
    } else if delta_percent < -POSITION_BAND_PCT {
        MarketPosition::Value
    } else {
        MarketPosition::MidMarket
    };

    Some(PositionSummary {
        own_average,
        market_average,
        delta_percent,
        position,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

#[cfg(test)]
#[path = "recommendation_test.rs"]
mod tests;
