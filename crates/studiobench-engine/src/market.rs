//! Market buckets: offers grouped by shape, with price statistics per group.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use studiobench_core::Offer;

use crate::pricing::market_price;

/// Min, median and max of a non-empty price list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub count: usize,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl PriceStats {
    /// Compute statistics over `prices`, ignoring non-finite values.
    ///
    /// Returns `None` when no finite price remains.
    #[must_use]
    pub fn from_prices(mut prices: Vec<f64>) -> Option<Self> {
        prices.retain(|p| p.is_finite());
        prices.sort_by(f64::total_cmp);
        let median = median(&prices)?;
        Some(Self {
            count: prices.len(),
            min: prices[0],
            median,
            max: prices[prices.len() - 1],
        })
    }
}

/// Median of an ascending-sorted slice: the mean of the two central values
/// for even lengths.
#[must_use]
pub fn median(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Grouping key of a market bucket. Absent attributes are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BucketKey {
    pub offer_type: String,
    pub class_type: String,
    pub class_length_min: String,
    pub heat: String,
}

impl BucketKey {
    #[must_use]
    pub fn of(offer: &Offer) -> Self {
        Self {
            offer_type: offer
                .offer_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            class_type: offer.class_type.clone().unwrap_or_default(),
            class_length_min: offer
                .class_length_min
                .map(|m| m.to_string())
                .unwrap_or_default(),
            heat: offer
                .heat
                .as_ref()
                .map(|h| h.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketBucket {
    #[serde(flatten)]
    pub key: BucketKey,
    #[serde(flatten)]
    pub stats: PriceStats,
}

fn group_prices<'a>(offers: impl IntoIterator<Item = &'a Offer>) -> BTreeMap<BucketKey, Vec<f64>> {
    let mut groups: BTreeMap<BucketKey, Vec<f64>> = BTreeMap::new();
    for offer in offers {
        let prices = groups.entry(BucketKey::of(offer)).or_default();
        if let Some(price) = market_price(offer) {
            prices.push(price);
        }
    }
    groups
}

/// Group offers into buckets and compute price statistics for each.
///
/// Buckets without a usable price are dropped. Rows are ordered by offer
/// type, then by the remaining key fields.
#[must_use]
pub fn market_buckets<'a>(offers: impl IntoIterator<Item = &'a Offer>) -> Vec<MarketBucket> {
    let buckets: Vec<MarketBucket> = group_prices(offers)
        .into_iter()
        .filter_map(|(key, prices)| {
            PriceStats::from_prices(prices).map(|stats| MarketBucket { key, stats })
        })
        .collect();
    tracing::debug!(buckets = buckets.len(), "computed market buckets");
    buckets
}

/// A selected player's offer priced against its market bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDelta {
    pub player: String,
    pub competitor_id: Option<String>,
    #[serde(flatten)]
    pub key: BucketKey,
    pub selected_price: f64,
    pub market_median: f64,
    /// `selected_price - market_median`, in euros.
    pub delta: f64,
}

/// Compare every offer of the selected competitors against the market
/// median of its bucket.
///
/// The market is built from all `offers`, selected ones included. Offers
/// whose bucket has no prices, or that have no price themselves, are skipped.
#[must_use]
pub fn competitor_benchmark(offers: &[Offer], selected_ids: &HashSet<String>) -> Vec<BenchmarkDelta> {
    if selected_ids.is_empty() {
        return Vec::new();
    }

    let medians: BTreeMap<BucketKey, f64> = group_prices(offers)
        .into_iter()
        .filter_map(|(key, prices)| PriceStats::from_prices(prices).map(|s| (key, s.median)))
        .collect();

    offers
        .iter()
        .filter(|o| {
            o.competitor_id
                .as_ref()
                .is_some_and(|id| selected_ids.contains(id))
        })
        .filter_map(|offer| {
            let key = BucketKey::of(offer);
            let market_median = *medians.get(&key)?;
            let selected_price = market_price(offer)?;
            Some(BenchmarkDelta {
                player: offer
                    .studio
                    .clone()
                    .or_else(|| offer.competitor_id.clone())
                    .unwrap_or_else(|| "Competitor".to_string()),
                competitor_id: offer.competitor_id.clone(),
                key,
                selected_price,
                market_median,
                delta: selected_price - market_median,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "market_test.rs"]
mod tests;
