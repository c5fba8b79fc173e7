//! Competitor ranking by similarity to the own studio.

use serde::Serialize;
use studiobench_core::{Competitor, EngineConfig, Offer, Tier};

use crate::comparability::{comparability, HIGH_BAND_MIN};

const SEGMENT_BONUS: f64 = 10.0;
const TIER_ONE_BONUS: f64 = 15.0;
const TIER_TWO_BONUS: f64 = 10.0;
const NEAR_BONUS: f64 = 10.0;
const CLOSE_BONUS: f64 = 5.0;
const NEAR_MAX_MIN: f64 = 15.0;
const CLOSE_MAX_MIN: f64 = 25.0;
const MAX_SCORE: f64 = 100.0;

/// Offers sold by `competitor`.
///
/// When both the offer and the competitor carry an id, the ids decide: an
/// offer listed under a different id never joins, even if its studio name
/// matches. When either side has no id, the offer joins if its studio name
/// equals the competitor's display name (trimmed, case-insensitive).
pub fn offers_of<'a>(
    competitor: &'a Competitor,
    offers: &'a [Offer],
) -> impl Iterator<Item = &'a Offer> + 'a {
    let name = competitor.display_name().trim().to_lowercase();
    offers.iter().filter(move |offer| {
        match (offer.competitor_id.as_deref(), competitor.competitor_id.as_deref()) {
            (Some(offer_id), Some(id)) => offer_id == id,
            _ => {
                !name.is_empty()
                    && offer
                        .studio
                        .as_deref()
                        .is_some_and(|studio| studio.trim().to_lowercase() == name)
            }
        }
    })
}

/// How a similarity score was composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    /// Mean comparability over every own-offer by competitor-offer pair.
    pub avg_comparability: f64,
    pub pair_count: usize,
    /// Pairs in the high comparability band.
    pub high_matches: usize,
    pub segment_bonus: f64,
    pub tier_bonus: f64,
    pub distance_bonus: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Similarity {
    pub score: u8,
    pub breakdown: SimilarityBreakdown,
}

/// Similarity of a competitor to the own studio, in `[0, 100]`.
///
/// A competitor without offers, or an own studio without offers, scores `0`.
#[must_use]
pub fn similarity(
    competitor: &Competitor,
    own_offers: &[Offer],
    offers: &[Offer],
    config: &EngineConfig,
) -> Similarity {
    let theirs: Vec<&Offer> = offers_of(competitor, offers).collect();
    if theirs.is_empty() || own_offers.is_empty() {
        return Similarity::default();
    }

    let mut total = 0_u64;
    let mut high_matches = 0_usize;
    for own in own_offers {
        for other in &theirs {
            let score = comparability(own, other);
            total += u64::from(score);
            if score >= HIGH_BAND_MIN {
                high_matches += 1;
            }
        }
    }
    let pair_count = own_offers.len() * theirs.len();
    #[allow(clippy::cast_precision_loss)]
    let avg_comparability = total as f64 / pair_count as f64;

    let breakdown = SimilarityBreakdown {
        avg_comparability,
        pair_count,
        high_matches,
        segment_bonus: segment_bonus(competitor, &config.segment_keywords),
        tier_bonus: tier_bonus(competitor.tier),
        distance_bonus: distance_bonus(competitor.nearest_travel_min()),
    };

    let raw = avg_comparability
        + breakdown.segment_bonus
        + breakdown.tier_bonus
        + breakdown.distance_bonus;

    Similarity {
        score: to_score(raw),
        breakdown,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_score(raw: f64) -> u8 {
    // clamped to [0, 100] first, so the cast cannot truncate
    (raw.clamp(0.0, MAX_SCORE) + 0.5).floor() as u8
}

fn segment_bonus(competitor: &Competitor, keywords: &[String]) -> f64 {
    let segment = competitor
        .segment
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let matched = keywords
        .iter()
        .any(|k| !k.is_empty() && segment.contains(&k.to_lowercase()));
    if matched {
        SEGMENT_BONUS
    } else {
        0.0
    }
}

fn tier_bonus(tier: Option<Tier>) -> f64 {
    match tier {
        Some(Tier::One) => TIER_ONE_BONUS,
        Some(Tier::Two) => TIER_TWO_BONUS,
        _ => 0.0,
    }
}

fn distance_bonus(nearest_min: Option<f64>) -> f64 {
    match nearest_min {
        Some(d) if d < NEAR_MAX_MIN => NEAR_BONUS,
        Some(d) if d < CLOSE_MAX_MIN => CLOSE_BONUS,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCompetitor {
    pub rank: usize,
    pub competitor: Competitor,
    pub score: u8,
    pub breakdown: SimilarityBreakdown,
    pub pin_worthy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    /// Highest-scoring competitors, best first.
    pub top: Vec<RankedCompetitor>,
    /// Ids offered to the bulk "pin top" action.
    pub pin_worthy_ids: Vec<String>,
}

/// Rank competitors by similarity.
///
/// Zero scores are dropped. Ties are broken by name, then id, so the order is
/// stable for a fixed input. The own studio is never ranked against itself.
#[must_use]
pub fn rank_competitors(
    competitors: &[Competitor],
    own_offers: &[Offer],
    offers: &[Offer],
    config: &EngineConfig,
) -> Ranking {
    let mut scored: Vec<(&Competitor, Similarity)> = competitors
        .iter()
        .filter(|c| c.competitor_id.as_deref() != Some(config.own_studio_id.as_str()))
        .map(|c| (c, similarity(c, own_offers, offers, config)))
        .filter(|(_, s)| s.score > 0)
        .collect();

    scored.sort_by(|(a, sa), (b, sb)| {
        sb.score
            .cmp(&sa.score)
            .then_with(|| a.sort_key().cmp(&b.sort_key()))
    });

    let top: Vec<RankedCompetitor> = scored
        .into_iter()
        .take(config.ranking_display_limit)
        .enumerate()
        .map(|(index, (competitor, sim))| RankedCompetitor {
            rank: index + 1,
            competitor: competitor.clone(),
            score: sim.score,
            breakdown: sim.breakdown,
            pin_worthy: index < config.pin_worthy_limit,
        })
        .collect();

    let pin_worthy_ids = top
        .iter()
        .filter(|r| r.pin_worthy)
        .filter_map(|r| r.competitor.competitor_id.clone())
        .collect();

    tracing::debug!(
        competitors = competitors.len(),
        ranked = top.len(),
        "ranked competitors"
    );

    Ranking {
        top,
        pin_worthy_ids,
    }
}

#[cfg(test)]
#[path = "ranking_test.rs"]
mod tests;
