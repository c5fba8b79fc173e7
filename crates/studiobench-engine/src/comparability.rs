//! Comparability of two offers on a 0 to 100 scale.
//!
//! Membership pairs are weighted toward usage and contract terms; every
//! other pair (including membership against drop-in) is weighted toward the
//! physical class attributes and the offer structure.

use serde::Serialize;
use studiobench_core::Offer;

use crate::scorers::{
    class_type_score, contract_score, heat_score, length_score, offer_type_score, usage_score,
};

/// Scores at or above this are shown as directly comparable.
pub const HIGH_BAND_MIN: u8 = 85;
/// Scores at or above this (and below [`HIGH_BAND_MIN`]) are partially comparable.
pub const MEDIUM_BAND_MIN: u8 = 60;

const MEMBERSHIP_WEIGHTS: [(Field, u32); 5] = [
    (Field::ClassType, 25),
    (Field::Heat, 20),
    (Field::Length, 15),
    (Field::Usage, 25),
    (Field::Contract, 15),
];

const STANDARD_WEIGHTS: [(Field, u32); 4] = [
    (Field::ClassType, 35),
    (Field::Heat, 25),
    (Field::Length, 20),
    (Field::OfferType, 20),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    Membership,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ClassType,
    Heat,
    Length,
    OfferType,
    Usage,
    Contract,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::ClassType => "class_type",
            Field::Heat => "heat",
            Field::Length => "length",
            Field::OfferType => "offer_type",
            Field::Usage => "usage",
            Field::Contract => "contract",
        }
    }

    fn score(self, a: &Offer, b: &Offer, max_points: u32) -> u32 {
        match self {
            Field::ClassType => {
                class_type_score(a.class_type.as_deref(), b.class_type.as_deref(), max_points)
            }
            Field::Heat => heat_score(a.heat.as_ref(), b.heat.as_ref(), max_points),
            Field::Length => length_score(a.class_length_min, b.class_length_min, max_points),
            Field::OfferType => offer_type_score(a.offer_type, b.offer_type, max_points),
            Field::Usage => usage_score(a, b, max_points),
            Field::Contract => contract_score(a, b, max_points),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldScore {
    pub field: Field,
    pub points: u32,
    pub max_points: u32,
}

/// Per-field contributions behind a comparability score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairBreakdown {
    pub kind: PairKind,
    pub fields: Vec<FieldScore>,
    pub total: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparabilityBand {
    High,
    Medium,
    Low,
}

impl ComparabilityBand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparabilityBand::High => "high",
            ComparabilityBand::Medium => "medium",
            ComparabilityBand::Low => "low",
        }
    }
}

/// Classify a comparability score.
#[must_use]
pub fn comparability_band(score: u8) -> ComparabilityBand {
    if score >= HIGH_BAND_MIN {
        ComparabilityBand::High
    } else if score >= MEDIUM_BAND_MIN {
        ComparabilityBand::Medium
    } else {
        ComparabilityBand::Low
    }
}

/// Score every field of a pair and report each contribution.
#[must_use]
pub fn score_pair(a: &Offer, b: &Offer) -> PairBreakdown {
    let (kind, weights): (PairKind, &[(Field, u32)]) =
        if a.is_membership_like() && b.is_membership_like() {
            (PairKind::Membership, &MEMBERSHIP_WEIGHTS)
        } else {
            (PairKind::Standard, &STANDARD_WEIGHTS)
        };

    let fields: Vec<FieldScore> = weights
        .iter()
        .map(|&(field, max_points)| FieldScore {
            field,
            points: field.score(a, b, max_points),
            max_points,
        })
        .collect();

    let sum: u32 = fields.iter().map(|f| f.points).sum();
    let total = u8::try_from(sum.min(100)).unwrap_or(100);

    PairBreakdown {
        kind,
        fields,
        total,
    }
}

/// Comparability of two offers in `[0, 100]`.
#[must_use]
pub fn comparability(a: &Offer, b: &Offer) -> u8 {
    score_pair(a, b).total
}

/// Like [`comparability`], but a missing side scores `0`.
#[must_use]
pub fn comparability_of(a: Option<&Offer>, b: Option<&Offer>) -> u8 {
    match (a, b) {
        (Some(a), Some(b)) => comparability(a, b),
        _ => 0,
    }
}

#[cfg(test)]
#[path = "comparability_test.rs"]
mod tests;
