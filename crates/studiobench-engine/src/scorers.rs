//! Field scorers.
//!
//! Each scorer compares one attribute of two offers and awards between `0`
//! and `max_points`. Missing values carry no signal and score `0` unless a
//! scorer documents a neutral default.

use studiobench_core::{ContractType, HeatLevel, Offer, OfferType, Sessions, UsageLimit};

/// Class-length difference (minutes) still worth half the points.
const LENGTH_TOLERANCE_MIN: f64 = 15.0;
/// Contract-duration difference (days) still worth half the points.
const DURATION_TOLERANCE_DAYS: f64 = 7.0;

/// `percent` of `max_points`, rounded half up.
///
/// Integer arithmetic keeps `.5` cases exact: 70% of 35 is 24.5 and rounds to 25.
#[must_use]
pub fn share(max_points: u32, percent: u32) -> u32 {
    (max_points * percent + 50) / 100
}

/// Group of class types that count as near-equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFamily {
    Yoga,
    HotYoga,
    Pilates,
    Yin,
}

/// Look up the synonym family of a class type. Expects trimmed lowercase input.
#[must_use]
pub fn class_family(class_type: &str) -> Option<ClassFamily> {
    match class_type {
        "yoga" | "vinyasa" | "vinyasa_flow" | "hatha" | "power_yoga" => Some(ClassFamily::Yoga),
        "hot_yoga" | "heated_yoga" | "bikram" | "bikram_26_2" => Some(ClassFamily::HotYoga),
        "pilates" | "reformer" | "reformer_pilates" | "mat_pilates" => Some(ClassFamily::Pilates),
        "yin" | "yin_restorative" | "restorative" => Some(ClassFamily::Yin),
        _ => None,
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Exact match scores full points; same synonym family scores 70%.
#[must_use]
pub fn class_type_score(a: Option<&str>, b: Option<&str>, max_points: u32) -> u32 {
    let (Some(a), Some(b)) = (normalized(a), normalized(b)) else {
        return 0;
    };
    if a == b {
        return max_points;
    }
    match (class_family(&a), class_family(&b)) {
        (Some(fa), Some(fb)) if fa == fb => share(max_points, 70),
        _ => 0,
    }
}

/// Missing heat counts as `none`. Hot/warm and warm/heated are adjacent (50%).
#[must_use]
pub fn heat_score(a: Option<&HeatLevel>, b: Option<&HeatLevel>, max_points: u32) -> u32 {
    let a = a.unwrap_or(&HeatLevel::None);
    let b = b.unwrap_or(&HeatLevel::None);
    if a == b {
        return max_points;
    }
    match (a, b) {
        (HeatLevel::Hot, HeatLevel::Warm)
        | (HeatLevel::Warm, HeatLevel::Hot)
        | (HeatLevel::Warm, HeatLevel::Heated)
        | (HeatLevel::Heated, HeatLevel::Warm) => share(max_points, 50),
        _ => 0,
    }
}

#[must_use]
#[allow(clippy::float_cmp)]
pub fn length_score(a: Option<f64>, b: Option<f64>, max_points: u32) -> u32 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0;
    };
    if !a.is_finite() || !b.is_finite() {
        return 0;
    }
    if a == b {
        max_points
    } else if (a - b).abs() <= LENGTH_TOLERANCE_MIN {
        share(max_points, 50)
    } else {
        0
    }
}

/// Exact type match scores full points; pack against bundle scores 50%.
#[must_use]
pub fn offer_type_score(a: Option<OfferType>, b: Option<OfferType>, max_points: u32) -> u32 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0;
    };
    if a == b {
        return max_points;
    }
    let pack_like = |t: OfferType| matches!(t, OfferType::Pack | OfferType::Bundle);
    if pack_like(a) && pack_like(b) {
        share(max_points, 50)
    } else {
        0
    }
}

/// Usage restriction of two memberships.
///
/// Uses `usage_limit_type`/`usage_limit_value` when both offers carry a type,
/// otherwise falls back to a coarse limited/unlimited check on
/// `sessions_included`.
#[must_use]
pub fn usage_score(a: &Offer, b: &Offer, max_points: u32) -> u32 {
    match (&a.usage_limit_type, &b.usage_limit_type) {
        (Some(ta), Some(tb)) => {
            structured_usage_score(ta, a.usage_limit_value, tb, b.usage_limit_value, max_points)
        }
        _ => sessions_usage_score(a.sessions_included, b.sessions_included, max_points),
    }
}

#[allow(clippy::float_cmp)]
fn structured_usage_score(
    type_a: &UsageLimit,
    value_a: Option<f64>,
    type_b: &UsageLimit,
    value_b: Option<f64>,
    max_points: u32,
) -> u32 {
    match (type_a, type_b) {
        (UsageLimit::Unlimited, UsageLimit::Unlimited) => max_points,
        (ta, tb) if ta == tb => match (value_a, value_b) {
            (None, None) => max_points,
            (Some(va), Some(vb)) if va == vb => max_points,
            (Some(va), Some(vb)) if (va - vb).abs() <= 1.0 => share(max_points, 80),
            _ => share(max_points, 40),
        },
        _ => share(max_points, 20),
    }
}

fn sessions_usage_score(a: Option<Sessions>, b: Option<Sessions>, max_points: u32) -> u32 {
    let is_limited = |s: Option<Sessions>| s.and_then(Sessions::positive_count).is_some();
    match (is_limited(a), is_limited(b)) {
        (false, false) => max_points,
        (true, true) => share(max_points, 60),
        _ => share(max_points, 20),
    }
}

/// Contract terms of two memberships.
///
/// Compares `contract_type` when both offers carry one, otherwise
/// `duration_days`. An unknown duration is neutral (50%).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn contract_score(a: &Offer, b: &Offer, max_points: u32) -> u32 {
    if let (Some(ca), Some(cb)) = (a.contract_type, b.contract_type) {
        return contract_type_score(ca, cb, max_points);
    }
    match (a.duration_days, b.duration_days) {
        (Some(da), Some(db)) if da == db => max_points,
        (Some(da), Some(db)) if (da - db).abs() <= DURATION_TOLERANCE_DAYS => {
            share(max_points, 50)
        }
        (Some(_), Some(_)) => 0,
        _ => share(max_points, 50),
    }
}

fn contract_type_score(a: ContractType, b: ContractType, max_points: u32) -> u32 {
    if a == b {
        max_points
    } else if a.is_flexible() == b.is_flexible() {
        share(max_points, 70)
    } else {
        share(max_points, 30)
    }
}

#[cfg(test)]
#[path = "scorers_test.rs"]
mod tests;
