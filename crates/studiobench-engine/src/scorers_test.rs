use super::*;

fn membership() -> Offer {
    Offer {
        offer_type: Some(OfferType::Membership),
        ..Offer::default()
    }
}

// ---------------------------------------------------------------------------
// share
// ---------------------------------------------------------------------------

#[test]
fn share_rounds_half_up() {
    assert_eq!(share(35, 70), 25);
    assert_eq!(share(25, 50), 13);
    assert_eq!(share(20, 50), 10);
    assert_eq!(share(25, 20), 5);
    assert_eq!(share(15, 30), 5);
}

// ---------------------------------------------------------------------------
// class_type_score
// ---------------------------------------------------------------------------

#[test]
fn class_type_exact_match_ignores_case_and_whitespace() {
    assert_eq!(class_type_score(Some(" Hot_Yoga "), Some("hot_yoga"), 35), 35);
}

#[test]
fn class_type_same_family_scores_seventy_percent() {
    assert_eq!(class_type_score(Some("vinyasa"), Some("hatha"), 35), 25);
    assert_eq!(class_type_score(Some("bikram"), Some("heated_yoga"), 25), 18);
    assert_eq!(class_type_score(Some("reformer"), Some("mat_pilates"), 35), 25);
    assert_eq!(class_type_score(Some("yin"), Some("restorative"), 35), 25);
}

#[test]
fn class_type_different_family_scores_zero() {
    assert_eq!(class_type_score(Some("vinyasa"), Some("bikram"), 35), 0);
    assert_eq!(class_type_score(Some("barre"), Some("spin"), 35), 0);
}

#[test]
fn class_type_missing_side_scores_zero() {
    assert_eq!(class_type_score(None, Some("yoga"), 35), 0);
    assert_eq!(class_type_score(Some("  "), Some("yoga"), 35), 0);
    assert_eq!(class_type_score(None, None, 35), 0);
}

#[test]
fn class_family_lookup() {
    assert_eq!(class_family("power_yoga"), Some(ClassFamily::Yoga));
    assert_eq!(class_family("bikram_26_2"), Some(ClassFamily::HotYoga));
    assert_eq!(class_family("yin_restorative"), Some(ClassFamily::Yin));
    assert_eq!(class_family("boxing"), None);
}

// ---------------------------------------------------------------------------
// heat_score
// ---------------------------------------------------------------------------

#[test]
fn heat_hot_vs_warm_is_half_rounded_up() {
    assert_eq!(heat_score(Some(&HeatLevel::Hot), Some(&HeatLevel::Warm), 25), 13);
    assert_eq!(heat_score(Some(&HeatLevel::Warm), Some(&HeatLevel::Hot), 25), 13);
}

#[test]
fn heat_warm_vs_heated_is_adjacent() {
    assert_eq!(heat_score(Some(&HeatLevel::Heated), Some(&HeatLevel::Warm), 20), 10);
}

#[test]
fn heat_hot_vs_heated_is_not_adjacent() {
    assert_eq!(heat_score(Some(&HeatLevel::Hot), Some(&HeatLevel::Heated), 25), 0);
}

#[test]
fn heat_missing_defaults_to_none() {
    assert_eq!(heat_score(None, Some(&HeatLevel::None), 25), 25);
    assert_eq!(heat_score(None, None, 25), 25);
    assert_eq!(heat_score(None, Some(&HeatLevel::Hot), 25), 0);
}

#[test]
fn heat_free_text_levels_match_exactly() {
    let a = HeatLevel::Other("infrared".to_string());
    let b = HeatLevel::Other("infrared".to_string());
    assert_eq!(heat_score(Some(&a), Some(&b), 25), 25);
}

// ---------------------------------------------------------------------------
// length_score
// ---------------------------------------------------------------------------

#[test]
fn length_exact_tolerant_and_far() {
    assert_eq!(length_score(Some(60.0), Some(60.0), 20), 20);
    assert_eq!(length_score(Some(60.0), Some(75.0), 20), 10);
    assert_eq!(length_score(Some(60.0), Some(90.0), 20), 0);
}

#[test]
fn length_missing_or_non_finite_scores_zero() {
    assert_eq!(length_score(None, Some(60.0), 20), 0);
    assert_eq!(length_score(Some(f64::NAN), Some(60.0), 20), 0);
}

// ---------------------------------------------------------------------------
// offer_type_score
// ---------------------------------------------------------------------------

#[test]
fn offer_type_rules() {
    let pack = Some(OfferType::Pack);
    let bundle = Some(OfferType::Bundle);
    let drop_in = Some(OfferType::DropIn);
    assert_eq!(offer_type_score(pack, pack, 20), 20);
    assert_eq!(offer_type_score(pack, bundle, 20), 10);
    assert_eq!(offer_type_score(bundle, pack, 20), 10);
    assert_eq!(offer_type_score(pack, drop_in, 20), 0);
    assert_eq!(offer_type_score(None, drop_in, 20), 0);
}

// ---------------------------------------------------------------------------
// usage_score
// ---------------------------------------------------------------------------

fn limited(kind: UsageLimit, value: Option<f64>) -> Offer {
    Offer {
        usage_limit_type: Some(kind),
        usage_limit_value: value,
        ..membership()
    }
}

#[test]
fn usage_both_unlimited_scores_full() {
    let a = limited(UsageLimit::Unlimited, None);
    let b = limited(UsageLimit::Unlimited, Some(99.0));
    assert_eq!(usage_score(&a, &b, 25), 25);
}

#[test]
fn usage_same_type_compares_values() {
    let two = limited(UsageLimit::PerWeek, Some(2.0));
    let three = limited(UsageLimit::PerWeek, Some(3.0));
    let eight = limited(UsageLimit::PerWeek, Some(8.0));
    assert_eq!(usage_score(&two, &two, 25), 25);
    assert_eq!(usage_score(&two, &three, 25), 20);
    assert_eq!(usage_score(&two, &eight, 25), 10);
}

#[test]
fn usage_unlimited_vs_limited_scores_twenty_percent() {
    let a = limited(UsageLimit::Unlimited, None);
    let b = limited(UsageLimit::PerMonth, Some(8.0));
    assert_eq!(usage_score(&a, &b, 25), 5);
}

#[test]
fn usage_falls_back_to_sessions() {
    let unlimited = Offer {
        sessions_included: Some(Sessions::Unlimited),
        ..membership()
    };
    let empty = membership();
    let ten = Offer {
        sessions_included: Some(Sessions::Count(10.0)),
        ..membership()
    };
    assert_eq!(usage_score(&unlimited, &empty, 25), 25);
    assert_eq!(usage_score(&ten, &ten, 25), 15);
    assert_eq!(usage_score(&ten, &unlimited, 25), 5);
}

#[test]
fn usage_one_sided_structured_fields_use_fallback() {
    let structured = limited(UsageLimit::Unlimited, None);
    let bare = membership();
    assert_eq!(usage_score(&structured, &bare, 25), 25);
}

// ---------------------------------------------------------------------------
// contract_score
// ---------------------------------------------------------------------------

fn contract(kind: ContractType) -> Offer {
    Offer {
        contract_type: Some(kind),
        ..membership()
    }
}

fn duration(days: f64) -> Offer {
    Offer {
        duration_days: Some(days),
        ..membership()
    }
}

#[test]
fn contract_type_rules() {
    let monthly = contract(ContractType::MonthToMonth);
    let quarterly = contract(ContractType::Quarterly);
    let annual = contract(ContractType::Annual);
    let semi = contract(ContractType::SemiAnnual);
    assert_eq!(contract_score(&monthly, &monthly, 15), 15);
    assert_eq!(contract_score(&monthly, &quarterly, 15), 11);
    assert_eq!(contract_score(&annual, &semi, 15), 11);
    assert_eq!(contract_score(&monthly, &annual, 15), 5);
}

#[test]
fn contract_duration_fallback() {
    assert_eq!(contract_score(&duration(30.0), &duration(30.0), 15), 15);
    assert_eq!(contract_score(&duration(28.0), &duration(30.0), 15), 8);
    assert_eq!(contract_score(&duration(30.0), &duration(365.0), 15), 0);
}

#[test]
fn contract_unknown_duration_is_neutral() {
    assert_eq!(contract_score(&membership(), &duration(30.0), 15), 8);
    assert_eq!(contract_score(&membership(), &membership(), 15), 8);
}
