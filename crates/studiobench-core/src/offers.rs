use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::lenient;

/// Serialize a closed vocabulary value as its canonical string.
macro_rules! serialize_as_str {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OfferType {
    DropIn,
    Pack,
    Membership,
    Intro,
    Bundle,
    Subscription,
    Unknown,
}

impl OfferType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OfferType::DropIn => "drop_in",
            OfferType::Pack => "pack",
            OfferType::Membership => "membership",
            OfferType::Intro => "intro",
            OfferType::Bundle => "bundle",
            OfferType::Subscription => "subscription",
            OfferType::Unknown => "unknown",
        }
    }

    /// Recurring products whose comparability hinges on usage and contract terms.
    #[must_use]
    pub fn is_membership_like(self) -> bool {
        matches!(self, OfferType::Membership | OfferType::Subscription)
    }
}

impl FromStr for OfferType {
    type Err = Infallible;

    /// Never fails: unrecognised text maps to [`OfferType::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "drop_in" | "drop-in" | "dropin" | "single" => OfferType::DropIn,
            "pack" => OfferType::Pack,
            "membership" => OfferType::Membership,
            "intro" | "trial" => OfferType::Intro,
            "bundle" => OfferType::Bundle,
            "subscription" => OfferType::Subscription,
            _ => OfferType::Unknown,
        })
    }
}

serialize_as_str!(OfferType);

/// Room temperature of a class. Unrecognised labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeatLevel {
    None,
    Warm,
    Hot,
    Heated,
    Other(String),
}

impl HeatLevel {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            HeatLevel::None => "none",
            HeatLevel::Warm => "warm",
            HeatLevel::Hot => "hot",
            HeatLevel::Heated => "heated",
            HeatLevel::Other(label) => label,
        }
    }
}

impl FromStr for HeatLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Ok(match lower.as_str() {
            "none" => HeatLevel::None,
            "warm" => HeatLevel::Warm,
            "hot" => HeatLevel::Hot,
            "heated" => HeatLevel::Heated,
            _ => HeatLevel::Other(lower),
        })
    }
}

serialize_as_str!(HeatLevel);

/// How many classes an offer includes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sessions {
    Count(f64),
    Unlimited,
}

impl Sessions {
    /// Positive session count, if any.
    #[must_use]
    pub fn positive_count(self) -> Option<f64> {
        match self {
            Sessions::Count(n) if n > 0.0 => Some(n),
            _ => None,
        }
    }
}

impl FromStr for Sessions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Sessions::Unlimited);
        }
        lenient::parse_number(trimmed)
            .filter(|n| *n >= 0.0)
            .map(Sessions::Count)
            .ok_or_else(|| format!("invalid session count: {trimmed}"))
    }
}

impl Serialize for Sessions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Sessions::Count(n) => serializer.serialize_f64(*n),
            Sessions::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// Structured usage restriction of a membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UsageLimit {
    Unlimited,
    PerWeek,
    PerMonth,
    Other(String),
}

impl UsageLimit {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            UsageLimit::Unlimited => "unlimited",
            UsageLimit::PerWeek => "per_week",
            UsageLimit::PerMonth => "per_month",
            UsageLimit::Other(label) => label,
        }
    }
}

impl FromStr for UsageLimit {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Ok(match lower.as_str() {
            "unlimited" => UsageLimit::Unlimited,
            "per_week" | "weekly" => UsageLimit::PerWeek,
            "per_month" | "monthly" => UsageLimit::PerMonth,
            _ => UsageLimit::Other(lower),
        })
    }
}

serialize_as_str!(UsageLimit);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractType {
    MonthToMonth,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl ContractType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::MonthToMonth => "month_to_month",
            ContractType::Quarterly => "quarterly",
            ContractType::SemiAnnual => "semi_annual",
            ContractType::Annual => "annual",
        }
    }

    /// Month-to-month and quarterly terms; the rest are committed terms.
    #[must_use]
    pub fn is_flexible(self) -> bool {
        matches!(self, ContractType::MonthToMonth | ContractType::Quarterly)
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month_to_month" | "month-to-month" | "monthly" => Ok(ContractType::MonthToMonth),
            "quarterly" => Ok(ContractType::Quarterly),
            "semi_annual" | "semi-annual" => Ok(ContractType::SemiAnnual),
            "annual" | "yearly" => Ok(ContractType::Annual),
            other => Err(format!("unknown contract type: {other}")),
        }
    }
}

serialize_as_str!(ContractType);

/// Billing period the listed price refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceUnit {
    Class,
    Week,
    Month,
    FourWeeks,
    SixMonths,
    Year,
}

impl PriceUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PriceUnit::Class => "class",
            PriceUnit::Week => "week",
            PriceUnit::Month => "month",
            PriceUnit::FourWeeks => "4_weeks",
            PriceUnit::SixMonths => "6_months",
            PriceUnit::Year => "year",
        }
    }

    /// Human-readable period, as shown next to a price.
    #[must_use]
    pub fn period_label(self) -> &'static str {
        match self {
            PriceUnit::Class => "per class",
            PriceUnit::Week => "per week",
            PriceUnit::Month => "per month",
            PriceUnit::FourWeeks => "per 4 weeks",
            PriceUnit::SixMonths => "per 6 months",
            PriceUnit::Year => "per year",
        }
    }
}

impl FromStr for PriceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "class" => Ok(PriceUnit::Class),
            "week" => Ok(PriceUnit::Week),
            "month" => Ok(PriceUnit::Month),
            "4_weeks" => Ok(PriceUnit::FourWeeks),
            "6_months" => Ok(PriceUnit::SixMonths),
            "year" => Ok(PriceUnit::Year),
            other => Err(format!("unknown price unit: {other}")),
        }
    }
}

serialize_as_str!(PriceUnit);

/// A priced product sold by one studio.
///
/// Every attribute is optional: rows come from hand-maintained sheets and
/// the engine treats an absent value as "no signal" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Owning competitor, or the configured own-studio id.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub competitor_id: Option<String>,
    /// Studio display name; the join key when `competitor_id` is missing.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(
        default,
        alias = "offer",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub offer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub offer_type: Option<OfferType>,
    /// Free-text category such as `vinyasa` or `hot_yoga`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub class_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub heat: Option<HeatLevel>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub class_length_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub sessions_included: Option<Sessions>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub price_eur: Option<f64>,
    /// Per-class price precomputed by the backend, when it could derive one.
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub price_per_class: Option<f64>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub price_unit: Option<PriceUnit>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub usage_limit_type: Option<UsageLimit>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub usage_limit_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

const MAX_NAME_LABEL_CHARS: usize = 80;

impl Offer {
    /// Returns `true` for membership and subscription offers.
    #[must_use]
    pub fn is_membership_like(&self) -> bool {
        self.offer_type.is_some_and(OfferType::is_membership_like)
    }

    /// Returns `true` when the offer belongs to the studio identified by `own_id`.
    #[must_use]
    pub fn is_own(&self, own_id: &str) -> bool {
        self.competitor_id.as_deref() == Some(own_id)
    }

    /// Short display label, preferring the explicit offer name.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(name) = self
            .offer_name
            .as_deref()
            .filter(|n| n.chars().count() <= MAX_NAME_LABEL_CHARS)
        {
            return name.to_string();
        }

        let period = self.period_label();
        match self.offer_type {
            Some(OfferType::DropIn) => "Drop-in class".to_string(),
            Some(OfferType::Intro) => "Intro offer".to_string(),
            Some(OfferType::Membership) => match period {
                Some(p) => format!("Membership ({p})"),
                None => "Membership".to_string(),
            },
            Some(OfferType::Pack) => match (self.sessions_included, period) {
                (Some(Sessions::Count(n)), Some(p)) => format!("{n}-class pack ({p})"),
                (Some(Sessions::Count(n)), None) => format!("{n}-class pack"),
                _ => "Offer".to_string(),
            },
            _ => self.offer_name.clone().unwrap_or_else(|| "Offer".to_string()),
        }
    }

    /// Validity period as a compact label (`4w`, `12mo`, `per month`).
    #[must_use]
    pub fn period_label(&self) -> Option<String> {
        if let Some(days) = self.duration_days {
            #[allow(clippy::float_cmp)]
            let label = match days {
                d if d == 7.0 => "1w".to_string(),
                d if d == 28.0 => "4w".to_string(),
                d if d == 30.0 => "1mo".to_string(),
                d if d == 90.0 => "3mo".to_string(),
                d if d == 180.0 => "6mo".to_string(),
                d if d == 365.0 => "12mo".to_string(),
                d => format!("{d}d"),
            };
            return Some(label);
        }
        self.price_unit.map(|u| u.period_label().to_string())
    }
}

#[cfg(test)]
#[path = "offers_test.rs"]
mod tests;
