use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::lenient;

/// Strategic relevance bucket assigned to a competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::One => "Tier 1",
            Tier::Two => "Tier 2",
            Tier::Three => "Tier 3",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    /// Accepts `Tier 1`, `tier1`, `T1` and a bare `1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let digits = lower
            .trim_start_matches("tier")
            .trim_start_matches('t')
            .trim();
        match digits {
            "1" => Ok(Tier::One),
            "2" => Ok(Tier::Two),
            "3" => Ok(Tier::Three),
            _ => Err(format!("invalid tier: {s}")),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A studio or brand that competes for the same customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub competitor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Legacy column used by older sheets instead of `name`.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient::parsed", skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub distance_walk_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub distance_bike_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Competitor {
    /// Display name: `name`, then `brand`, then an empty string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.brand.as_deref())
            .unwrap_or_default()
    }

    /// Shortest positive travel time in minutes across walking and cycling.
    ///
    /// Zero is treated as "unknown" because the sheets use it as a placeholder.
    #[must_use]
    pub fn nearest_travel_min(&self) -> Option<f64> {
        [self.distance_walk_min, self.distance_bike_min]
            .into_iter()
            .flatten()
            .filter(|d| *d > 0.0)
            .min_by(f64::total_cmp)
    }

    /// Key used for stable ordering: name, then id.
    #[must_use]
    pub fn sort_key(&self) -> (String, &str) {
        (
            self.display_name().to_lowercase(),
            self.competitor_id.as_deref().unwrap_or_default(),
        )
    }
}
