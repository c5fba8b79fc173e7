use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::offers::{Offer, OfferType};

/// The studio the dashboard is built for, as published on its pricing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnStudioProfile {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub locations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub proposition: Vec<String>,
    #[serde(default)]
    pub packages: Vec<OwnPackage>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnPackage {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price_eur: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: Option<String>,
}

impl OwnPackage {
    /// Offer type guessed from the package name.
    #[must_use]
    pub fn inferred_offer_type(&self) -> OfferType {
        let name = self.name.as_deref().unwrap_or_default().to_lowercase();
        if name.contains("membership") {
            OfferType::Membership
        } else if name.contains("trial") {
            OfferType::Intro
        } else if name.contains("class") {
            OfferType::Pack
        } else {
            OfferType::Unknown
        }
    }
}

impl OwnStudioProfile {
    /// A profile without a name is what the backend returns when none is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// Convert the published packages into offers owned by `own_id`.
    #[must_use]
    pub fn to_offers(&self, own_id: &str) -> Vec<Offer> {
        self.packages
            .iter()
            .map(|pkg| Offer {
                competitor_id: Some(own_id.to_string()),
                studio: self.name.clone(),
                offer_name: pkg.name.clone(),
                offer_type: Some(pkg.inferred_offer_type()),
                price_eur: pkg.price_eur,
                notes: pkg.notes.clone(),
                ..Offer::default()
            })
            .collect()
    }
}
