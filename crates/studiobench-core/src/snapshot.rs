//! Read-only input bundle handed to the engine.
//!
//! A snapshot holds whatever subset of backend data has arrived so far.
//! Any part may be empty; the engine degrades to partial results.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::competitors::Competitor;
use crate::error::SnapshotError;
use crate::offers::Offer;
use crate::own_studio::OwnStudioProfile;

/// Body of `GET`/`POST /api/pins`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinsPayload {
    #[serde(default)]
    pub competitor_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub own_studio: Option<OwnStudioProfile>,
    #[serde(default)]
    pub pinned_ids: Vec<String>,
}

impl Snapshot {
    /// Offers sold by the own studio.
    ///
    /// Listed offers tagged with `own_id` win; when there are none, the
    /// packages of the own-studio profile stand in for them.
    #[must_use]
    pub fn own_offers(&self, own_id: &str) -> Vec<Offer> {
        let listed: Vec<Offer> = self
            .offers
            .iter()
            .filter(|o| o.is_own(own_id))
            .cloned()
            .collect();
        if !listed.is_empty() {
            return listed;
        }
        self.own_studio
            .as_ref()
            .map(|profile| profile.to_offers(own_id))
            .unwrap_or_default()
    }

    /// Offers sold by anyone other than the own studio.
    pub fn competitor_offers<'a>(&'a self, own_id: &'a str) -> impl Iterator<Item = &'a Offer> {
        self.offers.iter().filter(move |o| !o.is_own(own_id))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty() && self.competitors.is_empty() && self.own_studio.is_none()
    }
}

/// Load a snapshot from a directory of JSON exports.
///
/// Reads `offers.json`, `competitors.json`, `own_studio.json` and `pins.json`.
/// Missing files leave that part empty; an own-studio file holding `{}` means
/// no profile.
///
/// # Errors
///
/// Returns [`SnapshotError`] when a present file cannot be read or parsed.
pub fn load_snapshot_dir(dir: &Path) -> Result<Snapshot, SnapshotError> {
    let offers: Vec<Offer> = read_optional(&dir.join("offers.json"))?.unwrap_or_default();
    let competitors: Vec<Competitor> =
        read_optional(&dir.join("competitors.json"))?.unwrap_or_default();
    let own_studio = read_optional::<OwnStudioProfile>(&dir.join("own_studio.json"))?
        .filter(|profile| !profile.is_empty());
    let pins: PinsPayload = read_optional(&dir.join("pins.json"))?.unwrap_or_default();

    tracing::debug!(
        dir = %dir.display(),
        offers = offers.len(),
        competitors = competitors.len(),
        own_studio = own_studio.is_some(),
        pins = pins.competitor_ids.len(),
        "loaded snapshot from directory"
    );

    Ok(Snapshot {
        offers,
        competitors,
        own_studio,
        pinned_ids: pins.competitor_ids,
    })
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SnapshotError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "snapshot file not present, skipping");
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| SnapshotError::Parse {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::OfferType;
    use crate::own_studio::OwnPackage;

    fn offer(competitor_id: &str, offer_type: OfferType) -> Offer {
        Offer {
            competitor_id: Some(competitor_id.to_string()),
            offer_type: Some(offer_type),
            price_eur: Some(20.0),
            ..Offer::default()
        }
    }

    fn profile() -> OwnStudioProfile {
        OwnStudioProfile {
            name: Some("Own".to_string()),
            packages: vec![OwnPackage {
                name: Some("Monthly membership".to_string()),
                price_eur: Some(120.0),
                notes: None,
            }],
            ..OwnStudioProfile::default()
        }
    }

    #[test]
    fn listed_own_offers_take_precedence_over_profile() {
        let snapshot = Snapshot {
            offers: vec![
                offer("our-studio", OfferType::DropIn),
                offer("comp-1", OfferType::DropIn),
            ],
            own_studio: Some(profile()),
            ..Snapshot::default()
        };
        let own = snapshot.own_offers("our-studio");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].offer_type, Some(OfferType::DropIn));
        assert_eq!(snapshot.competitor_offers("our-studio").count(), 1);
    }

    #[test]
    fn profile_packages_fill_in_when_no_own_offers_listed() {
        let snapshot = Snapshot {
            offers: vec![offer("comp-1", OfferType::Pack)],
            own_studio: Some(profile()),
            ..Snapshot::default()
        };
        let own = snapshot.own_offers("our-studio");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].offer_type, Some(OfferType::Membership));
    }

    #[test]
    fn empty_snapshot_has_no_own_offers() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.own_offers("our-studio").is_empty());
    }

    #[test]
    fn load_snapshot_dir_tolerates_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("offers.json"),
            r#"[{"competitor_id": "comp-1", "offer_type": "drop_in", "price_eur": "20"}]"#,
        )
        .expect("write offers");
        std::fs::write(dir.path().join("own_studio.json"), "{}").expect("write own studio");
        std::fs::write(
            dir.path().join("pins.json"),
            r#"{"competitor_ids": ["comp-1"]}"#,
        )
        .expect("write pins");

        let snapshot = load_snapshot_dir(dir.path()).expect("load");
        assert_eq!(snapshot.offers.len(), 1);
        assert!(snapshot.competitors.is_empty());
        assert!(snapshot.own_studio.is_none());
        assert_eq!(snapshot.pinned_ids, vec!["comp-1"]);
    }

    #[test]
    fn load_snapshot_dir_reports_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("competitors.json"), "not json").expect("write");
        let err = load_snapshot_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { ref path, .. } if path.ends_with("competitors.json")));
    }
}
