//! HTTP client for the studio backend's `/api` endpoints.
//!
//! Every read goes through [`retry_with_backoff`]; transient failures are
//! retried and everything else surfaces as a [`ClientError`].

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use studiobench_core::{AppConfig, Competitor, Offer, OwnStudioProfile, PinsPayload, Snapshot};

use crate::error::ClientError;
use crate::retry::retry_with_backoff;

/// Client for the benchmarking backend.
///
/// Use [`BackendClient::from_config`] in the CLI, or [`BackendClient::new`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    retry_backoff_ms: u64,
}

/// One of the four independent backend reads that make up a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPart {
    Offers,
    Competitors,
    OwnStudio,
    Pins,
}

impl SnapshotPart {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offers => "offers",
            Self::Competitors => "competitors",
            Self::OwnStudio => "own_studio",
            Self::Pins => "pins",
        }
    }
}

impl fmt::Display for SnapshotPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub part: SnapshotPart,
    pub message: String,
}

/// Whatever arrived from the backend, plus the reads that failed.
///
/// Failed parts are left empty in `snapshot`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFetch {
    pub snapshot: Snapshot,
    pub failures: Vec<FetchFailure>,
}

impl SnapshotFetch {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl BackendClient {
    /// Creates a client with retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join("api/..")` appends
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            max_retries: 0,
            retry_backoff_ms: 0,
        })
    }

    /// Creates a client from the application config, retries included.
    ///
    /// # Errors
    ///
    /// See [`BackendClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(Self::new(
            &config.backend_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(config.max_retries, config.retry_backoff_ms))
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, retry_backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/offers`
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not a list of offer rows.
    pub async fn fetch_offers(&self) -> Result<Vec<Offer>, ClientError> {
        self.get_json("offers").await
    }

    /// `GET /api/competitors`
    ///
    /// # Errors
    ///
    /// Same as [`BackendClient::fetch_offers`].
    pub async fn fetch_competitors(&self) -> Result<Vec<Competitor>, ClientError> {
        self.get_json("competitors").await
    }

    /// `GET /api/own_studio`
    ///
    /// The backend answers `{}` when no profile is stored; that maps to `None`.
    ///
    /// # Errors
    ///
    /// Same as [`BackendClient::fetch_offers`].
    pub async fn fetch_own_studio(&self) -> Result<Option<OwnStudioProfile>, ClientError> {
        let profile: OwnStudioProfile = self.get_json("own_studio").await?;
        Ok(Some(profile).filter(|p| !p.is_empty()))
    }

    /// `GET /api/pins`
    ///
    /// # Errors
    ///
    /// Same as [`BackendClient::fetch_offers`].
    pub async fn fetch_pins(&self) -> Result<Vec<String>, ClientError> {
        let payload: PinsPayload = self.get_json("pins").await?;
        Ok(payload.competitor_ids)
    }

    /// `POST /api/pins`, replacing the stored list.
    ///
    /// Returns the list as the backend stored it, which may be truncated.
    ///
    /// # Errors
    ///
    /// Same as [`BackendClient::fetch_offers`].
    pub async fn save_pins(&self, ids: &[String]) -> Result<Vec<String>, ClientError> {
        let body = PinsPayload {
            competitor_ids: ids.to_vec(),
        };
        let stored: PinsPayload = self.send_json(Method::POST, "pins", Some(&body)).await?;
        tracing::info!(
            requested = ids.len(),
            stored = stored.competitor_ids.len(),
            "saved pinned competitors"
        );
        Ok(stored.competitor_ids)
    }

    /// Issue all four reads concurrently and keep whatever succeeds.
    ///
    /// A failed read is logged and recorded in [`SnapshotFetch::failures`];
    /// it never aborts the other reads.
    pub async fn fetch_snapshot(&self) -> SnapshotFetch {
        let (offers, competitors, own_studio, pins) = tokio::join!(
            self.fetch_offers(),
            self.fetch_competitors(),
            self.fetch_own_studio(),
            self.fetch_pins(),
        );

        let mut failures = Vec::new();
        let snapshot = Snapshot {
            offers: settle(SnapshotPart::Offers, offers, &mut failures).unwrap_or_default(),
            competitors: settle(SnapshotPart::Competitors, competitors, &mut failures)
                .unwrap_or_default(),
            own_studio: settle(SnapshotPart::OwnStudio, own_studio, &mut failures).flatten(),
            pinned_ids: settle(SnapshotPart::Pins, pins, &mut failures).unwrap_or_default(),
        };

        tracing::debug!(
            offers = snapshot.offers.len(),
            competitors = snapshot.competitors.len(),
            own_studio = snapshot.own_studio.is_some(),
            pins = snapshot.pinned_ids.len(),
            failures = failures.len(),
            "fetched snapshot from backend"
        );

        SnapshotFetch { snapshot, failures }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(&format!("api/{path}"))
            .map_err(|e| ClientError::InvalidUrl {
                url: format!("{}api/{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json::<T, ()>(Method::GET, path, None).await
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let context = format!("{method} /api/{path}");
        retry_with_backoff(&context, self.max_retries, self.retry_backoff_ms, || {
            self.request_json(method.clone(), &url, body, &context)
        })
        .await
    }

    async fn request_json<T, B>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&B>,
        context: &str,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

fn settle<T>(
    part: SnapshotPart,
    result: Result<T, ClientError>,
    failures: &mut Vec<FetchFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(part = part.as_str(), error = %err, "backend read failed");
            failures.push(FetchFailure {
                part,
                message: err.to_string(),
            });
            None
        }
    }
}
