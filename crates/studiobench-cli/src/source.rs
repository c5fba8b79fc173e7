//! Where a command's snapshot comes from: a directory of JSON exports or the
//! live backend.

use anyhow::Context;
use studiobench_client::BackendClient;
use studiobench_core::{load_snapshot_dir, AppConfig, Snapshot};

pub(crate) struct LoadedSnapshot {
    pub(crate) snapshot: Snapshot,
    /// Human-readable origin, echoed in JSON output.
    pub(crate) source: String,
    /// One entry per backend read that failed.
    pub(crate) warnings: Vec<String>,
}

/// Load the snapshot for one command run.
///
/// A configured data directory wins over the backend. Backend reads that fail
/// leave their part empty and are reported as warnings; the command still
/// runs on whatever arrived.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read or the backend
/// client cannot be built.
pub(crate) async fn load_snapshot(config: &AppConfig) -> anyhow::Result<LoadedSnapshot> {
    if let Some(dir) = &config.data_dir {
        let snapshot = load_snapshot_dir(dir)
            .with_context(|| format!("failed to load snapshot from {}", dir.display()))?;
        return Ok(LoadedSnapshot {
            snapshot,
            source: format!("directory {}", dir.display()),
            warnings: Vec::new(),
        });
    }

    let client = backend_client(config)?;
    let fetch = client.fetch_snapshot().await;
    let warnings: Vec<String> = fetch
        .failures
        .iter()
        .map(|f| format!("{} unavailable: {}", f.part, f.message))
        .collect();

    if fetch.snapshot.is_empty() && !warnings.is_empty() {
        tracing::warn!(
            backend_url = %config.backend_url,
            "backend returned no data; results will be empty"
        );
    }

    Ok(LoadedSnapshot {
        snapshot: fetch.snapshot,
        source: format!("backend {}", client.base_url()),
        warnings,
    })
}

pub(crate) fn backend_client(config: &AppConfig) -> anyhow::Result<BackendClient> {
    BackendClient::from_config(config)
        .with_context(|| format!("failed to build backend client for {}", config.backend_url))
}
