//! Async client for the pricing backend's REST API.

pub mod client;
pub mod error;
pub(crate) mod retry;

pub use client::{BackendClient, FetchFailure, SnapshotFetch, SnapshotPart};
pub use error::ClientError;
