//! Data model, wire decoding and configuration shared by the studiobench crates.

pub mod app_config;
pub mod competitors;
pub mod config;
pub mod engine_config;
pub mod error;
pub mod lenient;
pub mod offers;
pub mod own_studio;
pub mod snapshot;

pub use app_config::{AppConfig, Environment};
pub use competitors::{Competitor, Tier};
pub use config::{load_app_config, load_app_config_from_env};
pub use engine_config::{load_engine_config, load_engine_config_or_default, EngineConfig};
pub use error::{ConfigError, SnapshotError};
pub use offers::{ContractType, HeatLevel, Offer, OfferType, PriceUnit, Sessions, UsageLimit};
pub use own_studio::{OwnPackage, OwnStudioProfile};
pub use snapshot::{load_snapshot_dir, PinsPayload, Snapshot};
