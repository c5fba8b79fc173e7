use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Tunables for the comparability engine.
///
/// Every field defaults to the documented constant, so a YAML file only needs
/// to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// `competitor_id` that marks offers sold by the own studio.
    pub own_studio_id: String,
    /// Minimum comparability for an offer to count toward a recommendation.
    pub recommendation_threshold: u8,
    /// Comparable count at which a recommendation is high confidence.
    pub high_confidence_min_comparables: usize,
    pub ranking_display_limit: usize,
    pub pin_worthy_limit: usize,
    /// Segment substrings that earn the segment bonus in ranking.
    pub segment_keywords: Vec<String>,
    /// Reference usage assumed for unlimited memberships.
    pub unlimited_classes_per_month: u32,
    pub pin_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            own_studio_id: "our-studio".to_string(),
            recommendation_threshold: 70,
            high_confidence_min_comparables: 5,
            ranking_display_limit: 10,
            pin_worthy_limit: 5,
            segment_keywords: vec!["hot".to_string(), "yoga".to_string(), "boutique".to_string()],
            unlimited_classes_per_month: 12,
            pin_limit: 10,
        }
    }
}

/// Load and validate engine tunables from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::EngineFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: EngineConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::EngineFileParse)?;

    validate_engine_config(&config)?;

    Ok(config)
}

/// Like [`load_engine_config`], but a missing file yields the defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_engine_config_or_default(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        tracing::info!(
            path = %path.display(),
            "engine config not found, using defaults"
        );
        return Ok(EngineConfig::default());
    }
    load_engine_config(path)
}

fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.own_studio_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "own_studio_id must be non-empty".to_string(),
        ));
    }

    if config.recommendation_threshold > 100 {
        return Err(ConfigError::Validation(format!(
            "recommendation_threshold {} exceeds 100",
            config.recommendation_threshold
        )));
    }

    for (name, value) in [
        ("ranking_display_limit", config.ranking_display_limit),
        ("pin_worthy_limit", config.pin_worthy_limit),
        ("pin_limit", config.pin_limit),
        (
            "high_confidence_min_comparables",
            config.high_confidence_min_comparables,
        ),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!("{name} must be at least 1")));
        }
    }

    if config.pin_worthy_limit > config.ranking_display_limit {
        return Err(ConfigError::Validation(format!(
            "pin_worthy_limit {} exceeds ranking_display_limit {}",
            config.pin_worthy_limit, config.ranking_display_limit
        )));
    }

    if config.pin_worthy_limit > config.pin_limit {
        return Err(ConfigError::Validation(format!(
            "pin_worthy_limit {} exceeds pin_limit {}",
            config.pin_worthy_limit, config.pin_limit
        )));
    }

    if config.unlimited_classes_per_month == 0 {
        return Err(ConfigError::Validation(
            "unlimited_classes_per_month must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        validate_engine_config(&EngineConfig::default()).expect("defaults are valid");
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("own_studio_id: hotyoga-central\npin_limit: 8\n").expect("parse");
        assert_eq!(config.own_studio_id, "hotyoga-central");
        assert_eq!(config.pin_limit, 8);
        assert_eq!(config.recommendation_threshold, 70);
        assert_eq!(config.segment_keywords, vec!["hot", "yoga", "boutique"]);
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let result: Result<EngineConfig, _> = serde_yaml::from_str("pin_limt: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_blank_own_id() {
        let config = EngineConfig {
            own_studio_id: "  ".to_string(),
            ..EngineConfig::default()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(err.to_string().contains("own_studio_id"));
    }

    #[test]
    fn validate_rejects_threshold_above_100() {
        let config = EngineConfig {
            recommendation_threshold: 101,
            ..EngineConfig::default()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(err.to_string().contains("exceeds 100"));
    }

    #[test]
    fn validate_rejects_zero_limit() {
        let config = EngineConfig {
            ranking_display_limit: 0,
            ..EngineConfig::default()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(err.to_string().contains("ranking_display_limit"));
    }

    #[test]
    fn validate_rejects_pin_worthy_above_pin_limit() {
        let config = EngineConfig {
            pin_worthy_limit: 6,
            pin_limit: 5,
            ..EngineConfig::default()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(err.to_string().contains("pin_limit"));
    }

    #[test]
    fn validate_rejects_zero_reference_usage() {
        let config = EngineConfig {
            unlimited_classes_per_month: 0,
            ..EngineConfig::default()
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config =
            load_engine_config_or_default(&dir.path().join("absent.yaml")).expect("defaults");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn invalid_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "pin_worthy_limit: 20\n").expect("write");
        let err = load_engine_config_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn shipped_engine_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/engine.yaml");
        let config = load_engine_config(&path).expect("shipped config should load");
        assert_eq!(config, EngineConfig::default());
    }
}
