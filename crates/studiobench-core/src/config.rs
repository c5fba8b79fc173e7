use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("STUDIOBENCH_ENV", "development"));

    let backend_url = or_default("STUDIOBENCH_BACKEND_URL", "http://127.0.0.1:8000");
    if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "STUDIOBENCH_BACKEND_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{backend_url}'"),
        });
    }

    let log_level = or_default("STUDIOBENCH_LOG_LEVEL", "info");
    let engine_config_path = PathBuf::from(or_default(
        "STUDIOBENCH_ENGINE_CONFIG_PATH",
        "./config/engine.yaml",
    ));
    let data_dir = lookup("STUDIOBENCH_DATA_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let request_timeout_secs = parse_u64("STUDIOBENCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "STUDIOBENCH_USER_AGENT",
        "studiobench/0.1 (pricing-benchmark)",
    );
    let max_retries = parse_u32("STUDIOBENCH_MAX_RETRIES", "2")?;
    let retry_backoff_ms = parse_u64("STUDIOBENCH_RETRY_BACKOFF_MS", "500")?;

    Ok(AppConfig {
        env,
        backend_url,
        log_level,
        engine_config_path,
        data_dir,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
