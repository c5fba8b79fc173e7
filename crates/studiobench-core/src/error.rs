use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read engine config at {path}: {source}")]
    EngineFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse engine config: {0}")]
    EngineFileParse(#[from] serde_yaml::Error),

    #[error("engine config validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
