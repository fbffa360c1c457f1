use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read run config at {path}: {source}")]
    RunFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse run config: {0}")]
    RunFileParse(#[source] serde_yaml::Error),

    #[error("invalid run config: {0}")]
    Validation(String),
}
