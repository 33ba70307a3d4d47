//! Error types for configuration loading and the orchestrator.

use crate::model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`ProductionConfig`](super::ProductionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while starting or stopping a [`ProductionSystem`](super::ProductionSystem).
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("worker task failed: {0}")]
    WorkerFailed(String),

    #[error("event consumer failed: {0}")]
    ConsumerFailed(String),
}
