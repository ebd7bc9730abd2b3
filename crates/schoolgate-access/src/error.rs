use schoolgate_core::StoreError;
use schoolgate_models::RegistryName;
use serde::Serialize;
use thiserror::Error;

use crate::keys::ConfigKey;

/// Failures loading, encoding or re-persisting the whole configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Malformed {key} payload: {reason}")]
    Malformed { key: ConfigKey, reason: String },
}

/// Staging operations on an edit session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No edit session is open")]
    NotOpen,

    #[error("Unknown section '{key}' in {registry}")]
    UnknownSection { registry: RegistryName, key: String },
}

/// One persistence write that did not land during a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWrite {
    pub key: ConfigKey,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("No edit session is open")]
    NotOpen,

    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),

    /// Some of the six writes failed. The parts in `persisted` are live, the
    /// parts in `failed` still hold their previous committed value.
    #[error("Configuration partially saved: {} of 6 writes failed", failed.len())]
    PartialCommitFailure {
        persisted: Vec<ConfigKey>,
        failed: Vec<FailedWrite>,
    },
}
