//! Error types for the catalog supply chain

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("source not found: {0}")]
    SourceNotFound(String),

    #[error("invalid version format: {0}")]
    VersionParse(String),

    #[error("unrecognized rule document shape")]
    UnrecognizedShape,

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Engine(#[from] piiguard_core::EngineError),
}

/// Errors from signature verification.
///
/// A verification failure is advisory: whether to keep ingesting the rule
/// set is the caller's decision.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to decode PEM block")]
    Pem,

    #[error("failed to parse public key: {0}")]
    Key(String),

    #[error("failed to decode base64 signature: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("signature verification failed")]
    BadSignature,

    #[error("hash mismatch: expected {expected}, got {computed}")]
    HashMismatch { expected: String, computed: String },
}
