//! Error types for the detection engine

use piiguard_domain::Detection;
use thiserror::Error;

/// Errors surfaced while registering patterns.
///
/// Registration is all-or-nothing: on any error the registry is unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("pattern has no rules")]
    EmptyRules,

    #[error("invalid regex in rule {index}: {source}")]
    InvalidRegex {
        index: usize,
        #[source]
        source: regex::Error,
    },
}

/// Errors surfaced from a detection scan.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The caller's cancellation token tripped between patterns. Detections
    /// produced before the trip are carried in `partial`.
    #[error("detection cancelled after {} detections", .partial.len())]
    Cancelled { partial: Vec<Detection> },
}

pub type EngineResult<T> = Result<T, EngineError>;
