//! # piiguard Core
//!
//! Detection, validation, and masking engine for PII in arbitrary text.
//!
//! The engine compiles named patterns (built-in or supplied at runtime),
//! scans input under a reader–writer registry, validates candidate matches
//! with checksum validators, and masks matches through per-pattern
//! strategies. The [`Redactor`] composes detection and masking into an
//! in-place rewrite of the scanned buffer.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod config;
pub mod engine;
pub mod error;
pub mod masking;
pub mod patterns;
pub mod redactor;
pub mod validator;

pub use config::EngineConfig;
pub use engine::{CompiledPattern, Engine};
pub use error::{DetectError, EngineError, EngineResult};
pub use redactor::{RedactResult, Redactor};
pub use validator::Validator;
