//! # piiguard Domain
//!
//! Data model for the piiguard PII detection and catalog pipeline.
//!
//! This crate contains:
//! - Pattern and masking types consumed by the detection engine
//! - Rule-set document types produced by external fetchers
//! - Subscription and update-policy types
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other piiguard crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
