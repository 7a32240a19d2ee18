//! # piiguard Catalog
//!
//! Supply chain for externally sourced pattern catalogs: an in-memory cache
//! of fetched rule sets, semver-constrained subscriptions that materialize
//! cached patterns into the detection engine, an update planner that
//! classifies pending changes, and signature verifiers for fetched content.
//!
//! Transport (Git, OCI, HTTP) lives outside this workspace; fetchers hand
//! parsed rule sets to [`SourceCache`] and everything downstream is derived
//! from it.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod error;
pub mod ruleset;
pub mod semver;
pub mod subscription;
pub mod updater;
pub mod verifier;

pub use cache::{CacheStats, CachedPattern, CachedSource, SourceCache};
pub use error::{CatalogError, VerifyError};
pub use semver::{Constraint, Constraints, Version};
pub use subscription::{SubscriptionManager, SubscriptionResult};
pub use updater::UpdatePlanner;
pub use verifier::{SignatureVerifier, VerificationResult};
