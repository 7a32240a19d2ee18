//! Core domain types for pattern detection and masking

mod pattern;
mod ruleset;
mod subscription;

pub use pattern::*;
pub use ruleset::*;
pub use subscription::*;
