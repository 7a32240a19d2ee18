//! Subscription and update-policy types
//!
//! A subscription is a declarative, read-only selection of patterns to
//! install from a cached source. Materialization is performed by the
//! catalog crate; nothing here mutates state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pattern::{MaskingStrategy, Severity};
use super::ruleset::Maturity;

/// Declarative selection of patterns to install from one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Key of the source in the source cache.
    pub source_ref: String,
    /// Maturity levels to include. Empty means stable + incubating.
    #[serde(default)]
    pub maturity_levels: Vec<Maturity>,
    pub subscribe: Vec<CategorySubscription>,
    #[serde(default)]
    pub overrides: Vec<PatternOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_policy: Option<UpdatePolicy>,
}

/// One category selection inside a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySubscription {
    /// Category path, possibly hierarchical (e.g. `compliance/pci-dss`).
    /// Empty or `*` matches every category.
    pub category: String,
    /// Version constraint over providing rule sets (e.g. `>=2.0.0, <3.0.0`).
    #[serde(default)]
    pub version: String,
    /// Pattern names or globs (e.g. `aws-*`). Empty matches all.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Per-pattern override applied during materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternOverride {
    /// Pattern identifier in the source's taxonomy.
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masking_strategy: Option<MaskingStrategy>,
}

/// Automatic update behavior for a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicy {
    #[serde(default = "default_automatic")]
    pub automatic: bool,
    /// Change kinds that always require manual approval.
    #[serde(default)]
    pub require_approval: Vec<ChangeKind>,
    /// Change kinds to notify on; the literal `all` matches every kind.
    #[serde(default)]
    pub notify_on: Vec<String>,
}

fn default_automatic() -> bool {
    true
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self { automatic: true, require_approval: Vec::new(), notify_on: Vec::new() }
    }
}

/// Classification of a version delta between an installed pattern and the
/// cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    MajorVersion,
    MinorVersion,
    PatchVersion,
    NewPatterns,
    Deprecations,
    Unknown,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MajorVersion => "majorVersion",
            Self::MinorVersion => "minorVersion",
            Self::PatchVersion => "patchVersion",
            Self::NewPatterns => "newPatterns",
            Self::Deprecations => "deprecations",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An update the planner found but has not applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUpdate {
    pub pattern: String,
    pub current_version: String,
    pub available_version: String,
    pub change_kind: ChangeKind,
    #[serde(default)]
    pub description: String,
}

/// Record of one pattern installed by a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedPatternInfo {
    pub name: String,
    pub category: String,
    /// Version of the rule set that provided the pattern.
    pub version: String,
    pub source: String,
    #[serde(default)]
    pub overridden: bool,
}
