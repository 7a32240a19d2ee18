//! Rule-set documents delivered by external fetchers
//!
//! A rule set is a versioned, categorized bundle of pattern definitions
//! authored outside the system. The wire format is YAML with camelCase
//! field names; the same shapes are accepted from Git, OCI, and HTTP
//! sources, whose fetchers live outside this workspace.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::{MaskingStrategy, PatternRule, PatternSpec, Severity};

/// Lifecycle label on a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Maturity {
    #[default]
    Stable,
    Incubating,
    Sandbox,
    Deprecated,
}

impl Maturity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Incubating => "incubating",
            Self::Sandbox => "sandbox",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A versioned bundle of pattern definitions from one source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub maturity: Maturity,
    pub patterns: Vec<PatternDefinition>,
    #[serde(default)]
    pub metadata: RuleSetMetadata,
}

/// One pattern as it appears inside a rule-set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDefinition {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub patterns: Vec<PatternRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    #[serde(default)]
    pub masking_strategy: MaskingStrategy,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<TestCases>,
}

impl PatternDefinition {
    /// Convert to the engine's input form. The definition's name becomes part
    /// of the registry key chosen by the caller.
    pub fn to_pattern_spec(&self) -> PatternSpec {
        PatternSpec {
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            patterns: self.patterns.clone(),
            validator: self.validator.clone(),
            masking_strategy: self.masking_strategy.clone(),
            severity: self.severity,
            enabled: self.enabled,
        }
    }
}

/// Author-supplied examples exercised by rule-set linters, carried through
/// the cache untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCases {
    #[serde(default)]
    pub should_match: Vec<String>,
    #[serde(default)]
    pub should_not_match: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetMetadata {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub maintainers: Vec<String>,
}

/// Aggregate outcome of one fetch operation, assembled by a fetcher and
/// handed to the source cache.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub rule_sets: Vec<RuleSet>,
    pub total_patterns: usize,
    pub errors: Vec<String>,
    pub verified: bool,
}

impl FetchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule_set(&mut self, rule_set: RuleSet) {
        self.total_patterns += rule_set.patterns.len();
        self.rule_sets.push(rule_set);
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;

    #[test]
    fn pattern_definition_converts_to_spec() {
        let def = PatternDefinition {
            name: "corp-badge".into(),
            display_name: "Corporate Badge".into(),
            description: "Internal badge numbers".into(),
            category: "corp/identity".into(),
            patterns: vec![PatternRule::new(r"B\d{6}", Confidence::High)],
            validator: None,
            masking_strategy: MaskingStrategy::partial(1, 0),
            severity: Severity::High,
            enabled: true,
            test_cases: None,
        };

        let spec = def.to_pattern_spec();
        assert_eq!(spec.category, "corp/identity");
        assert_eq!(spec.patterns.len(), 1);
        assert!(spec.enabled);
    }

    #[test]
    fn fetch_result_tracks_pattern_totals() {
        let mut result = FetchResult::new();
        result.add_rule_set(RuleSet {
            name: "rs".into(),
            version: "1.0.0".into(),
            patterns: vec![
                PatternDefinition {
                    name: "a".into(),
                    display_name: String::new(),
                    description: String::new(),
                    category: String::new(),
                    patterns: vec![PatternRule::new("x", Confidence::Low)],
                    validator: None,
                    masking_strategy: MaskingStrategy::default(),
                    severity: Severity::Low,
                    enabled: false,
                    test_cases: None,
                },
            ],
            ..RuleSet::default()
        });

        assert_eq!(result.total_patterns, 1);
        assert!(!result.has_errors());
        result.add_error("boom");
        assert!(result.has_errors());
    }
}
