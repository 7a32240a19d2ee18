use std::fmt;

use serde::{Deserialize, Serialize};

/// Consequence classification of a match, consumed by downstream policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

/// Pattern author's self-assessed precision of a single regex rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::Medium
    }
}

/// One regular expression with the author's confidence grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub regex: String,
    #[serde(default)]
    pub confidence: Confidence,
}

impl PatternRule {
    pub fn new(regex: impl Into<String>, confidence: Confidence) -> Self {
        Self { regex: regex.into(), confidence }
    }
}

/// Deterministic transformation applied to a matched substring.
///
/// The `hash` and `tokenize` variants derive from an unsalted SHA-256 of the
/// match text. They are deterministic placeholders, not an unlinkable
/// tokenization primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaskingStrategy {
    Full {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replacement: Option<String>,
        #[serde(default, rename = "maskChar", skip_serializing_if = "Option::is_none")]
        mask_char: Option<char>,
    },
    Partial {
        #[serde(default, rename = "showFirst")]
        show_first: usize,
        #[serde(default, rename = "showLast")]
        show_last: usize,
        #[serde(default, rename = "maskChar", skip_serializing_if = "Option::is_none")]
        mask_char: Option<char>,
    },
    Hash,
    Tokenize,
    /// Unrecognized strategy types degrade to full masking via the partial
    /// path rather than failing ingestion.
    #[serde(other)]
    Other,
}

impl MaskingStrategy {
    /// Partial masking with the default mask character.
    pub fn partial(show_first: usize, show_last: usize) -> Self {
        Self::Partial { show_first, show_last, mask_char: None }
    }

    /// Full masking with a fixed replacement string.
    pub fn replacement(text: impl Into<String>) -> Self {
        Self::Full { replacement: Some(text.into()), mask_char: None }
    }
}

impl Default for MaskingStrategy {
    fn default() -> Self {
        Self::partial(0, 0)
    }
}

/// Input form of a detection pattern.
///
/// The pattern's registry key (its name) lives outside the spec: the engine
/// namespaces keys such as `builtin/email` or `source/ruleset/pattern`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSpec {
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
}

/// A single match produced by the detection engine.
///
/// `start` and `end` are byte offsets into the scanned buffer, with
/// `input[start..end] == matched_text`. `redacted_text` is filled by the
/// redactor, not the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub pattern_name: String,
    pub display_name: String,
    pub matched_text: String,
    pub start: usize,
    pub end: usize,
    pub confidence: Confidence,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redacted_text: Option<String>,
}
