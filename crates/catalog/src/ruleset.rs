//! Rule-set document parsing
//!
//! Fetchers deliver YAML in one of three shapes: a single pattern object
//! (recognized by a non-empty top-level `name`), a list of pattern objects,
//! or a rule-set object with a `patterns` list. Probing happens in that
//! order, mirroring how catalog repositories mix standalone pattern files
//! with bundled rule sets.

use piiguard_domain::{PatternDefinition, RuleSet};

use crate::error::CatalogError;

/// Parse one YAML document into pattern definitions, accepting all three
/// document shapes.
pub fn parse_pattern_content(data: &str) -> Result<Vec<PatternDefinition>, CatalogError> {
    if let Ok(single) = serde_yaml::from_str::<PatternDefinition>(data) {
        if !single.name.is_empty() {
            return Ok(vec![single]);
        }
    }

    if let Ok(list) = serde_yaml::from_str::<Vec<PatternDefinition>>(data) {
        return Ok(list);
    }

    if let Ok(rule_set) = serde_yaml::from_str::<RuleSet>(data) {
        return Ok(rule_set.patterns);
    }

    Err(CatalogError::UnrecognizedShape)
}

/// Parse a full rule-set document.
pub fn parse_rule_set(data: &str) -> Result<RuleSet, CatalogError> {
    Ok(serde_yaml::from_str(data)?)
}
