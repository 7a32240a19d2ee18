//! Subscription materialization
//!
//! A subscription selects cached patterns by maturity, version constraint,
//! category, and name globs, applies per-pattern overrides, and registers
//! each selection with the engine under `source/ruleset/pattern` keys.
//! Materialization derives everything from the cache; re-running it with an
//! unchanged cache produces the same engine state.

use std::collections::HashMap;
use std::sync::Arc;

use piiguard_core::Engine;
use piiguard_domain::{
    Maturity, PatternOverride, PatternSpec, SubscribedPatternInfo, Subscription,
    DEFAULT_MATURITY_LEVELS,
};
use tracing::{info, warn};

use crate::cache::SourceCache;
use crate::semver::Constraints;

/// Outcome of materializing one subscription.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionResult {
    pub subscribed_patterns: Vec<SubscribedPatternInfo>,
    pub total_patterns: usize,
    /// Per-pattern and source-level problems; materialization continues past
    /// them.
    pub errors: Vec<String>,
}

/// Materializes subscriptions from the source cache into the engine.
pub struct SubscriptionManager {
    cache: Arc<SourceCache>,
    engine: Arc<Engine>,
}

impl SubscriptionManager {
    pub fn new(cache: Arc<SourceCache>, engine: Arc<Engine>) -> Self {
        Self { cache, engine }
    }

    /// Select, override, and register every pattern the subscription asks
    /// for. Individual failures are collected; they never abort the rest of
    /// the subscription.
    pub fn subscribe(&self, subscription: &Subscription) -> SubscriptionResult {
        let mut result = SubscriptionResult::default();
        let source_key = subscription.source_ref.as_str();

        let Some(source) = self.cache.get_source(source_key) else {
            result.errors.push(format!("source not found: {source_key}"));
            return result;
        };

        let maturity_levels: &[Maturity] = if subscription.maturity_levels.is_empty() {
            &DEFAULT_MATURITY_LEVELS
        } else {
            &subscription.maturity_levels
        };

        let overrides: HashMap<&str, &PatternOverride> =
            subscription.overrides.iter().map(|o| (o.pattern.as_str(), o)).collect();

        for category_sub in &subscription.subscribe {
            let constraints = match Constraints::parse(&category_sub.version) {
                Ok(constraints) => constraints,
                Err(error) => {
                    warn!(constraint = %category_sub.version, %error, "ignoring bad version constraint");
                    Constraints::default()
                }
            };

            for rule_set in &source.rule_sets {
                if !maturity_levels.contains(&rule_set.maturity) {
                    continue;
                }
                if !constraints.matches_str(&rule_set.version) {
                    continue;
                }

                for pattern in &rule_set.patterns {
                    if !matches_category(&pattern.category, &category_sub.category) {
                        continue;
                    }
                    if !matches_pattern_names(&pattern.name, &category_sub.patterns) {
                        continue;
                    }

                    let mut spec = pattern.to_pattern_spec();
                    let overridden = match overrides.get(pattern.name.as_str()) {
                        Some(o) => {
                            apply_override(&mut spec, o);
                            true
                        }
                        None => false,
                    };

                    let key = format!("{source_key}/{}/{}", rule_set.name, pattern.name);
                    if let Err(error) = self.engine.add_pattern(&key, spec) {
                        warn!(key, %error, "failed to register subscribed pattern");
                        result.errors.push(format!("failed to add pattern {}: {error}", pattern.name));
                        continue;
                    }

                    result.subscribed_patterns.push(SubscribedPatternInfo {
                        name: pattern.name.clone(),
                        category: pattern.category.clone(),
                        version: rule_set.version.clone(),
                        source: source_key.to_string(),
                        overridden,
                    });
                }
            }
        }

        result.total_patterns = result.subscribed_patterns.len();
        info!(
            source = source_key,
            patterns = result.total_patterns,
            errors = result.errors.len(),
            "subscription materialized"
        );
        result
    }

    /// Remove every engine pattern installed from a source.
    pub fn unsubscribe(&self, source_key: &str) {
        let prefix = format!("{source_key}/");
        for key in self.engine.list_patterns() {
            if key.starts_with(&prefix) {
                self.engine.remove_pattern(&key);
            }
        }
    }

    /// Cache index keys currently available from a source.
    pub fn subscribed_patterns(&self, source_key: &str) -> Vec<String> {
        self.cache.list_patterns_for_source(source_key)
    }
}

/// A pattern category matches its subscription category exactly or as a
/// slash-separated descendant; empty and `*` match everything.
pub(crate) fn matches_category(pattern_category: &str, subscription_category: &str) -> bool {
    if subscription_category.is_empty() || subscription_category == "*" {
        return true;
    }
    if pattern_category == subscription_category {
        return true;
    }
    pattern_category.starts_with(&format!("{subscription_category}/"))
}

/// A pattern name matches when the list is empty, contains `*`, or any entry
/// matches as a glob or verbatim.
pub(crate) fn matches_pattern_names(pattern_name: &str, names: &[String]) -> bool {
    if names.is_empty() {
        return true;
    }

    names.iter().any(|candidate| {
        if candidate == "*" || candidate == pattern_name {
            return true;
        }
        glob::Pattern::new(candidate).map(|g| g.matches(pattern_name)).unwrap_or(false)
    })
}

fn apply_override(spec: &mut PatternSpec, o: &PatternOverride) {
    if let Some(severity) = o.severity {
        spec.severity = severity;
    }
    if let Some(enabled) = o.enabled {
        spec.enabled = enabled;
    }
    if let Some(masking_strategy) = &o.masking_strategy {
        spec.masking_strategy = masking_strategy.clone();
    }
}
