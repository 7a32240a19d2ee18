//! In-memory cache of fetched rule sets
//!
//! One [`CachedSource`] per external source, plus a flat index from
//! `source/ruleset/pattern` keys to the cached pattern definitions. The
//! index is rebuilt whenever a source is replaced, so it is always
//! consistent with the stored rule sets.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use piiguard_domain::{Maturity, PatternDefinition, RuleSet};
use tracing::debug;

/// A cached source and the rule sets it delivered.
#[derive(Debug, Clone)]
pub struct CachedSource {
    pub name: String,
    pub rule_sets: Vec<RuleSet>,
    pub last_sync: DateTime<Utc>,
    pub total_patterns: usize,
    /// Last fetch error, if any. Prior rule sets survive an error.
    pub error: Option<String>,
}

/// One pattern definition in the flat index.
#[derive(Debug, Clone)]
pub struct CachedPattern {
    pub source_name: String,
    pub rule_set_name: String,
    pub pattern: PatternDefinition,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub source_count: usize,
    pub pattern_count: usize,
}

#[derive(Default)]
struct CacheInner {
    sources: HashMap<String, CachedSource>,
    patterns: HashMap<String, CachedPattern>,
}

/// Concurrent-safe store of fetched rule sets, keyed by source.
#[derive(Default)]
pub struct SourceCache {
    inner: RwLock<CacheInner>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace a source's rule sets and rebuild its pattern index.
    pub fn set_source(&self, name: &str, rule_sets: Vec<RuleSet>) {
        let now = Utc::now();
        let total_patterns = rule_sets.iter().map(|rs| rs.patterns.len()).sum();

        let mut inner = self.inner.write();

        // Drop index entries from the previous sync before re-indexing.
        inner.patterns.retain(|_, cached| cached.source_name != name);

        for rule_set in &rule_sets {
            for pattern in &rule_set.patterns {
                let key = pattern_key(name, &rule_set.name, &pattern.name);
                inner.patterns.insert(
                    key,
                    CachedPattern {
                        source_name: name.to_string(),
                        rule_set_name: rule_set.name.clone(),
                        pattern: pattern.clone(),
                        cached_at: now,
                    },
                );
            }
        }

        inner.sources.insert(
            name.to_string(),
            CachedSource {
                name: name.to_string(),
                rule_sets,
                last_sync: now,
                total_patterns,
                error: None,
            },
        );
        debug!(source = name, total_patterns, "source cached");
    }

    /// Record a fetch error. Rule sets from a previous successful sync are
    /// preserved.
    pub fn set_source_error(&self, name: &str, error: impl Into<String>) {
        let mut inner = self.inner.write();
        match inner.sources.get_mut(name) {
            Some(source) => source.error = Some(error.into()),
            None => {
                inner.sources.insert(
                    name.to_string(),
                    CachedSource {
                        name: name.to_string(),
                        rule_sets: Vec::new(),
                        last_sync: Utc::now(),
                        total_patterns: 0,
                        error: Some(error.into()),
                    },
                );
            }
        }
    }

    pub fn get_source(&self, name: &str) -> Option<CachedSource> {
        self.inner.read().sources.get(name).cloned()
    }

    /// Remove a source and purge its pattern index entries.
    pub fn remove_source(&self, name: &str) {
        let mut inner = self.inner.write();
        inner.patterns.retain(|_, cached| cached.source_name != name);
        inner.sources.remove(name);
    }

    pub fn list_sources(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.read().sources.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// All pattern index keys, sorted.
    pub fn list_patterns(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.inner.read().patterns.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Pattern index keys belonging to one source, sorted.
    pub fn list_patterns_for_source(&self, source_name: &str) -> Vec<String> {
        let inner = self.inner.read();
        let mut keys: Vec<_> = inner
            .patterns
            .iter()
            .filter(|(_, cached)| cached.source_name == source_name)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn get_pattern(
        &self,
        source_name: &str,
        rule_set_name: &str,
        pattern_name: &str,
    ) -> Option<CachedPattern> {
        self.get_pattern_by_key(&pattern_key(source_name, rule_set_name, pattern_name))
    }

    pub fn get_pattern_by_key(&self, key: &str) -> Option<CachedPattern> {
        self.inner.read().patterns.get(key).cloned()
    }

    pub fn get_rule_sets_for_source(&self, source_name: &str) -> Vec<RuleSet> {
        self.inner
            .read()
            .sources
            .get(source_name)
            .map(|source| source.rule_sets.clone())
            .unwrap_or_default()
    }

    /// Cached patterns of one source whose own category matches exactly.
    pub fn get_patterns_by_category(&self, source_name: &str, category: &str) -> Vec<CachedPattern> {
        let inner = self.inner.read();
        let mut result: Vec<_> = inner
            .patterns
            .values()
            .filter(|cached| {
                cached.source_name == source_name && cached.pattern.category == category
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.pattern.name.cmp(&b.pattern.name));
        result
    }

    /// Cached patterns of one source delivered by rule sets at the given
    /// maturity levels.
    pub fn get_patterns_by_maturity(
        &self,
        source_name: &str,
        maturity_levels: &[Maturity],
    ) -> Vec<CachedPattern> {
        let inner = self.inner.read();
        let Some(source) = inner.sources.get(source_name) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for rule_set in &source.rule_sets {
            if !maturity_levels.contains(&rule_set.maturity) {
                continue;
            }
            for pattern in &rule_set.patterns {
                let key = pattern_key(source_name, &rule_set.name, &pattern.name);
                if let Some(cached) = inner.patterns.get(&key) {
                    result.push(cached.clone());
                }
            }
        }
        result
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.sources.clear();
        inner.patterns.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats { source_count: inner.sources.len(), pattern_count: inner.patterns.len() }
    }
}

fn pattern_key(source_name: &str, rule_set_name: &str, pattern_name: &str) -> String {
    format!("{source_name}/{rule_set_name}/{pattern_name}")
}
