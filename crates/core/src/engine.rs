//! PII detection engine
//!
//! The engine owns a registry of compiled patterns behind a reader–writer
//! lock: any number of concurrent scans, mutually exclusive with registry
//! mutation. Patterns compile before the write lock is taken, so a scan
//! never observes a half-compiled entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use piiguard_domain::{Confidence, Detection, MaskingStrategy, PatternSpec, Severity};
use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{DetectError, EngineError, EngineResult};
use crate::patterns;
use crate::validator::Validator;

/// One compiled regex rule with its confidence grade.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub regex: Regex,
    pub confidence: Confidence,
}

/// A pattern after compilation, owned by the engine's registry.
///
/// Mutable only through the engine's enable/disable toggles; replaced
/// wholesale on re-registration.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub display_name: String,
    pub category: String,
    pub rules: Vec<CompiledRule>,
    pub validator: Option<String>,
    pub masking_strategy: MaskingStrategy,
    pub severity: Severity,
    pub enabled: bool,
}

/// The detection engine.
pub struct Engine {
    registry: RwLock<HashMap<String, CompiledPattern>>,
    validation_enabled: AtomicBool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine preloaded with the built-in catalog.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine from explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let engine = Self {
            registry: RwLock::new(HashMap::new()),
            validation_enabled: AtomicBool::new(config.validation_enabled),
        };
        if config.load_builtins {
            engine.load_builtins();
        }
        engine
    }

    fn load_builtins(&self) {
        let mut registry = self.registry.write();
        for (&name, spec) in patterns::BUILTIN_PATTERNS.iter() {
            // Built-ins are trusted input: a rule that fails to compile is
            // dropped rather than poisoning the rest of the pattern.
            let mut rules = Vec::with_capacity(spec.patterns.len());
            for rule in &spec.patterns {
                match Regex::new(&rule.regex) {
                    Ok(regex) => rules.push(CompiledRule { regex, confidence: rule.confidence }),
                    Err(error) => {
                        warn!(pattern = name, %error, "skipping unparseable built-in rule");
                    }
                }
            }
            registry.insert(name.to_string(), compiled_from(name, spec, rules));
        }
    }

    /// Register (or replace) a pattern under `key`.
    ///
    /// Compilation is all-or-nothing: on any failing rule the registry is
    /// left untouched and the error names the failing rule index.
    pub fn add_pattern(&self, key: &str, spec: PatternSpec) -> EngineResult<()> {
        if spec.patterns.is_empty() {
            return Err(EngineError::EmptyRules);
        }

        let mut rules = Vec::with_capacity(spec.patterns.len());
        for (index, rule) in spec.patterns.iter().enumerate() {
            let regex = Regex::new(&rule.regex)
                .map_err(|source| EngineError::InvalidRegex { index, source })?;
            rules.push(CompiledRule { regex, confidence: rule.confidence });
        }

        let compiled = compiled_from(key, &spec, rules);
        self.registry.write().insert(key.to_string(), compiled);
        debug!(key, "pattern registered");
        Ok(())
    }

    /// Remove a pattern. Removing an absent key is a no-op.
    pub fn remove_pattern(&self, key: &str) {
        if self.registry.write().remove(key).is_some() {
            debug!(key, "pattern removed");
        }
    }

    /// Scan `text` with every enabled pattern.
    ///
    /// The cancellation token is observed between patterns, never inside a
    /// single regex scan; on cancellation the detections gathered so far
    /// ride along in the error.
    pub fn detect(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Detection>, DetectError> {
        let registry = self.registry.read();
        let validate = self.validation_enabled.load(Ordering::Relaxed);

        let mut detections = Vec::new();
        for pattern in registry.values() {
            if !pattern.enabled {
                continue;
            }
            if cancel.is_cancelled() {
                return Err(DetectError::Cancelled { partial: detections });
            }
            scan_pattern(pattern, text, validate, &mut detections);
        }
        Ok(detections)
    }

    /// Scan `text` with the named patterns only, whether or not they are
    /// enabled. Unknown keys are skipped silently.
    pub fn detect_with_patterns(
        &self,
        text: &str,
        keys: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Vec<Detection>, DetectError> {
        let registry = self.registry.read();
        let validate = self.validation_enabled.load(Ordering::Relaxed);

        let mut detections = Vec::new();
        for key in keys {
            let Some(pattern) = registry.get(*key) else {
                continue;
            };
            if cancel.is_cancelled() {
                return Err(DetectError::Cancelled { partial: detections });
            }
            scan_pattern(pattern, text, validate, &mut detections);
        }
        Ok(detections)
    }

    /// Snapshot of a registered pattern.
    pub fn get_pattern(&self, key: &str) -> Option<CompiledPattern> {
        self.registry.read().get(key).cloned()
    }

    /// Masking strategy registered for a pattern key.
    pub fn get_masking_strategy(&self, key: &str) -> Option<MaskingStrategy> {
        self.registry.read().get(key).map(|p| p.masking_strategy.clone())
    }

    pub fn enable_pattern(&self, key: &str) -> bool {
        self.set_enabled(key, true)
    }

    pub fn disable_pattern(&self, key: &str) -> bool {
        self.set_enabled(key, false)
    }

    fn set_enabled(&self, key: &str, enabled: bool) -> bool {
        match self.registry.write().get_mut(key) {
            Some(pattern) => {
                pattern.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_pattern_enabled(&self, key: &str) -> bool {
        self.registry.read().get(key).map(|p| p.enabled).unwrap_or(false)
    }

    /// Enable every pattern in a category; returns the number toggled.
    pub fn enable_patterns_by_category(&self, category: &str) -> usize {
        self.set_enabled_by_category(category, true)
    }

    /// Disable every pattern in a category; returns the number toggled.
    pub fn disable_patterns_by_category(&self, category: &str) -> usize {
        self.set_enabled_by_category(category, false)
    }

    fn set_enabled_by_category(&self, category: &str, enabled: bool) -> usize {
        let mut registry = self.registry.write();
        let mut count = 0;
        for pattern in registry.values_mut() {
            if pattern.category == category {
                pattern.enabled = enabled;
                count += 1;
            }
        }
        count
    }

    /// All registered pattern keys, sorted.
    pub fn list_patterns(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.registry.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub fn list_enabled_patterns(&self) -> Vec<String> {
        self.list_filtered(|p| p.enabled)
    }

    pub fn list_disabled_patterns(&self) -> Vec<String> {
        self.list_filtered(|p| !p.enabled)
    }

    pub fn list_patterns_by_category(&self, category: &str) -> Vec<String> {
        self.list_filtered(|p| p.category == category)
    }

    fn list_filtered(&self, keep: impl Fn(&CompiledPattern) -> bool) -> Vec<String> {
        let registry = self.registry.read();
        let mut keys: Vec<_> =
            registry.iter().filter(|(_, p)| keep(p)).map(|(k, _)| k.clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Accept regex matches without running checksum validators.
    pub fn disable_validation(&self) {
        self.validation_enabled.store(false, Ordering::Relaxed);
    }

    pub fn enable_validation(&self) {
        self.validation_enabled.store(true, Ordering::Relaxed);
    }

    pub fn validation_enabled(&self) -> bool {
        self.validation_enabled.load(Ordering::Relaxed)
    }
}

fn compiled_from(key: &str, spec: &PatternSpec, rules: Vec<CompiledRule>) -> CompiledPattern {
    CompiledPattern {
        name: key.to_string(),
        display_name: spec.display_name.clone(),
        category: spec.category.clone(),
        rules,
        validator: spec.validator.clone(),
        masking_strategy: spec.masking_strategy.clone(),
        severity: spec.severity,
        enabled: spec.enabled,
    }
}

fn scan_pattern(
    pattern: &CompiledPattern,
    text: &str,
    validate: bool,
    detections: &mut Vec<Detection>,
) {
    for rule in &pattern.rules {
        for found in rule.regex.find_iter(text) {
            let matched_text = found.as_str();

            if validate {
                if let Some(validator) = pattern.validator.as_deref().and_then(Validator::by_name) {
                    if !validator.validate(matched_text) {
                        continue;
                    }
                }
            }

            detections.push(Detection {
                pattern_name: pattern.name.clone(),
                display_name: pattern.display_name.clone(),
                matched_text: matched_text.to_string(),
                start: found.start(),
                end: found.end(),
                confidence: rule.confidence,
                severity: pattern.severity,
                redacted_text: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use piiguard_domain::PatternRule;

    use super::*;

    fn custom_spec(regex: &str) -> PatternSpec {
        PatternSpec {
            display_name: "Custom".into(),
            description: String::new(),
            category: "custom".into(),
            patterns: vec![PatternRule::new(regex, Confidence::High)],
            validator: None,
            masking_strategy: MaskingStrategy::partial(0, 0),
            severity: Severity::Medium,
            enabled: true,
        }
    }

    #[test]
    fn new_engine_preloads_builtins_with_defaults() {
        let engine = Engine::new();
        assert!(engine.is_pattern_enabled("email"));
        assert!(!engine.is_pattern_enabled("ip-address"));
        assert!(engine.list_patterns().len() >= 30);
    }

    #[test]
    fn empty_registry_without_builtins() {
        let engine =
            Engine::with_config(EngineConfig { validation_enabled: true, load_builtins: false });
        assert!(engine.list_patterns().is_empty());
    }

    #[test]
    fn detect_reports_byte_positions_and_matched_text() {
        let engine = Engine::new();
        let text = "contact: alice@example.com";
        let detections = engine.detect(text, &CancellationToken::new()).unwrap();

        let email = detections.iter().find(|d| d.pattern_name == "email").unwrap();
        assert_eq!(email.matched_text, "alice@example.com");
        assert_eq!(&text[email.start..email.end], email.matched_text);
    }

    #[test]
    fn add_pattern_rejects_invalid_regex_without_mutation() {
        let engine = Engine::new();
        let before = engine.list_patterns();

        let mut spec = custom_spec("valid-\\d+");
        spec.patterns.push(PatternRule::new("([unclosed", Confidence::Low));
        let err = engine.add_pattern("ns/custom", spec).unwrap_err();
        match err {
            EngineError::InvalidRegex { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(engine.list_patterns(), before);
    }

    #[test]
    fn add_pattern_rejects_empty_rule_list() {
        let engine = Engine::new();
        let mut spec = custom_spec(".");
        spec.patterns.clear();
        assert!(matches!(engine.add_pattern("ns/none", spec), Err(EngineError::EmptyRules)));
    }

    #[test]
    fn remove_pattern_is_idempotent() {
        let engine = Engine::new();
        engine.add_pattern("ns/custom", custom_spec(r"zz\d+")).unwrap();
        engine.remove_pattern("ns/custom");
        engine.remove_pattern("ns/custom");
        assert!(engine.get_pattern("ns/custom").is_none());
    }

    #[test]
    fn category_toggles_report_counts() {
        let engine = Engine::new();
        let disabled = engine.disable_patterns_by_category("korea");
        assert_eq!(disabled, 6);
        assert!(engine.list_patterns_by_category("korea").len() == disabled);
        assert!(!engine.is_pattern_enabled("phone-kr"));

        let enabled = engine.enable_patterns_by_category("korea");
        assert_eq!(enabled, 6);
        assert!(engine.is_pattern_enabled("phone-kr"));
    }

    #[test]
    fn detect_with_patterns_skips_unknown_keys() {
        let engine = Engine::new();
        let detections = engine
            .detect_with_patterns(
                "mail me: bob@example.org",
                &["email", "no-such-pattern"],
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].pattern_name, "email");
    }

    #[test]
    fn detect_with_patterns_ignores_enabled_flag() {
        let engine = Engine::new();
        let detections = engine
            .detect_with_patterns("host 10.1.2.3 up", &["ip-address"], &CancellationToken::new())
            .unwrap();
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn validation_toggle_gates_checksums() {
        let engine = Engine::new();
        let bogus_card = "card 1234567890123456 on file";

        let detections = engine
            .detect_with_patterns(bogus_card, &["credit-card"], &CancellationToken::new())
            .unwrap();
        assert!(detections.is_empty());

        engine.disable_validation();
        let detections = engine
            .detect_with_patterns(bogus_card, &["credit-card"], &CancellationToken::new())
            .unwrap();
        assert!(!detections.is_empty());
        engine.enable_validation();
    }

    #[test]
    fn unknown_validator_name_accepts_matches() {
        let engine = Engine::new();
        let mut spec = custom_spec(r"zz\d{4}");
        spec.validator = Some("not-a-validator".into());
        engine.add_pattern("ns/loose", spec).unwrap();

        let detections = engine
            .detect_with_patterns("zz1234", &["ns/loose"], &CancellationToken::new())
            .unwrap();
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn cancelled_token_returns_partial_results() {
        let engine = Engine::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        match engine.detect("text", &cancel) {
            Err(DetectError::Cancelled { partial }) => assert!(partial.is_empty()),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    #[test]
    fn concurrent_detect_with_mutation_stays_consistent() {
        use std::sync::Arc;

        let engine = Arc::new(Engine::new());
        let mut handles = Vec::new();

        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    let detections = engine
                        .detect("reach me at carol@example.com", &CancellationToken::new())
                        .unwrap();
                    // Each scan sees a full snapshot: email is either present
                    // with valid positions or the pattern was removed.
                    for d in &detections {
                        assert!(d.start < d.end);
                    }
                }
            }));
        }

        let writer = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for i in 0..50 {
                    let key = format!("ns/gen-{i}");
                    engine.add_pattern(&key, custom_spec(r"gen\d+")).unwrap();
                    engine.remove_pattern(&key);
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        writer.join().unwrap();
    }
}
