//! Update planning for subscriptions
//!
//! Compares a subscription's installed patterns against the cache, emits
//! pending updates classified by the semver delta, and gates them through
//! the subscription's update policy. Applying updates is a full
//! re-materialization, not a surgical diff.

use std::sync::Arc;

use piiguard_domain::{
    ChangeKind, PatternDefinition, PendingUpdate, SubscribedPatternInfo, Subscription, UpdatePolicy,
};

use crate::cache::SourceCache;
use crate::semver::Version;
use crate::subscription::{matches_category, matches_pattern_names, SubscriptionManager, SubscriptionResult};

/// Plans and applies subscription updates.
pub struct UpdatePlanner {
    cache: Arc<SourceCache>,
    manager: Arc<SubscriptionManager>,
}

impl UpdatePlanner {
    pub fn new(cache: Arc<SourceCache>, manager: Arc<SubscriptionManager>) -> Self {
        Self { cache, manager }
    }

    /// Pending updates for a subscription given its installed patterns:
    /// version deltas for installed patterns, plus `newPatterns` entries for
    /// cached patterns that match the subscription criteria but are not yet
    /// installed.
    pub fn check_updates(
        &self,
        subscription: &Subscription,
        installed: &[SubscribedPatternInfo],
    ) -> Vec<PendingUpdate> {
        let mut pending = Vec::new();

        let Some(source) = self.cache.get_source(&subscription.source_ref) else {
            return pending;
        };

        for info in installed {
            let Some(rule_set) = source
                .rule_sets
                .iter()
                .find(|rs| rs.patterns.iter().any(|p| p.name == info.name))
            else {
                continue;
            };

            if !info.version.is_empty() && rule_set.version != info.version {
                pending.push(PendingUpdate {
                    pattern: info.name.clone(),
                    current_version: info.version.clone(),
                    available_version: rule_set.version.clone(),
                    change_kind: classify_change(&info.version, &rule_set.version),
                    description: "Version update available".to_string(),
                });
            }
        }

        for rule_set in &source.rule_sets {
            for pattern in &rule_set.patterns {
                if installed.iter().any(|info| info.name == pattern.name) {
                    continue;
                }
                if matches_subscription_criteria(pattern, subscription) {
                    pending.push(PendingUpdate {
                        pattern: pattern.name.clone(),
                        current_version: String::new(),
                        available_version: rule_set.version.clone(),
                        change_kind: ChangeKind::NewPatterns,
                        description: "New pattern available".to_string(),
                    });
                }
            }
        }

        pending
    }

    /// Apply updates by re-running the subscription materialization.
    pub fn apply_updates(&self, subscription: &Subscription) -> SubscriptionResult {
        self.manager.subscribe(subscription)
    }

    /// Whether an update may be applied without approval. An absent policy
    /// means no auto-apply and no approval requirements.
    pub fn should_auto_apply(update: &PendingUpdate, policy: Option<&UpdatePolicy>) -> bool {
        match policy {
            Some(policy) => {
                policy.automatic && !policy.require_approval.contains(&update.change_kind)
            }
            None => false,
        }
    }

    /// Whether the policy asks for a notification about an update.
    pub fn should_notify(update: &PendingUpdate, policy: Option<&UpdatePolicy>) -> bool {
        match policy {
            Some(policy) => policy
                .notify_on
                .iter()
                .any(|kind| kind == "all" || kind == update.change_kind.as_str()),
            None => false,
        }
    }

    /// Partition updates into (auto-apply, require-approval).
    pub fn filter_by_policy(
        updates: Vec<PendingUpdate>,
        policy: Option<&UpdatePolicy>,
    ) -> (Vec<PendingUpdate>, Vec<PendingUpdate>) {
        updates.into_iter().partition(|update| Self::should_auto_apply(update, policy))
    }
}

/// Classification of the delta between two version strings; unparseable
/// versions and non-increases classify as unknown.
fn classify_change(current: &str, available: &str) -> ChangeKind {
    let (Ok(current), Ok(available)) = (Version::parse(current), Version::parse(available)) else {
        return ChangeKind::Unknown;
    };

    if available.major > current.major {
        ChangeKind::MajorVersion
    } else if available.minor > current.minor {
        ChangeKind::MinorVersion
    } else if available.patch > current.patch {
        ChangeKind::PatchVersion
    } else {
        ChangeKind::Unknown
    }
}

/// Shared criteria with the subscription manager: a pattern is in scope when
/// any category subscription matches its category and name.
fn matches_subscription_criteria(pattern: &PatternDefinition, subscription: &Subscription) -> bool {
    subscription.subscribe.iter().any(|sub| {
        matches_category(&pattern.category, &sub.category)
            && matches_pattern_names(&pattern.name, &sub.patterns)
    })
}
