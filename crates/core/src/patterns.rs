//! Built-in pattern catalog
//!
//! A process-lifetime table of named patterns grouped into the `global`,
//! `usa`, `korea`, and `secrets` categories. The table is immutable after
//! initialization; the engine copies entries into its own registry at
//! construction, and concurrent readers need no synchronization here.
//!
//! High-false-positive patterns (bare IP addresses, MAC addresses, generic
//! nine-digit identifiers) ship disabled by default.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use piiguard_domain::{
    Confidence, MaskingStrategy, PatternRule, PatternSpec, Severity, CATEGORY_GLOBAL,
    CATEGORY_KOREA, CATEGORY_SECRETS, CATEGORY_USA,
};

/// All built-in patterns, keyed by pattern name.
pub static BUILTIN_PATTERNS: Lazy<HashMap<&'static str, PatternSpec>> = Lazy::new(build_table);

/// Look up a built-in pattern by name.
pub fn get(name: &str) -> Option<&'static PatternSpec> {
    BUILTIN_PATTERNS.get(name)
}

/// Whether a name refers to a built-in pattern.
pub fn contains(name: &str) -> bool {
    BUILTIN_PATTERNS.contains_key(name)
}

/// All built-in pattern names, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_PATTERNS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Names of patterns enabled by default, sorted.
pub fn enabled_names() -> Vec<&'static str> {
    let mut names: Vec<_> =
        BUILTIN_PATTERNS.iter().filter(|(_, spec)| spec.enabled).map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Names of built-in patterns in a category, sorted.
pub fn names_by_category(category: &str) -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_PATTERNS
        .iter()
        .filter(|(_, spec)| spec.category == category)
        .map(|(name, _)| *name)
        .collect();
    names.sort_unstable();
    names
}

/// Distinct categories present in the table, sorted.
pub fn categories() -> Vec<String> {
    let set: BTreeSet<_> = BUILTIN_PATTERNS.values().map(|spec| spec.category.clone()).collect();
    set.into_iter().collect()
}

fn rule(regex: &str, confidence: Confidence) -> PatternRule {
    PatternRule::new(regex, confidence)
}

#[allow(clippy::too_many_arguments)]
fn spec(
    display_name: &str,
    description: &str,
    category: &str,
    patterns: Vec<PatternRule>,
    validator: Option<&str>,
    masking_strategy: MaskingStrategy,
    severity: Severity,
    enabled: bool,
) -> PatternSpec {
    PatternSpec {
        display_name: display_name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        patterns,
        validator: validator.map(str::to_string),
        masking_strategy,
        severity,
        enabled,
    }
}

fn build_table() -> HashMap<&'static str, PatternSpec> {
    let mut table = HashMap::new();

    // Global
    // -----------------------------------------------------------------

    table.insert(
        "email",
        spec(
            "Email Address",
            "Detects email addresses",
            CATEGORY_GLOBAL,
            vec![rule(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}", Confidence::High)],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::Medium,
            true,
        ),
    );

    table.insert(
        "credit-card",
        spec(
            "Credit Card Number",
            "Detects credit card numbers (Visa, MasterCard, Amex, Discover)",
            CATEGORY_GLOBAL,
            vec![
                rule(
                    r"\b(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|6(?:011|5[0-9]{2})[0-9]{12})\b",
                    Confidence::High,
                ),
                rule(r"\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}", Confidence::Medium),
            ],
            Some("luhn"),
            MaskingStrategy::Partial { show_first: 4, show_last: 4, mask_char: None },
            Severity::Critical,
            true,
        ),
    );

    // Bare addresses match far too much operational text to enable by default.
    table.insert(
        "ip-address",
        spec(
            "IP Address",
            "Detects IPv4 addresses",
            CATEGORY_GLOBAL,
            vec![rule(
                r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
                Confidence::High,
            )],
            None,
            MaskingStrategy::replacement("[IP_REDACTED]"),
            Severity::Low,
            false,
        ),
    );

    table.insert(
        "ipv6-address",
        spec(
            "IPv6 Address",
            "Detects IPv6 addresses",
            CATEGORY_GLOBAL,
            vec![
                rule(r"(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}", Confidence::High),
                rule(r"(?:[0-9a-fA-F]{1,4}:){1,7}:", Confidence::Medium),
            ],
            None,
            MaskingStrategy::replacement("[IPv6_REDACTED]"),
            Severity::Low,
            false,
        ),
    );

    table.insert(
        "iban",
        spec(
            "IBAN",
            "International Bank Account Number",
            CATEGORY_GLOBAL,
            vec![rule(r"[A-Z]{2}\d{2}[A-Z0-9]{4}\d{7}(?:[A-Z0-9]?){0,16}", Confidence::High)],
            Some("iban-checksum"),
            MaskingStrategy::Partial { show_first: 4, show_last: 4, mask_char: None },
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "mac-address",
        spec(
            "MAC Address",
            "Detects MAC addresses",
            CATEGORY_GLOBAL,
            vec![rule(r"(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}", Confidence::High)],
            None,
            MaskingStrategy::partial(8, 0),
            Severity::Low,
            false,
        ),
    );

    // USA
    // -----------------------------------------------------------------

    table.insert(
        "ssn-us",
        spec(
            "US Social Security Number",
            "US Social Security Number (XXX-XX-XXXX format)",
            CATEGORY_USA,
            vec![
                rule(r"\b\d{3}-\d{2}-\d{4}\b", Confidence::High),
                rule(r"\b\d{9}\b", Confidence::Low),
            ],
            None,
            MaskingStrategy::Partial { show_first: 0, show_last: 4, mask_char: None },
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "phone-us",
        spec(
            "US Phone Number",
            "US phone numbers in various formats",
            CATEGORY_USA,
            vec![rule(
                r"\b(?:\+1[-.\s]?)?\(?[2-9]\d{2}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
                Confidence::High,
            )],
            None,
            MaskingStrategy::Partial { show_first: 3, show_last: 4, mask_char: None },
            Severity::High,
            true,
        ),
    );

    table.insert(
        "driver-license-us",
        spec(
            "US Driver License",
            "US Driver License numbers (generic pattern)",
            CATEGORY_USA,
            vec![rule(r"\b[A-Z]{1,2}\d{5,8}\b", Confidence::Medium)],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::Critical,
            false,
        ),
    );

    table.insert(
        "passport-us",
        spec(
            "US Passport Number",
            "US Passport numbers",
            CATEGORY_USA,
            vec![rule(r"\b[0-9]{9}\b", Confidence::Low)],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::Critical,
            false,
        ),
    );

    table.insert(
        "routing-number-us",
        spec(
            "US Bank Routing Number",
            "US Bank ABA Routing Transit Number",
            CATEGORY_USA,
            vec![rule(r"\b[0-9]{9}\b", Confidence::Low)],
            None,
            MaskingStrategy::Partial { show_first: 0, show_last: 4, mask_char: None },
            Severity::High,
            false,
        ),
    );

    table.insert(
        "itin-us",
        spec(
            "US ITIN",
            "US Individual Taxpayer Identification Number",
            CATEGORY_USA,
            vec![rule(r"\b9\d{2}-[7-9]\d-\d{4}\b", Confidence::High)],
            None,
            MaskingStrategy::Partial { show_first: 0, show_last: 4, mask_char: None },
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "medicare-us",
        spec(
            "US Medicare ID",
            "US Medicare Beneficiary Identifier (MBI)",
            CATEGORY_USA,
            vec![rule(
                r"\b[1-9][AC-HJKMNP-RT-Y][AC-HJKMNP-RT-Y0-9]\d[AC-HJKMNP-RT-Y][AC-HJKMNP-RT-Y0-9]\d[AC-HJKMNP-RT-Y]{2}\d{2}\b",
                Confidence::High,
            )],
            None,
            MaskingStrategy::Partial { show_first: 0, show_last: 4, mask_char: None },
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "ein-us",
        spec(
            "US EIN",
            "US Employer Identification Number",
            CATEGORY_USA,
            vec![rule(r"\b\d{2}-\d{7}\b", Confidence::High)],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::High,
            true,
        ),
    );

    table.insert(
        "dea-us",
        spec(
            "US DEA Number",
            "US Drug Enforcement Administration registration number",
            CATEGORY_USA,
            vec![rule(r"\b[A-Z][A-Z9][0-9]{7}\b", Confidence::High)],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::Critical,
            true,
        ),
    );

    // Korea
    // -----------------------------------------------------------------

    table.insert(
        "korean-rrn",
        spec(
            "Korean Resident Registration Number",
            "Korean RRN (Resident Registration Number)",
            CATEGORY_KOREA,
            vec![
                rule(r"\d{6}-[1-4]\d{6}", Confidence::High),
                rule(r"\d{6}[1-4]\d{6}", Confidence::Medium),
            ],
            Some("rrn-checksum"),
            MaskingStrategy::partial(6, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "phone-kr",
        spec(
            "Korean Phone Number",
            "Korean phone numbers (mobile and landline)",
            CATEGORY_KOREA,
            vec![
                rule(r"01[016789]-?\d{3,4}-?\d{4}", Confidence::High),
                rule(r"02-?\d{3,4}-?\d{4}", Confidence::High),
                rule(r"0[3-6][1-5]-?\d{3,4}-?\d{4}", Confidence::High),
            ],
            None,
            MaskingStrategy::Partial { show_first: 3, show_last: 4, mask_char: None },
            Severity::High,
            true,
        ),
    );

    table.insert(
        "passport-kr",
        spec(
            "Korean Passport Number",
            "Korean passport numbers",
            CATEGORY_KOREA,
            vec![rule(r"[A-Z]{1,2}\d{7,8}", Confidence::Medium)],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "driver-license-kr",
        spec(
            "Korean Driver License",
            "Korean driver license numbers",
            CATEGORY_KOREA,
            vec![rule(r"\d{2}-\d{2}-\d{6}-\d{2}", Confidence::High)],
            None,
            MaskingStrategy::partial(5, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "business-number-kr",
        spec(
            "Korean Business Registration Number",
            "Korean business registration numbers",
            CATEGORY_KOREA,
            vec![rule(r"\d{3}-\d{2}-\d{5}", Confidence::High)],
            Some("business-number-checksum"),
            MaskingStrategy::partial(3, 0),
            Severity::High,
            true,
        ),
    );

    table.insert(
        "foreign-registration-kr",
        spec(
            "Korean Foreign Registration Number",
            "Korean foreign registration numbers",
            CATEGORY_KOREA,
            vec![rule(r"\d{6}-[5-8]\d{6}", Confidence::High)],
            None,
            MaskingStrategy::partial(6, 0),
            Severity::Critical,
            true,
        ),
    );

    // Secrets & credentials
    // -----------------------------------------------------------------

    table.insert(
        "aws-access-key",
        spec(
            "AWS Access Key ID",
            "AWS Access Key ID",
            CATEGORY_SECRETS,
            vec![rule(r"AKIA[0-9A-Z]{16}", Confidence::High)],
            None,
            MaskingStrategy::partial(4, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "aws-secret-key",
        spec(
            "AWS Secret Access Key",
            "AWS Secret Access Key",
            CATEGORY_SECRETS,
            vec![rule(r#"(?i)aws.{0,20}secret.{0,20}['"][0-9a-zA-Z/+]{40}['"]"#, Confidence::High)],
            None,
            MaskingStrategy::replacement("[AWS_SECRET_REDACTED]"),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "github-token",
        spec(
            "GitHub Token",
            "GitHub Personal Access Token or OAuth Token",
            CATEGORY_SECRETS,
            vec![
                rule(r"ghp_[0-9a-zA-Z]{36}", Confidence::High),
                rule(r"gho_[0-9a-zA-Z]{36}", Confidence::High),
                rule(r"ghu_[0-9a-zA-Z]{36}", Confidence::High),
                rule(r"ghs_[0-9a-zA-Z]{36}", Confidence::High),
                rule(r"ghr_[0-9a-zA-Z]{36}", Confidence::High),
            ],
            None,
            MaskingStrategy::partial(4, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "gitlab-token",
        spec(
            "GitLab Token",
            "GitLab Personal Access Token",
            CATEGORY_SECRETS,
            vec![rule(r"glpat-[0-9a-zA-Z\-_]{20}", Confidence::High)],
            None,
            MaskingStrategy::partial(6, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "slack-token",
        spec(
            "Slack Token",
            "Slack Bot or User Token",
            CATEGORY_SECRETS,
            vec![rule(r"xox[baprs]-[0-9a-zA-Z]{10,48}", Confidence::High)],
            None,
            MaskingStrategy::partial(4, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "google-api-key",
        spec(
            "Google API Key",
            "Google API Key",
            CATEGORY_SECRETS,
            vec![rule(r"AIza[0-9A-Za-z\-_]{35}", Confidence::High)],
            None,
            MaskingStrategy::partial(4, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "api-key",
        spec(
            "Generic API Key",
            "Detects common API key patterns",
            CATEGORY_SECRETS,
            vec![rule(
                r#"(?i)(?:api[_-]?key|apikey|api_secret)['"]?\s*[:=]\s*['"]?[0-9a-zA-Z]{16,64}['"]?"#,
                Confidence::Medium,
            )],
            None,
            MaskingStrategy::replacement("[API_KEY_REDACTED]"),
            Severity::High,
            true,
        ),
    );

    table.insert(
        "jwt",
        spec(
            "JWT Token",
            "JSON Web Token",
            CATEGORY_SECRETS,
            vec![rule(r"eyJ[a-zA-Z0-9_-]*\.eyJ[a-zA-Z0-9_-]*\.[a-zA-Z0-9_-]*", Confidence::High)],
            None,
            MaskingStrategy::partial(10, 0),
            Severity::High,
            true,
        ),
    );

    table.insert(
        "private-key",
        spec(
            "Private Key",
            "Detects private keys (RSA, DSA, EC, etc.)",
            CATEGORY_SECRETS,
            vec![rule(r"-----BEGIN (?:RSA |DSA |EC |OPENSSH )?PRIVATE KEY-----", Confidence::High)],
            None,
            MaskingStrategy::replacement("[PRIVATE_KEY_REDACTED]"),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "password-in-url",
        spec(
            "Password in URL",
            "Detects passwords embedded in URLs",
            CATEGORY_SECRETS,
            vec![rule(r"(?i)(?:https?://)[^:]+:([^@]+)@", Confidence::High)],
            None,
            MaskingStrategy::replacement("[PASSWORD_REDACTED]"),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "password",
        spec(
            "Password",
            "Detects password assignments in code/config",
            CATEGORY_SECRETS,
            vec![rule(
                r#"(?i)(?:password|passwd|pwd)['"]?\s*[:=]\s*['"]?[^\s'"]{8,}['"]?"#,
                Confidence::Medium,
            )],
            None,
            MaskingStrategy::replacement("[PASSWORD_REDACTED]"),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "database-connection",
        spec(
            "Database Connection String",
            "Detects database connection strings with credentials",
            CATEGORY_SECRETS,
            vec![rule(r"(?i)(?:mongodb|postgres|mysql|redis|amqp)://[^:]+:[^@]+@", Confidence::High)],
            None,
            MaskingStrategy::replacement("[DB_CONNECTION_REDACTED]"),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "stripe-key",
        spec(
            "Stripe API Key",
            "Stripe API keys (live and test)",
            CATEGORY_SECRETS,
            vec![
                rule(r"sk_live_[0-9a-zA-Z]{24}", Confidence::High),
                rule(r"sk_test_[0-9a-zA-Z]{24}", Confidence::High),
                rule(r"pk_live_[0-9a-zA-Z]{24}", Confidence::High),
                rule(r"pk_test_[0-9a-zA-Z]{24}", Confidence::High),
            ],
            None,
            MaskingStrategy::partial(7, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "sendgrid-key",
        spec(
            "SendGrid API Key",
            "SendGrid API keys",
            CATEGORY_SECRETS,
            vec![rule(r"SG\.[0-9A-Za-z\-_]{22}\.[0-9A-Za-z\-_]{43}", Confidence::High)],
            None,
            MaskingStrategy::partial(3, 0),
            Severity::Critical,
            true,
        ),
    );

    table.insert(
        "twilio-key",
        spec(
            "Twilio API Key/SID",
            "Twilio Account SID and Auth Token",
            CATEGORY_SECRETS,
            vec![
                rule(r"AC[0-9a-fA-F]{32}", Confidence::High),
                rule(r"SK[0-9a-fA-F]{32}", Confidence::High),
            ],
            None,
            MaskingStrategy::partial(2, 0),
            Severity::Critical,
            true,
        ),
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn every_builtin_regex_compiles() {
        for (name, spec) in BUILTIN_PATTERNS.iter() {
            assert!(!spec.patterns.is_empty(), "{name} has no rules");
            for rule in &spec.patterns {
                assert!(Regex::new(&rule.regex).is_ok(), "{name}: bad regex {}", rule.regex);
            }
        }
    }

    #[test]
    fn every_validator_reference_resolves() {
        for (name, spec) in BUILTIN_PATTERNS.iter() {
            if let Some(validator) = &spec.validator {
                assert!(
                    crate::validator::Validator::by_name(validator).is_some(),
                    "{name} references unknown validator {validator}"
                );
            }
        }
    }

    #[test]
    fn default_enablement_matches_catalog_policy() {
        for name in ["email", "credit-card", "korean-rrn", "phone-kr", "aws-access-key", "jwt"] {
            assert!(get(name).unwrap().enabled, "{name} should default enabled");
        }
        for name in ["ip-address", "ipv6-address", "mac-address", "driver-license-us", "passport-us", "routing-number-us"] {
            assert!(!get(name).unwrap().enabled, "{name} should default disabled");
        }
    }

    #[test]
    fn categories_cover_the_four_groups() {
        assert_eq!(categories(), vec!["global", "korea", "secrets", "usa"]);
        assert!(names_by_category("korea").contains(&"korean-rrn"));
        assert!(names_by_category("secrets").contains(&"stripe-key"));
    }

    #[test]
    fn lookups_are_name_keyed() {
        assert!(contains("email"));
        assert!(!contains("emailx"));
        assert!(names().len() >= 30);
        assert!(enabled_names().len() < names().len());
    }
}
