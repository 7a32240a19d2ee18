//! Semantic versions and version constraints for rule sets
//!
//! Versions take the form `[v]MAJOR[.MINOR[.PATCH]][-PRE]`. Constraint
//! strings combine the operators `=`, `>`, `>=`, `<`, `<=`, `~`, and `^`;
//! a list separated by commas or spaces is a conjunction, and `*` or the
//! empty string matches anything.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CatalogError;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-(.+))?$")
        .expect("version grammar is a valid regex")
});

/// A parsed semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch, pre: None }
    }

    /// Parse `[v]MAJOR[.MINOR[.PATCH]][-PRE]`; omitted components are zero.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let trimmed = input.strip_prefix('v').unwrap_or(input);
        let captures = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| CatalogError::VersionParse(input.to_string()))?;

        let component = |index: usize| -> Result<u64, CatalogError> {
            captures
                .get(index)
                .map(|m| m.as_str().parse().map_err(|_| CatalogError::VersionParse(input.into())))
                .unwrap_or(Ok(0))
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            pre: captures.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pre {
            Some(pre) => write!(f, "{}.{}.{}-{}", self.major, self.minor, self.patch, pre),
            None => write!(f, "{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                // A pre-release sorts below the release of the same triple.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
                (None, None) => Ordering::Equal,
            })
    }
}

/// Compare two version strings, falling back to lexicographic comparison
/// when both are unparseable; an unparseable version sorts below a parsed
/// one.
pub fn compare_version_strings(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Err(_), Err(_)) => a.cmp(b),
        (Err(_), Ok(_)) => Ordering::Less,
        (Ok(_), Err(_)) => Ordering::Greater,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Tilde,
    Caret,
}

impl Op {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Tilde => "~",
            Self::Caret => "^",
        }
    }
}

/// A single version constraint, e.g. `>=1.2.0` or `^2.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub op: Op,
    pub version: Version,
}

impl Constraint {
    /// Parse one constraint. `*` and the empty string mean "no constraint"
    /// and return `None`.
    pub fn parse(input: &str) -> Result<Option<Self>, CatalogError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(None);
        }

        let (op, rest) = if let Some(rest) = trimmed.strip_prefix(">=") {
            (Op::Ge, rest)
        } else if let Some(rest) = trimmed.strip_prefix("<=") {
            (Op::Le, rest)
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            (Op::Gt, rest)
        } else if let Some(rest) = trimmed.strip_prefix('<') {
            (Op::Lt, rest)
        } else if let Some(rest) = trimmed.strip_prefix('~') {
            (Op::Tilde, rest)
        } else if let Some(rest) = trimmed.strip_prefix('^') {
            (Op::Caret, rest)
        } else if let Some(rest) = trimmed.strip_prefix('=') {
            (Op::Eq, rest)
        } else {
            (Op::Eq, trimmed)
        };

        Ok(Some(Self { op, version: Version::parse(rest.trim())? }))
    }

    pub fn matches(&self, version: &Version) -> bool {
        let ordering = version.cmp(&self.version);
        match self.op {
            Op::Ge => ordering != Ordering::Less,
            Op::Gt => ordering == Ordering::Greater,
            Op::Le => ordering != Ordering::Greater,
            Op::Lt => ordering == Ordering::Less,
            Op::Eq => ordering == Ordering::Equal,
            // ~X.Y.Z admits >=X.Y.Z and <X.(Y+1).0.
            Op::Tilde => {
                ordering != Ordering::Less
                    && version.major == self.version.major
                    && version.minor == self.version.minor
            }
            // ^X.Y.Z admits >=X.Y.Z and <(X+1).0.0; for 0.y.z it behaves
            // like ~.
            Op::Caret => {
                if ordering == Ordering::Less {
                    return false;
                }
                if self.version.major == 0 {
                    version.major == 0 && version.minor == self.version.minor
                } else {
                    version.major == self.version.major
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}

/// A conjunction of constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints(Vec<Constraint>);

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s]+").expect("separator grammar is a valid regex"));

impl Constraints {
    /// Parse a comma- or space-separated constraint list. `*` and the empty
    /// string parse to the unconstrained value.
    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::default());
        }

        let mut constraints = Vec::new();
        for part in SEPARATOR_RE.split(trimmed) {
            if part.is_empty() {
                continue;
            }
            if let Some(constraint) = Constraint::parse(part)? {
                constraints.push(constraint);
            }
        }
        Ok(Self(constraints))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A version satisfies the conjunction when it satisfies every member.
    pub fn matches(&self, version: &Version) -> bool {
        self.0.iter().all(|constraint| constraint.matches(version))
    }

    /// Parse and match a version string; unparseable versions match nothing
    /// unless the constraint set is empty.
    pub fn matches_str(&self, version: &str) -> bool {
        if self.0.is_empty() {
            return true;
        }
        match Version::parse(version) {
            Ok(version) => self.matches(&version),
            Err(_) => false,
        }
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("*");
        }
        let parts: Vec<String> = self.0.iter().map(Constraint::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_partial_versions_and_v_prefix() {
        assert_eq!(Version::parse("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(Version::parse("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(Version::parse("v2.3.4").unwrap(), Version::new(2, 3, 4));
        assert_eq!(
            Version::parse("1.0.0-alpha.1").unwrap().pre.as_deref(),
            Some("alpha.1")
        );
        assert!(Version::parse("not-a-version").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn format_parse_round_trip_is_identity() {
        for version in [Version::new(0, 1, 0), Version::new(10, 20, 30)] {
            let parsed = Version::parse(&version.to_string()).unwrap();
            assert_eq!(parsed.cmp(&version), Ordering::Equal);
        }
    }

    #[test]
    fn pre_release_sorts_below_release() {
        let pre = Version::parse("1.0.0-rc.1").unwrap();
        let release = Version::parse("1.0.0").unwrap();
        assert!(pre < release);
        assert!(Version::parse("1.0.0-alpha").unwrap() < Version::parse("1.0.0-beta").unwrap());
        assert!(Version::parse("1.0.0-rc.1").unwrap() > Version::parse("0.9.9").unwrap());
    }

    #[test]
    fn range_conjunction_matches_spec_examples() {
        let constraints = Constraints::parse(">=1.0.0, <2.0.0").unwrap();
        for ok in ["1.0.0", "1.5.0", "1.9.9"] {
            assert!(constraints.matches_str(ok), "{ok} should match");
        }
        for bad in ["0.9.9", "2.0.0"] {
            assert!(!constraints.matches_str(bad), "{bad} should not match");
        }
    }

    #[test]
    fn caret_pins_major_and_floors_at_base() {
        let caret = Constraints::parse("^1.2.3").unwrap();
        assert!(caret.matches_str("1.2.3"));
        assert!(caret.matches_str("1.5.0"));
        assert!(!caret.matches_str("2.0.0"));
        assert!(!caret.matches_str("1.2.2"));

        // ^0.y.z behaves like ~0.y.z.
        let zero = Constraints::parse("^0.2.3").unwrap();
        assert!(zero.matches_str("0.2.9"));
        assert!(!zero.matches_str("0.3.0"));
        assert!(!zero.matches_str("1.2.3"));
    }

    #[test]
    fn tilde_pins_major_and_minor() {
        let tilde = Constraints::parse("~1.2.3").unwrap();
        assert!(tilde.matches_str("1.2.3"));
        assert!(tilde.matches_str("1.2.9"));
        assert!(!tilde.matches_str("1.3.0"));
        assert!(!tilde.matches_str("1.2.2"));
    }

    #[test]
    fn wildcard_and_empty_match_everything() {
        for input in ["", "*", "  "] {
            let constraints = Constraints::parse(input).unwrap();
            assert!(constraints.is_empty());
            assert!(constraints.matches_str("0.0.1"));
            assert!(constraints.matches_str("weird"));
        }
    }

    #[test]
    fn unparseable_versions_fail_closed_against_constraints() {
        let constraints = Constraints::parse(">=1.0.0").unwrap();
        assert!(!constraints.matches_str("garbage"));
    }

    #[test]
    fn string_comparison_falls_back_to_lexicographic() {
        assert_eq!(compare_version_strings("1.2.0", "1.10.0"), Ordering::Less);
        assert_eq!(compare_version_strings("apple", "banana"), Ordering::Less);
        assert_eq!(compare_version_strings("apple", "1.0.0"), Ordering::Less);
        assert_eq!(compare_version_strings("1.0.0", "apple"), Ordering::Greater);
    }

    #[test]
    fn constraint_display_round_trips() {
        let constraints = Constraints::parse(">=1.0.0 <2.0.0").unwrap();
        assert_eq!(constraints.to_string(), ">=1.0.0 <2.0.0");
        assert_eq!(Constraints::default().to_string(), "*");
    }
}
