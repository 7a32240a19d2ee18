//! Masking strategies applied to matched substrings
//!
//! The applier is a pure function over the exact match text; surrounding
//! context never reaches it. Lengths are measured in code points so that
//! multi-byte text masks visually correctly.

use piiguard_domain::{MaskingStrategy, DEFAULT_MASK_CHAR};
use sha2::{Digest, Sha256};

/// Apply a masking strategy to a matched substring.
pub fn apply(text: &str, strategy: &MaskingStrategy) -> String {
    match strategy {
        MaskingStrategy::Full { replacement, mask_char } => {
            if let Some(replacement) = replacement.as_deref().filter(|r| !r.is_empty()) {
                return replacement.to_string();
            }
            repeat_mask(mask_char.unwrap_or(DEFAULT_MASK_CHAR), text.chars().count())
        }
        MaskingStrategy::Partial { show_first, show_last, mask_char } => {
            partial(text, *show_first, *show_last, mask_char.unwrap_or(DEFAULT_MASK_CHAR))
        }
        MaskingStrategy::Hash => hash(text),
        MaskingStrategy::Tokenize => tokenize(text),
        MaskingStrategy::Other => partial(text, 0, 0, DEFAULT_MASK_CHAR),
    }
}

fn partial(text: &str, show_first: usize, show_last: usize, mask_char: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    let length = chars.len();

    // Visible affixes covering the whole match collapse to a full mask.
    if show_first + show_last >= length {
        return repeat_mask(mask_char, length);
    }

    let mut result = String::with_capacity(text.len());
    result.extend(&chars[..show_first]);
    result.extend(std::iter::repeat(mask_char).take(length - show_first - show_last));
    result.extend(&chars[length - show_last..]);
    result
}

fn repeat_mask(mask_char: char, count: usize) -> String {
    std::iter::repeat(mask_char).take(count).collect()
}

/// Truncated SHA-256 placeholder. Deterministic and unsalted; a label, not
/// a secure token.
fn hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("[HASH:{}]", hex::encode(&digest[..8]))
}

fn tokenize(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("[TOKEN:{}]", hex::encode(&digest[..4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_masking_prefers_replacement() {
        let strategy = MaskingStrategy::replacement("[REDACTED]");
        assert_eq!(apply("secret-value", &strategy), "[REDACTED]");
    }

    #[test]
    fn full_masking_without_replacement_repeats_mask_char() {
        let strategy = MaskingStrategy::Full { replacement: None, mask_char: None };
        assert_eq!(apply("abcd", &strategy), "****");

        let strategy = MaskingStrategy::Full { replacement: Some(String::new()), mask_char: Some('#') };
        assert_eq!(apply("abcd", &strategy), "####");
    }

    #[test]
    fn partial_masking_keeps_affixes() {
        let strategy = MaskingStrategy::Partial { show_first: 3, show_last: 4, mask_char: None };
        assert_eq!(apply("010-1234-5678", &strategy), "010******5678");

        let strategy = MaskingStrategy::partial(2, 0);
        assert_eq!(apply("test@example.com", &strategy), "te**************");
    }

    #[test]
    fn partial_masking_collapses_when_affixes_cover_match() {
        let strategy = MaskingStrategy::Partial { show_first: 4, show_last: 4, mask_char: None };
        assert_eq!(apply("short", &strategy), "*****");
        assert_eq!(apply("ab", &strategy), "**");
    }

    #[test]
    fn partial_masking_counts_code_points_not_bytes() {
        let strategy = MaskingStrategy::Partial { show_first: 2, show_last: 0, mask_char: None };
        // Four Hangul syllables: two shown, two masked.
        assert_eq!(apply("김철수씨", &strategy), "김철**");
    }

    #[test]
    fn hash_and_tokenize_are_deterministic_placeholders() {
        let hashed = apply("4532015112830366", &MaskingStrategy::Hash);
        assert!(hashed.starts_with("[HASH:") && hashed.ends_with(']'));
        // 8 bytes -> 16 hex chars inside the envelope.
        assert_eq!(hashed.len(), "[HASH:]".len() + 16);
        assert_eq!(hashed, apply("4532015112830366", &MaskingStrategy::Hash));

        let token = apply("4532015112830366", &MaskingStrategy::Tokenize);
        assert!(token.starts_with("[TOKEN:") && token.ends_with(']'));
        assert_eq!(token.len(), "[TOKEN:]".len() + 8);
        assert_ne!(hashed, token);
    }

    #[test]
    fn unknown_strategy_falls_back_to_full_mask() {
        assert_eq!(apply("abc", &MaskingStrategy::Other), "***");
    }
}
