//! Checksum validators for candidate matches
//!
//! Validators are pure functions over the matched substring. The set is
//! closed: patterns reference validators by name, and unknown names mean
//! the match is accepted without validation.

/// A checksum validator selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Luhn check over 13–19 digits (payment card numbers).
    Luhn,
    /// Korean Resident Registration Number check digit.
    KoreanRrn,
    /// Korean Business Registration Number check digit.
    KoreanBusinessNumber,
    /// IBAN MOD 97-10.
    Iban,
}

impl Validator {
    /// Resolve a validator by its registry name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "luhn" => Some(Self::Luhn),
            "rrn-checksum" => Some(Self::KoreanRrn),
            "business-number-checksum" => Some(Self::KoreanBusinessNumber),
            "iban-checksum" => Some(Self::Iban),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Luhn => "luhn",
            Self::KoreanRrn => "rrn-checksum",
            Self::KoreanBusinessNumber => "business-number-checksum",
            Self::Iban => "iban-checksum",
        }
    }

    /// All registry names, for diagnostics.
    pub fn names() -> &'static [&'static str] {
        &["luhn", "rrn-checksum", "business-number-checksum", "iban-checksum"]
    }

    /// Evaluate the validator against a matched substring.
    pub fn validate(&self, input: &str) -> bool {
        match self {
            Self::Luhn => luhn(input),
            Self::KoreanRrn => korean_rrn(input),
            Self::KoreanBusinessNumber => korean_business_number(input),
            Self::Iban => iban(input),
        }
    }
}

fn luhn(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let mut sum = 0u32;
    let mut alternate = false;
    for &digit in digits.iter().rev() {
        let mut n = digit;
        if alternate {
            n *= 2;
            if n > 9 {
                n -= 9;
            }
        }
        sum += n;
        alternate = !alternate;
    }

    sum % 10 == 0
}

fn korean_rrn(input: &str) -> bool {
    let digits: Vec<u32> = input
        .chars()
        .filter(|&c| c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if digits.len() != 13 {
        return false;
    }

    const WEIGHTS: [u32; 12] = [2, 3, 4, 5, 6, 7, 8, 9, 2, 3, 4, 5];

    let sum: u32 = digits.iter().zip(WEIGHTS.iter()).map(|(d, w)| d * w).sum();
    let expected = (11 - sum % 11) % 10;

    digits[12] == expected
}

fn korean_business_number(input: &str) -> bool {
    let digits: Vec<u32> = input
        .chars()
        .filter(|&c| c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    if digits.len() != 10 {
        return false;
    }

    const WEIGHTS: [u32; 9] = [1, 3, 7, 1, 3, 7, 1, 3, 5];

    let mut sum: u32 = digits.iter().zip(WEIGHTS.iter()).map(|(d, w)| d * w).sum();
    // The ninth digit contributes its weighted tens carry as well.
    sum += digits[8] * 5 / 10;

    let expected = (10 - sum % 10) % 10;
    digits[9] == expected
}

fn iban(input: &str) -> bool {
    let iban: String =
        input.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();

    if iban.len() < 15 || iban.len() > 34 {
        return false;
    }

    // Country code and check digits rotate to the end before expansion.
    let (head, _) = iban.split_at(4);
    let rearranged: String = iban[4..].chars().chain(head.chars()).collect();

    // Streaming MOD-97 over the digit expansion, so arbitrarily long IBANs
    // never need big-integer arithmetic.
    let mut remainder: u32 = 0;
    for c in rearranged.chars() {
        match c {
            'A'..='Z' => {
                let value = c as u32 - 'A' as u32 + 10;
                remainder = (remainder * 100 + value) % 97;
            }
            '0'..='9' => {
                remainder = (remainder * 10 + (c as u32 - '0' as u32)) % 97;
            }
            _ => return false,
        }
    }

    remainder == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luhn_accepts_valid_card_numbers() {
        assert!(Validator::Luhn.validate("4532015112830366"));
        assert!(Validator::Luhn.validate("4532-0151-1283-0366"));
        assert!(Validator::Luhn.validate("5425233430109903"));
    }

    #[test]
    fn luhn_rejects_bad_checksums_and_lengths() {
        assert!(!Validator::Luhn.validate("1234567890123456"));
        assert!(!Validator::Luhn.validate("4532015112830367"));
        // Too short and too long after digit stripping.
        assert!(!Validator::Luhn.validate("411111111111"));
        assert!(!Validator::Luhn.validate("41111111111111111111"));
    }

    #[test]
    fn rrn_checksum_validates_check_digit() {
        // Weighted sum of 920101-123456 is 130; (11 - 130 % 11) % 10 == 2.
        assert!(Validator::KoreanRrn.validate("920101-1234562"));
        assert!(Validator::KoreanRrn.validate("9201011234562"));
        assert!(!Validator::KoreanRrn.validate("920101-1234567"));
        assert!(!Validator::KoreanRrn.validate("920101-123456"));
        assert!(!Validator::KoreanRrn.validate("92010a-1234562"));
    }

    #[test]
    fn business_number_checksum_validates_check_digit() {
        // 220-81-62517 is the canonical published example.
        assert!(Validator::KoreanBusinessNumber.validate("220-81-62517"));
        assert!(Validator::KoreanBusinessNumber.validate("2208162517"));
        assert!(!Validator::KoreanBusinessNumber.validate("220-81-62518"));
        assert!(!Validator::KoreanBusinessNumber.validate("220-81-625"));
    }

    #[test]
    fn iban_mod97_accepts_reference_accounts() {
        assert!(Validator::Iban.validate("GB82WEST12345698765432"));
        assert!(Validator::Iban.validate("GB82 WEST 1234 5698 7654 32"));
        assert!(Validator::Iban.validate("DE89370400440532013000"));
        assert!(!Validator::Iban.validate("GB82WEST12345698765433"));
        assert!(!Validator::Iban.validate("GB82WEST"));
    }

    #[test]
    fn registry_resolves_known_names_only() {
        assert_eq!(Validator::by_name("luhn"), Some(Validator::Luhn));
        assert_eq!(Validator::by_name("iban-checksum"), Some(Validator::Iban));
        assert_eq!(Validator::by_name("no-such-validator"), None);
        for name in Validator::names() {
            assert!(Validator::by_name(name).is_some());
        }
    }
}
