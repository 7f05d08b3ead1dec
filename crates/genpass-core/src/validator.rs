//! Form input validation.
//!
//! Length input is never rejected: whatever the user typed maps onto a
//! usable value, so every edit leaves the form able to generate.

use serde::{Deserialize, Serialize};

/// Shortest password the form will generate.
pub const MIN_LENGTH: u8 = 4;

/// Longest password the form will generate.
pub const MAX_LENGTH: u8 = 32;

/// Length used when the field does not hold a number.
pub const DEFAULT_LENGTH: u8 = 8;

/// Parse a length field and clamp it into `[MIN_LENGTH, MAX_LENGTH]`.
///
/// Parsing follows what a browser's `parseInt(raw, 10)` accepts: leading
/// whitespace, an optional sign, then the leading run of digits. Anything
/// without digits falls back to [`DEFAULT_LENGTH`].
///
/// ```
/// use genpass_core::validate_length;
///
/// assert_eq!(validate_length("12"), 12);
/// assert_eq!(validate_length("200"), 32);
/// assert_eq!(validate_length("3"), 4);
/// assert_eq!(validate_length("ten"), 8);
/// assert_eq!(validate_length(" 16px"), 16);
/// ```
pub fn validate_length(raw: &str) -> u8 {
    parse_leading_int(raw).map_or(DEFAULT_LENGTH, clamp_length)
}

/// Clamp an integer length into `[MIN_LENGTH, MAX_LENGTH]`.
pub fn clamp_length(length: i64) -> u8 {
    let clamped = length.clamp(i64::from(MIN_LENGTH), i64::from(MAX_LENGTH));
    u8::try_from(clamped).unwrap_or(DEFAULT_LENGTH)
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let run = digits.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for digit in run {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(digit - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}

/// Letter case applied to a derived password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordCase {
    /// All letters lowercased.
    #[default]
    Lowercase,
    /// All letters uppercased.
    Uppercase,
    /// Letters left as derived.
    Mixed,
}

impl PasswordCase {
    /// Name used in storage and in the form's radio values.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Mixed => "mixed",
        }
    }

    /// Look a case up by its stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lowercase" => Some(Self::Lowercase),
            "uppercase" => Some(Self::Uppercase),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    /// Apply this case to a derived password.
    pub fn apply(self, password: &str) -> String {
        match self {
            Self::Lowercase => password.to_lowercase(),
            Self::Uppercase => password.to_uppercase(),
            Self::Mixed => password.to_string(),
        }
    }
}

/// Resolve the chosen case option; nothing or something unknown selected
/// means [`PasswordCase::Lowercase`].
pub fn selected_case(selection: Option<&str>) -> PasswordCase {
    selection.and_then(PasswordCase::from_name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn boundaries_clamp() {
        assert_eq!(validate_length("3"), 4);
        assert_eq!(validate_length("4"), 4);
        assert_eq!(validate_length("32"), 32);
        assert_eq!(validate_length("33"), 32);
        assert_eq!(validate_length("-7"), 4);
        assert_eq!(validate_length("0"), 4);
    }

    #[test]
    fn parse_failure_defaults() {
        assert_eq!(validate_length(""), 8);
        assert_eq!(validate_length("   "), 8);
        assert_eq!(validate_length("abc"), 8);
        assert_eq!(validate_length("-"), 8);
        assert_eq!(validate_length("x12"), 8);
    }

    #[test]
    fn leading_digits_win() {
        assert_eq!(validate_length("12abc"), 12);
        assert_eq!(validate_length("  +20"), 20);
        assert_eq!(validate_length("9.9"), 9);
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(validate_length("99999999999999999999999999"), 32);
        assert_eq!(validate_length("-99999999999999999999999999"), 4);
    }

    #[test]
    fn case_names() {
        for case in [PasswordCase::Lowercase, PasswordCase::Uppercase, PasswordCase::Mixed] {
            assert_eq!(PasswordCase::from_name(case.as_str()), Some(case));
        }
    }

    #[test]
    fn selected_case_defaults_to_lowercase() {
        assert_eq!(selected_case(None), PasswordCase::Lowercase);
        assert_eq!(selected_case(Some("shouting")), PasswordCase::Lowercase);
        assert_eq!(selected_case(Some("uppercase")), PasswordCase::Uppercase);
    }

    #[test]
    fn case_apply() {
        assert_eq!(PasswordCase::Lowercase.apply("aB3"), "ab3");
        assert_eq!(PasswordCase::Uppercase.apply("aB3"), "AB3");
        assert_eq!(PasswordCase::Mixed.apply("aB3"), "aB3");
    }

    proptest! {
        #[test]
        fn always_in_range(n in any::<i64>()) {
            let length = validate_length(&n.to_string());
            prop_assert!((MIN_LENGTH..=MAX_LENGTH).contains(&length));
        }

        #[test]
        fn monotonic(a in -100i64..100, b in -100i64..100) {
            prop_assume!(a <= b);
            prop_assert!(validate_length(&a.to_string()) <= validate_length(&b.to_string()));
        }

        #[test]
        fn identity_inside_range(n in 4i64..=32) {
            prop_assert_eq!(i64::from(validate_length(&n.to_string())), n);
        }

        #[test]
        fn non_numeric_defaults(s in "[a-zA-Z ]*") {
            prop_assert_eq!(validate_length(&s), DEFAULT_LENGTH);
        }
    }
}
