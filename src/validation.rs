//! Field-level validation rules shared by the request handlers.
//!
//! Length limits are counted in Unicode scalar values, not bytes, so a
//! name like "café" costs four characters.

/// True iff every character of `s` is in `[A-Za-z0-9]`.
pub fn is_ascii_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// True iff `s` contains at least one lowercase letter, one uppercase
/// letter, and one ASCII digit.
pub fn has_lower_upper_digit(s: &str) -> bool {
    let mut has_lower = false;
    let mut has_upper = false;
    let mut has_digit = false;

    for c in s.chars() {
        if c.is_lowercase() {
            has_lower = true;
        } else if c.is_uppercase() {
            has_upper = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        }
    }

    has_lower && has_upper && has_digit
}

/// Number of Unicode scalar values in `s`.
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_alphanumeric_accepts_letters_and_digits() {
        assert!(is_ascii_alphanumeric("Abc123"));
        assert!(is_ascii_alphanumeric(""));
    }

    #[test]
    fn ascii_alphanumeric_rejects_anything_else() {
        assert!(!is_ascii_alphanumeric("abc 123"));
        assert!(!is_ascii_alphanumeric("pass-word"));
        assert!(!is_ascii_alphanumeric("pässword1A"));
        assert!(!is_ascii_alphanumeric("密碼Aa1"));
    }

    #[test]
    fn composition_requires_all_three_classes() {
        assert!(has_lower_upper_digit("Abc123"));
        assert!(!has_lower_upper_digit("abc"));
        assert!(!has_lower_upper_digit("abc123"));
        assert!(!has_lower_upper_digit("ABC123"));
        assert!(!has_lower_upper_digit("AbcDef"));
    }

    #[test]
    fn char_count_counts_scalars_not_bytes() {
        assert_eq!(char_count("café"), 4);
        assert_eq!(char_count("雜項預算"), 4);
        assert_eq!(char_count(""), 0);
    }
}
