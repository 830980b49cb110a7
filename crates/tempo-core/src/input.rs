//! Control-surface input parsing
//!
//! The minutes and seconds fields accept free-form text. Non-digit
//! characters are stripped before parsing and values clamp to the
//! field range.

/// Largest value either clock field accepts.
pub const MAX_FIELD: u32 = 59;

/// Parse one clock field (minutes or seconds).
///
/// Strips everything that is not an ASCII digit, then parses; an empty or
/// fully non-numeric field reads as zero, and anything above [`MAX_FIELD`]
/// clamps down to it.
pub fn parse_time_field(raw: &str) -> u32 {
    // Nine digits cannot overflow u32; longer runs clamp anyway.
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(9)
        .collect();
    digits
        .parse::<u32>()
        .map_or(0, |value| value.min(MAX_FIELD))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_time_field("0"), 0);
        assert_eq!(parse_time_field("7"), 7);
        assert_eq!(parse_time_field("59"), 59);
    }

    #[test]
    fn test_strips_non_digits() {
        assert_eq!(parse_time_field(" 1 5 "), 15);
        assert_eq!(parse_time_field("2m"), 2);
        assert_eq!(parse_time_field("-3"), 3);
        assert_eq!(parse_time_field("abc"), 0);
        assert_eq!(parse_time_field(""), 0);
    }

    #[test]
    fn test_clamps_to_field_range() {
        assert_eq!(parse_time_field("60"), 59);
        assert_eq!(parse_time_field("999"), 59);
        assert_eq!(parse_time_field("99999999999999999999"), 59);
    }

    proptest! {
        #[test]
        fn prop_always_in_range(raw in ".*") {
            prop_assert!(parse_time_field(&raw) <= MAX_FIELD);
        }

        #[test]
        fn prop_digits_roundtrip(value in 0u32..=59) {
            prop_assert_eq!(parse_time_field(&value.to_string()), value);
        }
    }
}
