//! Numeric text entry.
//!
//! Table cells accept numbers one keystroke at a time, so every prefix of a
//! valid literal (`"-"`, `"."`, `"1.2e-"`) must be accepted while typing and
//! still resolve to something usable. Grammar:
//!
//! ```text
//! literal  := sign? mantissa exponent?
//! mantissa := digits ('.' digits?)? | '.' digits
//! exponent := ('e' | 'E') sign? digits
//! ```
//!
//! Surrounding whitespace is ignored by every check below; whitespace inside
//! a literal is not. Anything that cannot be extended into a literal is
//! rejected by [`is_partial_numeric`] and resolves to `0`.

use crate::Real;

/// Where a piece of text stands relative to the literal grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralState {
    /// Nothing typed yet.
    Empty,
    /// A proper prefix of a literal: `"-"`, `"."`, `"3e"`, `"3e+"`.
    Partial,
    /// A full literal.
    Complete,
    /// Cannot become a literal by appending characters.
    Invalid,
}

/// Classify raw (untrimmed) text.
pub fn classify(text: &str) -> LiteralState {
    if text.is_empty() {
        return LiteralState::Empty;
    }

    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes[0], b'+' | b'-') {
        i += 1;
    }

    let mut mantissa_digits = 0usize;
    let mut seen_point = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => mantissa_digits += 1,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        i += 1;
    }

    if i == bytes.len() {
        return if mantissa_digits > 0 {
            LiteralState::Complete
        } else {
            LiteralState::Partial
        };
    }

    if !matches!(bytes[i], b'e' | b'E') || mantissa_digits == 0 {
        return LiteralState::Invalid;
    }
    i += 1;

    if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
        i += 1;
    }

    let mut exponent_digits = 0usize;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        exponent_digits += 1;
        i += 1;
    }

    if i < bytes.len() {
        LiteralState::Invalid
    } else if exponent_digits > 0 {
        LiteralState::Complete
    } else {
        LiteralState::Partial
    }
}

/// Keystroke gate: true if the trimmed text is a literal or could become one.
pub fn is_partial_numeric(text: &str) -> bool {
    classify(text.trim()) != LiteralState::Invalid
}

/// True if the trimmed text is a full literal with a finite value.
pub fn is_complete_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    classify(trimmed) == LiteralState::Complete
        && trimmed.parse::<Real>().is_ok_and(Real::is_finite)
}

/// Convert finished text into a number.
///
/// Total: empty input, a bare sign or point, a dangling exponent marker,
/// garbage and overflow all resolve to `0`.
pub fn resolve(text: &str) -> Real {
    let trimmed = text.trim();
    if classify(trimmed) != LiteralState::Complete {
        return 0.0;
    }
    match trimmed.parse::<Real>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_scientific_notation() {
        assert_eq!(resolve("1.5e3"), 1500.0);
        assert_eq!(resolve("-2.5E-2"), -0.025);
        assert_eq!(resolve("+4e+1"), 40.0);
        assert_eq!(resolve(".5"), 0.5);
        assert_eq!(resolve("5."), 5.0);
    }

    #[test]
    fn incomplete_or_garbage_resolves_to_zero() {
        for text in ["", "-", "+", ".", "-.", "1.5e", "1e-", "2E+", "abc", "1.2.3", "inf", "NaN"] {
            assert_eq!(resolve(text), 0.0, "{text:?}");
        }
    }

    #[test]
    fn overflow_resolves_to_zero() {
        assert_eq!(resolve("1e999"), 0.0);
        assert!(!is_complete_numeric("1e999"));
    }

    #[test]
    fn resolve_trims_surrounding_whitespace() {
        assert_eq!(resolve("  12.5 "), 12.5);
    }

    #[test]
    fn partial_prefixes_are_accepted() {
        for text in ["", "-", "+", ".", "-.", "1", "1.", "1.2e", "1.2e-", "1.2E+3", "100e-3"] {
            assert!(is_partial_numeric(text), "{text:?}");
        }
    }

    #[test]
    fn dead_ends_are_rejected() {
        for text in ["e", "-e5", ".e", "1..", "1e2.", "1e--", "12a", "1 2", "- 1", "--1"] {
            assert!(!is_partial_numeric(text), "{text:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored_consistently() {
        for text in [" 7", "7 ", "\t-2.5e1\n"] {
            assert!(is_partial_numeric(text), "{text:?}");
            assert!(is_complete_numeric(text), "{text:?}");
        }
        assert_eq!(resolve(" 7"), 7.0);
        assert!(is_partial_numeric("  "));
        assert!(is_partial_numeric(" 1e-"));
        assert!(!is_complete_numeric(" 1e-"));
    }

    #[test]
    fn classify_states() {
        assert_eq!(classify(""), LiteralState::Empty);
        assert_eq!(classify("-"), LiteralState::Partial);
        assert_eq!(classify("3e"), LiteralState::Partial);
        assert_eq!(classify("3e7"), LiteralState::Complete);
        assert_eq!(classify("x"), LiteralState::Invalid);
    }

    #[test]
    fn complete_requires_digits_in_mantissa_and_exponent() {
        assert!(is_complete_numeric("0"));
        assert!(is_complete_numeric(" 7e2 "));
        assert!(!is_complete_numeric("-"));
        assert!(!is_complete_numeric("7e"));
        assert!(!is_complete_numeric(""));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn resolve_is_total_and_finite(text in ".{0,24}") {
            prop_assert!(resolve(&text).is_finite());
        }

        #[test]
        fn complete_implies_partial(text in "[ \t]{0,2}[-+]?[0-9.]{0,6}([eE][-+]?[0-9]{0,3})?[ \t]{0,2}") {
            if is_complete_numeric(&text) {
                prop_assert!(is_partial_numeric(&text));
            }
        }

        #[test]
        fn every_prefix_of_a_literal_is_partial(text in "[-+]?[0-9]{1,5}(\\.[0-9]{0,4})?([eE][-+]?[0-9]{1,2})?") {
            for end in 0..=text.len() {
                prop_assert!(is_partial_numeric(&text[..end]), "prefix {:?}", &text[..end]);
            }
        }

        #[test]
        fn formatted_floats_round_trip(v in -1.0e12_f64..1.0e12) {
            let text = format!("{v:e}");
            prop_assert!(is_complete_numeric(&text));
            prop_assert_eq!(resolve(&text), v);
        }
    }
}
