//! Numeric suffix extraction.
//!
//! Identifiers are a textual prefix followed by a zero-padded decimal
//! sequence, e.g. `TXN2406` + `0007`. The nominal width is four digits but
//! older data may carry wider or narrower suffixes, so any non-empty run of
//! digits after the prefix is accepted.

/// Return the numeric suffix of `text` under `prefix`, or `0` on no match.
///
/// A match requires `text` to start with `prefix` exactly and to continue
/// with nothing but ASCII digits. Absent input, a different prefix, stray
/// characters, an empty suffix, or a suffix too large to represent are all
/// treated as "no match"; this never fails.
///
/// # Examples
///
/// ```
/// use folio_numbering::extract_sequence;
///
/// assert_eq!(extract_sequence(Some("TXN24060007"), "TXN2406"), 7);
/// assert_eq!(extract_sequence(Some("garbage"), "TXN2406"), 0);
/// assert_eq!(extract_sequence(None, "RCP"), 0);
/// ```
pub fn extract_sequence(text: Option<&str>, prefix: &str) -> u64 {
    let Some(text) = text else {
        return 0;
    };
    let Some(suffix) = text.trim().strip_prefix(prefix) else {
        return 0;
    };
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    suffix.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_period_scoped_suffix() {
        assert_eq!(extract_sequence(Some("TXN24060007"), "TXN2406"), 7);
        assert_eq!(extract_sequence(Some("TXN24060042"), "TXN2406"), 42);
    }

    #[test]
    fn extracts_global_suffix() {
        assert_eq!(extract_sequence(Some("RCP0001"), "RCP"), 1);
        assert_eq!(extract_sequence(Some("PV0120"), "PV"), 120);
    }

    #[test]
    fn non_matches_are_zero() {
        assert_eq!(extract_sequence(Some("garbage"), "TXN2406"), 0);
        assert_eq!(extract_sequence(None, "RCP"), 0);
        assert_eq!(extract_sequence(Some(""), "RCP"), 0);
        assert_eq!(extract_sequence(Some("RCP"), "RCP"), 0);
        assert_eq!(extract_sequence(Some("TXN24070001"), "TXN2406"), 0);
        assert_eq!(extract_sequence(Some("RCP00A1"), "RCP"), 0);
    }

    #[test]
    fn single_letter_prefix_does_not_swallow_other_namespaces() {
        assert_eq!(extract_sequence(Some("RCP0001"), "R"), 0);
        assert_eq!(extract_sequence(Some("R24060003"), "R2406"), 3);
    }

    #[test]
    fn tolerates_width_drift() {
        assert_eq!(extract_sequence(Some("RCP12345"), "RCP"), 12345);
        assert_eq!(extract_sequence(Some("RCP7"), "RCP"), 7);
        assert_eq!(extract_sequence(Some("TXN2406000010"), "TXN2406"), 10);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(extract_sequence(Some("  PV0003 "), "PV"), 3);
    }

    #[test]
    fn overflowing_suffix_is_no_match() {
        assert_eq!(
            extract_sequence(Some("RCP999999999999999999999999"), "RCP"),
            0
        );
    }

    proptest! {
        #[test]
        fn formatted_sequences_roundtrip(
            prefix in "[A-Z]{1,3}[0-9]{0,4}",
            seq in 0u64..100_000_000,
        ) {
            let text = format!("{prefix}{seq:04}");
            prop_assert_eq!(extract_sequence(Some(&text), &prefix), seq);
        }

        #[test]
        fn never_panics(text in ".*", prefix in ".*") {
            let _ = extract_sequence(Some(&text), &prefix);
        }
    }
}
