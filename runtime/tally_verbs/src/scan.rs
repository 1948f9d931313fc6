use tally_value::{classify, logical, set_first, CondFlags};

use crate::readable;

/// Find `needle` inside the logical window of `haystack`.
///
/// On a match the haystack's first logical position moves to the start of
/// the match and `EQUAL` is returned. No match leaves the haystack alone
/// and returns no bits. Either window being empty returns `EOS`.
pub fn scan(needle: &[u8], haystack: &mut [u8]) -> CondFlags {
    let view = readable(needle);
    let key = logical(&view);
    let window = logical(haystack);
    if key.is_empty() || window.is_empty() {
        return CondFlags::EOS;
    }
    let Some(offset) = window.windows(key.len()).position(|w| w == key) else {
        return CondFlags::empty();
    };
    let fp = classify(haystack).fp.max(1) as usize;
    set_first(haystack, fp + offset);
    tracing::trace!(offset, "scan matched");
    CondFlags::EQUAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_value::{set_window, TaggedValue};

    #[test]
    fn match_moves_first_position() {
        let mut hay = TaggedValue::short_text_from(b"hello world", 11);
        let needle = TaggedValue::short_text_from(b"wor", 3);
        assert_eq!(scan(&needle, &mut hay), CondFlags::EQUAL);
        assert_eq!(logical(&hay), b"world");
    }

    #[test]
    fn search_is_within_the_window() {
        let mut hay = TaggedValue::short_text_from(b"abcabc", 6);
        set_window(&mut hay, 3, 6);
        let needle = TaggedValue::short_text_from(b"ab", 2);
        assert_eq!(scan(&needle, &mut hay), CondFlags::EQUAL);
        assert_eq!(classify(&hay).fp, 4);
        assert_eq!(classify(&hay).lp, 6);
    }

    #[test]
    fn no_match_leaves_haystack() {
        let mut hay = TaggedValue::short_text_from(b"abc", 3);
        let needle = TaggedValue::short_text_from(b"x", 1);
        assert_eq!(scan(&needle, &mut hay), CondFlags::empty());
        assert_eq!(logical(&hay), b"abc");
    }

    #[test]
    fn empty_operands_are_end_of_sequence() {
        let mut hay = TaggedValue::short_text(5);
        let needle = TaggedValue::short_text_from(b"a", 1);
        assert_eq!(scan(&needle, &mut hay), CondFlags::EOS);
        let mut hay = TaggedValue::short_text_from(b"abc", 3);
        assert_eq!(scan(&TaggedValue::short_text(2), &mut hay), CondFlags::EOS);
    }

    #[test]
    fn numeric_needle_matches_its_form() {
        let mut hay = TaggedValue::short_text_from(b"total 42 units", 14);
        let needle = TaggedValue::int(42, 2);
        assert_eq!(scan(&needle, &mut hay), CondFlags::EQUAL);
        assert_eq!(logical(&hay), b"42 units");
    }
}
