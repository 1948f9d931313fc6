use tally_value::{classify, logical, CondFlags};

/// Translate the logical bytes of `target` through `table`.
///
/// The table's logical text is a run of `(from, to)` byte pairs. Each
/// target byte is looked up from the end of the table backwards; the first
/// pair whose `from` matches replaces it. Bytes with no pair are kept.
///
/// A null or empty operand, or a table of odd length, returns `EOS` and
/// leaves the target alone.
pub fn replace(table: &[u8], target: &mut [u8]) -> CondFlags {
    let pairs = logical(table);
    let Some(range) = classify(target).logical_range() else {
        return CondFlags::EOS;
    };
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        return CondFlags::EOS;
    }
    let end = range.end.min(target.len());
    for byte in &mut target[range.start..end] {
        if let Some(pair) = pairs.chunks_exact(2).rev().find(|pair| pair[0] == *byte) {
            *byte = pair[1];
        }
    }
    CondFlags::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_value::{set_window, TaggedValue};

    fn text(s: &[u8]) -> TaggedValue {
        TaggedValue::short_text_from(s, 0)
    }

    #[test]
    fn translates_each_byte() {
        let mut target = text(b"a-b-c");
        assert_eq!(replace(&text(b"-_ab"), &mut target), CondFlags::empty());
        assert_eq!(logical(&target), b"b_b_c");
    }

    #[test]
    fn later_pairs_win() {
        let mut target = text(b"xx");
        replace(&text(b"x1x2"), &mut target);
        assert_eq!(logical(&target), b"22");
    }

    #[test]
    fn only_the_window_changes() {
        let mut target = text(b"aaaa");
        set_window(&mut target, 2, 3);
        replace(&text(b"ab"), &mut target);
        assert_eq!(&target[3..], b"abba");
    }

    #[test]
    fn odd_table_or_empty_operand_is_end_of_sequence() {
        let mut target = text(b"abc");
        assert_eq!(replace(&text(b"abc"), &mut target), CondFlags::EOS);
        assert_eq!(replace(&TaggedValue::short_text(2), &mut target), CondFlags::EOS);
        assert_eq!(logical(&target), b"abc");

        let mut empty = TaggedValue::short_text(3);
        assert_eq!(replace(&text(b"ab"), &mut empty), CondFlags::EOS);
    }
}
