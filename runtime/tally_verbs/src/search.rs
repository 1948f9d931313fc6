//! Linear search of a list for a target value.

use std::cmp::Ordering;

use tally_edit::numeric::compare;
use tally_value::{classify, logical, payload, tag, CondFlags, VarType};

use crate::readable;

/// How a numeric target is matched against numeric elements.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Numeric target against numeric element compares by value.
    #[default]
    Numeric,
    /// Every target compares as characters against the element's digits.
    Legacy,
}

/// Result of [`search`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Search {
    /// 1-based position of the match among counted elements, or 0.
    pub position: i32,
    /// `EQUAL` when found, `OVER` when not.
    pub flags: CondFlags,
}

impl Search {
    fn found(position: i32) -> Self {
        Search {
            position,
            flags: CondFlags::EQUAL,
        }
    }

    const NOT_FOUND: Search = Search {
        position: 0,
        flags: CondFlags::OVER,
    };
}

/// Search at most `count` elements of `list` for `target`.
///
/// - Numeric target, numeric element: compared by value.
/// - Otherwise the target's bytes are compared with the start of the
///   element. Numeric elements are read as their form; text elements by
///   their logical window. Elements shorter than the target, and null or
///   empty text, never match.
/// - An end-of-data element stops the search. Elements of any other kind
///   are skipped and do not count toward `count` or the position.
///
/// A null or empty target matches nothing.
pub fn search(target: &[u8], list: &[&[u8]], count: i32, mode: SearchMode) -> Search {
    let target_view = readable(target);
    let target_layout = classify(&target_view);
    let mut target_type = classify(target).var_type;
    let key: &[u8] = if target_type.is_numeric() {
        payload(&target_view)
    } else {
        logical(&target_view)
    };
    if target_layout.fp == 0 || key.is_empty() {
        return Search::NOT_FOUND;
    }
    if mode == SearchMode::Legacy && target_type.is_numeric() {
        target_type = VarType::CHAR;
    }

    let mut position = 0;
    for &element in list {
        if position >= count {
            break;
        }
        let element_type = classify(element).var_type;
        if element_type.is_numvar() {
            position += 1;
            if target_type.is_numvar() {
                if compare(target, element) == Some(Ordering::Equal) {
                    return Search::found(position);
                }
                continue;
            }
            let digits = readable(element);
            if payload(&digits).starts_with(key) {
                return Search::found(position);
            }
        } else if element_type.contains(VarType::CHAR) {
            position += 1;
            if element_type.is_null() {
                continue;
            }
            if logical(element).starts_with(key) {
                return Search::found(position);
            }
        } else if element.first() == Some(&tag::END_OF_DATA) {
            break;
        }
    }
    Search::NOT_FOUND
}
