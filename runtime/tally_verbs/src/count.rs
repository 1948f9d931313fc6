use tally_value::{classify, logical, payload};

use crate::readable;

/// Total significant length of every element of `list`.
///
/// - Numeric: the form width less leading spaces and zeros. When there is
///   a decimal point, trailing fraction zeros are dropped too, and the
///   point itself when nothing follows it.
/// - Text: logical length less trailing spaces.
pub fn count(list: &[&[u8]]) -> i32 {
    list.iter().map(|&element| significant(element)).sum()
}

fn significant(element: &[u8]) -> i32 {
    let var_type = classify(element).var_type;
    if var_type.is_numeric() {
        let view = readable(element);
        let digits = payload(&view);
        let start = digits
            .iter()
            .position(|&b| b != b' ' && b != b'0')
            .unwrap_or(digits.len());
        let mut end = digits.len();
        if digits[start..].contains(&b'.') {
            while end > start && digits[end - 1] == b'0' {
                end -= 1;
            }
            if end > start && digits[end - 1] == b'.' {
                end -= 1;
            }
        }
        (end - start) as i32
    } else {
        let text = logical(element);
        let trimmed = text.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        trimmed as i32
    }
}
