//! Numeric readings of tagged values.
//!
//! These helpers never fail: malformed digit text reads as whatever prefix
//! parses, and non-numeric variants read as zero.

use std::cmp::Ordering;

use tally_value::{classify, decode, logical, Kind, Value};

use crate::form::make_form;

/// Longest logical text [`is_numeric_text`] accepts.
pub const MAX_NUMERIC_TEXT: usize = 31;

/// Check that the logical text of a value reads as a number: leading
/// spaces, an optional `-`, digits, an optional point and fraction digits.
///
/// A lone `.`, `-.` or `-` is rejected, as is anything longer than
/// [`MAX_NUMERIC_TEXT`] bytes.
pub fn is_numeric_text(buf: &[u8]) -> bool {
    is_numeric_bytes(logical(buf))
}

/// [`is_numeric_text`] over raw bytes.
pub fn is_numeric_bytes(text: &[u8]) -> bool {
    if text.is_empty() || text.len() > MAX_NUMERIC_TEXT || text == b"." || text == b"-." {
        return false;
    }

    #[derive(PartialEq)]
    enum State {
        Leading,
        Integer,
        Fraction,
    }

    let mut state = State::Leading;
    for &c in text {
        state = match state {
            State::Leading => match c {
                b' ' => State::Leading,
                b'-' | b'0'..=b'9' => State::Integer,
                b'.' => State::Fraction,
                _ => return false,
            },
            State::Integer => match c {
                b'0'..=b'9' => State::Integer,
                b'.' => State::Fraction,
                _ => return false,
            },
            State::Fraction => match c {
                b'0'..=b'9' => State::Fraction,
                _ => return false,
            },
        };
    }
    state != State::Leading && text.last() != Some(&b'-')
}

/// `atoi` over a byte prefix: leading whitespace, an optional sign, then
/// digits up to the first non-digit. Overflow wraps.
pub fn atoi_wrapping(text: &[u8]) -> i32 {
    let mut i = 0;
    while i < text.len() && text[i].is_ascii_whitespace() {
        i += 1;
    }
    let negative = match text.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let mut value: i32 = 0;
    for &c in &text[i.min(text.len())..] {
        if !c.is_ascii_digit() {
            break;
        }
        value = value.wrapping_mul(10).wrapping_add(i32::from(c - b'0'));
    }
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// `atof` over a byte prefix: leading whitespace, then the longest
/// `[sign]digits[.digits][e[sign]digits]` prefix. No digits reads as zero.
pub fn atof_prefix(text: &[u8]) -> f64 {
    let mut start = 0;
    while start < text.len() && text[start].is_ascii_whitespace() {
        start += 1;
    }
    let text = &text[start..];
    let digits_from = |mut i: usize| {
        while i < text.len() && text[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(text.first(), Some(b'-' | b'+')));
    let int_end = digits_from(i);
    let mut mantissa = int_end - i;
    i = int_end;
    if text.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa += frac_end - i - 1;
        i = frac_end;
    }
    if mantissa == 0 {
        return 0.0;
    }
    if matches!(text.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(text.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    std::str::from_utf8(&text[..i])
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

/// Truncated integer value of a numeric variable. Non-numerics read as 0.
pub fn to_i32(buf: &[u8]) -> i32 {
    match decode(buf) {
        Value::Int { value, .. } => value,
        Value::Float { value, .. } => value as i32,
        Value::Form { .. } => atoi_wrapping(logical(&make_form(buf))),
        Value::NumLiteral(bytes) => atoi_wrapping(bytes),
        _ => 0,
    }
}

/// Value of a numeric variable as a float. Non-numerics read as 0.
pub fn to_f64(buf: &[u8]) -> f64 {
    match decode(buf) {
        Value::Int { value, .. } => f64::from(value),
        Value::Float { value, .. } => value,
        Value::Form { .. } => atof_prefix(logical(&make_form(buf))),
        Value::NumLiteral(bytes) => atof_prefix(bytes),
        _ => 0.0,
    }
}

/// Compare two numeric values.
///
/// When either side is a float the comparison is on `f64`. Otherwise both
/// sides are compared exactly as decimal digit text. Returns `None` when
/// either side is not numeric.
pub fn compare(a: &[u8], b: &[u8]) -> Option<Ordering> {
    let (la, lb) = (classify(a), classify(b));
    if !la.var_type.is_numeric() || !lb.var_type.is_numeric() {
        return None;
    }
    if la.kind == Kind::Float || lb.kind == Kind::Float {
        return to_f64(a).partial_cmp(&to_f64(b));
    }
    let (fa, fb) = (make_form(a), make_form(b));
    Some(Decimal::parse(logical(&fa)).cmp(&Decimal::parse(logical(&fb))))
}

/// Sign and significant digits of a decimal text.
#[derive(PartialEq, Eq)]
struct Decimal<'a> {
    negative: bool,
    /// No leading zeros.
    int: &'a [u8],
    /// No trailing zeros.
    frac: &'a [u8],
}

impl<'a> Decimal<'a> {
    fn parse(text: &'a [u8]) -> Self {
        let mut i = 0;
        while i < text.len() && text[i] == b' ' {
            i += 1;
        }
        let negative = text.get(i) == Some(&b'-');
        if negative {
            i += 1;
        }
        let int_start = i;
        while i < text.len() && text[i].is_ascii_digit() {
            i += 1;
        }
        let mut int = &text[int_start..i];
        while let [b'0', rest @ ..] = int {
            int = rest;
        }
        let mut frac: &[u8] = &[];
        if text.get(i) == Some(&b'.') {
            let frac_start = i + 1;
            let mut end = frac_start;
            while end < text.len() && text[end].is_ascii_digit() {
                end += 1;
            }
            frac = &text[frac_start..end];
            while let [rest @ .., b'0'] = frac {
                frac = rest;
            }
        }
        let negative = negative && !(int.is_empty() && frac.is_empty());
        Decimal {
            negative,
            int,
            frac,
        }
    }

    fn magnitude_cmp(&self, other: &Self) -> Ordering {
        self.int
            .len()
            .cmp(&other.int.len())
            .then_with(|| self.int.cmp(other.int))
            .then_with(|| self.frac.cmp(other.frac))
    }
}

impl Ord for Decimal<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.magnitude_cmp(other),
            (true, true) => other.magnitude_cmp(self),
        }
    }
}

impl PartialOrd for Decimal<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests;
