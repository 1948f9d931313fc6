//! In-band null state.
//!
//! Each variant encodes null differently, and the encodings are not a
//! single bit: a null form loses its length from the tag and parks it in
//! byte 1, a null float lives four tags below its live range. Clearing null
//! must restore exactly what setting it rewrote.

use crate::layout::{classify, Kind};
use crate::tag;

/// Test the null state of any variant. Literals are never null.
#[inline]
pub fn is_null(buf: &[u8]) -> bool {
    classify(buf).is_null()
}

/// Set (`true`) or clear (`false`) the null state in place.
///
/// Setting null on a numeric first stores a canonical zero so that reading
/// the value back after clearing null yields zero, not stale digits.
/// Variants without a null encoding are left untouched.
pub fn set_null(buf: &mut [u8], null: bool) {
    if null {
        set(buf);
    } else {
        clear(buf);
    }
}

fn set(buf: &mut [u8]) {
    let layout = classify(buf);
    if layout.is_null() {
        return;
    }
    match layout.kind {
        Kind::ShortText => {
            blank(buf, layout.payload_range());
            buf[0] = 0;
            buf[1] = tag::SHORT_NULL_LP;
        }
        Kind::LongText => {
            blank(buf, layout.payload_range());
            buf[1..3].copy_from_slice(&0u16.to_le_bytes());
            buf[3..5].copy_from_slice(&tag::LONG_NULL_LP.to_le_bytes());
        }
        Kind::Form => {
            let end = (1 + layout.pl).min(buf.len());
            zero_form(&mut buf[1..end]);
            let t = buf[0];
            if end > 1 {
                buf[1] = if buf[1] == b'.' { t } else { t & tag::FORM_LEN_MASK };
            }
            buf[0] = tag::FORM_NULL;
        }
        Kind::Int => {
            if let Some(slot) = buf.get_mut(2..2 + tag::INT_PAYLOAD) {
                slot.copy_from_slice(&0i32.to_ne_bytes());
            }
            buf[1] |= tag::INT_NULL_BIT;
        }
        Kind::Float => {
            if let Some(slot) = buf.get_mut(2..2 + tag::FLOAT_PAYLOAD) {
                slot.copy_from_slice(&0f64.to_ne_bytes());
            }
            buf[0] -= tag::FLOAT_NULL_SHIFT;
        }
        Kind::NumLiteral | Kind::CharLiteral | Kind::List | Kind::Array | Kind::Unknown => {}
    }
}

fn clear(buf: &mut [u8]) {
    let layout = classify(buf);
    if !layout.is_null() {
        return;
    }
    match layout.kind {
        Kind::ShortText => buf[1] = 0,
        Kind::LongText => buf[3..5].copy_from_slice(&0u16.to_le_bytes()),
        Kind::Form => {
            // byte 1 is always present for a null form: classify read it
            let parked = buf[1];
            buf[0] |= parked;
            buf[1] = if parked & tag::FORM != 0 {
                b'.'
            } else if buf[0] & tag::FORM_LEN_MASK == 1 {
                b'0'
            } else {
                b' '
            };
        }
        Kind::Int => buf[1] &= !tag::INT_NULL_BIT,
        Kind::Float => buf[0] += tag::FLOAT_NULL_SHIFT,
        Kind::NumLiteral | Kind::CharLiteral | Kind::List | Kind::Array | Kind::Unknown => {}
    }
}

fn blank(buf: &mut [u8], range: std::ops::Range<usize>) {
    let end = range.end.min(buf.len());
    if let Some(bytes) = buf.get_mut(range.start..end) {
        bytes.fill(b' ');
    }
}

/// Canonical zero body of a form: digits to `'0'`, then every integer
/// position except the one next to the point (or the last one) blanked.
pub(crate) fn zero_form(digits: &mut [u8]) {
    let mut point = None;
    for (i, b) in digits.iter_mut().enumerate() {
        if *b == b'.' {
            point = Some(i);
        } else {
            *b = b'0';
        }
    }
    let keep = match point {
        Some(p) => p.saturating_sub(1),
        None => digits.len().saturating_sub(1),
    };
    for b in &mut digits[..keep] {
        *b = b' ';
    }
}
