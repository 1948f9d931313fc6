//! Canonical form construction.
//!
//! A form is the fixed-decimal digit text every numeric variant can be
//! rendered as. The editing engine, the verbs, and the text bridge all read
//! numerics through [`make_form`] so that only one place decides how an int
//! or a float turns into digits.

use tally_value::tag::FORM_MAX_LEN;
use tally_value::{classify, decode, set_null, TaggedValue, Value};

use crate::digits::{right_justify, FixedDigits};

/// Convert a numeric value into its form.
///
/// - Int: right-justified in its digit width. A zero width uses the
///   natural width of the number.
/// - Float: `left` integer columns, a point and `right` fraction digits.
/// - Form: copied, un-nulled when null.
/// - Numeric literal: copied.
/// - Anything else: the form `"0"`.
pub fn make_form(buf: &[u8]) -> TaggedValue {
    match decode(buf) {
        Value::Int { value, width, .. } => TaggedValue::form(&int_digits(value, width)),
        Value::Float {
            value, left, right, ..
        } => TaggedValue::form(&float_digits(value, left, right)),
        Value::Form { raw, null: false } => TaggedValue::form(raw),
        Value::Form { null: true, .. } => {
            let pl = classify(buf).pl;
            let mut copy = vec![b'0'; 1 + pl];
            let n = copy.len().min(buf.len());
            copy[..n].copy_from_slice(&buf[..n]);
            set_null(&mut copy, false);
            TaggedValue::from_bytes(copy)
        }
        Value::NumLiteral(bytes) => TaggedValue::form(bytes),
        _ => TaggedValue::form(b"0"),
    }
}

fn int_digits(value: i32, width: u8) -> Vec<u8> {
    let width = match usize::from(width) {
        0 => value.to_string().len(),
        w => w,
    }
    .min(FORM_MAX_LEN);
    let mut out = vec![b' '; width];
    right_justify(value, &mut out);
    out
}

/// Clamp float widths so the form fits in 31 bytes: fraction first, then
/// integer columns. A width of zero on both sides renders one integer
/// column.
fn fit_widths(left: usize, right: usize) -> (usize, usize) {
    let right = right.min(FORM_MAX_LEN - 1);
    let room = FORM_MAX_LEN - right - usize::from(right > 0);
    let left = left.min(room);
    if left == 0 && right == 0 {
        (1, 0)
    } else {
        (left, right)
    }
}

fn float_digits(value: f64, left: u8, right: u8) -> Vec<u8> {
    let (left, right) = fit_widths(usize::from(left), usize::from(right));
    let fixed = FixedDigits::new(value, right);
    let n = fixed.int.len();
    let mut out = vec![b' '; left];
    let mut sign_at = None;

    if left > 0 {
        if n < left {
            out[left - n..].copy_from_slice(&fixed.int);
            if n == 0 && right == 0 {
                out[left - 1] = b'0';
            }
            sign_at = Some(left - n - 1);
        } else {
            out.copy_from_slice(&fixed.int[n - left..]);
        }
    }
    if right > 0 {
        out.push(b'.');
        out.extend_from_slice(&fixed.frac);
    }
    if let Some(at) = sign_at {
        if fixed.negative && !fixed.is_zero() {
            out[at] = b'-';
        }
    }
    out
}
