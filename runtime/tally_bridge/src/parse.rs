use tally_edit::numeric::{atof_prefix, atoi_wrapping};
use tally_value::{classify, set_null, set_window, write_f64, write_i32, Kind};

use crate::BridgeError;

/// Write `text` into an existing value.
///
/// A null destination is un-nulled first.
///
/// - Text: `min(len, capacity)` bytes are copied and the window becomes
///   `1..=n`; empty text empties the window.
/// - Form: the form is cleared to zero, then a valid number is aligned on
///   its decimal point. High-order integer digits and excess fraction
///   digits are dropped without rounding. Invalid text leaves the zero and
///   returns [`BridgeError::NotNumeric`].
/// - Int / float: the longest numeric prefix is parsed, wrapping on
///   overflow.
/// - Literals and aggregates are left untouched.
pub fn from_text(text: &[u8], dest: &mut [u8]) -> Result<(), BridgeError> {
    let layout = classify(dest);
    if layout.is_null() {
        set_null(dest, false);
    }
    let range = layout.payload_range();
    let end = range.end.min(dest.len());
    let start = range.start.min(end);
    match layout.kind {
        Kind::ShortText | Kind::LongText => {
            let room = &mut dest[start..end];
            let n = text.len().min(room.len());
            room[..n].copy_from_slice(&text[..n]);
            if n > 0 {
                set_window(dest, 1, n);
            } else {
                set_window(dest, 0, 0);
            }
            Ok(())
        }
        Kind::Form => write_form(text, &mut dest[start..end]),
        Kind::Int => {
            write_i32(dest, atoi_wrapping(text));
            Ok(())
        }
        Kind::Float => {
            write_f64(dest, atof_prefix(text));
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Lengths of the integer part (spaces and sign included) and of the
/// point-plus-fraction part of `text`, when it is a valid number.
fn split_number(text: &[u8]) -> Option<(usize, usize)> {
    let digit_at = |i: usize| text.get(i).is_some_and(u8::is_ascii_digit);
    let mut int_len = 0;
    while text.get(int_len) == Some(&b' ') {
        int_len += 1;
    }
    if text.get(int_len) == Some(&b'-') {
        int_len += 1;
    }
    while digit_at(int_len) {
        int_len += 1;
    }
    let frac_len = if text.get(int_len) == Some(&b'.') {
        let mut end = int_len + 1;
        while digit_at(end) {
            end += 1;
        }
        end - int_len
    } else {
        0
    };
    let valid = int_len + frac_len == text.len() && text.last().is_some_and(u8::is_ascii_digit);
    valid.then_some((int_len, frac_len))
}

fn write_form(text: &[u8], body: &mut [u8]) -> Result<(), BridgeError> {
    let int_cols = body.iter().position(|&b| b == b'.').unwrap_or(body.len());
    let frac_cols = body.len() - int_cols;
    body[..int_cols].fill(b' ');
    if frac_cols > 0 {
        body[int_cols] = b'.';
        body[int_cols + 1..].fill(b'0');
    } else if int_cols > 0 {
        body[int_cols - 1] = b'0';
    }

    let (int_len, frac_len) = split_number(text).ok_or(BridgeError::NotNumeric)?;
    let (skip, pad) = if int_len > int_cols {
        (int_len - int_cols, 0)
    } else {
        (0, int_cols - int_len)
    };
    body[pad..int_cols].copy_from_slice(&text[skip..skip + int_cols - pad]);
    let frac_len = frac_len.min(frac_cols);
    body[int_cols..int_cols + frac_len].copy_from_slice(&text[int_len..int_len + frac_len]);
    Ok(())
}

/// Move an integer into any numeric or text value.
///
/// Ints and floats take the value directly; forms and text receive its
/// decimal text through [`from_text`].
pub fn store_int(value: i32, dest: &mut [u8]) {
    match classify(dest).kind {
        Kind::Int => {
            set_null(dest, false);
            write_i32(dest, value);
        }
        Kind::Float => {
            set_null(dest, false);
            write_f64(dest, f64::from(value));
        }
        _ => {
            // decimal digits always satisfy the form grammar
            let _ = from_text(value.to_string().as_bytes(), dest);
        }
    }
}
