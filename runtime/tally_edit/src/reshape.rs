//! Re-dimensioning of numeric and text variables in place.
//!
//! A variable never grows past the bytes it owns. Room to grow is reserved
//! by trailing [`EXTENDER`] bytes; growing consumes them and shrinking
//! leaves new ones behind, so a later reshape can grow back.

use tally_value::tag::{
    EXTENDER, FLOAT, FLOAT_HEADER, FLOAT_NULL_SHIFT, FORM, FORM_HEADER, FORM_MAX_LEN, INT_NULL_BIT,
};
use tally_value::{classify, set_window, CondFlags, Kind};

/// Check that `count` extender bytes follow `start`.
fn has_room(buf: &[u8], start: usize, count: usize) -> bool {
    buf.get(start..start + count)
        .is_some_and(|bytes| bytes.iter().all(|&b| b == EXTENDER))
}

/// Give a numeric variable `left` integer and `right` fraction digits.
///
/// - Int: the display width becomes `left`.
/// - Float: the digit widths are rewritten; the value is kept.
/// - Form: becomes a zero form of the new shape.
///
/// The null state of ints and floats is kept. Returns `OVER` when the
/// shape is invalid (`1 ≤ left + right (+1 for the point) ≤ 31`), when a
/// form has no extender room to grow, or when the variable is not numeric.
pub fn reshape_numeric(buf: &mut [u8], left: i32, right: i32) -> CondFlags {
    let total = left + right + i32::from(right != 0);
    if left < 0 || right < 0 || total < 1 || total > FORM_MAX_LEN as i32 {
        return CondFlags::OVER;
    }
    let (left, right, total) = (left as usize, right as usize, total as usize);
    let layout = classify(buf);
    match layout.kind {
        Kind::Int => {
            buf[1] = (buf[1] & INT_NULL_BIT) | left as u8;
        }
        Kind::Float if buf.len() >= FLOAT_HEADER => {
            let shift = if layout.is_null() { FLOAT_NULL_SHIFT } else { 0 };
            buf[0] = (FLOAT | (left >> 3) as u8) - shift;
            buf[1] = ((left << 5) as u8) | right as u8;
        }
        Kind::Form => {
            let current = layout.pl;
            let freed = if current < total {
                if !has_room(buf, FORM_HEADER + current, total - current) {
                    return CondFlags::OVER;
                }
                0
            } else {
                current - total
            };
            let Some(region) = buf.get_mut(..FORM_HEADER + total + freed) else {
                return CondFlags::OVER;
            };
            region[0] = FORM | total as u8;
            let (body, rest) = region[FORM_HEADER..].split_at_mut(total);
            body[..left].fill(b' ');
            if right > 0 {
                body[left] = b'.';
                body[left + 1..].fill(b'0');
            } else {
                body[left - 1] = b'0';
            }
            rest.fill(EXTENDER);
        }
        _ => return CondFlags::OVER,
    }
    CondFlags::empty()
}

/// Give a text variable a new physical length.
///
/// The payload is blanked and the window emptied. Returns `OVER` when the
/// length is below one or beyond what the variant can describe, when there
/// is no extender room to grow, or when the variable is not text.
pub fn reshape_text(buf: &mut [u8], len: i32) -> CondFlags {
    let layout = classify(buf);
    let limit = match layout.kind {
        Kind::ShortText => usize::from(u8::MAX),
        Kind::LongText => usize::from(u16::MAX),
        _ => return CondFlags::OVER,
    };
    if len < 1 || len as usize > limit {
        return CondFlags::OVER;
    }
    let len = len as usize;
    let current = layout.pl;
    let freed = if current < len {
        if !has_room(buf, layout.hl + current, len - current) {
            return CondFlags::OVER;
        }
        0
    } else {
        current - len
    };
    if buf.len() < layout.hl + len + freed {
        return CondFlags::OVER;
    }

    set_window(buf, 0, 0);
    if layout.kind == Kind::ShortText {
        buf[2] = len as u8;
    } else {
        buf[5..7].copy_from_slice(&(len as u16).to_le_bytes());
    }
    let (body, rest) = buf[layout.hl..layout.hl + len + freed].split_at_mut(len);
    body.fill(b' ');
    rest.fill(EXTENDER);
    CondFlags::empty()
}

#[cfg(test)]
mod tests;
