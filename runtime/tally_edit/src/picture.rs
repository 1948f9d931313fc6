//! Picture-clause editing.
//!
//! [`vformat`] renders a source value through an edit picture into a text
//! destination. Numeric sources go through their form first and are laid
//! out digit position by digit position; character sources are
//! substituted one `A` at a time.
//!
//! # Numeric picture tokens
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `9` | digit, `0` when the source has none |
//! | `Z` | digit, fill char when the source has none |
//! | `~` | skip one source digit |
//! | `.` | decimal point |
//! | `^c` | decimal point written as `c` |
//! | `,` | separator, fill char before the first digit |
//! | `-` `(` `)` | printed only for a negative source |
//! | `+` | `-` when negative, fill when zero, else `+` |
//! | `<c` | set the fill char |
//! | `$`, `>c` | floating insertion, placed before the first digit |
//! | `&c` | literal, fill char before the first digit |
//! | `\c` | escape |
//!
//! A negative source with no sign token in the picture gets a floating
//! `'-'` in front of its first digit instead.

use smallvec::SmallVec;
use tally_value::{classify, logical, set_window, CondFlags, VarType};

use crate::form::make_form;

/// Floating insertions beyond this many are ignored.
const MAX_FLOATS: usize = 16;

/// Edit `source` through `picture` into the text value `dest`.
///
/// Returns the `EOS`, `OVER` and `LESS` bits of the outcome:
///
/// - `EOS`: the source or picture is empty or null (the destination is
///   emptied), or the destination filled up before the picture ended.
/// - `OVER`: a modifier token ends the picture, or integer digits of the
///   source did not fit the picture and were dropped high-order first.
/// - `LESS`: the fill run before the first digit was too short for the
///   floating sign and insertions.
///
/// A destination that is not text is left untouched and yields `OVER`.
pub fn vformat(source: &[u8], picture: &[u8], dest: &mut [u8]) -> CondFlags {
    let dest_layout = classify(dest);
    if !dest_layout.kind.is_text() {
        return CondFlags::OVER;
    }

    let src_type = classify(source).var_type;
    let made;
    let src = if src_type.is_numvar() && src_type.intersects(VarType::NEEDS_FORM) {
        made = make_form(source);
        logical(&made)
    } else {
        logical(source)
    };
    let pic = logical(picture);
    if src.is_empty() || pic.is_empty() {
        set_window(dest, 0, 0);
        return CondFlags::EOS;
    }

    let range = dest_layout.payload_range();
    let end = range.end.min(dest.len());
    let out = &mut dest[range.start.min(end)..end];
    let (written, flags) = if src_type.is_numeric() {
        edit_numeric(src, pic, out)
    } else {
        edit_text(src, pic, out)
    };
    tracing::trace!(written, ?flags, "vformat");
    if written > 0 {
        set_window(dest, 1, written);
    } else {
        set_window(dest, 0, 0);
    }
    flags
}

/// Integer digit positions and presence of a sign token in a picture.
fn scan_picture(pic: &[u8]) -> (isize, bool) {
    let mut digits = 0;
    let mut sign = false;
    let mut i = 0;
    while i < pic.len() {
        let c = pic[i];
        i += 1;
        match c {
            b'Z' | b'9' | b'~' => digits += 1,
            b'.' | b'^' => break,
            b'<' | b'>' | b'\\' | b'&' => i += 1,
            b'-' | b'(' | b')' | b'+' => sign = true,
            _ => {}
        }
    }
    while i < pic.len() && !sign {
        let c = pic[i];
        i += 1;
        match c {
            b'<' | b'>' | b'\\' => i += 1,
            b'-' | b'(' | b')' | b'+' => sign = true,
            _ => {}
        }
    }
    (digits, sign)
}

fn edit_numeric(src: &[u8], pic: &[u8], out: &mut [u8]) -> (usize, CondFlags) {
    let mut flags = CondFlags::empty();
    let (mut digit_slots, mut picture_sign) = scan_picture(pic);

    let mut s = 0;
    while s < src.len() && src[s] == b' ' {
        s += 1;
    }
    // a negative source prints through the picture's sign tokens when it
    // has any, otherwise through a floating '-'
    let mut floating_minus = false;
    if src.get(s) == Some(&b'-') {
        s += 1;
        floating_minus = !picture_sign;
    } else {
        picture_sign = false;
    }

    let mut zero = true;
    let mut i = s;
    while i < src.len() && src[i] != b'.' {
        if src[i] != b'0' {
            zero = false;
        }
        i += 1;
    }
    let mut int_digits = (i - s) as isize;
    if zero && i < src.len() {
        i += 1;
        while i < src.len() && src[i] == b'0' {
            i += 1;
        }
        if i < src.len() {
            zero = false;
        }
    }
    if int_digits > digit_slots {
        s += (int_digits - digit_slots) as usize;
        int_digits = digit_slots;
        flags |= CondFlags::OVER;
    }

    let mut fill_count: isize = 0;
    let mut fill = b' ';
    let mut floats: SmallVec<[u8; MAX_FLOATS]> = SmallVec::new();
    let mut period = false;
    let mut first = true;
    let mut w = 0;
    let mut p = 0;

    while p < pic.len() {
        let mut c = pic[p];
        p += 1;
        match c {
            b'Z' | b'9' => {
                if !period {
                    digit_slots -= 1;
                    if digit_slots < int_digits {
                        c = src.get(s).copied().unwrap_or(b'0');
                        s += 1;
                    } else if c == b'Z'
                        || (first
                            && fill_count < floats.len() as isize + isize::from(floating_minus))
                    {
                        c = fill;
                    } else {
                        c = b'0';
                    }
                } else if s < src.len() {
                    c = src[s];
                    s += 1;
                } else {
                    c = b'0';
                }
            }
            b'~' => {
                if !period {
                    digit_slots -= 1;
                    if digit_slots < int_digits {
                        s += 1;
                    }
                } else if s < src.len() {
                    s += 1;
                }
                continue;
            }
            b',' => {
                if first {
                    c = fill;
                }
            }
            b'-' | b'(' | b')' => {
                if !picture_sign {
                    c = fill;
                }
            }
            b'+' => {
                if picture_sign {
                    c = b'-';
                } else if zero {
                    c = fill;
                }
            }
            b'.' => {
                period = true;
                if s < src.len() {
                    s += 1;
                }
            }
            b'^' => {
                period = true;
                let Some(&next) = pic.get(p) else {
                    flags |= CondFlags::OVER;
                    break;
                };
                p += 1;
                c = next;
                if s < src.len() {
                    s += 1;
                }
            }
            b'<' => {
                let Some(&next) = pic.get(p) else {
                    flags |= CondFlags::OVER;
                    break;
                };
                p += 1;
                fill = next;
                continue;
            }
            b'$' => {
                if floats.len() < MAX_FLOATS {
                    floats.push(b'$');
                }
                continue;
            }
            b'>' => {
                let Some(&next) = pic.get(p) else {
                    flags |= CondFlags::OVER;
                    break;
                };
                p += 1;
                if floats.len() < MAX_FLOATS {
                    floats.push(next);
                }
                continue;
            }
            b'&' => {
                let Some(&next) = pic.get(p) else {
                    flags |= CondFlags::OVER;
                    break;
                };
                p += 1;
                c = if first { fill } else { next };
            }
            b'\\' => {
                let Some(&next) = pic.get(p) else {
                    flags |= CondFlags::OVER;
                    break;
                };
                p += 1;
                c = next;
            }
            _ => {}
        }

        if first {
            if c.is_ascii_digit() || period {
                first = false;
                // the fill run just written is exactly `fill_count` bytes
                // ending at `w`, so back-filling stays inside it
                let mut back = w;
                if floating_minus {
                    fill_count -= 1;
                    if fill_count >= 0 {
                        back -= 1;
                        out[back] = b'-';
                    }
                }
                while let Some(&insert) = floats.last() {
                    fill_count -= 1;
                    if fill_count < 0 {
                        break;
                    }
                    floats.pop();
                    back -= 1;
                    out[back] = insert;
                }
                if fill_count < 0 {
                    flags |= CondFlags::LESS;
                }
            } else if c == fill {
                fill_count += 1;
            } else {
                fill_count = 0;
            }
        }

        if w == out.len() {
            flags |= CondFlags::EOS;
            break;
        }
        out[w] = c;
        w += 1;
    }
    (w, flags)
}

fn edit_text(src: &[u8], pic: &[u8], out: &mut [u8]) -> (usize, CondFlags) {
    let mut flags = CondFlags::empty();
    let mut s = 0;
    let mut w = 0;
    let mut p = 0;
    while p < pic.len() {
        let mut c = pic[p];
        p += 1;
        match c {
            b'A' => {
                c = src.get(s).copied().unwrap_or(b' ');
                s += 1;
            }
            b'~' => {
                s += 1;
                continue;
            }
            b'\\' => {
                let Some(&next) = pic.get(p) else {
                    flags |= CondFlags::OVER;
                    break;
                };
                p += 1;
                c = next;
            }
            _ => {}
        }
        if w == out.len() {
            flags |= CondFlags::EOS;
            break;
        }
        out[w] = c;
        w += 1;
    }
    (w, flags)
}
