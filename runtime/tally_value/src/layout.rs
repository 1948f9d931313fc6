//! Classification of a tagged value and its logical window.
//!
//! [`classify`] is the only place that decodes header bytes into
//! positions. Everything downstream works with the [`Layout`] it returns:
//! `payload_range` for the physical bytes, `logical_range` for the in-use
//! window of a text value.

use std::ops::Range;

use crate::flags::VarType;
use crate::tag;

/// Variant selected by the tag byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    ShortText,
    LongText,
    Form,
    NumLiteral,
    CharLiteral,
    Float,
    Int,
    List,
    Array,
    /// Any tag outside the repertoire, or a buffer too short for its header.
    Unknown,
}

impl Kind {
    /// Text variants with a movable logical window.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, Kind::ShortText | Kind::LongText)
    }

    /// Fixed-width binary numerics (`fp`/`lp` are `-1`).
    #[inline]
    pub const fn is_binary_numeric(self) -> bool {
        matches!(self, Kind::Float | Kind::Int)
    }
}

/// Positional fields of a classified value.
///
/// `fp`/`lp` are 1-based positions inside the payload. Text uses `0` for an
/// empty or null window; int and float use `-1` because a sub-window makes
/// no sense for them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub kind: Kind,
    pub var_type: VarType,
    pub fp: i32,
    pub lp: i32,
    /// Physical payload length.
    pub pl: usize,
    /// Header length; the payload starts at this offset.
    pub hl: usize,
}

impl Layout {
    pub const UNKNOWN: Layout = Layout {
        kind: Kind::Unknown,
        var_type: VarType::empty(),
        fp: 0,
        lp: 0,
        pl: 0,
        hl: 0,
    };

    const fn aggregate(kind: Kind, var_type: VarType) -> Layout {
        Layout {
            kind,
            var_type,
            ..Layout::UNKNOWN
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.var_type.is_null()
    }

    /// Byte range of the whole physical payload.
    #[inline]
    pub fn payload_range(&self) -> Range<usize> {
        self.hl..self.hl + self.pl
    }

    /// Byte range of the logical window, or `None` when the window is
    /// empty (null text, zero-length literal) or the variant has none.
    pub fn logical_range(&self) -> Option<Range<usize>> {
        if self.fp <= 0 || self.lp < self.fp {
            return None;
        }
        let start = self.hl + self.fp as usize - 1;
        let end = self.hl + self.lp as usize;
        Some(start..end)
    }

    /// Number of bytes in the logical window.
    #[inline]
    pub fn logical_len(&self) -> usize {
        self.logical_range().map_or(0, |r| r.len())
    }
}

#[inline]
fn le16(buf: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes([*buf.get(at)?, *buf.get(at + 1)?]))
}

/// Classify a tagged value from its header.
///
/// Never allocates and never fails: unknown tags and buffers shorter than
/// their header classify as [`Layout::UNKNOWN`] with empty type bits.
pub fn classify(buf: &[u8]) -> Layout {
    classify_checked(buf).unwrap_or(Layout::UNKNOWN)
}

fn classify_checked(buf: &[u8]) -> Option<Layout> {
    let t = *buf.first()?;
    let layout = match t {
        0x00..=tag::SHORT_TEXT_MAX => {
            let fp = i32::from(t);
            let lp = *buf.get(1)?;
            let pl = usize::from(*buf.get(2)?);
            let null = fp == 0 && lp == tag::SHORT_NULL_LP;
            Layout {
                kind: Kind::ShortText,
                var_type: with_null(VarType::CHAR, null),
                fp,
                lp: if null { 0 } else { i32::from(lp) },
                pl,
                hl: tag::SHORT_TEXT_HEADER,
            }
        }
        _ if t & tag::FORM_MASK == tag::FORM => {
            let len = t & tag::FORM_LEN_MASK;
            let (len, null) = if len == 0 {
                (*buf.get(1)? & tag::FORM_LEN_MASK, true)
            } else {
                (len, false)
            };
            Layout {
                kind: Kind::Form,
                var_type: with_null(VarType::NUM, null),
                fp: 1,
                lp: i32::from(len),
                pl: usize::from(len),
                hl: tag::FORM_HEADER,
            }
        }
        tag::NUM_LITERAL | tag::CHAR_LITERAL => {
            let len = *buf.get(1)?;
            let (kind, var_type) = if t == tag::NUM_LITERAL {
                (Kind::NumLiteral, VarType::NUMLIT)
            } else {
                (Kind::CharLiteral, VarType::CHARLIT)
            };
            Layout {
                kind,
                var_type,
                fp: i32::from(len != 0),
                lp: i32::from(len),
                pl: usize::from(len),
                hl: tag::LITERAL_HEADER,
            }
        }
        tag::INT => {
            let null = *buf.get(1)? & tag::INT_NULL_BIT != 0;
            Layout {
                kind: Kind::Int,
                var_type: with_null(VarType::INT, null),
                fp: -1,
                lp: -1,
                pl: tag::INT_PAYLOAD,
                hl: tag::INT_HEADER,
            }
        }
        tag::LONG_TEXT => {
            let fp = le16(buf, 1)?;
            let lp = le16(buf, 3)?;
            let pl = le16(buf, 5)?;
            let null = fp == 0 && lp == tag::LONG_NULL_LP;
            Layout {
                kind: Kind::LongText,
                var_type: with_null(VarType::CHAR, null),
                fp: i32::from(fp),
                lp: if null { 0 } else { i32::from(lp) },
                pl: usize::from(pl),
                hl: tag::LONG_TEXT_HEADER,
            }
        }
        tag::FLOAT_NULL_LOW..=tag::FLOAT_HIGH => Layout {
            kind: Kind::Float,
            var_type: with_null(VarType::FLOAT, t <= tag::FLOAT_NULL_HIGH),
            fp: -1,
            lp: -1,
            pl: tag::FLOAT_PAYLOAD,
            hl: tag::FLOAT_HEADER,
        },
        tag::LIST => Layout::aggregate(Kind::List, VarType::LIST),
        tag::ARRAY_LOW..=tag::ARRAY_HIGH => Layout::aggregate(Kind::Array, VarType::ARRAY),
        _ => Layout::UNKNOWN,
    };
    Some(layout)
}

#[inline]
fn with_null(var_type: VarType, null: bool) -> VarType {
    if null {
        var_type | VarType::NULL
    } else {
        var_type
    }
}

/// Write the logical window of a text value.
///
/// `fp == 0` (with any `lp`) empties the window. Values without a movable
/// window are left untouched.
pub fn set_window(buf: &mut [u8], fp: usize, lp: usize) {
    let layout = classify(buf);
    let (fp, lp) = if fp == 0 { (0, 0) } else { (fp, lp) };
    match layout.kind {
        Kind::ShortText if buf.len() >= tag::SHORT_TEXT_HEADER => {
            buf[0] = fp.min(usize::from(tag::SHORT_TEXT_MAX)) as u8;
            buf[1] = lp as u8;
        }
        Kind::LongText if buf.len() >= tag::LONG_TEXT_HEADER => {
            buf[1..3].copy_from_slice(&(fp as u16).to_le_bytes());
            buf[3..5].copy_from_slice(&(lp as u16).to_le_bytes());
        }
        _ => {}
    }
}

/// Move only the first logical position of a text value.
pub fn set_first(buf: &mut [u8], fp: usize) {
    let layout = classify(buf);
    if layout.kind.is_text() {
        set_window(buf, fp, layout.lp.max(0) as usize);
    }
}

/// Physical payload of a value, clamped to the bytes actually present.
pub fn payload(buf: &[u8]) -> &[u8] {
    let range = classify(buf).payload_range();
    let end = range.end.min(buf.len());
    buf.get(range.start..end).unwrap_or(&[])
}

/// Logical window of a value, clamped to the bytes actually present.
pub fn logical(buf: &[u8]) -> &[u8] {
    match classify(buf).logical_range() {
        Some(range) => {
            let end = range.end.min(buf.len());
            buf.get(range.start..end).unwrap_or(&[])
        }
        None => &[],
    }
}
