//! Typed view of a tagged value and owned storage to build one.
//!
//! [`decode`] borrows a buffer and returns the closed [`Value`] enum;
//! [`Value::encode`] writes it back into a fresh [`TaggedValue`]. Callers
//! that operate in place keep using the raw buffer together with
//! [`classify`](crate::classify); this module is for code that wants to
//! match on the variant.

use std::ops::{Deref, DerefMut};

use crate::layout::{classify, Kind};
use crate::tag;

/// Logical window of a text value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Window {
    Null,
    Empty,
    /// Inclusive, 1-based.
    Span {
        fp: usize,
        lp: usize,
    },
}

/// Text payload together with its window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Text<'a> {
    pub window: Window,
    /// Whole physical payload, including bytes outside the window.
    pub payload: &'a [u8],
}

impl<'a> Text<'a> {
    /// Bytes inside the window.
    pub fn logical(&self) -> &'a [u8] {
        match self.window {
            Window::Span { fp, lp } if fp >= 1 && lp >= fp => {
                let end = lp.min(self.payload.len());
                self.payload.get(fp - 1..end).unwrap_or(&[])
            }
            _ => &[],
        }
    }
}

/// Decoded tagged value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value<'a> {
    ShortText(Text<'a>),
    LongText(Text<'a>),
    /// Form digit text. For a null form the first byte of `raw` holds the
    /// parked length (or the parked tag when the form began with `'.'`).
    Form {
        raw: &'a [u8],
        null: bool,
    },
    NumLiteral(&'a [u8]),
    CharLiteral(&'a [u8]),
    Float {
        value: f64,
        left: u8,
        right: u8,
        null: bool,
    },
    Int {
        value: i32,
        width: u8,
        null: bool,
    },
    List,
    Array,
    Unknown,
}

/// Decode a buffer into its typed view.
pub fn decode(buf: &[u8]) -> Value<'_> {
    let layout = classify(buf);
    let payload = || {
        let range = layout.payload_range();
        let end = range.end.min(buf.len());
        buf.get(range.start..end).unwrap_or(&[])
    };
    match layout.kind {
        Kind::ShortText | Kind::LongText => {
            let window = if layout.is_null() {
                Window::Null
            } else if layout.fp <= 0 {
                Window::Empty
            } else {
                Window::Span {
                    fp: layout.fp as usize,
                    lp: layout.lp.max(0) as usize,
                }
            };
            let text = Text {
                window,
                payload: payload(),
            };
            if layout.kind == Kind::ShortText {
                Value::ShortText(text)
            } else {
                Value::LongText(text)
            }
        }
        Kind::Form => Value::Form {
            raw: payload(),
            null: layout.is_null(),
        },
        Kind::NumLiteral => Value::NumLiteral(payload()),
        Kind::CharLiteral => Value::CharLiteral(payload()),
        Kind::Float => {
            let (left, right) = float_widths(buf);
            Value::Float {
                value: read_f64(buf).unwrap_or(0.0),
                left,
                right,
                null: layout.is_null(),
            }
        }
        Kind::Int => Value::Int {
            value: read_i32(buf).unwrap_or(0),
            width: buf.get(1).map_or(0, |b| b & tag::INT_WIDTH_MASK),
            null: layout.is_null(),
        },
        Kind::List => Value::List,
        Kind::Array => Value::Array,
        Kind::Unknown => Value::Unknown,
    }
}

impl Value<'_> {
    /// Encode into owned storage. Aggregates and unknown values encode to
    /// an empty buffer.
    pub fn encode(&self) -> TaggedValue {
        match *self {
            Value::ShortText(text) => {
                let mut out = TaggedValue::short_text(text.payload.len().min(255) as u8);
                let n = out.0.len() - tag::SHORT_TEXT_HEADER;
                out.0[tag::SHORT_TEXT_HEADER..].copy_from_slice(&text.payload[..n]);
                write_window(&mut out, text.window);
                out
            }
            Value::LongText(text) => {
                let mut out = TaggedValue::long_text(text.payload.len().min(usize::from(u16::MAX)) as u16);
                let n = out.0.len() - tag::LONG_TEXT_HEADER;
                out.0[tag::LONG_TEXT_HEADER..].copy_from_slice(&text.payload[..n]);
                write_window(&mut out, text.window);
                out
            }
            Value::Form { raw, null } => {
                let len = raw.len().min(tag::FORM_MAX_LEN);
                let mut bytes = Vec::with_capacity(1 + len);
                bytes.push(if null { tag::FORM_NULL } else { tag::FORM | len as u8 });
                bytes.extend_from_slice(&raw[..len]);
                TaggedValue(bytes)
            }
            Value::NumLiteral(bytes) => TaggedValue::num_literal(bytes),
            Value::CharLiteral(bytes) => TaggedValue::char_literal(bytes),
            Value::Float {
                value,
                left,
                right,
                null,
            } => {
                let mut out = TaggedValue::float(value, left, right);
                if null {
                    out.0[0] -= tag::FLOAT_NULL_SHIFT;
                }
                out
            }
            Value::Int { value, width, null } => {
                let mut out = TaggedValue::int(value, width);
                if null {
                    out.0[1] |= tag::INT_NULL_BIT;
                }
                out
            }
            Value::List | Value::Array | Value::Unknown => TaggedValue(Vec::new()),
        }
    }
}

fn write_window(out: &mut TaggedValue, window: Window) {
    match window {
        Window::Null => crate::set_null(&mut out.0, true),
        Window::Empty => crate::set_window(&mut out.0, 0, 0),
        Window::Span { fp, lp } => crate::set_window(&mut out.0, fp, lp),
    }
}

/// Left/right digit widths packed into a float's tag and byte 1.
pub fn float_widths(buf: &[u8]) -> (u8, u8) {
    let t = buf.first().copied().unwrap_or(0);
    let b1 = buf.get(1).copied().unwrap_or(0);
    (((t << 3) & 0x18) | (b1 >> 5), b1 & 0x1F)
}

/// Native-endian f64 payload of a float value.
pub fn read_f64(buf: &[u8]) -> Option<f64> {
    let bytes = buf.get(tag::FLOAT_HEADER..tag::FLOAT_HEADER + tag::FLOAT_PAYLOAD)?;
    Some(f64::from_ne_bytes(bytes.try_into().ok()?))
}

/// Native-endian i32 payload of an int value.
pub fn read_i32(buf: &[u8]) -> Option<i32> {
    let bytes = buf.get(tag::INT_HEADER..tag::INT_HEADER + tag::INT_PAYLOAD)?;
    Some(i32::from_ne_bytes(bytes.try_into().ok()?))
}

/// Overwrite the payload of a float value. Returns `false` if the buffer
/// is too short.
pub fn write_f64(buf: &mut [u8], value: f64) -> bool {
    match buf.get_mut(tag::FLOAT_HEADER..tag::FLOAT_HEADER + tag::FLOAT_PAYLOAD) {
        Some(slot) => {
            slot.copy_from_slice(&value.to_ne_bytes());
            true
        }
        None => false,
    }
}

/// Overwrite the payload of an int value. Returns `false` if the buffer is
/// too short.
pub fn write_i32(buf: &mut [u8], value: i32) -> bool {
    match buf.get_mut(tag::INT_HEADER..tag::INT_HEADER + tag::INT_PAYLOAD) {
        Some(slot) => {
            slot.copy_from_slice(&value.to_ne_bytes());
            true
        }
        None => false,
    }
}

/// Owned storage for one tagged value.
///
/// Derefs to the raw bytes so it can be passed wherever a buffer is
/// expected.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TaggedValue(Vec<u8>);

impl TaggedValue {
    /// Wrap raw bytes without validation.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        TaggedValue(bytes)
    }

    /// Blank short text of the given capacity with an empty window.
    pub fn short_text(capacity: u8) -> Self {
        let mut bytes = vec![b' '; tag::SHORT_TEXT_HEADER + usize::from(capacity)];
        bytes[0] = 0;
        bytes[1] = 0;
        bytes[2] = capacity;
        TaggedValue(bytes)
    }

    /// Short text holding `text`, window `1..=len`. The capacity grows to
    /// fit the text, up to 255 bytes.
    pub fn short_text_from(text: &[u8], capacity: u8) -> Self {
        let capacity = capacity.max(text.len().min(255) as u8);
        let mut out = Self::short_text(capacity);
        let n = text.len().min(usize::from(capacity));
        out.0[tag::SHORT_TEXT_HEADER..tag::SHORT_TEXT_HEADER + n].copy_from_slice(&text[..n]);
        if n > 0 {
            crate::set_window(&mut out.0, 1, n);
        }
        out
    }

    /// Blank long text of the given capacity with an empty window.
    pub fn long_text(capacity: u16) -> Self {
        let mut bytes = vec![b' '; tag::LONG_TEXT_HEADER + usize::from(capacity)];
        bytes[0] = tag::LONG_TEXT;
        bytes[1..5].fill(0);
        bytes[5..7].copy_from_slice(&capacity.to_le_bytes());
        TaggedValue(bytes)
    }

    /// Long text holding `text`, window `1..=len`.
    pub fn long_text_from(text: &[u8], capacity: u16) -> Self {
        let capacity = capacity.max(text.len().min(usize::from(u16::MAX)) as u16);
        let mut out = Self::long_text(capacity);
        let n = text.len().min(usize::from(capacity));
        out.0[tag::LONG_TEXT_HEADER..tag::LONG_TEXT_HEADER + n].copy_from_slice(&text[..n]);
        if n > 0 {
            crate::set_window(&mut out.0, 1, n);
        }
        out
    }

    /// Form holding exactly `digits` (at most 31 bytes are kept).
    pub fn form(digits: &[u8]) -> Self {
        let len = digits.len().min(tag::FORM_MAX_LEN);
        let mut bytes = Vec::with_capacity(1 + len);
        bytes.push(tag::FORM | len as u8);
        bytes.extend_from_slice(&digits[..len]);
        TaggedValue(bytes)
    }

    /// Zero form with `left` integer and `right` fraction positions, laid
    /// out the way a freshly cleared form reads: `"   .00"` for 3/2,
    /// `"  0"` for 3/0.
    pub fn form_zero(left: usize, right: usize) -> Self {
        let mut digits = vec![b' '; left];
        if right > 0 {
            digits.push(b'.');
            digits.extend(std::iter::repeat(b'0').take(right));
        } else if let Some(last) = digits.last_mut() {
            *last = b'0';
        }
        Self::form(&digits)
    }

    pub fn num_literal(bytes: &[u8]) -> Self {
        Self::literal(tag::NUM_LITERAL, bytes)
    }

    pub fn char_literal(bytes: &[u8]) -> Self {
        Self::literal(tag::CHAR_LITERAL, bytes)
    }

    fn literal(t: u8, bytes: &[u8]) -> Self {
        let len = bytes.len().min(255);
        let mut out = Vec::with_capacity(tag::LITERAL_HEADER + len);
        out.push(t);
        out.push(len as u8);
        out.extend_from_slice(&bytes[..len]);
        TaggedValue(out)
    }

    /// Integer with a display width in digits.
    pub fn int(value: i32, width: u8) -> Self {
        let mut bytes = vec![tag::INT, width & tag::INT_WIDTH_MASK];
        bytes.extend_from_slice(&value.to_ne_bytes());
        TaggedValue(bytes)
    }

    /// Float with `left` integer and `right` fraction digits (each 0..=31).
    pub fn float(value: f64, left: u8, right: u8) -> Self {
        let left = left & 0x1F;
        let right = right & 0x1F;
        let mut bytes = vec![tag::FLOAT | (left >> 3), (left << 5) | right];
        bytes.extend_from_slice(&value.to_ne_bytes());
        TaggedValue(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for TaggedValue {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl DerefMut for TaggedValue {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl AsRef<[u8]> for TaggedValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
