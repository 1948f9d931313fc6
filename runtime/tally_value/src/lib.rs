//! Tagged value codec for the Tally runtime.
//!
//! Every variable the runtime manipulates is one self-describing byte
//! buffer. The leading tag byte selects the variant:
//!
//! | Tag | Variant | Header | Null encoding |
//! |-----|---------|--------|---------------|
//! | `0x00`–`0x7F` | short text | fp, lp, pl | fp=0, lp=0xFF |
//! | `0x80`–`0x9F` | form (decimal digit text) | 1 | tag `0x80`, length parked in byte 1 |
//! | `0xE0`/`0xE1` | numeric/char literal | 2 | never |
//! | `0xF0` | long text | LE u16 fp, lp, pl | fp=0, lp=0xFFFF |
//! | `0xF4`–`0xFB` | float | 2 | tag ≤ `0xF7` |
//! | `0xFC` | int | 2 | bit 7 of byte 1 |
//!
//! # Usage
//!
//! - [`classify`] reads the header into a [`Layout`]; callers use its
//!   ranges rather than computing offsets.
//! - [`set_null`] / [`is_null`] manage the in-band null state.
//! - [`decode`] / [`Value::encode`] convert between raw buffers and the
//!   typed [`Value`] enum.
//! - [`TaggedValue`] owns storage when a caller needs a fresh buffer.
//!
//! Buffers are always owned by the caller and passed by reference. Nothing
//! here allocates except the `TaggedValue` constructors and `encode`.

mod flags;
mod layout;
mod null;
pub mod tag;
mod value;

pub use flags::{CondFlags, VarType};
pub use layout::{classify, logical, payload, set_first, set_window, Kind, Layout};
pub use null::{is_null, set_null};
pub use value::{
    decode, float_widths, read_f64, read_i32, write_f64, write_i32, TaggedValue, Text, Value,
    Window,
};
