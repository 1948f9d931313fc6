//! Tag byte constants.
//!
//! The leading byte of every tagged value selects its variant. Ranges
//! overlap in the sense that some variants steal bits of the tag for
//! their own data (form length, float digit widths), so matching must go
//! through the masks below rather than equality on a single value.

// Short text: the tag byte is itself the `fp` field.
pub const SHORT_TEXT_MAX: u8 = 0x7F;
pub const SHORT_TEXT_HEADER: usize = 3;
/// `lp` sentinel marking a null short text.
pub const SHORT_NULL_LP: u8 = 0xFF;

// Form: 0x80 | length. 0x80 alone is the null form.
pub const FORM_MASK: u8 = 0xE0;
pub const FORM: u8 = 0x80;
pub const FORM_LEN_MASK: u8 = 0x1F;
pub const FORM_NULL: u8 = 0x80;
pub const FORM_HEADER: usize = 1;
/// Widest form payload the five length bits can describe.
pub const FORM_MAX_LEN: usize = 31;

// Literals
pub const NUM_LITERAL: u8 = 0xE0;
pub const CHAR_LITERAL: u8 = 0xE1;
pub const LITERAL_HEADER: usize = 2;

// Long text: little-endian u16 fp, lp, pl
pub const LONG_TEXT: u8 = 0xF0;
pub const LONG_TEXT_HEADER: usize = 7;
pub const LONG_NULL_LP: u16 = 0xFFFF;

// Float: 0xF8..=0xFB live, 0xF4..=0xF7 null
pub const FLOAT_MASK: u8 = 0xFC;
pub const FLOAT: u8 = 0xF8;
pub const FLOAT_NULL_LOW: u8 = 0xF4;
pub const FLOAT_NULL_HIGH: u8 = 0xF7;
pub const FLOAT_HIGH: u8 = 0xFB;
/// Distance between a live float tag and its null form.
pub const FLOAT_NULL_SHIFT: u8 = 0x04;
pub const FLOAT_HEADER: usize = 2;
pub const FLOAT_PAYLOAD: usize = 8;

// Int
pub const INT: u8 = 0xFC;
pub const INT_NULL_BIT: u8 = 0x80;
pub const INT_WIDTH_MASK: u8 = 0x7F;
pub const INT_HEADER: usize = 2;
pub const INT_PAYLOAD: usize = 4;

// Aggregates
pub const LIST: u8 = 0xA4;
pub const ARRAY_LOW: u8 = 0xA6;
pub const ARRAY_HIGH: u8 = 0xA8;

/// End-of-data marker inside heterogeneous variable runs.
pub const END_OF_DATA: u8 = 0xF2;

/// Filler byte reserving physical room for a variable to grow into.
pub const EXTENDER: u8 = 0xF3;
