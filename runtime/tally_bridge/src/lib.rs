//! Plain-text interchange for tagged values.
//!
//! The database side of the runtime only speaks text: parameters are
//! substituted into command strings and fetched columns come back as
//! character data. This crate is the single conversion point:
//!
//! - [`to_text`]: value to bytes, bounded by a caller limit.
//! - [`from_text`]: bytes into an existing value, in place.
//! - [`store_int`]: an `i32` into any numeric or text value.

use std::fmt;

mod parse;
mod render;

pub use parse::{from_text, store_int};
pub use render::to_text;

/// Failure of a text conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeError {
    /// Rendered text is longer than the caller allows.
    Overflow { len: usize, max: usize },
    /// Text moved into a form is not `[spaces][-]digits[.digits]`. The form
    /// is left holding zero.
    NotNumeric,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { len, max } => {
                write!(f, "text of {len} bytes exceeds the limit of {max}")
            }
            Self::NotNumeric => write!(f, "text is not a decimal number"),
        }
    }
}

impl std::error::Error for BridgeError {}

#[cfg(test)]
mod tests;
