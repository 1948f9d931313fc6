use tally_edit::make_form;
use tally_value::{decode, logical, Value};

use crate::BridgeError;

/// Render a value as plain text of at most `max_len` bytes.
///
/// - Text: the logical window (empty when null or empty).
/// - Form: every digit byte; a null form renders empty.
/// - Int: decimal digits with a leading `-` when negative.
/// - Float: its form with leading spaces trimmed. The declared width is
///   checked against `max_len` before any digits are generated.
/// - Literal: its bytes.
/// - Anything else: empty.
pub fn to_text(buf: &[u8], max_len: usize) -> Result<Vec<u8>, BridgeError> {
    let text = match decode(buf) {
        Value::ShortText(text) | Value::LongText(text) => text.logical().to_vec(),
        Value::Form { raw, null: false } => raw.to_vec(),
        Value::Int { value, .. } => value.to_string().into_bytes(),
        Value::Float { left, right, .. } => {
            let width = usize::from(left) + usize::from(right) + usize::from(right > 0);
            if width > max_len {
                return Err(BridgeError::Overflow {
                    len: width,
                    max: max_len,
                });
            }
            let form = make_form(buf);
            let digits = logical(&form);
            let start = digits.iter().position(|&b| b != b' ').unwrap_or(digits.len());
            digits[start..].to_vec()
        }
        Value::NumLiteral(bytes) | Value::CharLiteral(bytes) => bytes.to_vec(),
        Value::Form { null: true, .. } | Value::List | Value::Array | Value::Unknown => {
            Vec::new()
        }
    };
    if text.len() > max_len {
        return Err(BridgeError::Overflow {
            len: text.len(),
            max: max_len,
        });
    }
    Ok(text)
}
