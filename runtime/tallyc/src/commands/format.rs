use tally_edit::numeric::{atof_prefix, is_numeric_bytes};
use tally_edit::vformat;
use tally_value::{logical, TaggedValue};

use crate::cli::FormatArgs;
use crate::{flag_names, CliError};

const LITERAL_MAX: usize = 255;

/// Render `args.value` through `args.picture`.
///
/// A numeric value is edited as a number: a float of `width.scale` digits
/// when `--width` is given, the literal digits otherwise. Anything else is
/// edited as text. Prints the result and the flags it raised.
pub fn format(args: &FormatArgs) -> Result<String, CliError> {
    let picture = args.picture.as_bytes();
    if picture.len() > LITERAL_MAX {
        return Err(CliError::TooLong {
            what: "picture",
            max: LITERAL_MAX,
        });
    }
    let value = args.value.as_bytes();
    if value.len() > LITERAL_MAX {
        return Err(CliError::TooLong {
            what: "value",
            max: LITERAL_MAX,
        });
    }

    let source = if is_numeric_bytes(value) {
        match args.width {
            Some(width) => TaggedValue::float(atof_prefix(value), width, args.scale),
            None => TaggedValue::num_literal(value),
        }
    } else {
        TaggedValue::char_literal(value)
    };
    tracing::debug!(numeric = is_numeric_bytes(value), "format source");

    let mut dest = TaggedValue::long_text(picture.len() as u16 + 16);
    let flags = vformat(&source, &TaggedValue::char_literal(picture), &mut dest);
    Ok(format!(
        "{}\n{}\n",
        String::from_utf8_lossy(logical(&dest)),
        flag_names(flags)
    ))
}
