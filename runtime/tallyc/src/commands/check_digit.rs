use tally_value::{logical, TaggedValue};
use tally_verbs::CheckKind;

use crate::cli::CheckDigitArgs;
use crate::{flag_names, CliError};

/// Print the computed check character and whether it matched.
pub fn check_digit(args: &CheckDigitArgs) -> Result<String, CliError> {
    let kind = CheckKind::from_modulus(args.modulus).ok_or(CliError::Modulus(args.modulus))?;
    let digits = TaggedValue::char_literal(args.digits.as_bytes());
    let weights = TaggedValue::char_literal(args.weights.as_bytes());
    let mut out = TaggedValue::short_text(1);
    let flags = tally_verbs::check_digit(kind, &digits, &weights, &mut out);
    Ok(format!(
        "{}\n{}\n",
        String::from_utf8_lossy(logical(&out)),
        flag_names(flags)
    ))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(modulus: u8, digits: &str, weights: &str) -> CheckDigitArgs {
        CheckDigitArgs {
            modulus,
            digits: digits.into(),
            weights: weights.into(),
        }
    }

    #[test]
    fn luhn_matches() {
        assert_eq!(
            check_digit(&args(10, "79927398713", "1212121212")).unwrap(),
            "3\nEQUAL\n"
        );
    }

    #[test]
    fn mismatched_weights_print_a_blank() {
        assert_eq!(check_digit(&args(11, "123", "1")).unwrap(), " \nOVER\n");
    }

    #[test]
    fn unknown_modulus() {
        assert!(matches!(
            check_digit(&args(9, "1", "1")),
            Err(CliError::Modulus(9))
        ));
    }
}
