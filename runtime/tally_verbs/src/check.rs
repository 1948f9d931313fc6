//! Modulus-10 and modulus-11 check digits.

use tally_value::{classify, logical, set_window, CondFlags};

/// Which check digit scheme to compute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckKind {
    /// Weighted sum with products above 9 folded into their digit sum.
    Mod10,
    /// Weighted sum; a result of 10 reads `A` and 11 reads `B`.
    Mod11,
}

impl CheckKind {
    pub fn from_modulus(modulus: u8) -> Option<Self> {
        match modulus {
            10 => Some(CheckKind::Mod10),
            11 => Some(CheckKind::Mod11),
            _ => None,
        }
    }

    fn modulus(self) -> i32 {
        match self {
            CheckKind::Mod10 => 10,
            CheckKind::Mod11 => 11,
        }
    }
}

/// Compute the check character of `digits` and store it in `out`.
///
/// `digits` holds the body followed by its check digit; `weights` has one
/// weight per body digit. `out` always ends up with window `1..=1`: the
/// computed check character, or a space when the operands do not line up.
///
/// Returns `EQUAL` when the computed character matches the trailing digit
/// (never for `A` or `B`), `OVER` otherwise.
pub fn check_digit(
    kind: CheckKind,
    digits: &[u8],
    weights: &[u8],
    out: &mut [u8],
) -> CondFlags {
    let out_start = classify(out).hl;
    set_window(out, 1, 1);
    let Some(slot) = out.get_mut(out_start) else {
        return CondFlags::OVER;
    };
    *slot = b' ';

    let (digits, weights) = (logical(digits), logical(weights));
    let Some((&last, body)) = digits.split_last() else {
        return CondFlags::OVER;
    };
    if weights.is_empty() || body.len() != weights.len() {
        return CondFlags::OVER;
    }

    let modulus = kind.modulus();
    let sum: i32 = body
        .iter()
        .zip(weights)
        .map(|(&d, &w)| {
            let product = (i32::from(d) - i32::from(b'0')) * (i32::from(w) - i32::from(b'0'));
            if kind == CheckKind::Mod10 && product > 9 {
                product / 10 + product % 10
            } else {
                product
            }
        })
        .sum();
    let check = match (kind, modulus - sum % modulus) {
        (CheckKind::Mod10, 10) => b'0',
        (CheckKind::Mod11, 10) => b'A',
        (CheckKind::Mod11, 11) => b'B',
        (_, c) => (c + i32::from(b'0')) as u8,
    };
    *slot = check;

    if check != b'A' && check != b'B' && check == last {
        CondFlags::EQUAL
    } else {
        CondFlags::OVER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_value::TaggedValue;

    fn text(s: &[u8]) -> TaggedValue {
        TaggedValue::short_text_from(s, 0)
    }

    fn run(kind: CheckKind, digits: &[u8], weights: &[u8]) -> (CondFlags, Vec<u8>) {
        let mut out = TaggedValue::short_text(1);
        let flags = check_digit(kind, &text(digits), &text(weights), &mut out);
        (flags, logical(&out).to_vec())
    }

    #[test]
    fn luhn_number_verifies() {
        let (flags, check) = run(CheckKind::Mod10, b"79927398713", b"1212121212");
        assert_eq!(check, b"3");
        assert_eq!(flags, CondFlags::EQUAL);
    }

    #[test]
    fn wrong_trailing_digit_is_overflow() {
        let (flags, check) = run(CheckKind::Mod10, b"79927398710", b"1212121212");
        assert_eq!(check, b"3");
        assert_eq!(flags, CondFlags::OVER);
    }

    #[test]
    fn isbn_style_mod11() {
        let (flags, check) = run(CheckKind::Mod11, b"0306406152", b"098765432");
        assert_eq!(check, b"2");
        assert_eq!(flags, CondFlags::EQUAL);
    }

    #[test]
    fn mod11_ten_reads_as_letter() {
        // 1*1 = 1, 11 - 1 = 10
        let (flags, check) = run(CheckKind::Mod11, b"1A", b"1");
        assert_eq!(check, b"A");
        assert_eq!(flags, CondFlags::OVER);
    }

    #[test]
    fn mismatched_lengths_leave_a_space() {
        let (flags, check) = run(CheckKind::Mod10, b"1234", b"12");
        assert_eq!(check, b" ");
        assert_eq!(flags, CondFlags::OVER);
        let (flags, check) = run(CheckKind::Mod10, b"", b"12");
        assert_eq!(check, b" ");
        assert_eq!(flags, CondFlags::OVER);
    }

    #[test]
    fn modulus_lookup() {
        assert_eq!(CheckKind::from_modulus(10), Some(CheckKind::Mod10));
        assert_eq!(CheckKind::from_modulus(11), Some(CheckKind::Mod11));
        assert_eq!(CheckKind::from_modulus(7), None);
    }
}
