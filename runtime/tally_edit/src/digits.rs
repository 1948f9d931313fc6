//! Decimal digit generation for ints and floats.

/// Right-justify `value` in `out`.
///
/// The `'-'` goes directly before the digits when a column is left for it.
/// High-order digits (and then the sign) are dropped when `out` is too
/// narrow. Unused columns on the left are spaces.
pub(crate) fn right_justify(value: i32, out: &mut [u8]) {
    let mut n = out.len();
    if n == 0 {
        return;
    }
    let mut rest = i64::from(value).unsigned_abs();
    loop {
        n -= 1;
        out[n] = b'0' + (rest % 10) as u8;
        rest /= 10;
        if rest == 0 || n == 0 {
            break;
        }
    }
    if value < 0 && n > 0 {
        n -= 1;
        out[n] = b'-';
    }
    out[..n].fill(b' ');
}

/// Fixed-point digits of a float rounded to a number of fraction places.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FixedDigits {
    pub negative: bool,
    /// Integer digits without leading zeros; empty when the magnitude is
    /// below one.
    pub int: Vec<u8>,
    /// Exactly as many fraction digits as requested.
    pub frac: Vec<u8>,
}

impl FixedDigits {
    /// Round `value` to `right` fraction digits. Non-finite values read as
    /// zero.
    pub(crate) fn new(value: f64, right: usize) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        let text = format!("{:.*}", right, value.abs());
        let (int, frac) = match text.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (text.as_str(), ""),
        };
        FixedDigits {
            negative: value.is_sign_negative(),
            int: int.trim_start_matches('0').as_bytes().to_vec(),
            frac: frac.as_bytes().to_vec(),
        }
    }

    /// True when every generated digit is zero.
    pub(crate) fn is_zero(&self) -> bool {
        self.int.is_empty() && self.frac.iter().all(|&d| d == b'0')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn justify(value: i32, width: usize) -> String {
        let mut out = vec![b'?'; width];
        right_justify(value, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn pads_and_signs() {
        assert_eq!(justify(42, 5), "   42");
        assert_eq!(justify(-42, 5), "  -42");
        assert_eq!(justify(0, 3), "  0");
    }

    #[test]
    fn truncates_high_digits_then_sign() {
        assert_eq!(justify(12345, 3), "345");
        assert_eq!(justify(-123, 3), "123");
        assert_eq!(justify(i32::MIN, 11), "-2147483648");
        assert_eq!(justify(i32::MIN, 4), "3648");
    }

    #[test]
    fn fixed_digits_round() {
        let d = FixedDigits::new(123.456, 2);
        assert_eq!(d.int, b"123");
        assert_eq!(d.frac, b"46");
        assert!(!d.negative);

        let d = FixedDigits::new(-0.05, 2);
        assert_eq!(d.int, b"");
        assert_eq!(d.frac, b"05");
        assert!(d.negative);
    }

    #[test]
    fn rounding_to_zero_is_zero() {
        let d = FixedDigits::new(-0.001, 2);
        assert!(d.is_zero());
        assert!(FixedDigits::new(f64::NAN, 3).is_zero());
    }
}
