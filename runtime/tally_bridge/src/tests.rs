use super::*;
use pretty_assertions::assert_eq;
use tally_value::{is_null, logical, read_f64, read_i32, set_null, TaggedValue};

fn render(buf: &[u8]) -> String {
    match to_text(buf, 64) {
        Ok(text) => String::from_utf8_lossy(&text).into_owned(),
        Err(err) => panic!("to_text failed: {err}"),
    }
}

#[test]
fn renders_each_variant() {
    let mut text = TaggedValue::short_text_from(b"abcdef", 8);
    tally_value::set_window(&mut text, 2, 4);
    assert_eq!(render(&text), "bcd");
    assert_eq!(render(&TaggedValue::long_text_from(b"long", 10)), "long");
    assert_eq!(render(&TaggedValue::form(b" 12.50")), " 12.50");
    assert_eq!(render(&TaggedValue::int(-305, 2)), "-305");
    assert_eq!(render(&TaggedValue::float(-3.5, 4, 2)), "-3.50");
    assert_eq!(render(&TaggedValue::float(0.0, 3, 0)), "0");
    assert_eq!(render(&TaggedValue::num_literal(b"7.25")), "7.25");
    assert_eq!(render(&TaggedValue::char_literal(b"hi")), "hi");
    assert_eq!(render(&[0xA4]), "");
}

#[test]
fn long_text_window_is_respected() {
    let mut text = TaggedValue::long_text_from(b"0123456789", 10);
    tally_value::set_window(&mut text, 3, 5);
    assert_eq!(render(&text), "234");
}

#[test]
fn null_values_render_empty_or_zero() {
    let mut text = TaggedValue::short_text_from(b"abc", 3);
    set_null(&mut text, true);
    assert_eq!(render(&text), "");

    let mut form = TaggedValue::form(b" 1.5");
    set_null(&mut form, true);
    assert_eq!(render(&form), "");
}

#[test]
fn overflow_is_reported() {
    let text = TaggedValue::short_text_from(b"abcdef", 6);
    assert_eq!(
        to_text(&text, 5),
        Err(BridgeError::Overflow { len: 6, max: 5 })
    );
    // float width is checked before formatting
    let float = TaggedValue::float(1.0, 10, 2);
    assert_eq!(
        to_text(&float, 12),
        Err(BridgeError::Overflow { len: 13, max: 12 })
    );
}

#[test]
fn text_destination_truncates() {
    let mut dest = TaggedValue::short_text(4);
    assert_eq!(from_text(b"abcdef", &mut dest), Ok(()));
    assert_eq!(logical(&dest), b"abcd");

    assert_eq!(from_text(b"", &mut dest), Ok(()));
    assert_eq!(logical(&dest), b"");
}

#[test]
fn null_text_destination_is_unnulled() {
    let mut dest = TaggedValue::short_text(4);
    set_null(&mut dest, true);
    assert_eq!(from_text(b"ab", &mut dest), Ok(()));
    assert!(!is_null(&dest));
    assert_eq!(logical(&dest), b"ab");
}

#[test]
fn form_aligns_on_point() {
    let mut dest = TaggedValue::form_zero(3, 2);
    assert_eq!(from_text(b"7.5", &mut dest), Ok(()));
    assert_eq!(logical(&dest), b"  7.50");

    assert_eq!(from_text(b"-12345.678", &mut dest), Ok(()));
    assert_eq!(logical(&dest), b"345.67");

    assert_eq!(from_text(b".25", &mut dest), Ok(()));
    assert_eq!(logical(&dest), b"   .25");
}

#[test]
fn integer_form_ignores_fraction() {
    let mut dest = TaggedValue::form_zero(4, 0);
    assert_eq!(from_text(b"-42.9", &mut dest), Ok(()));
    assert_eq!(logical(&dest), b" -42");
}

#[test]
fn invalid_form_text_leaves_zero() {
    let mut dest = TaggedValue::form(b" 12.50");
    assert_eq!(from_text(b"12a", &mut dest), Err(BridgeError::NotNumeric));
    assert_eq!(logical(&dest), b"   .00");
    assert_eq!(from_text(b"5.", &mut dest), Err(BridgeError::NotNumeric));
    assert_eq!(from_text(b"", &mut dest), Err(BridgeError::NotNumeric));
}

#[test]
fn null_form_destination_is_unnulled() {
    let mut dest = TaggedValue::form(b"  0.00");
    set_null(&mut dest, true);
    assert_eq!(from_text(b"1.25", &mut dest), Ok(()));
    assert_eq!(dest.as_bytes(), b"\x86  1.25");
}

#[test]
fn binary_numerics_parse_prefix() {
    let mut int = TaggedValue::int(0, 5);
    set_null(&mut int, true);
    assert_eq!(from_text(b" -17xyz", &mut int), Ok(()));
    assert_eq!(read_i32(&int), Some(-17));
    assert!(!is_null(&int));

    let mut float = TaggedValue::float(0.0, 3, 2);
    assert_eq!(from_text(b"2.75", &mut float), Ok(()));
    assert_eq!(read_f64(&float), Some(2.75));
}

#[test]
fn literals_are_untouched() {
    let mut lit = TaggedValue::num_literal(b"12");
    let before = lit.clone();
    assert_eq!(from_text(b"99", &mut lit), Ok(()));
    assert_eq!(lit, before);
}

#[test]
fn store_int_into_every_kind() {
    let mut int = TaggedValue::int(0, 3);
    store_int(-8, &mut int);
    assert_eq!(read_i32(&int), Some(-8));

    let mut float = TaggedValue::float(0.0, 3, 1);
    store_int(12, &mut float);
    assert_eq!(read_f64(&float), Some(12.0));

    let mut form = TaggedValue::form_zero(3, 1);
    store_int(42, &mut form);
    assert_eq!(logical(&form), b" 42.0");

    let mut text = TaggedValue::short_text(6);
    store_int(-305, &mut text);
    assert_eq!(logical(&text), b"-305");
}

mod proptest_bridge {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn text_round_trip(text in proptest::collection::vec(0x20u8..0x7F, 0..60)) {
            let src = TaggedValue::short_text_from(&text, 60);
            let rendered = to_text(&src, 60);
            prop_assert!(rendered.is_ok());
            let rendered = rendered.unwrap_or_default();
            let mut dest = TaggedValue::short_text(60);
            prop_assert_eq!(from_text(&rendered, &mut dest), Ok(()));
            prop_assert_eq!(logical(&dest), logical(&src));
        }

        #[test]
        fn form_round_trip(value in -99_999.0f64..99_999.0, left in 5u8..=10, right in 0u8..=4) {
            let src = tally_edit::make_form(&TaggedValue::float(value, left, right));
            let rendered = to_text(&src, 31).unwrap_or_default();
            let mut dest = TaggedValue::form_zero(usize::from(left), usize::from(right));
            prop_assert_eq!(from_text(&rendered, &mut dest), Ok(()));
            prop_assert_eq!(logical(&dest), logical(&src));
        }

        #[test]
        fn int_round_trip(value in any::<i32>()) {
            let src = TaggedValue::int(value, 11);
            let rendered = to_text(&src, 11).unwrap_or_default();
            let mut dest = TaggedValue::int(0, 11);
            prop_assert_eq!(from_text(&rendered, &mut dest), Ok(()));
            prop_assert_eq!(read_i32(&dest), Some(value));
        }
    }
}
