use super::*;
use pretty_assertions::assert_eq;
use tally_value::{float_widths, logical, read_f64, TaggedValue};

#[test]
fn int_width_changes_keep_value() {
    let mut buf = TaggedValue::int(42, 2);
    assert_eq!(reshape_numeric(&mut buf, 7, 0), CondFlags::empty());
    assert_eq!(buf.as_bytes(), TaggedValue::int(42, 7).as_bytes());
}

#[test]
fn float_widths_are_rewritten() {
    let mut buf = TaggedValue::float(2.5, 3, 1);
    assert_eq!(reshape_numeric(&mut buf, 12, 4), CondFlags::empty());
    assert_eq!(float_widths(&buf), (12, 4));
    assert_eq!(read_f64(&buf), Some(2.5));
}

#[test]
fn null_float_stays_null() {
    let mut buf = TaggedValue::float(2.5, 3, 1);
    tally_value::set_null(&mut buf, true);
    assert_eq!(reshape_numeric(&mut buf, 9, 2), CondFlags::empty());
    assert!(tally_value::is_null(&buf));
    assert_eq!(float_widths(&buf), (9, 2));
}

#[test]
fn form_shrinks_leaving_extenders() {
    let mut buf = TaggedValue::form(b" 123.45");
    assert_eq!(reshape_numeric(&mut buf, 2, 1), CondFlags::empty());
    assert_eq!(buf.as_bytes(), b"\x84  .0\xF3\xF3\xF3");
}

#[test]
fn form_grows_into_extenders() {
    let mut buf = TaggedValue::from_bytes(b"\x84  .0\xF3\xF3\xF3".to_vec());
    assert_eq!(reshape_numeric(&mut buf, 5, 1), CondFlags::empty());
    assert_eq!(buf.as_bytes(), b"\x87     .0");
}

#[test]
fn form_without_room_overflows() {
    let mut buf = TaggedValue::form(b"12");
    let before = buf.clone();
    assert_eq!(reshape_numeric(&mut buf, 4, 0), CondFlags::OVER);
    assert_eq!(buf, before);
}

#[test]
fn integer_only_form_ends_in_zero() {
    let mut buf = TaggedValue::form(b"999");
    assert_eq!(reshape_numeric(&mut buf, 3, 0), CondFlags::empty());
    assert_eq!(logical(&buf), b"  0");
}

#[test]
fn invalid_shapes_overflow() {
    let mut buf = TaggedValue::int(1, 1);
    assert_eq!(reshape_numeric(&mut buf, 0, 0), CondFlags::OVER);
    assert_eq!(reshape_numeric(&mut buf, -1, 2), CondFlags::OVER);
    assert_eq!(reshape_numeric(&mut buf, 20, 11), CondFlags::OVER);
    let mut text = TaggedValue::short_text(4);
    assert_eq!(reshape_numeric(&mut text, 2, 0), CondFlags::OVER);
}

#[test]
fn text_shrinks_and_regrows() {
    let mut buf = TaggedValue::short_text_from(b"abcdef", 6);
    assert_eq!(reshape_text(&mut buf, 4), CondFlags::empty());
    assert_eq!(buf.as_bytes(), b"\x00\x00\x04    \xF3\xF3");
    assert_eq!(logical(&buf), b"");

    assert_eq!(reshape_text(&mut buf, 6), CondFlags::empty());
    assert_eq!(buf.as_bytes(), b"\x00\x00\x06      ");
    assert_eq!(reshape_text(&mut buf, 7), CondFlags::OVER);
}

#[test]
fn long_text_length_word() {
    let mut buf = TaggedValue::long_text(10);
    assert_eq!(reshape_text(&mut buf, 3), CondFlags::empty());
    assert_eq!(&buf[5..7], &[3, 0]);
    assert!(buf[10..].iter().all(|&b| b == EXTENDER));
}

#[test]
fn text_reshape_rejects_bad_lengths() {
    let mut buf = TaggedValue::short_text(4);
    assert_eq!(reshape_text(&mut buf, 0), CondFlags::OVER);
    assert_eq!(reshape_text(&mut buf, 300), CondFlags::OVER);
    let mut num = TaggedValue::int(3, 1);
    assert_eq!(reshape_text(&mut num, 2), CondFlags::OVER);
}
