use super::*;
use pretty_assertions::assert_eq;
use tally_value::TaggedValue;

fn text(s: &str) -> TaggedValue {
    TaggedValue::short_text_from(s.as_bytes(), 0)
}

#[test]
fn numeric_text_accepts_plain_numbers() {
    for s in ["12", "  -12.5", ".5", "-.5", "5.", "0"] {
        assert!(is_numeric_text(&text(s)), "{s:?}");
    }
}

#[test]
fn numeric_text_rejects_malformed() {
    for s in [".", "-.", "-", "   ", "1-2", "1.2.3", "12 ", "+5", "abc"] {
        assert!(!is_numeric_text(&text(s)), "{s:?}");
    }
    assert!(!is_numeric_text(&TaggedValue::short_text(5)));
    assert!(!is_numeric_text(&text(&"1".repeat(32))));
    assert!(is_numeric_text(&text(&"1".repeat(31))));
}

#[test]
fn atoi_parses_prefix_and_wraps() {
    assert_eq!(atoi_wrapping(b"  -42abc"), -42);
    assert_eq!(atoi_wrapping(b"+7"), 7);
    assert_eq!(atoi_wrapping(b""), 0);
    assert_eq!(atoi_wrapping(b"  12.75"), 12);
    assert_eq!(atoi_wrapping(b"4294967297"), 1);
}

#[test]
fn atof_parses_prefix() {
    assert_eq!(atof_prefix(b"  12.50"), 12.5);
    assert_eq!(atof_prefix(b"-.25x"), -0.25);
    assert_eq!(atof_prefix(b"1e3"), 1000.0);
    assert_eq!(atof_prefix(b"2e"), 2.0);
    assert_eq!(atof_prefix(b"."), 0.0);
    assert_eq!(atof_prefix(b"-"), 0.0);
}

#[test]
fn integer_readings() {
    assert_eq!(to_i32(&TaggedValue::int(-9, 2)), -9);
    assert_eq!(to_i32(&TaggedValue::float(-9.75, 2, 2)), -9);
    assert_eq!(to_i32(&TaggedValue::form(b" -12.99")), -12);
    assert_eq!(to_i32(&TaggedValue::num_literal(b"300")), 300);
    assert_eq!(to_i32(&text("12")), 0);
}

#[test]
fn null_form_reads_zero() {
    let mut buf = TaggedValue::form(b" 5");
    tally_value::set_null(&mut buf, true);
    assert_eq!(to_i32(&buf), 0);
    assert_eq!(to_f64(&buf), 0.0);
}

#[test]
fn float_readings() {
    assert_eq!(to_f64(&TaggedValue::form(b"  3.25")), 3.25);
    assert_eq!(to_f64(&TaggedValue::int(4, 1)), 4.0);
    assert_eq!(to_f64(&TaggedValue::num_literal(b"-0.5")), -0.5);
}

#[test]
fn decimal_comparison_is_exact() {
    let a = TaggedValue::form(b" 1.50");
    let b = TaggedValue::num_literal(b"1.5");
    assert_eq!(compare(&a, &b), Some(Ordering::Equal));

    let c = TaggedValue::int(2, 3);
    assert_eq!(compare(&a, &c), Some(Ordering::Less));
    assert_eq!(compare(&c, &a), Some(Ordering::Greater));

    let neg = TaggedValue::num_literal(b"-10");
    let neg_small = TaggedValue::num_literal(b"-9.5");
    assert_eq!(compare(&neg, &neg_small), Some(Ordering::Less));

    let zero = TaggedValue::form(b"  .00");
    let neg_zero = TaggedValue::num_literal(b"-0");
    assert_eq!(compare(&zero, &neg_zero), Some(Ordering::Equal));
}

#[test]
fn float_comparison() {
    let a = TaggedValue::float(0.1, 1, 1);
    let b = TaggedValue::num_literal(b"0.2");
    assert_eq!(compare(&a, &b), Some(Ordering::Less));
}

#[test]
fn non_numeric_compare_is_none() {
    assert_eq!(compare(&text("1"), &TaggedValue::int(1, 1)), None);
}
