#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_keeps_labels_that_fit() {
    assert_eq!(truncate("lunch", 10), "lunch");
    assert_eq!(truncate("lunch", 5), "lunch");
    assert_eq!(truncate("", 3), "");
}

#[test]
fn test_truncate_marks_cut_labels() {
    assert_eq!(truncate("groceries for the week", 10), "groceries…");
    assert_eq!(truncate("lunch", 0), "");
}

#[test]
fn test_truncate_counts_chars_not_bytes() {
    assert_eq!(truncate("pão de açúcar", 5), "pão …");
    assert_eq!(truncate("🎉🎊🎈🎁", 3), "🎉🎊…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
}

#[test]
fn test_format_amount_of_nothing() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_sign() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_pads_cents() {
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

#[test]
fn test_format_amount_rounds_half_up() {
    assert_eq!(format_amount(dec!(333.335)), "$333.34");
    assert_eq!(format_amount(dec!(0.125)), "$0.13");
}

#[test]
fn test_format_amount_tiny_negative_is_not_negative_zero() {
    assert_eq!(format_amount(dec!(-0.001)), "$0.00");
}
