//! Tagged cell tests.

use coopsim_core::core::cell::Cell;
use pretty_assertions::assert_eq;

#[test]
fn default_cell_is_the_number_zero() {
    assert_eq!(Cell::default(), Cell::Word(0));
    assert_eq!(Cell::default().as_word(), Some(0));
}

#[test]
fn word_cell_accessors() {
    let cell = Cell::Word(42);
    assert!(!cell.is_code());
    assert_eq!(cell.as_word(), Some(42));
    assert_eq!(cell.as_code(), None);
}

#[test]
fn code_cell_accessors() {
    let cell = Cell::code("SET 7 1500");
    assert!(cell.is_code());
    assert_eq!(cell.as_word(), None);
    assert_eq!(cell.as_code(), Some("SET 7 1500"));
}

#[test]
fn display_renders_both_tags() {
    assert_eq!(Cell::Word(-3).to_string(), "-3");
    assert_eq!(Cell::code("HLT").to_string(), "HLT");
}
