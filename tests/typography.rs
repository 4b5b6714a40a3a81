//! End-to-end text rewriting through the public API

use pretty_assertions::assert_eq;
use typograph::glyphs::{EM_DASH, EN_DASH, NBSP, THIN_SPACE};
use typograph::{Config, Profile, Typographer, TypographError};

fn typographer() -> Typographer {
    Typographer::new(Config::default()).unwrap()
}

fn ru(text: &str) -> String {
    typographer().rewrite_text(text, Profile::Primary).unwrap()
}

#[test]
fn test_nested_quotes() {
    assert_eq!(
        ru("«Outer \"Inner\" text»"),
        "«Outer „Inner“ text»"
    );
}

#[test]
fn test_word_dash() {
    assert_eq!(
        ru("Moscow - Saint Petersburg"),
        format!("Moscow{NBSP}{EM_DASH} Saint Petersburg")
    );
}

#[test]
fn test_double_hyphen() {
    assert_eq!(
        ru("Moscow--Saint Petersburg"),
        format!("Moscow{EM_DASH}Saint Petersburg")
    );
}

#[test]
fn test_year_range() {
    assert_eq!(ru("1990-2020"), format!("1990{EN_DASH}2020"));
}

#[test]
fn test_abbreviation_spacing() {
    assert_eq!(ru("и т.д."), format!("и{NBSP}т.{NBSP}д."));
}

#[test]
fn test_numero_sign() {
    assert_eq!(ru("№123"), format!("№{NBSP}123"));
    assert_eq!(ru("№ 456"), format!("№{NBSP}456"));
}

#[test]
fn test_digit_grouping() {
    assert_eq!(
        ru("1000000"),
        format!("1{THIN_SPACE}000{THIN_SPACE}000")
    );
    assert_eq!(ru("2024"), "2024");
}

#[test]
fn test_paragraph_breaks() {
    assert_eq!(ru("раз\n\nдва"), "раз¶¶два");
}

#[test]
fn test_repeatable() {
    let t = typographer();
    let text = "Он сказал: \"Да - это так...\" (c) 2024";
    let first = t.rewrite_text(text, Profile::Primary).unwrap();
    let second = t.rewrite_text(text, Profile::Primary).unwrap();
    assert_eq!(first, second);

    let uncached = Typographer::new(Config {
        cache: typograph::config::CacheConfig { capacity: 0 },
        ..Config::default()
    })
    .unwrap();
    assert_eq!(
        uncached.rewrite_text(text, Profile::Primary).unwrap(),
        first
    );
}

#[test]
fn test_secondary_profile() {
    let t = typographer();
    assert_eq!(
        t.rewrite_text("She said \"hi\"...", Profile::Secondary)
            .unwrap(),
        "She said \u{201C}hi\u{201D}…"
    );
}

#[test]
fn test_empty_input_rejected() {
    let err = typographer()
        .rewrite_text("", Profile::Primary)
        .unwrap_err();
    assert!(matches!(err, TypographError::InvalidInput));
    assert_eq!(err.to_string(), "Input must be a non-empty string");
}
