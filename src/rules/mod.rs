//! Built-in rule tables
//!
//! Each profile owns one ordered table. Rules shared by both tables are
//! built here from the profile's [`GlyphSet`], so the data stays in one place
//! while quote and dash glyphs differ. [`verse`] holds the reduced table
//! used for text detected as verse.

pub mod primary;
pub mod secondary;
pub mod verse;

use crate::glyphs::*;
use crate::profile::{GlyphSet, Profile};
use crate::rule::{Rule, RuleLoadError, RuleMatch};

/// Rule table for a profile, in declaration order
pub fn table_for(profile: Profile) -> Result<Vec<Rule>, RuleLoadError> {
    match profile {
        Profile::Primary => primary::rules(),
        Profile::Secondary => secondary::rules(),
    }
}

const ROMAN_NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn roman_digit(c: char) -> Option<u32> {
    ROMAN_NUMERALS
        .iter()
        .find(|(_, s)| s.len() == 1 && s.starts_with(c))
        .map(|(v, _)| *v)
}

fn to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for (v, s) in ROMAN_NUMERALS {
        while value >= v {
            out.push_str(s);
            value -= v;
        }
    }
    out
}

/// Whether `token` is a well-formed Roman numeral from 1 to 3999
fn is_roman(token: &str) -> bool {
    let Some(digits) = token.chars().map(roman_digit).collect::<Option<Vec<u32>>>() else {
        return false;
    };
    let mut value = 0;
    for (i, d) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(next) if d < next => value -= *d as i64,
            _ => value += *d as i64,
        }
    }
    (1..4000).contains(&value) && to_roman(value as u32) == token
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Whether a spaced dash joins two range endpoints rather than two clauses
fn is_range(before: &str, after: &str) -> bool {
    let before = before.trim_start_matches(|c: char| !c.is_alphanumeric());
    let after_head: String = after.chars().take_while(|c| c.is_alphanumeric()).collect();

    let numeric = before.ends_with(|c: char| c.is_ascii_digit())
        && after.starts_with(|c: char| c.is_ascii_digit());
    numeric || (is_roman(before) && is_roman(&after_head))
}

fn followed_by_text(m: &RuleMatch<'_>) -> bool {
    m.next_char().is_some_and(|c| !c.is_whitespace())
}

/// `word<NBSP>` when the word is followed by more text
pub(crate) fn nbsp_after_group(m: &RuleMatch<'_>) -> Option<String> {
    followed_by_text(m).then(|| format!("{}{}", m.group(1), NBSP))
}

pub(crate) fn leading_spaces() -> Result<Rule, RuleLoadError> {
    Ok(Rule::template(
        "remove_leading_spaces",
        -2.2,
        r"(?m)^(\t*)[ \u{2009}]+",
        "${1}",
    )?
    .with_description("Strip spaces at line start, keeping tab indentation"))
}

pub(crate) fn spaces_after_pilcrow() -> Result<Rule, RuleLoadError> {
    Ok(
        Rule::template("remove_spaces_after_pilcrow", -1.0, r"¶[ \t\u{a0}\u{2009}]+", "¶")?
            .with_description("Strip whitespace after an existing paragraph marker"),
    )
}

pub(crate) fn multiple_spaces() -> Result<Rule, RuleLoadError> {
    Ok(Rule::function("multiple_spaces", 1.0, r"[ \t]{2,}", |m| {
        (!m.at_line_start()).then(|| " ".to_string())
    })?
    .with_description("Collapse runs of spaces and tabs, except indentation"))
}

pub(crate) fn date_ranges(g: GlyphSet) -> Result<Rule, RuleLoadError> {
    Ok(Rule::template(
        "date_ranges",
        1.1,
        r"\b(1\d{3}|20\d{2})[ \t\u{a0}]*[-–−][ \t\u{a0}]*(1\d{3}|20\d{2})\b",
        &format!("${{1}}{}${{2}}", g.range_dash),
    )?
    .with_description("Range dash without spaces between years"))
}

pub(crate) fn roman_ranges(g: GlyphSet) -> Result<Rule, RuleLoadError> {
    let dash = g.range_dash;
    Ok(Rule::function(
        "roman_ranges",
        1.2,
        r"\b([IVXLCDM]+)[ \t\u{a0}]*[-–−][ \t\u{a0}]*([IVXLCDM]+)\b",
        move |m| {
            (is_roman(m.group(1)) && is_roman(m.group(2)))
                .then(|| format!("{}{}{}", m.group(1), dash, m.group(2)))
        },
    )?
    .with_description("Range dash without spaces between Roman numerals"))
}

/// No-break space after a Roman numeral before a lowercase word
pub(crate) fn roman_numerals(pattern: &str) -> Result<Rule, RuleLoadError> {
    Ok(Rule::function("roman_numerals", 15.0, pattern, |m| {
        is_roman(m.group(1)).then(|| format!("{}{}{}", m.group(1), NBSP, m.group(2)))
    })?
    .with_description("No-break space after Roman numerals (XXI век)"))
}

pub(crate) fn double_hyphen() -> Result<Rule, RuleLoadError> {
    Ok(Rule::template("double_hyphen", 1.5, r"-{2,3}", &EM_DASH.to_string())?
        .with_description("Double or triple hyphen becomes an em dash"))
}

fn spaced_dash_replacement(g: GlyphSet) -> impl Fn(&RuleMatch<'_>) -> Option<String> {
    move |m| {
        if !followed_by_text(m) {
            return None;
        }
        if is_range(m.token_before(1), m.token_after()) {
            Some(format!("{}{}", m.group(1), g.range_dash))
        } else {
            Some(format!("{}{}{} ", m.group(1), NBSP, g.clause_dash))
        }
    }
}

/// Spaced hyphen and spaced dash between tokens
pub(crate) fn spaced_dashes(g: GlyphSet) -> Result<Vec<Rule>, RuleLoadError> {
    Ok(vec![
        Rule::function(
            "spaced_hyphen",
            2.0,
            r"(\S)[ \t\u{a0}]+[-−][ \t\u{a0}]+",
            spaced_dash_replacement(g),
        )?
        .with_description("Spaced hyphen becomes a clause dash, or a range dash between numbers"),
        Rule::function(
            "spaced_dash",
            2.5,
            r"(\S)[ \t\u{a0}]+[–—][ \t\u{a0}]+",
            spaced_dash_replacement(g),
        )?
        .with_description("Normalise spacing around clause dashes, except in ranges"),
    ])
}

pub(crate) fn numeric_ranges(g: GlyphSet) -> Result<Rule, RuleLoadError> {
    let dash = g.range_dash;
    Ok(
        Rule::function("numeric_ranges", 3.0, r"(\d)[ \t]*[-–−][ \t]*", move |m| {
            m.next_char()
                .is_some_and(|c| c.is_ascii_digit())
                .then(|| format!("{}{}", m.group(1), dash))
        })?
        .with_description("Range dash between numbers"),
    )
}

pub(crate) fn sign_before_number() -> Result<Rule, RuleLoadError> {
    Ok(Rule::template(
        "numero_sign",
        8.0,
        r"([№§])[ \t\u{a0}]*(\d)",
        "${1}\u{a0}${2}",
    )?
    .with_description("Exactly one no-break space after № and §"))
}

fn group_digits(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(digits.len() + chars.len() / 3 * THIN_SPACE.len_utf8());
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(THIN_SPACE);
        }
        out.push(*c);
    }
    out
}

pub(crate) fn digit_groups() -> Result<Rule, RuleLoadError> {
    Ok(Rule::function("thin_spaces_in_numbers", 10.0, r"\b(\d{5,})\b", |m| {
        let mut before = m.before().chars().rev();
        let fraction = matches!(before.next(), Some('.' | ','))
            && before.next().is_some_and(|c| c.is_ascii_digit());
        (!fraction).then(|| group_digits(m.as_str()))
    })?
    .with_description("Thin-space groups of three in numbers of five or more digits"))
}

pub(crate) fn apostrophe() -> Result<Rule, RuleLoadError> {
    Ok(Rule::function("apostrophes", 15.9, r"(\w)'", |m| {
        m.next_char()
            .is_some_and(char::is_alphanumeric)
            .then(|| format!("{}{}", m.group(1), APOSTROPHE))
    })?
    .with_description("Typographic apostrophe inside words"))
}

/// Double quotes, one level of nesting, then single quotes
pub(crate) fn quotes(g: GlyphSet) -> Result<Vec<Rule>, RuleLoadError> {
    let (open, close) = g.outer_quotes;
    let (inner_open, inner_close) = g.inner_quotes;
    let (single_open, single_close) = g.single_quotes;
    let nested = format!(
        "{open}([^{open}{close}]*){open}([^{open}{close}]*){close}([^{open}{close}]*){close}"
    );

    Ok(vec![
        Rule::template(
            "main_quotes",
            16.0,
            r#""([^"]*)""#,
            &format!("{open}${{1}}{close}"),
        )?
        .with_description("Straight double quotes become outer quotes"),
        Rule::template(
            "nested_quotes",
            17.0,
            &nested,
            &format!("{open}${{1}}{inner_open}${{2}}{inner_close}${{3}}{close}"),
        )?
        .with_description("Quotes inside quotes become inner quotes"),
        Rule::template(
            "single_quotes",
            17.5,
            r"'([^'\n]*)'",
            &format!("{single_open}${{1}}{single_close}"),
        )?
        .with_description("Straight single quotes become curly quotes"),
    ])
}

pub(crate) fn ellipsis() -> Result<Rule, RuleLoadError> {
    Ok(Rule::template("ellipsis", 19.0, r"\.{3,}", &ELLIPSIS.to_string())?
        .with_description("Three or more periods become an ellipsis"))
}

pub(crate) fn symbols() -> Result<Vec<Rule>, RuleLoadError> {
    Ok(vec![
        Rule::template("copyright", 20.0, r"(?i)\([cс]\)", &COPYRIGHT.to_string())?
            .with_description("(c) becomes ©"),
        Rule::template("registered", 20.0, r"(?i)\([rр]\)", &REGISTERED.to_string())?
            .with_description("(r) becomes ®"),
        Rule::template("trademark", 20.0, r"(?i)\(tm\)", &TRADEMARK.to_string())?
            .with_description("(tm) becomes ™"),
    ])
}

pub(crate) fn line_breaks() -> Result<Rule, RuleLoadError> {
    Ok(Rule::template("line_breaks_to_paragraph", 100.0, r"\r?\n", "¶")?
        .with_description("Every line break becomes a paragraph marker"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RuleEngine;

    fn apply(rule: Rule, text: &str) -> String {
        rule.apply(text).0.into_owned()
    }

    #[test]
    fn test_is_range() {
        assert!(is_range("10", "20"));
        assert!(is_range("(10", "20)"));
        assert!(is_range("XIV", "XV"));
        assert!(!is_range("Moscow", "Saint"));
        assert!(!is_range("I", "Victor"));
        assert!(!is_range("CD", "DVD"));
    }

    #[test]
    fn test_roman_shape() {
        for token in ["I", "IV", "XIV", "XXI", "CD", "MCMXC", "MMXXIV"] {
            assert!(is_roman(token), "{token}");
        }
        for token in ["", "IIII", "VV", "DVD", "IC", "MMMM", "XM", "iv"] {
            assert!(!is_roman(token), "{token}");
        }
    }

    #[test]
    fn test_roman_ranges_need_numerals() {
        let rule = roman_ranges(Profile::Primary.glyphs()).unwrap();
        assert_eq!(apply(rule.clone(), "IV-VI"), "IV\u{2013}VI");
        assert_eq!(apply(rule.clone(), "CD-DVD"), "CD-DVD");
        assert_eq!(apply(rule, "MIX - MAX"), "MIX - MAX");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("12345"), "12\u{2009}345");
        assert_eq!(group_digits("1000000"), "1\u{2009}000\u{2009}000");
    }

    #[test]
    fn test_digit_groups_skip_fractions() {
        let rule = digit_groups().unwrap();
        assert_eq!(apply(rule.clone(), "1000"), "1000");
        assert_eq!(apply(rule.clone(), "3.14159"), "3.14159");
        assert_eq!(apply(rule, "100000 м"), "100\u{2009}000 м");
    }

    #[test]
    fn test_multiple_spaces_keep_indent() {
        let rule = multiple_spaces().unwrap();
        assert_eq!(apply(rule.clone(), "a   b"), "a b");
        assert_eq!(apply(rule, "\t\tverse"), "\t\tverse");
    }

    #[test]
    fn test_leading_spaces_keep_tabs() {
        let rule = leading_spaces().unwrap();
        assert_eq!(apply(rule, "  one\n\t  two"), "one\n\ttwo");
    }

    #[test]
    fn test_apostrophe_only_inside_words() {
        let rule = apostrophe().unwrap();
        assert_eq!(apply(rule.clone(), "don't"), "don\u{2019}t");
        assert_eq!(apply(rule, "'quoted'"), "'quoted'");
    }

    #[test]
    fn test_tables_sort_without_error() {
        for profile in Profile::ALL {
            let engine = RuleEngine::new(table_for(profile).unwrap());
            let priorities: Vec<f64> = engine.rules().iter().map(|r| r.priority).collect();
            assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(engine.rules().last().unwrap().name, "line_breaks_to_paragraph");
        }
    }

    #[test]
    fn test_table_names_unique() {
        for profile in Profile::ALL {
            let rules = table_for(profile).unwrap();
            let mut names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate rule name in {} table", profile);
        }
    }
}
