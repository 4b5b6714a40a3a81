//! Russian typography rules

use super::*;

/// Abbreviations that take a no-break space before a number
const NUMBER_ABBREVIATIONS: &str = "стр|гл|пп|п|абз|рис|табл|ст|ч|вып|т|с|см";

/// Abbreviations that take a no-break space before a capitalised name
const NAME_ABBREVIATIONS: &str = "г|ул|пос|пер|пл|пр|д|им|см|тов|гр|оз|р";

/// Short words bound to the following word
const TWO_LETTER_WORDS: &str = "на|по|за|из|от|до|во|со|ко|об|ну|не|ни|но|да";

pub fn rules() -> Result<Vec<Rule>, RuleLoadError> {
    let g = Profile::Primary.glyphs();
    let mut rules = vec![
        leading_spaces()?,
        spaces_after_pilcrow()?,
        multiple_spaces()?,
        date_ranges(g)?,
        roman_ranges(g)?,
        double_hyphen()?,
        Rule::template(
            "en_dash_at_line_end",
            1.9,
            r"(?m)–([ \t\r]*)$",
            &format!("{EM_DASH}${{1}}"),
        )?
        .with_description("En dash closing a verse line becomes an em dash"),
        Rule::function(
            "dialogue_dash",
            1.95,
            r"(?m)^([ \t\u{a0}]*)[-–—−‒][ \t\u{a0}]*",
            |m| {
                m.next_char()
                    .is_some_and(|c| !c.is_whitespace() && !c.is_ascii_digit() && !is_dash(c))
                    .then(|| format!("{}{} ", m.group(1), EM_DASH))
            },
        )?
        .with_description("Dash opening a dialogue line becomes an em dash and one space"),
    ];

    rules.extend(spaced_dashes(g)?);
    rules.push(numeric_ranges(g)?);

    rules.extend([
        Rule::function("non_breaking_hyphens", 4.0, r"(?i)([а-яё])-", |m| {
            m.next_char()
                .is_some_and(is_cyrillic)
                .then(|| format!("{}{}", m.group(1), NON_BREAKING_HYPHEN))
        })?
        .with_description("Non-breaking hyphen inside compound words"),
        Rule::function(
            "dates_with_endings",
            4.1,
            r"\b(\d{2,4})-(е|х|м|я|й|ю|и|ы)",
            |m| {
                (!m.next_char().is_some_and(is_cyrillic))
                    .then(|| format!("{}{}{}", m.group(1), NON_BREAKING_HYPHEN, m.group(2)))
            },
        )?
        .with_description("Non-breaking hyphen in numeric endings (1990-е, 80-х)"),
        Rule::function(
            "single_letter_words",
            5.0,
            r"(?i)\b([авиксоуя])[ \t]+",
            nbsp_after_group,
        )?
        .with_description("No-break space after one-letter prepositions and conjunctions"),
        Rule::function(
            "two_letter_words",
            5.5,
            &format!(r"(?i)\b({TWO_LETTER_WORDS})[ \t]+"),
            nbsp_after_group,
        )?
        .with_description("No-break space after two-letter prepositions and particles"),
        Rule::template(
            "abbreviations_with_numbers",
            6.0,
            &format!(r"(?i)\b({NUMBER_ABBREVIATIONS})\.[ \t\u{{a0}}]*(\d)"),
            "${1}.\u{a0}${2}",
        )?
        .with_description("No-break space after abbreviations before numbers"),
        Rule::template(
            "abbreviations_with_names",
            6.5,
            &format!(r"\b({NAME_ABBREVIATIONS})\.[ \t]+([А-ЯЁ])"),
            "${1}.\u{a0}${2}",
        )?
        .with_description("No-break space after abbreviations before names (г. Москва)"),
        Rule::template(
            "and_so_on",
            7.0,
            r"\bт\.[ \t\u{a0}]*([дпе])\.",
            "т.\u{a0}${1}.",
        )?
        .with_description("No-break space inside т. д., т. п., т. е."),
        sign_before_number()?,
        Rule::template(
            "surname_initials",
            8.8,
            r"([А-ЯЁ][а-яё]+)[ \t]+([А-ЯЁ]\.)[ \t\u{a0}]*([А-ЯЁ]\.)",
            "${1}\u{a0}${2}\u{a0}${3}",
        )?
        .with_description("No-break spaces between a surname and two initials"),
        Rule::function(
            "surname_single_initial",
            8.85,
            r"([А-ЯЁ][а-яё]+)[ \t]+([А-ЯЁ]\.)",
            |m| {
                let rest = m
                    .after()
                    .trim_start_matches(|c: char| matches!(c, ' ' | '\t' | NBSP));
                let mut rest = rest.chars();
                let another_initial = rest.next().is_some_and(|c| c.is_uppercase())
                    && rest.next() == Some('.');
                (!another_initial).then(|| format!("{}{}{}", m.group(1), NBSP, m.group(2)))
            },
        )?
        .with_description("No-break space between a surname and a single initial"),
        Rule::template(
            "comprehensive_initials",
            9.1,
            r"\b([А-ЯЁ]\.)[ \t\u{a0}]*([А-ЯЁ]\.)[ \t\u{a0}]*([А-ЯЁ][а-яё]+)",
            "${1}\u{a0}${2}\u{a0}${3}",
        )?
        .with_description("No-break spaces in initials followed by a surname"),
        Rule::template(
            "initial_surname",
            9.2,
            r"\b([А-ЯЁ]\.)[ \t]*([А-ЯЁ][а-яё]+)",
            "${1}\u{a0}${2}",
        )?
        .with_description("No-break space between an initial and a surname"),
        Rule::template(
            "number_word",
            9.7,
            r"(\d)[ \t]+([а-яёА-ЯЁ])",
            "${1}\u{a0}${2}",
        )?
        .with_description("No-break space between a number and the following word"),
        digit_groups()?,
        roman_numerals(r"\b([IVXLCDM]+)[ \t]+([а-яёА-ЯЁ])")?,
        apostrophe()?,
    ]);

    rules.extend(quotes(g)?);
    rules.push(ellipsis()?);
    rules.extend(symbols()?);
    rules.push(line_breaks()?);
    Ok(rules)
}
