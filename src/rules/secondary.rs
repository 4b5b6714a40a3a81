//! English typography rules

use super::*;

const NUMBER_ABBREVIATIONS: &str = "no|nos|pp|p|vol|ch|fig|sec|art";

const HONORIFICS: &str = "Mr|Mrs|Ms|Dr|Prof|St|Sr|Jr|Rev|Gen|Capt";

const UNITS: &str =
    "kg|g|mg|km|m|cm|mm|ml|min|sec|ms|kW|W|V|Hz|kHz|MHz|GHz|KB|MB|GB|TB|px|pt|ft|lb|oz|mi|mph";

pub fn rules() -> Result<Vec<Rule>, RuleLoadError> {
    let g = Profile::Secondary.glyphs();
    let mut rules = vec![
        leading_spaces()?,
        spaces_after_pilcrow()?,
        multiple_spaces()?,
        date_ranges(g)?,
        roman_ranges(g)?,
        double_hyphen()?,
    ];

    rules.extend(spaced_dashes(g)?);
    rules.push(numeric_ranges(g)?);

    rules.extend([
        Rule::function("non_breaking_hyphens", 4.0, r"(?i)([a-z])-", |m| {
            m.next_char()
                .is_some_and(|c| c.is_ascii_alphabetic())
                .then(|| format!("{}{}", m.group(1), NON_BREAKING_HYPHEN))
        })?
        .with_description("Non-breaking hyphen inside compound words"),
        Rule::function("single_letter_words", 5.0, r"\b([aAI])[ \t]+", nbsp_after_group)?
            .with_description("No-break space after the article a and the pronoun I"),
        Rule::template(
            "abbreviations_with_numbers",
            6.0,
            &format!(r"(?i)\b({NUMBER_ABBREVIATIONS})\.[ \t\u{{a0}}]*(\d)"),
            "${1}.\u{a0}${2}",
        )?
        .with_description("No-break space after No., p., vol. and similar before numbers"),
        Rule::template(
            "honorifics",
            6.5,
            &format!(r"\b({HONORIFICS})\.[ \t]+([A-Z])"),
            "${1}.\u{a0}${2}",
        )?
        .with_description("No-break space after honorifics (Mr. Smith)"),
        sign_before_number()?,
        Rule::template(
            "comprehensive_initials",
            9.1,
            r"\b([A-Z]\.)[ \t\u{a0}]*([A-Z]\.)[ \t\u{a0}]*([A-Z][a-z]+)",
            "${1}\u{a0}${2}\u{a0}${3}",
        )?
        .with_description("No-break spaces in initials followed by a surname"),
        Rule::template(
            "initial_surname",
            9.2,
            r"\b([A-Z]\.)[ \t]+([A-Z][a-z]+)",
            "${1}\u{a0}${2}",
        )?
        .with_description("No-break space between an initial and a surname"),
        Rule::template(
            "number_units",
            9.7,
            &format!(r"(\d)[ \t]+({UNITS})\b"),
            "${1}\u{a0}${2}",
        )?
        .with_description("No-break space between a number and its unit"),
        digit_groups()?,
        apostrophe()?,
    ]);

    rules.extend(quotes(g)?);
    rules.push(ellipsis()?);
    rules.extend(symbols()?);
    rules.push(line_breaks()?);
    Ok(rules)
}
