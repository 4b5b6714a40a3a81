//! Reduced rule table for verse
//!
//! Keeps the poet's line breaks, spacing and hyphenation. Only double
//! hyphens, dashes closing a line and straight double quotes change.

use super::*;

pub fn rules(profile: Profile) -> Result<Vec<Rule>, RuleLoadError> {
    let (open, close) = profile.glyphs().outer_quotes;
    Ok(vec![
        double_hyphen()?,
        Rule::template(
            "verse_line_end_dash",
            1.9,
            r"(?m)[-–][ \t]*$",
            &EM_DASH.to_string(),
        )?
        .with_description("Hyphen or en dash closing a verse line becomes an em dash"),
        Rule::template(
            "verse_opening_quotes",
            16.0,
            r#"(^|\s|\()""#,
            &format!("${{1}}{open}"),
        )?
        .with_description("Straight double quote opening a word becomes an outer quote"),
        Rule::template(
            "verse_closing_quotes",
            16.5,
            r#""($|\s|[.,:;!?)\\])"#,
            &format!("{close}${{1}}"),
        )?
        .with_description("Straight double quote closing a word becomes an outer quote"),
    ])
}
