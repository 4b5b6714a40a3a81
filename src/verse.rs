//! Verse detection
//!
//! Poems are short, evenly sized, often indented lines with a capital at the
//! start of each. Such text keeps its line layout and only gets the reduced
//! rule table from [`crate::rules::verse`].

/// Score at which text counts as verse
pub const VERSE_THRESHOLD: u32 = 5;

/// Heuristic evidence that a text is verse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerseScore {
    /// Average visible line length under 60 characters
    pub short_lines: bool,
    /// More than one line break per ten words
    pub dense_breaks: bool,
    /// Over 30% of lines indented by a tab or two spaces
    pub indented: bool,
    /// Over 70% of lines start with a capital letter
    pub capitalized: bool,
    /// Line length variance under 100
    pub even_lengths: bool,
}

impl VerseScore {
    /// Score a text. Fewer than two non-blank lines scores nothing.
    pub fn of(text: &str) -> Self {
        let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
        if lines.len() < 2 {
            return Self::default();
        }

        let count = lines.len() as f64;
        let lengths: Vec<f64> = lines
            .iter()
            .map(|l| l.trim().chars().count() as f64)
            .collect();
        let average = lengths.iter().sum::<f64>() / count;
        let variance = lengths.iter().map(|len| (len - average).powi(2)).sum::<f64>() / count;

        let breaks = text.matches('\n').count() as f64;
        let words = text.split_whitespace().count() as f64;

        let indented = lines
            .iter()
            .filter(|l| l.starts_with('\t') || l.chars().take(2).all(char::is_whitespace))
            .count() as f64;
        let capitalized = lines
            .iter()
            .filter(|l| l.trim().chars().next().is_some_and(is_capital))
            .count() as f64;

        Self {
            short_lines: average < 60.0,
            dense_breaks: words > 0.0 && breaks / words > 0.1,
            indented: indented / count > 0.3,
            capitalized: capitalized / count > 0.7,
            even_lengths: variance < 100.0,
        }
    }

    pub fn total(&self) -> u32 {
        [
            (self.short_lines, 2),
            (self.dense_breaks, 2),
            (self.indented, 3),
            (self.capitalized, 1),
            (self.even_lengths, 1),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, weight)| weight)
        .sum()
    }

    pub fn is_verse(&self) -> bool {
        self.total() >= VERSE_THRESHOLD
    }
}

fn is_capital(c: char) -> bool {
    c.is_ascii_uppercase() || matches!(c, 'А'..='Я' | 'Ё')
}

/// Whether `text` reads as verse
pub fn is_verse(text: &str) -> bool {
    VerseScore::of(text).is_verse()
}
