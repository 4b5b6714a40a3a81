//! Typographic characters produced or recognised by the rule tables

/// No-break space
pub const NBSP: char = '\u{00A0}';
/// Thin space, used for digit grouping
pub const THIN_SPACE: char = '\u{2009}';
pub const HAIR_SPACE: char = '\u{200A}';
/// Invisible boundary marker emitted after emphasis elements
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

pub const HYPHEN: char = '-';
pub const NON_BREAKING_HYPHEN: char = '\u{2011}';
pub const FIGURE_DASH: char = '\u{2012}';
pub const EN_DASH: char = '\u{2013}';
pub const EM_DASH: char = '\u{2014}';
pub const MINUS: char = '\u{2212}';

pub const LEFT_GUILLEMET: char = '«';
pub const RIGHT_GUILLEMET: char = '»';
pub const LOW_DOUBLE_QUOTE: char = '„';
pub const LEFT_DOUBLE_QUOTE: char = '\u{201C}';
pub const RIGHT_DOUBLE_QUOTE: char = '\u{201D}';
pub const LEFT_SINGLE_QUOTE: char = '\u{2018}';
pub const RIGHT_SINGLE_QUOTE: char = '\u{2019}';
pub const APOSTROPHE: char = RIGHT_SINGLE_QUOTE;

pub const ELLIPSIS: char = '…';
pub const COPYRIGHT: char = '©';
pub const REGISTERED: char = '®';
pub const TRADEMARK: char = '™';
pub const NUMERO_SIGN: char = '№';
pub const SECTION_SIGN: char = '§';
/// Paragraph-boundary marker that replaces line breaks
pub const PILCROW: char = '¶';

/// Any hyphen or dash a rule may widen or narrow.
pub fn is_dash(c: char) -> bool {
    matches!(
        c,
        HYPHEN | NON_BREAKING_HYPHEN | FIGURE_DASH | EN_DASH | EM_DASH | MINUS
    )
}

/// Characters the rule tables insert without consuming input.
pub fn is_inserted(c: char) -> bool {
    matches!(c, NBSP | THIN_SPACE | NON_BREAKING_HYPHEN)
}

/// Space-like characters that rules swap for one another.
pub fn is_space_like(c: char) -> bool {
    matches!(c, ' ' | '\t' | NBSP | THIN_SPACE | HAIR_SPACE)
}

pub fn is_quote_like(c: char) -> bool {
    matches!(
        c,
        '"' | '\''
            | LEFT_GUILLEMET
            | RIGHT_GUILLEMET
            | LOW_DOUBLE_QUOTE
            | LEFT_DOUBLE_QUOTE
            | RIGHT_DOUBLE_QUOTE
            | LEFT_SINGLE_QUOTE
            | RIGHT_SINGLE_QUOTE
    )
}
