//! Language profiles and their glyph sets

use crate::glyphs::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed language configuration selecting a rule table and glyph set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Russian conventions: «» with „“ inside, em dash clauses
    #[default]
    #[serde(alias = "ru", alias = "russian")]
    Primary,
    /// English conventions: “” with ‘’ inside, spaced en dash clauses
    #[serde(alias = "en", alias = "english")]
    Secondary,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Primary, Profile::Secondary];

    /// Glyphs the profile's rules emit
    pub fn glyphs(self) -> GlyphSet {
        match self {
            Profile::Primary => GlyphSet {
                outer_quotes: (LEFT_GUILLEMET, RIGHT_GUILLEMET),
                inner_quotes: (LOW_DOUBLE_QUOTE, LEFT_DOUBLE_QUOTE),
                single_quotes: (LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE),
                clause_dash: EM_DASH,
                range_dash: EN_DASH,
            },
            Profile::Secondary => GlyphSet {
                outer_quotes: (LEFT_DOUBLE_QUOTE, RIGHT_DOUBLE_QUOTE),
                inner_quotes: (LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE),
                single_quotes: (LEFT_SINGLE_QUOTE, RIGHT_SINGLE_QUOTE),
                clause_dash: EN_DASH,
                range_dash: EN_DASH,
            },
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Primary => write!(f, "primary"),
            Profile::Secondary => write!(f, "secondary"),
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" | "ru" | "russian" => Ok(Profile::Primary),
            "secondary" | "en" | "english" => Ok(Profile::Secondary),
            _ => Err(format!("Unknown profile: {}", s)),
        }
    }
}

/// Quote and dash glyphs for one profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    pub outer_quotes: (char, char),
    pub inner_quotes: (char, char),
    pub single_quotes: (char, char),
    /// Dash between clauses
    pub clause_dash: char,
    /// Dash inside numeric and era ranges
    pub range_dash: char,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("primary".parse::<Profile>().unwrap(), Profile::Primary);
        assert_eq!("RU".parse::<Profile>().unwrap(), Profile::Primary);
        assert_eq!("en".parse::<Profile>().unwrap(), Profile::Secondary);
        assert!("de".parse::<Profile>().is_err());
    }

    #[test]
    fn test_profile_display_roundtrips() {
        for profile in Profile::ALL {
            assert_eq!(profile.to_string().parse::<Profile>().unwrap(), profile);
        }
    }

    #[test]
    fn test_glyph_sets_differ() {
        let ru = Profile::Primary.glyphs();
        let en = Profile::Secondary.glyphs();
        assert_eq!(ru.outer_quotes, ('«', '»'));
        assert_eq!(en.outer_quotes, ('\u{201C}', '\u{201D}'));
        assert_eq!(ru.clause_dash, EM_DASH);
        assert_eq!(en.clause_dash, EN_DASH);
    }

    #[test]
    fn test_profile_yaml_alias() {
        let p: Profile = serde_yaml::from_str("en").unwrap();
        assert_eq!(p, Profile::Secondary);
    }
}
