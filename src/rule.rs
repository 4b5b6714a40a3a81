//! Rule definition and application
//!
//! A rule is one declarative substitution: a pattern, a replacement and a
//! priority that fixes its place in the table. Replacements are either
//! `${n}` templates or functions that inspect the surrounding text.

use crate::profile::Profile;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building or loading rules
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("Rule '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown rule file format: {0}")]
    UnknownFormat(String),
}

/// Replacement function. Returning `None` leaves the match untouched.
pub type ReplaceFn = Arc<dyn Fn(&RuleMatch<'_>) -> Option<String> + Send + Sync>;

/// What a match is replaced with
#[derive(Clone)]
pub enum Replacement {
    /// Template with `${n}` group references
    Template(String),
    /// Function of the match and its context
    Function(ReplaceFn),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Replacement::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => write!(f, "{:?}", t),
            Replacement::Function(_) => write!(f, "<function>"),
        }
    }
}

/// A single match handed to a replacement function
pub struct RuleMatch<'h> {
    haystack: &'h str,
    captures: Captures<'h>,
}

impl<'h> RuleMatch<'h> {
    pub fn new(haystack: &'h str, captures: Captures<'h>) -> Self {
        Self { haystack, captures }
    }

    /// Whole matched text
    pub fn as_str(&self) -> &'h str {
        self.captures.get(0).map_or("", |m| m.as_str())
    }

    /// Byte range of the whole match
    pub fn range(&self) -> Range<usize> {
        self.captures.get(0).map_or(0..0, |m| m.range())
    }

    /// Capture group text, empty when the group did not participate
    pub fn group(&self, i: usize) -> &'h str {
        self.captures.get(i).map_or("", |m| m.as_str())
    }

    /// Text preceding the match
    pub fn before(&self) -> &'h str {
        &self.haystack[..self.range().start]
    }

    /// Text following the match
    pub fn after(&self) -> &'h str {
        &self.haystack[self.range().end..]
    }

    pub fn prev_char(&self) -> Option<char> {
        self.before().chars().next_back()
    }

    pub fn next_char(&self) -> Option<char> {
        self.after().chars().next()
    }

    /// Whether the match starts a line
    pub fn at_line_start(&self) -> bool {
        matches!(self.prev_char(), None | Some('\n') | Some('\r'))
    }

    /// Non-whitespace token ending where group `i` ends
    pub fn token_before(&self, i: usize) -> &'h str {
        let end = self.captures.get(i).map_or(self.range().start, |m| m.end());
        trailing_token(&self.haystack[..end])
    }

    /// Non-whitespace token starting right after the match
    pub fn token_after(&self) -> &'h str {
        leading_token(self.after())
    }

    /// Expand a `${n}` template against this match
    pub fn expand(&self, template: &str) -> String {
        let mut dst = String::new();
        self.captures.expand(template, &mut dst);
        dst
    }
}

fn trailing_token(s: &str) -> &str {
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| !c.is_whitespace())
        .last()
        .map_or(s.len(), |(i, _)| i);
    &s[start..]
}

fn leading_token(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

/// A text rewrite rule
#[derive(Clone)]
pub struct Rule {
    /// Unique name within a table
    pub name: String,

    /// Application order, ascending
    pub priority: f64,

    pub pattern: Regex,

    pub replacement: Replacement,

    pub description: String,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .finish()
    }
}

impl Rule {
    /// Create a rule, compiling its pattern
    pub fn new(
        name: &str,
        priority: f64,
        pattern: &str,
        replacement: Replacement,
    ) -> Result<Self, RuleLoadError> {
        let pattern = Regex::new(pattern).map_err(|source| RuleLoadError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            priority,
            pattern,
            replacement,
            description: String::new(),
        })
    }

    /// Rule with a `${n}` template replacement
    pub fn template(
        name: &str,
        priority: f64,
        pattern: &str,
        template: &str,
    ) -> Result<Self, RuleLoadError> {
        Self::new(
            name,
            priority,
            pattern,
            Replacement::Template(template.to_string()),
        )
    }

    /// Rule with a function replacement
    pub fn function<F>(
        name: &str,
        priority: f64,
        pattern: &str,
        f: F,
    ) -> Result<Self, RuleLoadError>
    where
        F: Fn(&RuleMatch<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(name, priority, pattern, Replacement::Function(Arc::new(f)))
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Build a template rule from its serialized form
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, RuleLoadError> {
        Ok(Self::template(&spec.name, spec.priority, &spec.pattern, &spec.replacement)?
            .with_description(&spec.description))
    }

    /// Replace every non-overlapping match in `text`.
    ///
    /// Returns the rewritten text and the number of replacements made.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut out = String::new();
        let mut last = 0;
        let mut count = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(range) = caps.get(0).map(|m| m.range()) else {
                continue;
            };
            let replaced = match &self.replacement {
                Replacement::Template(template) => {
                    let mut dst = String::new();
                    caps.expand(template, &mut dst);
                    Some(dst)
                }
                Replacement::Function(f) => f(&RuleMatch::new(text, caps)),
            };
            if let Some(replaced) = replaced {
                out.push_str(&text[last..range.start]);
                out.push_str(&replaced);
                last = range.end;
                count += 1;
            }
        }

        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }
        out.push_str(&text[last..]);
        (Cow::Owned(out), count)
    }
}

/// Serialized template rule, as found in config and rule files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,

    pub priority: f64,

    pub pattern: String,

    pub replacement: String,

    #[serde(default)]
    pub description: String,

    /// Restrict the rule to one profile (both when absent)
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl RuleSpec {
    pub fn applies_to(&self, profile: Profile) -> bool {
        self.profile.map_or(true, |p| p == profile)
    }
}

/// A YAML or JSON file of custom rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleFile {
    pub version: Option<String>,

    /// Profile applied to rules that do not name one
    pub profile: Option<Profile>,

    pub rules: Vec<RuleSpec>,
}

impl RuleFile {
    /// Load a rule file, picking the format by extension
    pub fn load(path: &Path) -> Result<Self, RuleLoadError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut file: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => return Err(RuleLoadError::UnknownFormat(ext.to_string())),
        };

        if let Some(profile) = file.profile {
            for spec in &mut file.rules {
                spec.profile.get_or_insert(profile);
            }
        }
        Ok(file)
    }

    /// Compile the rules that apply to `profile`
    pub fn rules_for(&self, profile: Profile) -> Result<Vec<Rule>, RuleLoadError> {
        self.rules
            .iter()
            .filter(|spec| spec.applies_to(profile))
            .map(Rule::from_spec)
            .collect()
    }
}
