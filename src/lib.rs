//! Typograph - rule-based typography for Russian and English text
//!
//! Rewrites straight quotes, hyphens and plain spaces into the glyphs a
//! typesetter would use: nested curly quotes, clause and range dashes,
//! non-breaking spaces after short words and initials, thin-space digit
//! groups, ellipsis and symbol substitutions.
//!
//! # Architecture
//!
//! ```text
//! text ------------------------------> LanguageProcessor -> RuleEngine -> Rule table
//! markup -> parse -> MarkupWalker ---------^
//! document.xml -> DocumentRewriter -> realign_runs ----^
//! ```
//!
//! Each profile owns one rule table and one LRU cache. With verse detection
//! enabled, text that reads as a poem gets a reduced table instead. The markup walker and
//! the run realigner are front-ends that feed text through the same processor
//! without disturbing the structure around it.
//!
//! # Custom rules
//!
//! Extra rules can be supplied in config or in a rule file:
//!
//! ```yaml
//! version: "1.0"
//! profile: secondary
//! rules:
//!   - name: arrows
//!     priority: 21
//!     pattern: "->"
//!     replacement: "→"
//!     description: "ASCII arrow becomes an arrow glyph"
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod glyphs;
pub mod markup;
pub mod processor;
pub mod profile;
pub mod rule;
pub mod rules;
pub mod typographer;
pub mod verse;

// Re-export main types
pub use cache::{CacheStats, TextCache};
pub use config::{Config, ConfigError};
pub use document::{realign_runs, DocumentRewriter, OffsetMap, Run};
pub use engine::{RuleEngine, RuleStats, RuleTiming};
pub use error::{Result, TypographError};
pub use markup::{MarkupPolicy, MarkupWalker, Node, ParseError, ParseOptions};
pub use processor::LanguageProcessor;
pub use profile::{GlyphSet, Profile};
pub use rule::{Replacement, Rule, RuleFile, RuleLoadError, RuleMatch, RuleSpec};
pub use typographer::Typographer;
pub use verse::{is_verse, VerseScore};
