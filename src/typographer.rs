//! Public entry points over both profiles

use crate::cache::TextCache;
use crate::config::Config;
use crate::document::{realign_runs_with, DocumentRewriter, Run};
use crate::engine::{RuleEngine, RuleStats};
use crate::error::{Result, TypographError};
use crate::markup::{MarkupPolicy, MarkupWalker, ParseOptions};
use crate::processor::LanguageProcessor;
use crate::profile::Profile;
use crate::rule::{Rule, RuleFile};
use crate::rules;
use log::{debug, warn};

/// One language processor per profile, each owning its own cache
#[derive(Debug)]
pub struct Typographer {
    config: Config,
    primary: LanguageProcessor,
    secondary: LanguageProcessor,
    policy: MarkupPolicy,
}

impl Typographer {
    /// Build both rule tables, applying custom rules, rule files and
    /// disabled rule names from `config`
    pub fn new(config: Config) -> Result<Self> {
        let rule_files = config
            .rules
            .files
            .iter()
            .map(|path| RuleFile::load(path))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let (primary, primary_unknown) = build_processor(Profile::Primary, &config, &rule_files)?;
        let (secondary, secondary_unknown) =
            build_processor(Profile::Secondary, &config, &rule_files)?;
        let policy = MarkupPolicy::from(&config.markup);

        for name in primary_unknown.iter().filter(|n| secondary_unknown.contains(n)) {
            warn!("disabled rule '{}' does not exist", name);
        }

        Ok(Self {
            config,
            primary,
            secondary,
            policy,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn processor(&self, profile: Profile) -> &LanguageProcessor {
        match profile {
            Profile::Primary => &self.primary,
            Profile::Secondary => &self.secondary,
        }
    }

    /// Rewrite plain text
    pub fn rewrite_text(&self, text: &str, profile: Profile) -> Result<String> {
        if text.is_empty() {
            return Err(TypographError::InvalidInput);
        }
        Ok(self.processor(profile).process(text))
    }

    /// Rewrite the text nodes of a markup fragment.
    ///
    /// Verbatim and untouched text is kept exactly as written. Line breaks
    /// inside rewritten text nodes become `¶` as in plain text, so indented
    /// source such as `<p>\n  Text\n</p>` comes back as `<p>¶Text¶</p>`.
    pub fn rewrite_markup(&self, fragment: &str, profile: Profile) -> Result<String> {
        let options =
            ParseOptions::html().with_void_elements(self.config.markup.void_elements.clone());
        let walker =
            MarkupWalker::new(self.processor(profile), &self.policy).with_options(options);
        Ok(walker.transform(fragment)?)
    }

    /// Rewrite a paragraph held as formatted runs
    pub fn realign_runs(&self, runs: &[Run], profile: Profile) -> Vec<Run> {
        realign_runs_with(
            runs,
            self.processor(profile),
            self.config.document.preserve_leading_dash,
        )
    }

    /// Rewrite every paragraph of a WordprocessingML part
    pub fn rewrite_document_xml(&self, xml: &str, profile: Profile) -> Result<String> {
        let rewriter = DocumentRewriter::new(self.processor(profile))
            .with_options(self.config.document.clone());
        Ok(rewriter.rewrite(xml)?)
    }

    /// Timings from both processors, when timing is enabled
    pub fn timings(&self) -> RuleStats {
        let mut stats = self.primary.timings();
        stats.merge(&self.secondary.timings());
        stats
    }
}

/// Build one profile's processor, also returning the disabled names it lacks
fn build_processor(
    profile: Profile,
    config: &Config,
    rule_files: &[RuleFile],
) -> Result<(LanguageProcessor, Vec<String>)> {
    let mut extra = config
        .rules
        .custom
        .iter()
        .filter(|spec| spec.applies_to(profile))
        .map(Rule::from_spec)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for file in rule_files {
        extra.extend(file.rules_for(profile)?);
    }

    let engine = RuleEngine::for_profile(profile)?.with_rules(extra);
    let verse = if config.engine.verse {
        Some(RuleEngine::new(rules::verse::rules(profile)?))
    } else {
        None
    };

    let unknown = config
        .rules
        .disabled
        .iter()
        .filter(|name| {
            engine.find(name).is_none() && !verse.as_ref().is_some_and(|v| v.find(name).is_some())
        })
        .cloned()
        .collect();
    let engine = engine.without(&config.rules.disabled);
    debug!("{} table: {} rules", profile, engine.rules().len());

    let mut processor =
        LanguageProcessor::new(profile, engine, TextCache::new(config.cache.capacity))
            .with_timing(config.engine.timing);
    if let Some(verse) = verse {
        processor = processor.with_verse(verse.without(&config.rules.disabled));
    }
    Ok((processor, unknown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleSpec;

    #[test]
    fn test_empty_text_is_invalid() {
        let t = Typographer::new(Config::default()).unwrap();
        assert!(matches!(
            t.rewrite_text("", Profile::Primary),
            Err(TypographError::InvalidInput)
        ));
    }

    #[test]
    fn test_profiles_are_independent() {
        let t = Typographer::new(Config::default()).unwrap();
        assert_eq!(t.rewrite_text("\"a\"", Profile::Primary).unwrap(), "«a»");
        assert_eq!(
            t.rewrite_text("\"a\"", Profile::Secondary).unwrap(),
            "\u{201C}a\u{201D}"
        );
        assert_eq!(t.processor(Profile::Primary).cache().len(), 1);
        assert_eq!(t.processor(Profile::Secondary).cache().len(), 1);
    }

    #[test]
    fn test_disabled_and_custom_rules() {
        let mut config = Config::default();
        config.rules.disabled.push("ellipsis".to_string());
        config.rules.custom.push(RuleSpec {
            name: "arrows".to_string(),
            priority: 21.0,
            pattern: "->".to_string(),
            replacement: "→".to_string(),
            description: String::new(),
            profile: Some(Profile::Secondary),
        });

        let t = Typographer::new(config).unwrap();
        assert!(t.processor(Profile::Primary).engine().find("ellipsis").is_none());
        assert!(t.processor(Profile::Primary).engine().find("arrows").is_none());
        assert!(t.processor(Profile::Secondary).engine().find("arrows").is_some());
        assert_eq!(t.rewrite_text("a...", Profile::Secondary).unwrap(), "a...");
    }

    #[test]
    fn test_verse_mode_from_config() {
        let poem = "Люблю грозу в начале мая,\nКогда весенний первый гром,\nКак бы резвяся и играя,\nГрохочет в небе голубом.";

        let t = Typographer::new(Config::default()).unwrap();
        assert!(t.processor(Profile::Primary).verse().is_none());
        assert!(t.rewrite_text(poem, Profile::Primary).unwrap().contains('¶'));

        let mut config = Config::default();
        config.engine.verse = true;
        config.rules.disabled.push("verse_closing_quotes".to_string());
        let t = Typographer::new(config).unwrap();
        assert_eq!(t.rewrite_text(poem, Profile::Primary).unwrap(), poem);

        let verse = t.processor(Profile::Secondary).verse().unwrap();
        assert!(verse.find("verse_opening_quotes").is_some());
        assert!(verse.find("verse_closing_quotes").is_none());
    }

    #[test]
    fn test_bad_custom_pattern_fails() {
        let mut config = Config::default();
        config.rules.custom.push(RuleSpec {
            name: "broken".to_string(),
            priority: 1.0,
            pattern: "(".to_string(),
            replacement: String::new(),
            description: String::new(),
            profile: None,
        });
        assert!(matches!(
            Typographer::new(config),
            Err(TypographError::Rule(_))
        ));
    }

    #[test]
    fn test_markup_parse_failure() {
        let t = Typographer::new(Config::default()).unwrap();
        assert!(matches!(
            t.rewrite_markup("<p>Unclosed", Profile::Primary),
            Err(TypographError::Parse(_))
        ));
    }
}
