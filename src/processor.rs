//! Language processor: one profile's rule engine behind a cache

use crate::cache::TextCache;
use crate::engine::{RuleEngine, RuleStats};
use crate::profile::Profile;
use crate::verse::is_verse;
use log::debug;
use std::sync::{Mutex, PoisonError};

/// Rewrites strings for a single profile, memoizing identical inputs
#[derive(Debug)]
pub struct LanguageProcessor {
    profile: Profile,
    engine: RuleEngine,
    /// Reduced table for text detected as verse
    verse: Option<RuleEngine>,
    cache: TextCache,
    /// Per-rule timings, collected only when enabled
    timings: Option<Mutex<RuleStats>>,
}

impl LanguageProcessor {
    pub fn new(profile: Profile, engine: RuleEngine, cache: TextCache) -> Self {
        Self {
            profile,
            engine,
            verse: None,
            cache,
            timings: None,
        }
    }

    /// Collect per-rule timings on every cache miss
    pub fn with_timing(mut self, enabled: bool) -> Self {
        self.timings = enabled.then(|| Mutex::new(RuleStats::default()));
        self
    }

    /// Rewrite text that reads as verse with `engine` instead
    pub fn with_verse(mut self, engine: RuleEngine) -> Self {
        self.verse = Some(engine);
        self
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn verse(&self) -> Option<&RuleEngine> {
        self.verse.as_ref()
    }

    pub fn cache(&self) -> &TextCache {
        &self.cache
    }

    /// Rewrite `text`, consulting the cache first
    pub fn process(&self, text: &str) -> String {
        if let Some(hit) = self.cache.get(text) {
            return hit;
        }

        debug!(
            "{} cache miss ({} chars)",
            self.profile,
            text.chars().count()
        );
        let engine = match &self.verse {
            Some(verse) if is_verse(text) => {
                debug!("{} verse detected", self.profile);
                verse
            }
            _ => &self.engine,
        };
        let output = match &self.timings {
            Some(stats) => {
                let mut stats = stats.lock().unwrap_or_else(PoisonError::into_inner);
                engine.apply_timed(text, &mut stats)
            }
            None => engine.apply(text),
        };
        self.cache.put(text.to_string(), output.clone());
        output
    }

    /// Timings collected so far (empty unless timing is enabled)
    pub fn timings(&self) -> RuleStats {
        self.timings
            .as_ref()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .unwrap_or_default()
    }
}
