//! Configuration system for the typographer
//!
//! Reads configuration from:
//! - `.typographrc.yaml` / `.typographrc.json` (project-level)
//! - `~/.typographrc.yaml` (user-level)
//! - rule files listed under `rules.files`

use crate::markup::parser::DEFAULT_VOID_ELEMENTS;
use crate::profile::Profile;
use crate::rule::RuleSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Collect per-rule timings
    pub timing: bool,
    /// Detect verse and rewrite it with the reduced verse table
    pub verse: bool,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries kept per profile (0 disables caching)
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Markup walker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Elements whose text is never rewritten
    pub verbatim: Vec<String>,

    /// Inline emphasis elements followed by the boundary marker
    pub emphasis: Vec<String>,

    /// Text inserted after each emphasis element
    pub boundary_marker: String,

    /// HTML elements parsed without a closing tag
    pub void_elements: Vec<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            verbatim: vec!["pre".to_string(), "code".to_string()],
            emphasis: vec![
                "strong".to_string(),
                "b".to_string(),
                "em".to_string(),
                "i".to_string(),
            ],
            boundary_marker: "\u{200B}".to_string(),
            void_elements: DEFAULT_VOID_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Word-processor document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Drop the second and later consecutive empty paragraphs
    pub remove_empty_paragraphs: bool,

    /// Keep whitespace before a dash opening a paragraph
    pub preserve_leading_dash: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            remove_empty_paragraphs: true,
            preserve_leading_dash: true,
        }
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Extra template rules
    pub custom: Vec<RuleSpec>,

    /// Rule files (YAML or JSON)
    pub files: Vec<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files
    pub extends: Vec<String>,

    /// Profile used when none is given
    pub profile: Profile,

    /// Engine settings
    pub engine: EngineConfig,

    /// Cache settings
    pub cache: CacheConfig,

    /// Markup settings
    pub markup: MarkupConfig,

    /// Document settings
    pub document: DocumentConfig,

    /// Rule configuration
    pub rules: RulesConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        let base_dir = path.parent().unwrap_or(Path::new("."));

        // Rule files are relative to the config that names them
        for file in &mut config.rules.files {
            if file.is_relative() {
                *file = base_dir.join(&*file);
            }
        }

        if !config.extends.is_empty() {
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extend_path = if Path::new(extend).is_absolute() {
                    PathBuf::from(extend)
                } else {
                    base_dir.join(extend)
                };
                base_config.merge(Self::load_with_depth(&extend_path, depth + 1)?);
            }

            // Merge current config on top of base
            base_config.merge(config);
            config = base_config;
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Self) {
        let defaults = Self::default();

        if other.profile != defaults.profile {
            self.profile = other.profile;
        }

        if other.engine.timing {
            self.engine.timing = true;
        }
        if other.engine.verse {
            self.engine.verse = true;
        }

        if other.cache.capacity != defaults.cache.capacity {
            self.cache.capacity = other.cache.capacity;
        }

        // Markup sets replace rather than extend, so a config can shrink them
        if other.markup.verbatim != defaults.markup.verbatim {
            self.markup.verbatim = other.markup.verbatim;
        }
        if other.markup.emphasis != defaults.markup.emphasis {
            self.markup.emphasis = other.markup.emphasis;
        }
        if other.markup.boundary_marker != defaults.markup.boundary_marker {
            self.markup.boundary_marker = other.markup.boundary_marker;
        }
        if other.markup.void_elements != defaults.markup.void_elements {
            self.markup.void_elements = other.markup.void_elements;
        }

        if other.document != defaults.document {
            self.document = other.document;
        }

        // Rules - extend lists
        self.rules.disabled.extend(other.rules.disabled);
        self.rules.custom.extend(other.rules.custom);
        self.rules.files.extend(other.rules.files);
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".typographrc.yaml",
            ".typographrc.yml",
            ".typographrc.json",
            "typograph.yaml",
            "typograph.yml",
            "typograph.json",
        ];

        // Check current directory
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        // Return default config
        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        profile: Option<Profile>,
        timing: Option<bool>,
        verse: Option<bool>,
        cache_capacity: Option<usize>,
        disabled_rules: Option<Vec<String>>,
    ) {
        if let Some(p) = profile {
            self.profile = p;
        }
        if let Some(t) = timing {
            self.engine.timing = t;
        }
        if let Some(v) = verse {
            self.engine.verse = v;
        }
        if let Some(c) = cache_capacity {
            self.cache.capacity = c;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        !self.rules.disabled.iter().any(|d| d == name)
    }
}
