//! Crate-level error type

use crate::config::ConfigError;
use crate::markup::ParseError;
use crate::rule::RuleLoadError;
use thiserror::Error;

/// Errors surfaced by the public entry points
#[derive(Debug, Error)]
pub enum TypographError {
    /// Empty text handed to the text entry point
    #[error("Input must be a non-empty string")]
    InvalidInput,

    /// Markup or document XML could not be parsed
    #[error("Parse failure: {0}")]
    Parse(#[from] ParseError),

    /// A custom rule could not be loaded
    #[error(transparent)]
    Rule(#[from] RuleLoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TypographError>;
