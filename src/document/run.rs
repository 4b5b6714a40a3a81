//! Formatted text runs

/// A contiguous span of paragraph text carrying one formatting state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    /// Serialized run properties (`<w:rPr>...</w:rPr>`), opaque to realignment
    pub formatting: String,
    /// Whether the carrying format must keep leading/trailing spaces
    pub preserve_whitespace: bool,
}

impl Run {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_formatting(mut self, formatting: &str) -> Self {
        self.formatting = formatting.to_string();
        self
    }

    pub fn preserved(mut self) -> Self {
        self.preserve_whitespace = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Visible paragraph text: every run's text in order
pub fn concat(runs: &[Run]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}
