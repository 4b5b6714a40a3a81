//! Tree walker that rewrites text nodes

use super::node::{Element, Node};
use super::parser::{parse, ParseError, ParseOptions};
use super::writer::serialize;
use crate::config::MarkupConfig;
use crate::glyphs::THIN_SPACE;
use crate::processor::LanguageProcessor;

/// Stands in for the inline content before a text node while it is rewritten
const INLINE_ANCHOR: char = '\u{FFFC}';

/// Which elements are left alone and which get a boundary marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupPolicy {
    /// Elements whose descendant text is never rewritten
    pub verbatim: Vec<String>,
    /// Inline emphasis elements followed by the boundary marker
    pub emphasis: Vec<String>,
    /// Invisible text inserted after each emphasis element
    pub boundary_marker: String,
}

impl Default for MarkupPolicy {
    fn default() -> Self {
        Self::from(&MarkupConfig::default())
    }
}

impl From<&MarkupConfig> for MarkupPolicy {
    fn from(config: &MarkupConfig) -> Self {
        Self {
            verbatim: config.verbatim.clone(),
            emphasis: config.emphasis.clone(),
            boundary_marker: config.boundary_marker.clone(),
        }
    }
}

impl MarkupPolicy {
    pub fn is_verbatim(&self, name: &str) -> bool {
        self.verbatim.iter().any(|v| v.eq_ignore_ascii_case(name))
    }

    pub fn is_emphasis(&self, name: &str) -> bool {
        self.emphasis.iter().any(|v| v.eq_ignore_ascii_case(name))
    }
}

/// Applies a language processor to the text of a markup tree
pub struct MarkupWalker<'a> {
    processor: &'a LanguageProcessor,
    policy: &'a MarkupPolicy,
    options: ParseOptions,
}

impl<'a> MarkupWalker<'a> {
    pub fn new(processor: &'a LanguageProcessor, policy: &'a MarkupPolicy) -> Self {
        Self {
            processor,
            policy,
            options: ParseOptions::html(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse, rewrite and re-serialize a fragment.
    ///
    /// Text inside verbatim elements, whitespace-only text and text the
    /// rules leave alone is written back byte for byte. Line breaks inside
    /// rewritten text become `¶` like any other text, so pretty-printed
    /// markup (`<p>\n  Text\n</p>`) gains markers.
    pub fn transform(&self, fragment: &str) -> Result<String, ParseError> {
        let nodes = parse(fragment, &self.options)?;
        let nodes = self.walk(nodes);
        Ok(serialize(&nodes, &self.options))
    }

    /// Rewrite the text nodes of a tree
    pub fn walk(&self, nodes: Vec<Node>) -> Vec<Node> {
        self.walk_nodes(nodes, false)
    }

    fn walk_nodes(&self, nodes: Vec<Node>, verbatim: bool) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.into_iter().enumerate() {
            match node {
                Node::Text(text) if verbatim || text.content.trim().is_empty() => {
                    out.push(Node::Text(text));
                }
                Node::Text(mut text) => {
                    let rewritten = self.rewrite_text(&text.content, index > 0);
                    text.replace(rewritten);
                    out.push(Node::Text(text));
                }
                Node::Element(element) => {
                    let emphasis = self.policy.is_emphasis(&element.name);
                    out.push(Node::Element(self.walk_element(element, verbatim)));
                    if emphasis && !verbatim && !self.policy.boundary_marker.is_empty() {
                        out.push(Node::text(&self.policy.boundary_marker));
                    }
                }
                raw @ Node::Raw(_) => out.push(raw),
            }
        }
        out
    }

    /// Rewrite one text node's content.
    ///
    /// Text that follows a sibling continues that sibling's line, so it is
    /// processed behind an anchor character that line-start rules cannot
    /// match and that clause-dash rules treat as the preceding word. The
    /// first text of an element keeps its leading spaces instead.
    fn rewrite_text(&self, text: &str, after_sibling: bool) -> String {
        if after_sibling {
            let mut anchored = String::with_capacity(text.len() + INLINE_ANCHOR.len_utf8());
            anchored.push(INLINE_ANCHOR);
            anchored.push_str(text);
            let processed = self.processor.process(&anchored);
            return match processed.strip_prefix(INLINE_ANCHOR) {
                Some(rest) => rest.to_string(),
                None => processed,
            };
        }

        let body = text.trim_start_matches(|c: char| c == ' ' || c == THIN_SPACE);
        let prefix = &text[..text.len() - body.len()];
        let mut out = String::with_capacity(text.len());
        out.push_str(prefix);
        out.push_str(&self.processor.process(body));
        out
    }

    fn walk_element(&self, mut element: Element, verbatim: bool) -> Element {
        let verbatim = verbatim || self.policy.is_verbatim(&element.name);
        let children = std::mem::take(&mut element.children);
        element.children = self.walk_nodes(children, verbatim);
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TextCache;
    use crate::engine::RuleEngine;
    use crate::profile::Profile;

    fn processor() -> LanguageProcessor {
        LanguageProcessor::new(
            Profile::Primary,
            RuleEngine::for_profile(Profile::Primary).unwrap(),
            TextCache::new(16),
        )
    }

    #[test]
    fn test_verbatim_untouched() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker
            .transform("<pre>\"test\" -- code</pre><p>\"Quoted\"</p>")
            .unwrap();
        assert_eq!(out, "<pre>\"test\" -- code</pre><p>«Quoted»</p>");
    }

    #[test]
    fn test_nested_verbatim() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker.transform("<pre><span>a...</span></pre>").unwrap();
        assert_eq!(out, "<pre><span>a...</span></pre>");
    }

    #[test]
    fn test_boundary_marker_after_emphasis() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker.transform("<p><strong>Да</strong> нет</p>").unwrap();
        assert_eq!(out, "<p><strong>Да</strong>\u{200B} нет</p>");
    }

    #[test]
    fn test_policy_is_data() {
        let p = processor();
        let policy = MarkupPolicy {
            verbatim: vec!["kbd".to_string()],
            emphasis: vec![],
            boundary_marker: String::new(),
        };
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker
            .transform("<kbd>a...</kbd><code>b...</code><b>c</b>")
            .unwrap();
        assert_eq!(out, "<kbd>a...</kbd><code>b…</code><b>c</b>");
    }

    #[test]
    fn test_verbatim_keeps_entities() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let input = "<pre>if a &amp;&amp; b &quot;x&quot; &nbsp;&#39;y&#39;</pre>";
        assert_eq!(walker.transform(input).unwrap(), input);

        let input = "<p>a &amp; b&nbsp;c</p>";
        assert_eq!(walker.transform(input).unwrap(), input);
    }

    #[test]
    fn test_dash_after_inline_element() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker.transform("<p><em>Да</em> - ответил он</p>").unwrap();
        assert_eq!(out, "<p><em>Да</em>\u{200B}\u{a0}\u{2014} ответил он</p>");

        let out = walker.transform("<p><b>X</b> - Y</p>").unwrap();
        assert_eq!(out, "<p><b>X</b>\u{200B}\u{a0}\u{2014} Y</p>");
    }

    #[test]
    fn test_dialogue_dash_opening_element() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker.transform("<p>- Привет</p>").unwrap();
        assert_eq!(out, "<p>\u{2014} Привет</p>");
    }

    #[test]
    fn test_line_breaks_in_text_become_markers() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker.transform("<p>\n  Text\n</p>").unwrap();
        assert_eq!(out, "<p>¶Text¶</p>");
    }

    #[test]
    fn test_parse_failure() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        assert!(matches!(
            walker.transform("<p>Unclosed"),
            Err(ParseError::Unclosed { .. })
        ));
    }

    #[test]
    fn test_whitespace_between_blocks_kept() {
        let p = processor();
        let policy = MarkupPolicy::default();
        let walker = MarkupWalker::new(&p, &policy);
        let out = walker.transform("<p>a</p>\n  <p>b</p>").unwrap();
        assert_eq!(out, "<p>a</p>\n  <p>b</p>");
    }
}
