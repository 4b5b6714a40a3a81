//! WordprocessingML rewriting
//!
//! Works on an extracted `word/document.xml` (or footnotes/endnotes) part.
//! Every `w:p` is realigned on its own: text is gathered from its `w:t`
//! elements in document order, and paragraphs nested inside text boxes are
//! visited separately rather than merged into the enclosing paragraph.

use super::realign::{realign_runs_with, strip_leading_whitespace};
use super::run::Run;
use crate::config::DocumentConfig;
use crate::markup::{parse, serialize, Element, Node, ParseError, ParseOptions, Text};
use crate::processor::LanguageProcessor;
use log::debug;

const PARAGRAPH: &str = "w:p";
const RUN: &str = "w:r";
const RUN_PROPERTIES: &str = "w:rPr";
const TEXT: &str = "w:t";
const XML_SPACE: &str = "xml:space";

/// Elements that make a paragraph worth keeping even without text
pub const CONTENT_ELEMENTS: &[&str] = &[
    "w:sectPr",
    "w:drawing",
    "w:pict",
    "w:object",
    "w:br",
    "w:tab",
    "w:fldChar",
    "w:instrText",
    "w:fldSimple",
    "w:bookmarkStart",
    "w:footnoteReference",
    "w:endnoteReference",
    "w:footnoteRef",
    "w:endnoteRef",
    "w:separator",
    "w:continuationSeparator",
    "w:sym",
    "w:txbxContent",
    "m:oMath",
    "m:oMathPara",
];

/// Rewrites the paragraphs of a document part in place
pub struct DocumentRewriter<'a> {
    processor: &'a LanguageProcessor,
    options: DocumentConfig,
}

impl<'a> DocumentRewriter<'a> {
    pub fn new(processor: &'a LanguageProcessor) -> Self {
        Self {
            processor,
            options: DocumentConfig::default(),
        }
    }

    pub fn with_options(mut self, options: DocumentConfig) -> Self {
        self.options = options;
        self
    }

    /// Rewrite every paragraph and re-serialize the part
    pub fn rewrite(&self, xml: &str) -> Result<String, ParseError> {
        let options = ParseOptions::xml();
        let mut nodes = parse(xml, &options)?;

        let rewritten = self.rewrite_nodes(&mut nodes);
        let cleaned = self.cleanup_nodes(&mut nodes);
        debug!("rewrote {rewritten} paragraphs, trimmed {cleaned}");

        if self.options.remove_empty_paragraphs {
            let removed = prune_empty_paragraphs(&mut nodes);
            if removed > 0 {
                debug!("removed {removed} repeated empty paragraphs");
            }
        }

        Ok(serialize(&nodes, &options))
    }

    fn rewrite_nodes(&self, nodes: &mut [Node]) -> usize {
        let mut count = 0;
        for element in nodes.iter_mut().filter_map(Node::as_element_mut) {
            count += self.rewrite_nodes(&mut element.children);
            if element.name == PARAGRAPH && self.rewrite_paragraph(element) {
                count += 1;
            }
        }
        count
    }

    fn rewrite_paragraph(&self, paragraph: &mut Element) -> bool {
        let runs = paragraph_runs(paragraph);
        if runs.is_empty() {
            return false;
        }

        let realigned =
            realign_runs_with(&runs, self.processor, self.options.preserve_leading_dash);
        if realigned.iter().map(|r| &r.text).eq(runs.iter().map(|r| &r.text)) {
            return false;
        }

        store_runs(paragraph, realigned);
        true
    }

    /// Strip leading whitespace left at the start of any paragraph
    fn cleanup_nodes(&self, nodes: &mut [Node]) -> usize {
        let mut count = 0;
        for element in nodes.iter_mut().filter_map(Node::as_element_mut) {
            count += self.cleanup_nodes(&mut element.children);
            if element.name != PARAGRAPH {
                continue;
            }
            let mut runs = paragraph_runs(element);
            if strip_leading_whitespace(&mut runs, self.options.preserve_leading_dash) {
                store_runs(element, runs);
                count += 1;
            }
        }
        count
    }
}

/// The paragraph's runs in document order, not descending into nested paragraphs
pub fn paragraph_runs(paragraph: &Element) -> Vec<Run> {
    let mut runs = Vec::new();
    collect_runs(&paragraph.children, "", &mut runs);
    runs
}

fn collect_runs(nodes: &[Node], formatting: &str, out: &mut Vec<Run>) {
    for element in nodes.iter().filter_map(Node::as_element) {
        match element.name.as_str() {
            PARAGRAPH => {}
            RUN => collect_runs(&element.children, &run_properties(element), out),
            TEXT => out.push(Run {
                text: element.text(),
                formatting: formatting.to_string(),
                preserve_whitespace: element.get(XML_SPACE) == Some("preserve"),
            }),
            _ => collect_runs(&element.children, formatting, out),
        }
    }
}

fn run_properties(run: &Element) -> String {
    run.children
        .iter()
        .filter(|node| matches!(node, Node::Element(e) if e.name == RUN_PROPERTIES))
        .map(|node| serialize(std::slice::from_ref(node), &ParseOptions::xml()))
        .collect()
}

/// Write runs back into the paragraph's `w:t` elements, in the order
/// [`paragraph_runs`] read them
fn store_runs(paragraph: &mut Element, runs: Vec<Run>) {
    let mut runs = runs.into_iter();
    assign_runs(&mut paragraph.children, &mut runs);
}

fn assign_runs(nodes: &mut [Node], runs: &mut impl Iterator<Item = Run>) {
    for element in nodes.iter_mut().filter_map(Node::as_element_mut) {
        match element.name.as_str() {
            PARAGRAPH => {}
            TEXT => {
                let Some(run) = runs.next() else {
                    return;
                };
                if run.preserve_whitespace {
                    element
                        .attributes
                        .insert(XML_SPACE.to_string(), "preserve".to_string());
                }
                if element.text() == run.text {
                    continue;
                }
                element.children = if run.text.is_empty() {
                    Vec::new()
                } else {
                    vec![Node::Text(Text::new(run.text))]
                };
            }
            _ => assign_runs(&mut element.children, runs),
        }
    }
}

/// A paragraph with no visible text and nothing else worth keeping
pub fn is_empty_paragraph(paragraph: &Element) -> bool {
    paragraph_runs(paragraph)
        .iter()
        .all(|run| run.text.trim().is_empty())
        && !paragraph.contains_any(CONTENT_ELEMENTS)
}

/// Drop the second and later empty paragraphs in each run of consecutive
/// sibling paragraphs. Returns how many were removed.
pub fn prune_empty_paragraphs(nodes: &mut Vec<Node>) -> usize {
    let mut removed = 0;
    for element in nodes.iter_mut().filter_map(Node::as_element_mut) {
        removed += prune_empty_paragraphs(&mut element.children);
    }

    let before = nodes.len();
    let mut consecutive = 0;
    nodes.retain(|node| match node {
        Node::Element(e) if e.name == PARAGRAPH => {
            if is_empty_paragraph(e) {
                consecutive += 1;
                consecutive <= 1
            } else {
                consecutive = 0;
                true
            }
        }
        Node::Element(_) => {
            consecutive = 0;
            true
        }
        Node::Text(_) | Node::Raw(_) => true,
    });
    removed + before - nodes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TextCache;
    use crate::engine::RuleEngine;
    use crate::glyphs::{EM_DASH, NBSP};
    use crate::profile::Profile;

    fn processor() -> LanguageProcessor {
        LanguageProcessor::new(
            Profile::Primary,
            RuleEngine::for_profile(Profile::Primary).unwrap(),
            TextCache::new(64),
        )
    }

    fn body(inner: &str) -> String {
        format!("<w:document><w:body>{inner}</w:body></w:document>")
    }

    #[test]
    fn test_paragraph_runs_read_formatting() {
        let nodes = parse(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>a</w:t></w:r><w:r><w:t xml:space=\"preserve\"> b</w:t></w:r></w:p>",
            &ParseOptions::xml(),
        )
        .unwrap();
        let runs = paragraph_runs(nodes[0].as_element().unwrap());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].formatting, "<w:rPr><w:b/></w:rPr>");
        assert!(!runs[0].preserve_whitespace);
        assert_eq!(runs[1].text, " b");
        assert!(runs[1].preserve_whitespace);
    }

    #[test]
    fn test_rewrite_across_runs() {
        let p = processor();
        let xml = body(
            "<w:p><w:r><w:t>Москва </w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>- столица</w:t></w:r></w:p>",
        );
        let out = DocumentRewriter::new(&p).rewrite(&xml).unwrap();
        assert_eq!(
            out,
            body(&format!(
                "<w:p><w:r><w:t>Москва{NBSP}</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t xml:space=\"preserve\">{EM_DASH} столица</w:t></w:r></w:p>"
            ))
        );
    }

    #[test]
    fn test_unchanged_paragraph_is_left_alone() {
        let p = processor();
        let xml = body("<w:p><w:r><w:t>Привет мир</w:t></w:r></w:p>");
        assert_eq!(DocumentRewriter::new(&p).rewrite(&xml).unwrap(), xml);
    }

    #[test]
    fn test_nested_paragraphs_processed_separately() {
        let p = processor();
        let xml = body(
            "<w:p><w:r><w:t>a...</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>b...</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>",
        );
        let out = DocumentRewriter::new(&p).rewrite(&xml).unwrap();
        assert_eq!(
            out,
            body("<w:p><w:r><w:t>a…</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>b…</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>")
        );
    }

    #[test]
    fn test_repeated_empty_paragraphs_removed() {
        let p = processor();
        let xml = body(
            "<w:p><w:r><w:t>a</w:t></w:r></w:p><w:p/><w:p><w:r><w:t> </w:t></w:r></w:p><w:p/><w:p><w:r><w:t>b</w:t></w:r></w:p><w:p/>",
        );
        let out = DocumentRewriter::new(&p).rewrite(&xml).unwrap();
        assert_eq!(
            out,
            body("<w:p><w:r><w:t>a</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>b</w:t></w:r></w:p><w:p/>")
        );
    }

    #[test]
    fn test_empty_paragraph_with_content_kept() {
        let p = processor();
        let xml = body("<w:p/><w:p><w:r><w:br/></w:r></w:p><w:p><w:pPr><w:sectPr/></w:pPr></w:p>");
        let out = DocumentRewriter::new(&p).rewrite(&xml).unwrap();
        assert_eq!(out, xml);
    }

    #[test]
    fn test_pruning_can_be_disabled() {
        let p = processor();
        let xml = body("<w:p/><w:p/><w:p/>");
        let options = DocumentConfig {
            remove_empty_paragraphs: false,
            ..Default::default()
        };
        let out = DocumentRewriter::new(&p)
            .with_options(options)
            .rewrite(&xml)
            .unwrap();
        assert_eq!(out, xml);
    }

    #[test]
    fn test_declaration_and_namespaces_kept() {
        let p = processor();
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body><w:p><w:r><w:t>(c) 2024</w:t></w:r></w:p></w:body></w:document>";
        let out = DocumentRewriter::new(&p).rewrite(xml).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w="));
        assert!(out.contains("<w:t xml:space=\"preserve\">© 2024</w:t>"));
    }

    #[test]
    fn test_malformed_xml_fails() {
        let p = processor();
        let err = DocumentRewriter::new(&p)
            .rewrite("<w:document><w:body><w:p></w:body></w:document>")
            .unwrap_err();
        assert!(matches!(err, ParseError::Mismatched { .. }));
    }
}
