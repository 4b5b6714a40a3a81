//! Markup serializer

use super::node::{Element, Node, Text};
use super::parser::{ParseOptions, Syntax};

/// Markup writer that renders a node list back to a string
pub struct MarkupWriter<'a> {
    output: String,
    options: &'a ParseOptions,
}

impl<'a> MarkupWriter<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            output: String::new(),
            options,
        }
    }

    /// Get the rendered output
    pub fn finish(self) -> String {
        self.output
    }

    pub fn write_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.write_node(node);
        }
    }

    pub fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element(e) => self.write_element(e),
            Node::Text(Text {
                source: Some(source),
                ..
            }) => self.output.push_str(source),
            Node::Text(text) => self
                .output
                .push_str(&html_escape::encode_text(text.as_str())),
            Node::Raw(raw) => self.output.push_str(raw),
        }
    }

    fn write_element(&mut self, element: &Element) {
        self.output.push('<');
        self.output.push_str(&element.name);
        for (key, value) in &element.attributes {
            self.output.push(' ');
            self.output.push_str(key);
            self.output.push_str("=\"");
            self.output
                .push_str(&html_escape::encode_double_quoted_attribute(value));
            self.output.push('"');
        }

        if element.children.is_empty() {
            match self.options.syntax {
                Syntax::Xml => {
                    self.output.push_str("/>");
                    return;
                }
                Syntax::Html if self.options.is_void(&element.name) => {
                    self.output.push('>');
                    return;
                }
                Syntax::Html => {}
            }
        }

        self.output.push('>');
        self.write_nodes(&element.children);
        self.output.push_str("</");
        self.output.push_str(&element.name);
        self.output.push('>');
    }
}

/// Render nodes to a string
pub fn serialize(nodes: &[Node], options: &ParseOptions) -> String {
    let mut writer = MarkupWriter::new(options);
    writer.write_nodes(nodes);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parser::parse;

    fn roundtrip(input: &str, options: &ParseOptions) -> String {
        serialize(&parse(input, options).unwrap(), options)
    }

    #[test]
    fn test_html_output() {
        let options = ParseOptions::html();
        assert_eq!(
            roundtrip("<p class=\"a\" id=\"b\">x<br>y</p>", &options),
            "<p class=\"a\" id=\"b\">x<br>y</p>"
        );
        assert_eq!(roundtrip("<div></div>", &options), "<div></div>");
    }

    #[test]
    fn test_xml_self_closing() {
        let options = ParseOptions::xml();
        assert_eq!(
            roundtrip("<w:r><w:rPr><w:b/></w:rPr><w:t>x</w:t></w:r>", &options),
            "<w:r><w:rPr><w:b/></w:rPr><w:t>x</w:t></w:r>"
        );
    }

    #[test]
    fn test_escaping() {
        let options = ParseOptions::html();
        assert_eq!(
            roundtrip("<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp; 3</p>", &options),
            "<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp; 3</p>"
        );
    }

    #[test]
    fn test_entities_kept_as_written() {
        let options = ParseOptions::html();
        let input = "<pre>&quot;x&quot; &nbsp;&#39;y&#39; &#x41;</pre>";
        assert_eq!(roundtrip(input, &options), input);
    }

    #[test]
    fn test_built_text_is_escaped() {
        let options = ParseOptions::html();
        let nodes = vec![Element::new("p").with_child(Node::text("1 < 2 & \"3\"")).into()];
        assert_eq!(serialize(&nodes, &options), "<p>1 &lt; 2 &amp; \"3\"</p>");
    }

    #[test]
    fn test_raw_passthrough() {
        let options = ParseOptions::xml();
        let input = "<?xml version=\"1.0\"?><!-- c --><a><![CDATA[<raw>]]></a>";
        assert_eq!(roundtrip(input, &options), input);
    }
}
