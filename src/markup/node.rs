//! Markup tree nodes

use indexmap::IndexMap;

/// A node in a parsed markup fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    /// Comment, CDATA, processing instruction or doctype, kept as written
    Raw(String),
}

/// Character data, decoded, with the source form it was parsed from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub content: String,
    /// Entity-encoded slice of the input, absent for text built in memory
    pub source: Option<String>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
        }
    }

    pub fn parsed(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: Some(source.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Replace the content, dropping the source form when it no longer matches
    pub fn replace(&mut self, content: String) {
        if content != self.content {
            self.content = content;
            self.source = None;
        }
    }
}

/// An element and the subtree it owns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    /// Attributes in source order
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Child elements, skipping text and raw nodes
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Whether any descendant element has one of `names`
    pub fn contains_any(&self, names: &[&str]) -> bool {
        self.elements()
            .any(|e| names.contains(&e.name.as_str()) || e.contains_any(names))
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text.as_str()),
            Node::Element(e) => collect_text(&e.children, out),
            Node::Raw(_) => {}
        }
    }
}

impl Node {
    pub fn text(content: &str) -> Self {
        Node::Text(Text::new(content))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(t) if t.content.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_text() {
        let p = Element::new("p")
            .with_child(Node::text("a "))
            .with_child(Element::new("b").with_child(Node::text("bold")).into())
            .with_child(Node::Raw("<!-- c -->".to_string()));
        assert_eq!(p.text(), "a bold");
    }

    #[test]
    fn test_contains_any() {
        let p = Element::new("w:p").with_child(
            Element::new("w:r")
                .with_child(Element::new("w:drawing").into())
                .into(),
        );
        assert!(p.contains_any(&["w:drawing"]));
        assert!(!p.contains_any(&["w:pict"]));
    }

    #[test]
    fn test_replace_drops_source_only_on_change() {
        let mut text = Text::parsed("a & b", "a &amp; b");
        text.replace("a & b".to_string());
        assert_eq!(text.source.as_deref(), Some("a &amp; b"));

        text.replace("a & c".to_string());
        assert_eq!(text, Text::new("a & c"));
    }

    #[test]
    fn test_attributes_keep_order() {
        let e = Element::new("a")
            .with_attribute("z", "1")
            .with_attribute("a", "2");
        let keys: Vec<&str> = e.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(e.get("a"), Some("2"));
    }
}
