//! Markup parser built on quick-xml
//!
//! Element nesting is checked here rather than by the reader so that HTML
//! void elements (`<br>`, `<img>`) can stay unclosed while every other
//! element must be closed in order.

use super::node::{Element, Node, Text};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use thiserror::Error;

/// HTML elements that never have content or a closing tag
pub const DEFAULT_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Markup parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("XML parse error at line {line}: {message}")]
    Xml { line: usize, message: String },

    #[error("Unclosed element <{name}> opened at line {line}")]
    Unclosed { name: String, line: usize },

    #[error("Mismatched closing tag at line {line}: expected </{expected}>, found </{found}>")]
    Mismatched {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("Closing tag </{name}> at line {line} has no opening tag")]
    Unmatched { name: String, line: usize },
}

/// Markup dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// HTML fragments: entity decoding, void elements, loose attributes
    Html,
    /// Well-formed XML, such as word-processor document parts
    Xml,
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub syntax: Syntax,
    pub void_elements: Vec<String>,
}

impl ParseOptions {
    pub fn html() -> Self {
        Self {
            syntax: Syntax::Html,
            void_elements: DEFAULT_VOID_ELEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn xml() -> Self {
        Self {
            syntax: Syntax::Xml,
            void_elements: Vec::new(),
        }
    }

    pub fn with_void_elements(mut self, void_elements: Vec<String>) -> Self {
        self.void_elements = void_elements;
        self
    }

    pub fn is_void(&self, name: &str) -> bool {
        self.syntax == Syntax::Html
            && self
                .void_elements
                .iter()
                .any(|v| v.eq_ignore_ascii_case(name))
    }

    fn same_name(&self, a: &str, b: &str) -> bool {
        match self.syntax {
            Syntax::Html => a.eq_ignore_ascii_case(b),
            Syntax::Xml => a == b,
        }
    }
}

/// Parse a fragment into a list of top-level nodes
pub fn parse(input: &str, options: &ParseOptions) -> Result<Vec<Node>, ParseError> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(input.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let line_of = |pos: usize| line_starts.partition_point(|&start| start <= pos);

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<(Element, usize)> = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event();
        let line = line_of(start);

        match event {
            Ok(Event::Start(e)) => {
                let element = read_element(&e, options, line)?;
                if options.is_void(&element.name) {
                    attach(&mut stack, &mut roots, element.into());
                } else {
                    stack.push((element, line));
                }
            }

            Ok(Event::Empty(e)) => {
                let element = read_element(&e, options, line)?;
                attach(&mut stack, &mut roots, element.into());
            }

            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match stack.last() {
                    Some((open, _)) if options.same_name(&open.name, &name) => {
                        if let Some((element, _)) = stack.pop() {
                            attach(&mut stack, &mut roots, element.into());
                        }
                    }
                    // Stray `</br>` and friends
                    _ if options.is_void(&name) => {}
                    Some((open, _)) => {
                        return Err(ParseError::Mismatched {
                            expected: open.name.clone(),
                            found: name,
                            line,
                        })
                    }
                    None => return Err(ParseError::Unmatched { name, line }),
                }
            }

            Ok(Event::Text(e)) => {
                let source = String::from_utf8_lossy(&e);
                let content: Cow<'_, str> = match options.syntax {
                    Syntax::Html => html_escape::decode_html_entities(&source),
                    Syntax::Xml => e.unescape().map_err(|err| ParseError::Xml {
                        line,
                        message: err.to_string(),
                    })?,
                };
                let text = Text::parsed(content.into_owned(), source.into_owned());
                attach(&mut stack, &mut roots, Node::Text(text));
            }

            Ok(Event::Eof) => break,

            Ok(_) => {
                // Comments, CDATA, declarations and doctypes are kept verbatim
                let end = reader.buffer_position() as usize;
                let raw = input
                    .get(start..end)
                    .filter(|s| s.starts_with('<') && s.ends_with('>'))
                    .ok_or_else(|| ParseError::Xml {
                        line,
                        message: "unreadable markup construct".to_string(),
                    })?;
                attach(&mut stack, &mut roots, Node::Raw(raw.to_string()));
            }

            Err(e) => {
                return Err(ParseError::Xml {
                    line,
                    message: e.to_string(),
                })
            }
        }
    }

    if let Some((element, line)) = stack.pop() {
        return Err(ParseError::Unclosed {
            name: element.name,
            line,
        });
    }

    Ok(roots)
}

fn attach(stack: &mut [(Element, usize)], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some((parent, _)) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn read_element(
    e: &BytesStart<'_>,
    options: &ParseOptions,
    line: usize,
) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let mut element = Element::new(&name);

    let attributes = match options.syntax {
        Syntax::Html => e.html_attributes(),
        Syntax::Xml => e.attributes(),
    };

    for attr in attributes {
        let attr = attr.map_err(|err| ParseError::Xml {
            line,
            message: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = match options.syntax {
            Syntax::Html => {
                html_escape::decode_html_entities(&String::from_utf8_lossy(&attr.value))
                    .into_owned()
            }
            Syntax::Xml => attr
                .unescape_value()
                .map_err(|err| ParseError::Xml {
                    line,
                    message: err.to_string(),
                })?
                .into_owned(),
        };
        element.attributes.insert(key, value);
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(input: &str) -> Result<Vec<Node>, ParseError> {
        parse(input, &ParseOptions::html())
    }

    #[test]
    fn test_parse_nested() {
        let nodes = html("<p class=\"lead\">Hello <b>world</b></p>").unwrap();
        assert_eq!(nodes.len(), 1);
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.name, "p");
        assert_eq!(p.get("class"), Some("lead"));
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.text(), "Hello world");
    }

    #[test]
    fn test_whitespace_kept() {
        let nodes = html("<p>  a  </p>").unwrap();
        assert_eq!(nodes[0].as_element().unwrap().text(), "  a  ");
    }

    #[test]
    fn test_unclosed() {
        let err = html("<p>Unclosed").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unclosed {
                name: "p".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_mismatched() {
        let err = html("<p><b>x</p></b>").unwrap_err();
        assert!(matches!(err, ParseError::Mismatched { ref expected, .. } if expected == "b"));
    }

    #[test]
    fn test_unmatched() {
        let err = html("text</p>").unwrap_err();
        assert!(matches!(err, ParseError::Unmatched { ref name, .. } if name == "p"));
    }

    #[test]
    fn test_void_elements() {
        let nodes = html("<p>a<br>b<img src=\"x.png\"></p>").unwrap();
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.children.len(), 4);
        assert_eq!(p.text(), "ab");
    }

    #[test]
    fn test_html_entities_decoded() {
        let nodes = html("<p>a&nbsp;b &amp; c</p>").unwrap();
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.text(), "a\u{a0}b & c");
        assert_eq!(
            p.children[0],
            Node::Text(Text::parsed("a\u{a0}b & c", "a&nbsp;b &amp; c"))
        );
    }

    #[test]
    fn test_raw_constructs() {
        let nodes = html("<!-- note --><p>x</p>").unwrap();
        assert_eq!(nodes[0], Node::Raw("<!-- note -->".to_string()));
    }

    #[test]
    fn test_xml_mode_void_names_need_closing() {
        let err = parse("<w:p><br></w:p>", &ParseOptions::xml()).unwrap_err();
        assert!(matches!(err, ParseError::Mismatched { .. }));
    }

    #[test]
    fn test_line_numbers() {
        let err = html("<div>\n<p>\n</div>").unwrap_err();
        assert!(matches!(err, ParseError::Mismatched { line: 3, .. }));
    }
}
