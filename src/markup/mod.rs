//! Structure-preserving markup processing
//!
//! ```text
//! fragment -> parse -> Vec<Node> -> MarkupWalker -> serialize -> fragment
//! ```
//!
//! Only text nodes are rewritten. Elements, attributes and raw constructs
//! (comments, processing instructions, CDATA) pass through in order, and
//! text that is not rewritten is written back exactly as it was read.

pub mod node;
pub mod parser;
pub mod walker;
pub mod writer;

pub use node::{Element, Node, Text};
pub use parser::{parse, ParseError, ParseOptions, Syntax};
pub use walker::{MarkupPolicy, MarkupWalker};
pub use writer::serialize;
