//! Word-processor document support
//!
//! ```text
//! document.xml -> parse -> for each w:p: runs -> realign -> w:t texts
//!              -> leading-whitespace pass -> empty-paragraph pruning -> serialize
//! ```

pub mod realign;
pub mod run;
pub mod xml;

pub use realign::{
    realign_runs, realign_runs_with, strip_leading_whitespace, trim_leading_whitespace, OffsetMap,
};
pub use run::{concat, Run};
pub use xml::{is_empty_paragraph, paragraph_runs, prune_empty_paragraphs, DocumentRewriter};
