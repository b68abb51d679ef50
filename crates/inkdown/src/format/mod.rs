//! Mechanical tree walks over a closed document: an HTML producer and an
//! auto-formatter that re-emits canonical Markdown. Both are read-only; the
//! parser never depends on them.

pub use html::{to_html, HtmlFormatter};
pub use markdown::{to_markdown, MarkdownFormatter};

mod html;
mod markdown;
