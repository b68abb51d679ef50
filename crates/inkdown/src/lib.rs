//! A CommonMark-flavored Markdown engine built around a three-stage
//! pipeline: a greedy lexer, a line-oriented block parser that grows a tree
//! of nested container and leaf blocks, and an inline parser that
//! re-tokenizes each leaf into styled runs when it closes.
//!
//! The produced [`Document`] is renderer-agnostic: the bundled HTML producer
//! and Markdown auto-formatter are plain pre-order walks, and external
//! backends (terminal renderers, highlighters) consume the same tree
//! read-only. Parsing never fails; syntax that fits no other rule degrades
//! to paragraph text.

pub use ast::{
    Alignment, Block, BlockIter, CodeData, Color, Container, ContainerKind, Document, HeadingData,
    Inline, Leaf, LeafKind, ListData, ListItemData, ListKind, StyleFlags, TableData, Text,
    TextStyle,
};
pub use parser::{MarkdownParser, ParserOptions};
pub use source::{SourceLocation, SourceText, TextSize, TextSpan};
pub use syntax::TokenKind;
pub use token::Token;

mod ast;
mod byte_lookup;
pub mod format;
mod lexer;
mod parser;
mod source;
mod syntax;
mod token;

/// Parse a Markdown document with default options.
pub fn parse(input: &str) -> Document {
    MarkdownParser::new(input, ParserOptions::default()).parse()
}

/// Parse a Markdown document with explicit options.
pub fn parse_with_options(input: &str, options: ParserOptions) -> Document {
    MarkdownParser::new(input, options).parse()
}
