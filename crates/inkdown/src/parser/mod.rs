use crate::ast::{Block, ContainerKind, Document};
use crate::lexer::tokenize;
use crate::source::SourceText;
use crate::syntax::TokenKind;
use crate::token::Token;

use self::line::Line;

pub(crate) mod block;
pub(crate) mod inline;
pub(crate) mod line;
pub(crate) mod link;

/// Caller-facing parser configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParserOptions {
    /// Route block open/close and line dispatch decisions through the `log`
    /// crate at debug level. Diagnostics only; never affects output.
    pub verbose: bool,
}

/// Shared state the block and inline machines need while the tree is being
/// built: the text behind the token spans, and the diagnostic switch.
pub(crate) struct ParseContext<'p> {
    pub(crate) source: &'p str,
    pub(crate) verbose: bool,
}

/// The Markdown parser: a single call to [`MarkdownParser::parse`] consumes
/// the full input and produces a closed document tree.
///
/// The input is lexed up front into a flat token sequence; the block machine
/// then feeds the currently open branch of the tree one line at a time, and
/// every leaf is handed to the inline machine at the moment it closes. There
/// are no suspension points and no shared state between parser instances.
pub struct MarkdownParser {
    source: SourceText,
    tokens: Vec<Token>,
    options: ParserOptions,
}

impl MarkdownParser {
    pub fn new(input: &str, options: ParserOptions) -> Self {
        Self {
            source: SourceText::from(input),
            tokens: tokenize(input),
            options,
        }
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    /// Parse the input to completion. Every block in the returned tree is
    /// closed and every leaf's inline runs are populated.
    pub fn parse(self) -> Document {
        let mut root = Block::new_container(ContainerKind::Document);

        {
            let text: &str = &self.source;
            let ctx = ParseContext {
                source: text,
                verbose: self.options.verbose,
            };

            let mut cursor = 0;
            while cursor < self.tokens.len() {
                let end = line_end(&self.tokens, cursor);
                let line = Line::new(text, &self.tokens[cursor..end]);
                // The Document root absorbs every line.
                block::handle_line(&ctx, &mut root, line);
                cursor = end;
            }

            block::close_block(&ctx, &mut root);
        }

        Document::new(self.source, root)
    }
}

/// One past the index of the BREAK that ends the line starting at `start`,
/// or the end of the token sequence.
fn line_end(tokens: &[Token], start: usize) -> usize {
    for (offset, token) in tokens[start..].iter().enumerate() {
        if token.kind() == TokenKind::Break {
            return start + offset + 1;
        }
    }
    tokens.len()
}
