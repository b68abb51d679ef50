//! The inline machine: re-tokenizes a closed leaf's raw tokens into styled
//! runs, code spans, links, images, autolinks and hard breaks.
//!
//! Styling is a left-to-right toggle walk over a scratch word buffer: every
//! delimiter flushes the buffer as a run with the style active so far, then
//! flips its flags. Pairing is greedy, and an unmatched toggle simply leaves
//! its style on until the end of the leaf. Soft line breaks become single
//! spaces; runs of whitespace collapse to one space at flush time.

use crate::ast::{Inline, StyleFlags, Text, TextStyle};
use crate::syntax::TokenKind;
use crate::token::Token;

use super::link;

pub(crate) fn parse_inline(source: &str, tokens: &[Token]) -> Vec<Inline> {
    let mut builder = InlineBuilder::new();

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        match token.kind() {
            TokenKind::Eof => break,
            TokenKind::Embold => builder.toggle(StyleFlags::BOLD | StyleFlags::ITALIC),
            TokenKind::Bold | TokenKind::Star => builder.toggle(StyleFlags::BOLD),
            TokenKind::Uscore => {
                // An underscore sandwiched between two words is literal, so
                // identifiers like foo_bar_baz never italicize.
                if is_word(tokens, index.wrapping_sub(1)) && is_word(tokens, index + 1) {
                    builder.buffer.push('_');
                } else {
                    builder.toggle(StyleFlags::ITALIC);
                }
            }
            TokenKind::Tilde => builder.toggle(StyleFlags::UNDERLINE),
            TokenKind::Break => builder.buffer.push(' '),
            TokenKind::Bslash => match tokens.get(index + 1) {
                Some(next) if next.kind() == TokenKind::Break => {
                    builder.flush();
                    builder.out.push(Inline::Linebreak);
                    index += 1;
                }
                Some(next) if is_escapable(next.kind()) => {
                    builder.buffer.push_str(next.text(source));
                    index += 1;
                }
                _ => builder.buffer.push('\\'),
            },
            TokenKind::CodeInline => {
                match tokens[index + 1..]
                    .iter()
                    .position(|token| token.kind() == TokenKind::CodeInline)
                {
                    Some(offset) => {
                        let close = index + 1 + offset;
                        builder.flush();
                        let mut content = String::new();
                        for token in &tokens[index + 1..close] {
                            match token.kind() {
                                TokenKind::Break => content.push(' '),
                                _ => content.push_str(token.text(source)),
                            }
                        }
                        builder.out.push(Inline::Codespan { content });
                        index = close;
                    }
                    None => builder.buffer.push('`'),
                }
            }
            TokenKind::Bang => {
                let scan = tokens
                    .get(index + 1)
                    .filter(|next| next.kind() == TokenKind::Lbrack)
                    .and_then(|_| link::scan_link(tokens, index + 1));
                match scan {
                    Some(scan) => {
                        builder.flush();
                        let alt = parse_styled_runs(source, &tokens[scan.text_start..scan.text_end]);
                        let src = concat_verbatim(source, &tokens[scan.url_start..scan.url_end]);
                        builder.out.push(Inline::Image { src, alt });
                        index = scan.end - 1;
                    }
                    None => builder.buffer.push('!'),
                }
            }
            TokenKind::Lbrack => match link::scan_link(tokens, index) {
                Some(scan) => {
                    builder.flush();
                    let text = parse_styled_runs(source, &tokens[scan.text_start..scan.text_end]);
                    let url = concat_verbatim(source, &tokens[scan.url_start..scan.url_end]);
                    builder.out.push(Inline::Link { url, text });
                    index = scan.end - 1;
                }
                None => builder.buffer.push('['),
            },
            TokenKind::Lt => match link::scan_autolink(source, tokens, index) {
                Some((url, end)) => {
                    builder.flush();
                    builder.out.push(Inline::Autolink { url });
                    index = end - 1;
                }
                None => builder.buffer.push('<'),
            },
            _ => builder.buffer.push_str(token.text(source)),
        }
        index += 1;
    }

    builder.flush();
    let mut out = builder.out;
    trim_edge_runs(&mut out);
    out
}

/// Parse link text or image alt text: style toggles and literals only. A
/// nested `[` stays literal, so links never nest.
pub(crate) fn parse_styled_runs(source: &str, tokens: &[Token]) -> Vec<Text> {
    let mut builder = InlineBuilder::new();

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        match token.kind() {
            TokenKind::Eof => break,
            TokenKind::Embold => builder.toggle(StyleFlags::BOLD | StyleFlags::ITALIC),
            TokenKind::Bold | TokenKind::Star => builder.toggle(StyleFlags::BOLD),
            TokenKind::Uscore => {
                if is_word(tokens, index.wrapping_sub(1)) && is_word(tokens, index + 1) {
                    builder.buffer.push('_');
                } else {
                    builder.toggle(StyleFlags::ITALIC);
                }
            }
            TokenKind::Tilde => builder.toggle(StyleFlags::UNDERLINE),
            TokenKind::Break => builder.buffer.push(' '),
            TokenKind::Bslash => match tokens.get(index + 1) {
                Some(next) if is_escapable(next.kind()) => {
                    builder.buffer.push_str(next.text(source));
                    index += 1;
                }
                _ => builder.buffer.push('\\'),
            },
            _ => builder.buffer.push_str(token.text(source)),
        }
        index += 1;
    }

    builder.flush();
    let mut runs: Vec<Text> = builder
        .out
        .into_iter()
        .filter_map(|inline| match inline {
            Inline::Text(text) => Some(text),
            _ => None,
        })
        .collect();
    trim_text_edges(&mut runs);
    runs
}

struct InlineBuilder {
    out: Vec<Inline>,
    style: TextStyle,
    buffer: String,
}

impl InlineBuilder {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            style: TextStyle::default(),
            buffer: String::new(),
        }
    }

    fn toggle(&mut self, flags: StyleFlags) {
        self.flush();
        self.style.toggle(flags);
    }

    /// Emit the scratch buffer as a run carrying the current style,
    /// collapsing internal whitespace runs to single spaces.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let content = collapse_whitespace(&self.buffer);
        self.buffer.clear();
        self.out.push(Inline::Text(Text::new(self.style, content)));
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

fn is_word(tokens: &[Token], index: usize) -> bool {
    tokens
        .get(index)
        .is_some_and(|token| token.kind() == TokenKind::Word)
}

/// A backslash escapes any following punctuation token into literal text.
/// Words, digits and whitespace are not escapable; the backslash itself
/// stays literal in front of them.
fn is_escapable(kind: TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::Word
            | TokenKind::Digit
            | TokenKind::Space
            | TokenKind::Indent
            | TokenKind::Break
            | TokenKind::Eof
            | TokenKind::Unknown
    )
}

fn concat_verbatim(source: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(token.text(source));
    }
    out
}

/// Left-trim the first text run and right-trim the last one, dropping runs
/// the trim empties. Soft breaks at the edges of a leaf must not leak
/// spaces into renders.
fn trim_edge_runs(inlines: &mut Vec<Inline>) {
    if let Some(Inline::Text(text)) = inlines.first_mut() {
        let trimmed = text.content.trim_start();
        if trimmed.len() != text.content.len() {
            text.content = trimmed.to_string();
        }
        if text.content.is_empty() {
            inlines.remove(0);
        }
    }
    if let Some(Inline::Text(text)) = inlines.last_mut() {
        let trimmed = text.content.trim_end();
        if trimmed.len() != text.content.len() {
            text.content = trimmed.to_string();
        }
        if text.content.is_empty() {
            inlines.pop();
        }
    }
}

fn trim_text_edges(runs: &mut Vec<Text>) {
    if let Some(text) = runs.first_mut() {
        text.content = text.content.trim_start().to_string();
        if text.content.is_empty() {
            runs.remove(0);
        }
    }
    if let Some(text) = runs.last_mut() {
        text.content = text.content.trim_end().to_string();
        if text.content.is_empty() {
            runs.pop();
        }
    }
}
