//! Cheap look-ahead scans for bracketed constructs. Validity is decided on
//! the current line only; a line break anywhere inside the construct makes
//! the opening token literal text instead.

use crate::syntax::TokenKind;
use crate::token::Token;

/// Token index bounds of a validated `[text](url)` construct.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LinkScan {
    pub text_start: usize,
    pub text_end: usize,
    pub url_start: usize,
    pub url_end: usize,
    /// Index one past the closing parenthesis.
    pub end: usize,
}

/// Scan for `[ … ] ( … )` starting at the LBRACK at `open`, with nothing
/// between `]` and `(`. The first RSQUARE closes the text; a nested `[` in
/// the text is treated literally by the styled-run parser later.
pub(crate) fn scan_link(tokens: &[Token], open: usize) -> Option<LinkScan> {
    debug_assert!(tokens[open].kind() == TokenKind::Lbrack);

    let mut cursor = open + 1;
    let text_end = loop {
        match tokens.get(cursor)?.kind() {
            TokenKind::Rbrack => break cursor,
            TokenKind::Break => return None,
            _ => cursor += 1,
        }
    };

    if tokens.get(text_end + 1)?.kind() != TokenKind::Lparen {
        return None;
    }

    let mut cursor = text_end + 2;
    let url_end = loop {
        match tokens.get(cursor)?.kind() {
            TokenKind::Rparen => break cursor,
            TokenKind::Break => return None,
            _ => cursor += 1,
        }
    };

    Some(LinkScan {
        text_start: open + 1,
        text_end,
        url_start: text_end + 2,
        url_end,
        end: url_end + 1,
    })
}

/// Scan for `<url>` starting at the LT at `open`. The enclosed tokens must
/// contain no whitespace and concatenate to something that looks like an
/// absolute URI: a leading letter and a `:` somewhere after it.
pub(crate) fn scan_autolink(
    source: &str,
    tokens: &[Token],
    open: usize,
) -> Option<(String, usize)> {
    debug_assert!(tokens[open].kind() == TokenKind::Lt);

    let mut url = String::new();
    let mut cursor = open + 1;
    loop {
        let token = tokens.get(cursor)?;
        match token.kind() {
            TokenKind::Gt => break,
            TokenKind::Break | TokenKind::Space | TokenKind::Indent => return None,
            _ => {
                url.push_str(token.text(source));
                cursor += 1;
            }
        }
    }

    let looks_like_uri = url
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && url.contains(':');
    if !looks_like_uri {
        return None;
    }

    Some((url, cursor + 1))
}
