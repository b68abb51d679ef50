use crate::ast::ListKind;
use crate::syntax::TokenKind;
use crate::token::Token;

/// How much leading whitespace a new-block dispatch tolerates before the
/// head of the line stops matching. Exactly the tolerated columns are
/// stripped before dispatch.
pub(crate) const DISPATCH_WIGGLE: u32 = 2;

/// The extra column a quote marker may be indented by relative to other
/// block starts.
const QUOTE_MARKER_INDENT: u32 = 3;

/// A borrowed view of one line of the token stream: the inclusive run of
/// tokens up to and including the next BREAK (or to the end of input).
/// Container blocks strip their continuation markers by advancing the view;
/// the underlying tokens are never mutated.
#[derive(Clone, Copy)]
pub(crate) struct Line<'p> {
    source: &'p str,
    tokens: &'p [Token],
}

/// The shape of a list item marker found at the head of a line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ListMarker {
    pub kind: ListKind,
    pub checked: bool,
    /// The parsed number of an ordered marker; 1 otherwise.
    pub start: usize,
    /// The column at which the item's content begins.
    pub content_col: u32,
    /// How many tokens the marker occupies, including leading whitespace
    /// and the space that terminates the marker.
    pub tokens_consumed: usize,
}

/// The shape of an ATX heading opener found at the head of a line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AtxHeading {
    pub level: u8,
    /// Index of the first content token, past the hashes and their
    /// terminating space.
    pub content_start: usize,
}

impl<'p> Line<'p> {
    pub(crate) fn new(source: &'p str, tokens: &'p [Token]) -> Self {
        Self { source, tokens }
    }

    pub(crate) fn tokens(&self) -> &'p [Token] {
        self.tokens
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn text_of(&self, token: &Token) -> &'p str {
        token.text(self.source)
    }

    /// True if the line holds nothing but whitespace.
    pub(crate) fn is_blank(&self) -> bool {
        self.tokens.iter().all(|token| token.kind().is_whitespace())
    }

    /// The whitespace columns at the head of the line (spaces count one,
    /// tabs two).
    pub(crate) fn leading_cols(&self) -> u32 {
        let mut cols = 0;
        for token in self.tokens {
            let width = token.kind().indent_width();
            if width == 0 {
                break;
            }
            cols += width;
        }
        cols
    }

    /// A view with the first `count` tokens removed.
    pub(crate) fn advance(&self, count: usize) -> Line<'p> {
        Line {
            source: self.source,
            tokens: &self.tokens[count.min(self.tokens.len())..],
        }
    }

    /// Strip leading whitespace tokens up to `max` columns. Tokens that
    /// would overshoot the budget are left in place.
    pub(crate) fn strip_leading_ws_up_to(&self, max: u32) -> Line<'p> {
        let mut cols = 0;
        let mut count = 0;
        for token in self.tokens {
            let width = token.kind().indent_width();
            if width == 0 || cols + width > max {
                break;
            }
            cols += width;
            count += 1;
        }
        self.advance(count)
    }

    /// Strip leading whitespace tokens until at least `cols` columns have
    /// been consumed. Used to remove a list item's content indentation from
    /// a continuation line; a tab may overshoot by one column.
    pub(crate) fn strip_indent(&self, cols: u32) -> Line<'p> {
        let mut consumed = 0;
        let mut count = 0;
        for token in self.tokens {
            let width = token.kind().indent_width();
            if width == 0 || consumed >= cols {
                break;
            }
            consumed += width;
            count += 1;
        }
        self.advance(count)
    }

    /// Index and reference of the first non-whitespace token, limited to
    /// `max_cols` of leading whitespace.
    fn head(&self, max_cols: u32) -> Option<(usize, &'p Token)> {
        let mut cols = 0;
        for (index, token) in self.tokens.iter().enumerate() {
            let width = token.kind().indent_width();
            if width == 0 {
                if token.kind() == TokenKind::Break {
                    return None;
                }
                return Some((index, token));
            }
            cols += width;
            if cols > max_cols {
                return None;
            }
        }
        None
    }

    /// If the line begins with a quote marker (up to three columns of
    /// whitespace, then `>`), returns the line with the marker and one
    /// following space stripped.
    pub(crate) fn strip_quote_marker(&self) -> Option<Line<'p>> {
        let (index, token) = self.head(QUOTE_MARKER_INDENT)?;
        if token.kind() != TokenKind::Gt {
            return None;
        }

        let mut consumed = index + 1;
        if self
            .tokens
            .get(consumed)
            .is_some_and(|token| token.kind() == TokenKind::Space)
        {
            consumed += 1;
        }
        Some(self.advance(consumed))
    }

    /// Recognize a list item marker at the head of the line: a bullet or a
    /// digit run, a period for ordered items, an optional `[ ]`/`[x]`
    /// checkbox, and the single space that ends the marker.
    pub(crate) fn list_marker(&self) -> Option<ListMarker> {
        let (index, token) = self.head(DISPATCH_WIGGLE)?;
        let leading_cols: u32 = self.tokens[..index]
            .iter()
            .map(|token| token.kind().indent_width())
            .sum();

        if token.kind().is_list_bullet() {
            return self.bullet_marker(index, leading_cols);
        }
        if token.kind() == TokenKind::Digit {
            return self.ordered_marker(index, leading_cols);
        }
        None
    }

    fn bullet_marker(&self, index: usize, leading_cols: u32) -> Option<ListMarker> {
        if self.kind_at(index + 1)? != TokenKind::Space {
            return None;
        }

        // `- [ ] ` or `- [x] ` extends the bullet into a task marker.
        if self.kind_at(index + 2) == Some(TokenKind::Lbrack)
            && self.kind_at(index + 4) == Some(TokenKind::Rbrack)
            && self.kind_at(index + 5) == Some(TokenKind::Space)
        {
            let state = &self.tokens[index + 3];
            let checked = match state.kind() {
                TokenKind::Space => Some(false),
                TokenKind::Word if self.text_of(state).eq_ignore_ascii_case("x") => Some(true),
                _ => None,
            };
            if let Some(checked) = checked {
                return Some(ListMarker {
                    kind: ListKind::Task,
                    checked,
                    start: 1,
                    content_col: leading_cols + 6,
                    tokens_consumed: index + 6,
                });
            }
        }

        Some(ListMarker {
            kind: ListKind::Unordered,
            checked: false,
            start: 1,
            content_col: leading_cols + 2,
            tokens_consumed: index + 2,
        })
    }

    fn ordered_marker(&self, index: usize, leading_cols: u32) -> Option<ListMarker> {
        let mut cursor = index;
        let mut start: usize = 0;
        while self.kind_at(cursor) == Some(TokenKind::Digit) {
            let digit = self.text_of(&self.tokens[cursor]).as_bytes()[0] - b'0';
            start = start.saturating_mul(10).saturating_add(digit as usize);
            cursor += 1;
        }

        if self.kind_at(cursor)? != TokenKind::Period {
            return None;
        }
        if self.kind_at(cursor + 1)? != TokenKind::Space {
            return None;
        }

        let digits = (cursor - index) as u32;
        Some(ListMarker {
            kind: ListKind::Ordered,
            checked: false,
            start,
            content_col: leading_cols + digits + 2,
            tokens_consumed: cursor + 2,
        })
    }

    /// Recognize an ATX heading opener: one to six hashes followed by a
    /// space (or the end of the line, for an empty heading).
    pub(crate) fn atx_heading(&self) -> Option<AtxHeading> {
        let (index, token) = self.head(DISPATCH_WIGGLE)?;
        if token.kind() != TokenKind::Hash {
            return None;
        }

        let mut cursor = index;
        while self.kind_at(cursor) == Some(TokenKind::Hash) {
            cursor += 1;
        }

        let level = cursor - index;
        if level > 6 {
            return None;
        }

        match self.kind_at(cursor) {
            Some(TokenKind::Space) => Some(AtxHeading {
                level: level as u8,
                content_start: cursor + 1,
            }),
            Some(TokenKind::Break) | None => Some(AtxHeading {
                level: level as u8,
                content_start: cursor,
            }),
            _ => None,
        }
    }

    /// The fence token opening a code block, if this line starts with one.
    pub(crate) fn fence_open(&self) -> Option<usize> {
        let (index, token) = self.head(DISPATCH_WIGGLE)?;
        (token.kind() == TokenKind::CodeBlock).then_some(index)
    }

    /// The first non-whitespace token of the line if it is a fence token,
    /// with no indentation limit. Used to detect the closing fence of an
    /// open code block.
    pub(crate) fn closing_fence_token(&self) -> Option<&'p Token> {
        let token = self
            .tokens
            .iter()
            .find(|token| !token.kind().is_inline_whitespace())?;
        (token.kind() == TokenKind::CodeBlock).then_some(token)
    }

    /// True if the line starts a table row.
    pub(crate) fn starts_table(&self) -> bool {
        self.head(DISPATCH_WIGGLE)
            .is_some_and(|(_, token)| token.kind() == TokenKind::Pipe)
    }

    /// True if the head of the line opens some block other than a
    /// paragraph. Paragraphs refuse these lines, which is also what makes
    /// the corresponding blocks able to interrupt a paragraph.
    pub(crate) fn is_block_start(&self) -> bool {
        self.strip_quote_marker().is_some()
            || self.list_marker().is_some()
            || self.atx_heading().is_some()
            || self.fence_open().is_some()
            || self.starts_table()
    }

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|token| token.kind())
    }
}
