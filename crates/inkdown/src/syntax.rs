use serde::Serialize;

/// The kind tag attached to every token the lexer produces.
///
/// Multi-character kinds exist only where the grammar treats the sequence as
/// a single unit: `Bold` for `**`/`__`, `Embold` for `***` and its mixed
/// variants, `CodeBlock` for a run of two or more backticks, and `Break` for
/// `\r\n`. Everything else is one byte per token, with `Word` swallowing any
/// residue so that lexing can never fail.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub enum TokenKind {
    #[default]
    Eof,
    /// A contiguous run of bytes that are neither whitespace nor significant
    /// punctuation. Non-ASCII bytes always land here.
    Word,
    /// A single decimal digit.
    Digit,
    /// A tab, semantically equivalent to two spaces of indentation.
    Indent,
    Space,
    /// `\n` or `\r\n`.
    Break,
    Hash,
    /// A fence delimiter: two or more consecutive backticks.
    CodeBlock,
    /// A single backtick.
    CodeInline,
    Plus,
    Minus,
    Star,
    Uscore,
    Tilde,
    Period,
    Comma,
    Equal,
    Bang,
    Query,
    At,
    Dollar,
    Percent,
    Caret,
    And,
    Lt,
    Gt,
    Lparen,
    Rparen,
    Lbrack,
    Rbrack,
    Lcurly,
    Rcurly,
    Slash,
    Bslash,
    Pipe,
    /// `**` or `__`.
    Bold,
    /// `***` or one of its mixed three-character variants.
    Embold,
    Unknown,
}

impl TokenKind {
    /// Returns true for whitespace that does not end a line.
    pub fn is_inline_whitespace(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Indent)
    }

    /// Returns true for any whitespace kind, including line breaks.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Indent | TokenKind::Break)
    }

    /// Returns true for the kinds that toggle styling in inline content.
    pub fn is_emphasis(self) -> bool {
        matches!(
            self,
            TokenKind::Star
                | TokenKind::Uscore
                | TokenKind::Tilde
                | TokenKind::Bold
                | TokenKind::Embold
        )
    }

    /// Returns true for the kinds that can begin an unordered list item.
    pub fn is_list_bullet(self) -> bool {
        matches!(self, TokenKind::Minus | TokenKind::Plus | TokenKind::Star)
    }

    /// The number of columns this kind occupies when it appears as leading
    /// whitespace. Tabs are stopped at two spaces.
    pub(crate) fn indent_width(self) -> u32 {
        match self {
            TokenKind::Space => 1,
            TokenKind::Indent => 2,
            _ => 0,
        }
    }
}
