use crate::source::{SourceLocation, TextSpan};
use crate::syntax::TokenKind;

/// A singular token entity: the kind of the token, its byte span in the
/// source text, and the row/column where it starts. Tokens never own their
/// text; the actual slice is resolved through the source the parse ran over,
/// which the document tree keeps alive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Token {
    kind: TokenKind,
    span: TextSpan,
    location: SourceLocation,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, span: TextSpan, location: SourceLocation) -> Self {
        Self {
            kind,
            span,
            location,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn span(&self) -> TextSpan {
        self.span
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Resolve the text this token covers within `source`. The caller is
    /// responsible for handing in the same text the token was lexed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.range()]
    }
}
