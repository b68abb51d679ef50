use crate::byte_lookup::{byte_ends_word, single_byte_token};
use crate::source::{SourceLocation, TextSize, TextSpan};
use crate::syntax::TokenKind;
use crate::token::Token;

/// The three-byte sequences that collapse into a single EMBOLD token. `***`
/// toggles bold and italic at once, and the mixed variants cover the cases
/// where a writer switches delimiter characters mid-run.
const EMBOLD_LITERALS: [&[u8; 3]; 6] = [b"***", b"_**", b"**_", b"*__", b"__*", b"___"];

/// A greedy, priority-ordered tokenizer over a UTF-8 source text.
///
/// At every position the lexer tries, in order: the multi-byte literals
/// (line endings, tabs, emphasis runs, backtick fences), the single-byte
/// punctuation table, a single decimal digit, and finally the WORD matcher,
/// which consumes the longest run of insignificant bytes. Because WORD
/// accepts any residue, lexing cannot fail.
pub(crate) struct Lexer<'src> {
    text: &'src str,
    position: usize,
    location: SourceLocation,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(text: &'src str) -> Self {
        Self {
            text,
            position: 0,
            location: SourceLocation::default(),
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Lex the next token from the source text. Once the end of the input is
    /// reached, an EOF token is returned, and every subsequent call returns
    /// EOF again.
    pub(crate) fn next_token(&mut self) -> Token {
        if self.is_eof() {
            return Token::new(
                TokenKind::Eof,
                TextSpan::new(self.position as TextSize, 0),
                self.location,
            );
        }

        let start = self.position;
        let location = self.location;
        let kind = self.scan_kind();
        debug_assert!(
            self.position > start,
            "Lexer failed to make progress at byte {start}"
        );
        let span = TextSpan::new(start as TextSize, (self.position - start) as TextSize);
        self.advance_location(kind, span);

        Token::new(kind, span, location)
    }

    fn scan_kind(&mut self) -> TokenKind {
        let bytes = self.text.as_bytes();
        match bytes[self.position] {
            b'\r' if bytes.get(self.position + 1) == Some(&b'\n') => {
                self.position += 2;
                TokenKind::Break
            }
            b'\n' => {
                self.position += 1;
                TokenKind::Break
            }
            b'\t' => {
                self.position += 1;
                TokenKind::Indent
            }
            b'*' | b'_' => self.scan_emphasis_run(),
            b'`' => self.scan_backtick_run(),
            b'0'..=b'9' => {
                self.position += 1;
                TokenKind::Digit
            }
            byte => match single_byte_token(byte) {
                Some(kind) => {
                    self.position += 1;
                    kind
                }
                None => self.scan_word(),
            },
        }
    }

    /// Consume a `*`/`_` delimiter run: the three-byte EMBOLD literals first,
    /// then the two-byte BOLD literals, then a lone STAR or USCORE.
    fn scan_emphasis_run(&mut self) -> TokenKind {
        let rest = &self.text.as_bytes()[self.position..];

        for literal in EMBOLD_LITERALS {
            if rest.starts_with(literal) {
                self.position += 3;
                return TokenKind::Embold;
            }
        }

        if rest.starts_with(b"**") || rest.starts_with(b"__") {
            self.position += 2;
            return TokenKind::Bold;
        }

        self.position += 1;
        if rest[0] == b'*' {
            TokenKind::Star
        } else {
            TokenKind::Uscore
        }
    }

    /// Consume a run of backticks. Two or more become a single CODE_BLOCK
    /// fence token whose text is the exact run; a lone backtick is
    /// CODE_INLINE.
    fn scan_backtick_run(&mut self) -> TokenKind {
        let rest = &self.text.as_bytes()[self.position..];
        let run = rest.iter().take_while(|b| **b == b'`').count();

        if run >= 2 {
            self.position += run;
            TokenKind::CodeBlock
        } else {
            self.position += 1;
            TokenKind::CodeInline
        }
    }

    /// Consume the longest run of bytes that neither whitespace nor the
    /// punctuation table claims. Digits and non-ASCII bytes are allowed to
    /// continue a word once one has started.
    fn scan_word(&mut self) -> TokenKind {
        let bytes = self.text.as_bytes();
        let start = self.position;

        while self.position < bytes.len() {
            let byte = bytes[self.position];
            let next = bytes.get(self.position + 1).copied();
            if byte_ends_word(byte, next) {
                break;
            }
            self.position += 1;
        }

        if self.position == start {
            // Unreachable through the public dispatch, kept as a safety valve
            // so a classification bug cannot become an infinite loop.
            self.position += 1;
            return TokenKind::Unknown;
        }

        TokenKind::Word
    }

    fn advance_location(&mut self, kind: TokenKind, span: TextSpan) {
        if kind == TokenKind::Break {
            self.location.row += 1;
            self.location.col = 0;
        } else {
            self.location.col += self.text[span.range()].chars().count() as u32;
        }
    }
}

/// Lex the entire input into an ordered token sequence. The terminating EOF
/// token is not included; the length of the sequence suffices.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        if token.kind() == TokenKind::Eof {
            break;
        }
        tokens.push(token);
    }

    tokens
}
