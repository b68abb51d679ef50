use crate::syntax::TokenKind;

/// Byte-indexed dispatch table for every byte that forms a token on its own.
/// Bytes that are not present here either start a multi-character token
/// (handled before this table is consulted) or fall through to the WORD
/// matcher.
#[rustfmt::skip]
static SINGLE_BYTE_TOKENS: [Option<TokenKind>; 256] = {
    let mut table: [Option<TokenKind>; 256] = [None; 256];
    table[b' ' as usize] = Some(TokenKind::Space);
    table[b'#' as usize] = Some(TokenKind::Hash);
    table[b'`' as usize] = Some(TokenKind::CodeInline);
    table[b'+' as usize] = Some(TokenKind::Plus);
    table[b'-' as usize] = Some(TokenKind::Minus);
    table[b'*' as usize] = Some(TokenKind::Star);
    table[b'_' as usize] = Some(TokenKind::Uscore);
    table[b'~' as usize] = Some(TokenKind::Tilde);
    table[b'.' as usize] = Some(TokenKind::Period);
    table[b',' as usize] = Some(TokenKind::Comma);
    table[b'=' as usize] = Some(TokenKind::Equal);
    table[b'!' as usize] = Some(TokenKind::Bang);
    table[b'?' as usize] = Some(TokenKind::Query);
    table[b'@' as usize] = Some(TokenKind::At);
    table[b'$' as usize] = Some(TokenKind::Dollar);
    table[b'%' as usize] = Some(TokenKind::Percent);
    table[b'^' as usize] = Some(TokenKind::Caret);
    table[b'&' as usize] = Some(TokenKind::And);
    table[b'<' as usize] = Some(TokenKind::Lt);
    table[b'>' as usize] = Some(TokenKind::Gt);
    table[b'(' as usize] = Some(TokenKind::Lparen);
    table[b')' as usize] = Some(TokenKind::Rparen);
    table[b'[' as usize] = Some(TokenKind::Lbrack);
    table[b']' as usize] = Some(TokenKind::Rbrack);
    table[b'{' as usize] = Some(TokenKind::Lcurly);
    table[b'}' as usize] = Some(TokenKind::Rcurly);
    table[b'/' as usize] = Some(TokenKind::Slash);
    table[b'\\' as usize] = Some(TokenKind::Bslash);
    table[b'|' as usize] = Some(TokenKind::Pipe);
    table
};

/// Returns the token kind for a byte that forms a token by itself.
#[inline(always)]
pub(crate) fn single_byte_token(byte: u8) -> Option<TokenKind> {
    SINGLE_BYTE_TOKENS[byte as usize]
}

/// Returns true if the given byte terminates a WORD run. This includes all
/// single-byte token triggers plus whitespace. A stray `\r` is only
/// significant when it pairs with a following `\n`; on its own it is WORD
/// content.
#[inline(always)]
pub(crate) fn byte_ends_word(byte: u8, next: Option<u8>) -> bool {
    match byte {
        b'\t' | b'\n' => true,
        b'\r' => next == Some(b'\n'),
        _ => SINGLE_BYTE_TOKENS[byte as usize].is_some(),
    }
}
