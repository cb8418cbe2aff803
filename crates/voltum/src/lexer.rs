use std::ops::Range;

use rowan::{TextRange, TextSize};
use serde::{Serialize, Serializer};

use crate::diagnostics::{Diagnostic, LineIndex};
use crate::syntax;
use crate::syntax_kind::SyntaxKind;

/// One raw token: a kind and the byte range it covers. The text is sliced
/// from the source only when the tree is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    #[serde(serialize_with = "serialize_range")]
    pub range: TextRange,
}

impl Token {
    pub fn new(kind: SyntaxKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            range: TextRange::new(offset(start), offset(end)),
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(Range::<usize>::from(self.range)).unwrap_or("")
    }
}

fn serialize_range<S: Serializer>(range: &TextRange, serializer: S) -> Result<S::Ok, S::Error> {
    [u32::from(range.start()), u32::from(range.end())].serialize(serializer)
}

fn offset(index: usize) -> TextSize {
    TextSize::try_from(index).unwrap_or(TextSize::from(u32::MAX))
}

/// Splits `content` into tokens. Every byte of the input lands in exactly
/// one token, trivia included.
pub fn lex(content: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    let lines = LineIndex::new(content);

    let chars: Vec<(usize, char)> = content.char_indices().collect();
    let byte_at = |index: usize| chars.get(index).map_or(content.len(), |(byte, _)| *byte);
    let char_at = |index: usize| chars.get(index).map(|(_, ch)| *ch);
    let mut index = 0usize;

    while index < chars.len() {
        let ch = chars[index].1;
        let start = index;

        if ch == '\n' || (ch == '\r' && char_at(index + 1) == Some('\n')) {
            index += if ch == '\r' { 2 } else { 1 };
            tokens.push(Token::new(SyntaxKind::Newline, byte_at(start), byte_at(index)));
            continue;
        }

        if ch == ' ' || ch == '\t' || ch == '\r' {
            while let Some(next) = char_at(index) {
                if next == ' ' || next == '\t' || (next == '\r' && char_at(index + 1) != Some('\n')) {
                    index += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token::new(SyntaxKind::Whitespace, byte_at(start), byte_at(index)));
            continue;
        }

        if ch == '/' && char_at(index + 1) == Some('/') {
            while char_at(index).is_some_and(|next| next != '\n' && next != '\r') {
                index += 1;
            }
            tokens.push(Token::new(SyntaxKind::LineComment, byte_at(start), byte_at(index)));
            continue;
        }

        if ch == '/' && char_at(index + 1) == Some('*') {
            index += 2;
            let mut closed = false;
            while index < chars.len() {
                if char_at(index) == Some('*') && char_at(index + 1) == Some('/') {
                    index += 2;
                    closed = true;
                    break;
                }
                index += 1;
            }
            let token = Token::new(SyntaxKind::BlockComment, byte_at(start), byte_at(index));
            if !closed {
                let opener = TextRange::at(token.range.start(), TextSize::from(2));
                diagnostics.push(
                    Diagnostic::error("E1002", "unterminated block comment", token.range, &lines)
                        .with_label("comment started here", opener, &lines),
                );
            }
            tokens.push(token);
            continue;
        }

        if ch == '"' {
            index += 1;
            let mut closed = false;
            while let Some(next) = char_at(index) {
                if next == '\n' || next == '\r' {
                    break;
                }
                if next == '\\' {
                    match char_at(index + 1) {
                        Some('\n') | Some('\r') | None => {
                            index += 1;
                            continue;
                        }
                        Some(escaped) => {
                            if !matches!(escaped, 'n' | 't' | 'r' | '0' | '\\' | '"' | '\'' | 'u') {
                                let range = TextRange::new(
                                    offset(byte_at(index)),
                                    offset(byte_at(index + 2)),
                                );
                                diagnostics.push(Diagnostic::warning(
                                    "W1003",
                                    format!("unknown escape sequence '\\{escaped}'"),
                                    range,
                                    &lines,
                                ));
                            }
                            index += 2;
                            continue;
                        }
                    }
                }
                index += 1;
                if next == '"' {
                    closed = true;
                    break;
                }
            }
            let token = Token::new(SyntaxKind::StringLiteral, byte_at(start), byte_at(index));
            if !closed {
                let opener = TextRange::at(token.range.start(), TextSize::from(1));
                diagnostics.push(
                    Diagnostic::error("E1001", "unterminated string literal", token.range, &lines)
                        .with_label("string literal started here", opener, &lines),
                );
            }
            tokens.push(token);
            continue;
        }

        if is_ident_start(ch) {
            index += 1;
            while char_at(index).is_some_and(is_ident_continue) {
                index += 1;
            }
            let text = &content[byte_at(start)..byte_at(index)];
            let kind = syntax::keyword_kind(text).unwrap_or(SyntaxKind::Ident);
            tokens.push(Token::new(kind, byte_at(start), byte_at(index)));
            continue;
        }

        if ch.is_ascii_digit() {
            let kind = lex_number(&chars, &mut index);
            tokens.push(Token::new(kind, byte_at(start), byte_at(index)));
            continue;
        }

        if let Some((kind, len)) = match_symbol(&chars, index) {
            index += len;
            tokens.push(Token::new(kind, byte_at(start), byte_at(index)));
            continue;
        }

        index += 1;
        let token = Token::new(SyntaxKind::Unknown, byte_at(start), byte_at(index));
        diagnostics.push(Diagnostic::error(
            "E1000",
            format!("unexpected character '{ch}'"),
            token.range,
            &lines,
        ));
        tokens.push(token);
    }

    (tokens, diagnostics)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

fn lex_number(chars: &[(usize, char)], index: &mut usize) -> SyntaxKind {
    let char_at = |index: usize| chars.get(index).map(|(_, ch)| *ch);

    if char_at(*index) == Some('0') && matches!(char_at(*index + 1), Some('x') | Some('X')) {
        *index += 2;
        while char_at(*index).is_some_and(|ch| ch.is_ascii_hexdigit() || ch == '_') {
            *index += 1;
        }
        return SyntaxKind::IntLiteral;
    }

    let mut kind = SyntaxKind::IntLiteral;
    while char_at(*index).is_some_and(|ch| ch.is_ascii_digit() || ch == '_') {
        *index += 1;
    }
    // `1..2` is a range, not a float
    if char_at(*index) == Some('.') && char_at(*index + 1).is_some_and(|ch| ch.is_ascii_digit()) {
        kind = SyntaxKind::FloatLiteral;
        *index += 1;
        while char_at(*index).is_some_and(|ch| ch.is_ascii_digit() || ch == '_') {
            *index += 1;
        }
    }
    if matches!(char_at(*index), Some('e') | Some('E')) {
        let digits_at = match char_at(*index + 1) {
            Some('+') | Some('-') => *index + 2,
            _ => *index + 1,
        };
        if char_at(digits_at).is_some_and(|ch| ch.is_ascii_digit()) {
            kind = SyntaxKind::FloatLiteral;
            *index = digits_at;
            while char_at(*index).is_some_and(|ch| ch.is_ascii_digit()) {
                *index += 1;
            }
        }
    }
    kind
}

fn match_symbol(chars: &[(usize, char)], index: usize) -> Option<(SyntaxKind, usize)> {
    let char_at = |offset: usize| chars.get(index + offset).map(|(_, ch)| *ch);

    for (needle, kind) in syntax::SYMBOLS_3 {
        if char_at(0) == Some(needle[0])
            && char_at(1) == Some(needle[1])
            && char_at(2) == Some(needle[2])
        {
            return Some((*kind, 3));
        }
    }

    for (needle, kind) in syntax::SYMBOLS_2 {
        if char_at(0) == Some(needle[0]) && char_at(1) == Some(needle[1]) {
            return Some((*kind, 2));
        }
    }

    let ch = char_at(0)?;
    syntax::SYMBOLS_1
        .iter()
        .find(|(symbol, _)| *symbol == ch)
        .map(|(_, kind)| (*kind, 1))
}
