use rowan::{TextRange, TextSize};

use crate::lexer::Token;
use crate::syntax_kind::SyntaxKind;

/// Forward view over the significant (non-trivia) tokens of a raw stream.
///
/// Trivia is skipped here once, up front; what survives of it is two bits
/// per token: whether the next token follows without any trivia in between
/// (`joint`, used to glue `&&` or `>>`), and whether a line break precedes it.
pub(crate) struct TokenCursor {
    kinds: Vec<SyntaxKind>,
    ranges: Vec<TextRange>,
    joint: Vec<bool>,
    /// One entry per token plus one for the end of input.
    line_break_before: Vec<bool>,
    end: TextSize,
}

impl TokenCursor {
    pub(crate) fn new(text: &str, tokens: &[Token]) -> Self {
        let mut kinds = Vec::new();
        let mut ranges = Vec::new();
        let mut joint = Vec::new();
        let mut line_break_before = Vec::new();
        let mut pending_break = false;
        let mut previous_was_significant = false;

        for token in tokens {
            if token.kind.is_trivia() {
                let spans_lines = token.kind == SyntaxKind::Newline
                    || (token.kind == SyntaxKind::BlockComment
                        && token.text(text).contains('\n'));
                pending_break |= spans_lines;
                previous_was_significant = false;
                continue;
            }
            if let Some(last) = joint.last_mut() {
                *last = previous_was_significant;
            }
            kinds.push(token.kind);
            ranges.push(token.range);
            joint.push(false);
            line_break_before.push(pending_break);
            pending_break = false;
            previous_was_significant = true;
        }
        line_break_before.push(pending_break);

        let end = tokens
            .last()
            .map(|token| token.range.end())
            .unwrap_or_else(|| TextSize::of(text));
        Self {
            kinds,
            ranges,
            joint,
            line_break_before,
            end,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    pub(crate) fn kind(&self, pos: usize) -> SyntaxKind {
        self.kinds.get(pos).copied().unwrap_or(SyntaxKind::Eof)
    }

    pub(crate) fn range(&self, pos: usize) -> TextRange {
        self.ranges
            .get(pos)
            .copied()
            .unwrap_or_else(|| TextRange::empty(self.end))
    }

    /// `pos` and `pos + 1` touch with no trivia between them.
    pub(crate) fn is_joint(&self, pos: usize) -> bool {
        self.joint.get(pos).copied().unwrap_or(false)
    }

    pub(crate) fn line_break_before(&self, pos: usize) -> bool {
        let index = pos.min(self.kinds.len());
        self.line_break_before.get(index).copied().unwrap_or(false)
    }
}
