use log::debug;

use super::grammar::{EXPR_FIRST, STATEMENT_FIRST};
use super::{Outcome, Parser, TokenSet};
use crate::syntax_kind::SyntaxKind::*;

/// Where a block resumes after a broken statement.
pub(crate) const BLOCK_SYNC: TokenSet = EXPR_FIRST
    .union(STATEMENT_FIRST)
    .union(TokenSet::new(&[RCurly, Semicolon]));

/// Where a program resumes after a broken item. Without `}`, so a stray
/// closing brace at top level is skipped instead of stalling the loop.
pub(crate) const ITEM_SYNC: TokenSet = EXPR_FIRST
    .union(STATEMENT_FIRST)
    .union(TokenSet::new(&[TypeKw, SignalKw, DefKw, LBrack, Semicolon]));

pub(crate) const MEMBER_SYNC: TokenSet = TokenSet::new(&[
    RCurly, Ident, DefKw, AsyncKw, CoroutineKw, LBrack, Semicolon, IntKw, FloatKw, DoubleKw,
    StringKw, BoolKw, ObjectKw, ArrayKw,
]);

/// Delimited lists stop skipping at a separator or any closer.
pub(crate) const LIST_SYNC: TokenSet =
    TokenSet::new(&[Comma, RParen, RBrack, RCurly, Semicolon]);

impl Parser<'_> {
    /// Skips tokens into an `Error` node until one in `sync`, a token on a
    /// new line, or end of input. With `force` the first token is skipped
    /// unconditionally so the caller is guaranteed to make progress.
    pub(crate) fn recover(&mut self, sync: TokenSet, force: bool) -> bool {
        if self.at_eof() {
            return false;
        }
        let start = self.position();
        let m = self.start();
        if force {
            self.bump_any();
        }
        while !self.at_eof() && !self.at_set(sync) && !self.has_line_break_before() {
            self.bump_any();
        }
        if self.position() == start {
            m.abandon(self);
            return false;
        }
        debug!(
            "recovered: skipped {} token(s), resuming at {:?}",
            self.position() - start,
            self.current()
        );
        m.complete(self, Error);
        true
    }

    /// Settles a repetition element: an unmatched element is reported and
    /// its first token forcibly skipped, a recovered one only skips what is
    /// left of its line.
    pub(crate) fn recover_after(
        &mut self,
        outcome: Outcome,
        sync: TokenSet,
        code: &'static str,
        message: &str,
    ) {
        match outcome {
            Outcome::Matched => {}
            Outcome::Recovered => {
                self.recover(sync, false);
            }
            Outcome::NoMatch => {
                self.error(code, message);
                self.recover(sync, true);
            }
        }
    }
}
