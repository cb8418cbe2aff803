//! The grammar proper: one method per rule, spread over the submodules by
//! the construct they build. Roots and the helpers shared by every rule
//! live here.

mod expressions;
mod items;
mod statements;
mod types;

use super::recovery::{ITEM_SYNC, LIST_SYNC};
use super::{CompletedMarker, Outcome, Parser, Rule, TokenSet};
use crate::config::EntryPoint;
use crate::syntax_kind::SyntaxKind::{self, *};

/// Names: identifiers and the type-name keywords.
pub(crate) const IDENT_LIKE: TokenSet = TokenSet::new(&[
    Ident, IntKw, FloatKw, DoubleKw, StringKw, BoolKw, ObjectKw, ArrayKw,
]);

pub(crate) const LITERAL_FIRST: TokenSet = TokenSet::new(&[
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    TrueKw,
    FalseKw,
    NullKw,
]);

pub(crate) const EXPR_FIRST: TokenSet = LITERAL_FIRST.union(IDENT_LIKE).union(TokenSet::new(&[
    LParen,
    LBrack,
    LCurly,
    Minus,
    Plus,
    Star,
    Bang,
    Amp,
    PlusPlus,
    MinusMinus,
    ReturnKw,
    ContinueKw,
    BreakKw,
    DeferKw,
    RangeKw,
    AwaitKw,
    FunctionKw,
    AsyncKw,
    CoroutineKw,
]));

pub(crate) const STATEMENT_FIRST: TokenSet = TokenSet::new(&[IfKw, ForKw, VarKw]);

/// Parses the whole input from `entry` into a single root node.
pub(crate) fn root(p: &mut Parser<'_>, entry: EntryPoint) {
    let m = p.start();
    let kind = match entry {
        EntryPoint::Program => Program,
        EntryPoint::Expression => ExpressionFragment,
        EntryPoint::Statement => StatementFragment,
        EntryPoint::Block => BlockFragment,
    };
    p.rule(Rule::Root, |p| {
        match entry {
            EntryPoint::Program => program(p),
            EntryPoint::Expression => expression_fragment(p),
            EntryPoint::Statement => statement_fragment(p),
            EntryPoint::Block => block_fragment(p),
        }
        Outcome::Matched
    });
    m.complete(p, kind);
}

fn program(p: &mut Parser<'_>) {
    while !p.at_eof() {
        if p.eat(Semicolon) {
            continue;
        }
        let before = p.position();
        let outcome = p.item();
        p.recover_after(outcome, ITEM_SYNC, "E2004", "expected declaration or statement");
        p.ensure_progress(before);
    }
}

fn expression_fragment(p: &mut Parser<'_>) {
    if !p.at_eof() && !p.expr().is_match() {
        p.error("E2002", "expected expression");
    }
    trailing(p, "expression");
}

fn statement_fragment(p: &mut Parser<'_>) {
    if !p.at_eof() && !p.statement_or_expr().is_match() {
        p.error("E2003", "expected statement");
    }
    p.eat(Semicolon);
    trailing(p, "statement");
}

fn block_fragment(p: &mut Parser<'_>) {
    if !p.block_body().is_match() {
        p.error("E2001", format!("expected {}", LCurly.describe()));
    }
    trailing(p, "block");
}

/// A fragment root owns exactly one construct; anything after it is
/// reported once and kept in an error node.
fn trailing(p: &mut Parser<'_>, fragment: &str) {
    if p.at_eof() {
        return;
    }
    let found = p.current().describe();
    p.error("E2005", format!("unexpected {found} after {fragment}"));
    let m = p.start();
    while !p.at_eof() {
        p.bump_any();
    }
    m.complete(p, Error);
}

impl<'t> Parser<'t> {
    /// `rule` for parsers that hand back the node they built.
    pub(crate) fn rule_node(
        &mut self,
        rule: Rule,
        parse: impl FnOnce(&mut Parser<'t>) -> Option<CompletedMarker>,
    ) -> Option<CompletedMarker> {
        let mut node = None;
        self.rule(rule, |p| {
            node = parse(p);
            match node {
                Some(_) => Outcome::Matched,
                None => Outcome::NoMatch,
            }
        });
        node
    }

    /// Swallows one token into an error node if a loop iteration consumed
    /// nothing.
    pub(crate) fn ensure_progress(&mut self, before: usize) {
        if self.position() != before || self.at_eof() {
            return;
        }
        let m = self.start();
        self.bump_any();
        m.complete(self, Error);
    }

    /// Wraps the current token into a one-token node of `kind`.
    pub(crate) fn leaf(&mut self, kind: SyntaxKind) -> CompletedMarker {
        let m = self.start();
        self.bump_any();
        m.complete(self, kind)
    }

    /// `element (',' element)* ','?` up to, but not including, `close`.
    ///
    /// An element that does not parse is reported with `code`/`what` and
    /// skipped up to the next separator or closer.
    pub(crate) fn comma_list(
        &mut self,
        close: SyntaxKind,
        code: &'static str,
        what: &str,
        mut element: impl FnMut(&mut Parser<'t>) -> Outcome,
    ) {
        loop {
            if self.at(close) || self.at_eof() {
                break;
            }
            match element(self) {
                Outcome::Matched => {}
                Outcome::Recovered => {
                    self.recover(LIST_SYNC, false);
                }
                Outcome::NoMatch => {
                    self.error(code, format!("expected {what}"));
                    // a stray `)` or `]` is skipped; `}` and `;` end the list
                    if !self.at(Comma) && !self.at(close) && !self.at(RCurly) && !self.at(Semicolon)
                    {
                        self.recover(LIST_SYNC, true);
                    }
                }
            }
            if !self.eat(Comma) {
                break;
            }
        }
    }

    /// Number of tokens taken by the `[...]` attributes at the cursor.
    fn attributes_len(&self) -> usize {
        let mut n = 0;
        while self.nth(n) == LBrack {
            let mut depth = 0usize;
            loop {
                match self.nth(n) {
                    LBrack => depth += 1,
                    RBrack => depth = depth.saturating_sub(1),
                    Eof => return n,
                    _ => {}
                }
                n += 1;
                if depth == 0 {
                    break;
                }
            }
        }
        n
    }

    /// Number of `def`/`async`/`coroutine` modifiers starting at `n`.
    fn modifiers_len(&self, n: usize) -> usize {
        let mut len = 0;
        while matches!(self.nth(n + len), DefKw | AsyncKw | CoroutineKw) {
            len += 1;
        }
        len
    }
}
