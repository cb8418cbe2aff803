//! Grammar-driven construction of the concrete syntax tree.
//!
//! Rules never touch a tree. They talk to [`Parser`], which records an
//! append-only log of [`Event`]s through markers; the log is replayed into a
//! `rowan` green tree by [`sink`] once the whole input has been consumed.

use std::collections::HashMap;

use log::trace;
use rowan::{GreenNode, TextRange, WalkEvent};

use crate::cancel::CancelToken;
use crate::config::ParseOptions;
use crate::diagnostics::Diagnostic;
use crate::lexer::Token;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use crate::ParseError;

mod event;
mod grammar;
mod input;
mod recovery;
mod sink;
mod token_set;

use event::Event;
use input::TokenCursor;
pub use token_set::TokenSet;

/// Immutable result of one parse: the lossless tree and every diagnostic,
/// ordered by source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub(crate) fn new(green: GreenNode, diagnostics: Vec<Diagnostic>) -> Self {
        Self { green, diagnostics }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// No error-severity diagnostics were produced.
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub(crate) fn push_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.extend(diagnostics);
        self.diagnostics.sort_by_key(|diagnostic| diagnostic.range.start());
    }

    /// Indented `Kind@start..end` dump, tokens with their text.
    pub fn debug_tree(&self) -> String {
        let mut output = String::new();
        let mut indent = 0usize;
        for event in self.syntax().preorder_with_tokens() {
            match event {
                WalkEvent::Enter(element) => {
                    let range = element.text_range();
                    output.push_str(&"  ".repeat(indent));
                    output.push_str(&format!(
                        "{:?}@{}..{}",
                        element.kind(),
                        u32::from(range.start()),
                        u32::from(range.end())
                    ));
                    if let Some(token) = element.as_token() {
                        output.push_str(&format!(" {:?}", token.text()));
                    }
                    output.push('\n');
                    indent += 1;
                }
                WalkEvent::Leave(_) => indent -= 1,
            }
        }
        output
    }
}

/// Parses an already tokenized input starting at `options.entry`.
///
/// `tokens` must tile `text` (trivia included) for the tree to be lossless.
/// Syntax errors never surface as `Err`; only cancellation does.
pub fn parse_tokens(
    text: &str,
    tokens: &[Token],
    options: &ParseOptions,
    cancel: &CancelToken,
) -> Result<Parse, ParseError> {
    let parser = run(text, tokens, options, cancel.clone());
    if parser.cancelled {
        return Err(ParseError::Cancelled);
    }
    Ok(materialize(text, tokens, parser))
}

/// `parse_tokens` for callers that cannot cancel.
pub(crate) fn parse_to_end(text: &str, tokens: &[Token], options: &ParseOptions) -> Parse {
    let parser = run(text, tokens, options, CancelToken::new());
    materialize(text, tokens, parser)
}

fn run<'t>(
    text: &'t str,
    tokens: &[Token],
    options: &ParseOptions,
    cancel: CancelToken,
) -> Parser<'t> {
    let mut parser = Parser::new(text, tokens, options, cancel);
    grammar::root(&mut parser, options.entry);
    parser
}

fn materialize(text: &str, tokens: &[Token], parser: Parser<'_>) -> Parse {
    let (green, diagnostics) = sink::build_tree(text, tokens, parser.finish());
    Parse::new(green, diagnostics)
}

/// How a rule invocation ended.
///
/// `Recovered` means the rule committed (passed its pin point) and then hit
/// an error it already reported; callers treat it as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    NoMatch,
    Matched,
    Recovered,
}

impl Outcome {
    pub(crate) fn is_match(self) -> bool {
        self != Outcome::NoMatch
    }

    /// Folds the outcome of a later element of a committed sequence.
    pub(crate) fn and(self, later: Outcome) -> Outcome {
        match (self, later) {
            (Outcome::Matched, Outcome::Matched) => Outcome::Matched,
            _ => Outcome::Recovered,
        }
    }
}

/// Rule names for tracing and the re-entry guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Rule {
    Root,
    Item,
    Attribute,
    FuncDeclaration,
    SignalDeclaration,
    TypeDeclaration,
    TypeMember,
    ArgumentDeclarationList,
    TypeRef,
    TypeArgumentList,
    BlockBody,
    BlockStatement,
    Statement,
    IfStatement,
    ElseStatement,
    ForLoop,
    VariableDeclaration,
    Expr,
    Atom,
    PathOrCall,
    ArgumentList,
    Dictionary,
    List,
    AnonymousFunc,
    ParenOrTuple,
}

/// Snapshot of the builder: cursor position and log length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pos: usize,
    events: usize,
}

/// Tree builder and token cursor for one parse.
pub(crate) struct Parser<'t> {
    text: &'t str,
    input: TokenCursor,
    pos: usize,
    events: Vec<Event>,
    open: Vec<u32>,
    depth: u32,
    active: HashMap<(Rule, usize), u32>,
    max_depth: u32,
    reentry_limit: u32,
    cancel: CancelToken,
    cancelled: bool,
    /// Set once nesting got too deep; the rest of the input is then skipped.
    halted: bool,
    /// Token position and event index of the last reported error.
    last_error: Option<(usize, usize)>,
    errors: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(
        text: &'t str,
        tokens: &[Token],
        options: &ParseOptions,
        cancel: CancelToken,
    ) -> Self {
        Self {
            text,
            input: TokenCursor::new(text, tokens),
            pos: 0,
            events: Vec::new(),
            open: Vec::new(),
            depth: 0,
            active: HashMap::new(),
            max_depth: options.max_depth,
            reentry_limit: options.reentry_limit,
            cancel,
            cancelled: false,
            halted: false,
            last_error: None,
            errors: 0,
        }
    }

    pub(crate) fn finish(self) -> Vec<Event> {
        debug_assert!(self.open.is_empty(), "markers left open: {:?}", self.open);
        self.events
    }

    // ---- token cursor -------------------------------------------------

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        if self.cancelled {
            return SyntaxKind::Eof;
        }
        self.input.kind(self.pos + n)
    }

    /// Also recognizes the glued operators (`&&`, `||`, `>=`, `>>`, `>>=`),
    /// which exist only as runs of adjacent single-character tokens.
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        match kind {
            SyntaxKind::AmpAmp => self.at_joint(&[SyntaxKind::Amp, SyntaxKind::Amp]),
            SyntaxKind::PipePipe => self.at_joint(&[SyntaxKind::Pipe, SyntaxKind::Pipe]),
            SyntaxKind::GtEq => self.at_joint(&[SyntaxKind::Gt, SyntaxKind::Eq]),
            SyntaxKind::GtGt => self.at_joint(&[SyntaxKind::Gt, SyntaxKind::Gt]),
            SyntaxKind::GtGtEq => {
                self.at_joint(&[SyntaxKind::Gt, SyntaxKind::Gt, SyntaxKind::Eq])
            }
            _ => self.current() == kind,
        }
    }

    fn at_joint(&self, parts: &[SyntaxKind]) -> bool {
        parts.iter().enumerate().all(|(offset, part)| {
            self.nth(offset) == *part && (offset == 0 || self.input.is_joint(self.pos + offset - 1))
        })
    }

    pub(crate) fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current() == SyntaxKind::Eof
    }

    pub(crate) fn has_line_break_before(&self) -> bool {
        self.input.line_break_before(self.pos)
    }

    pub(crate) fn current_text(&self) -> &'t str {
        let range = self.input.range(self.pos);
        self.text
            .get(std::ops::Range::<usize>::from(range))
            .unwrap_or("")
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Records the current token (glued if `kind` is a composite operator)
    /// and advances past it.
    pub(crate) fn bump(&mut self, kind: SyntaxKind) {
        debug_assert!(self.at(kind), "bump({kind:?}) at {:?}", self.current());
        let n_raw = match kind {
            SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::GtEq
            | SyntaxKind::GtGt => 2,
            SyntaxKind::GtGtEq => 3,
            _ => 1,
        };
        self.push_token(kind, n_raw);
    }

    pub(crate) fn bump_any(&mut self) {
        let kind = self.current();
        if kind == SyntaxKind::Eof {
            return;
        }
        self.push_token(kind, 1);
    }

    fn push_token(&mut self, kind: SyntaxKind, n_raw: u8) {
        self.pos += usize::from(n_raw);
        self.events.push(Event::Token { kind, n_raw });
    }

    /// Consumes `kind` if present. Never reports.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.bump(kind);
        true
    }

    /// Consumes `kind` or reports "expected ...".
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error("E2001", format!("expected {}", kind.describe()));
        false
    }

    // ---- markers --------------------------------------------------------

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::tombstone());
        self.open.push(pos);
        Marker {
            pos,
            checkpoint: Checkpoint {
                pos: self.pos,
                events: pos as usize,
            },
            preceded: None,
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            events: self.events.len(),
        }
    }

    /// Truncates the log and resets the cursor. The only way to un-consume
    /// a token.
    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        // after a depth halt the rest of the input already sits in an error
        // node; every caller is unwinding and nothing may be replayed
        if self.halted {
            return;
        }
        self.events.truncate(checkpoint.events);
        self.pos = checkpoint.pos;
    }

    fn reported_since(&self, checkpoint: Checkpoint) -> bool {
        self.events
            .get(checkpoint.events..)
            .is_some_and(|events| events.iter().any(|event| matches!(event, Event::Error { .. })))
    }

    fn close_marker(&mut self, pos: u32) {
        let top = self.open.pop();
        debug_assert_eq!(top, Some(pos), "markers must close innermost first");
    }

    // ---- diagnostics ----------------------------------------------------

    /// Reports at the current token. A second report at the same position
    /// is dropped, so a committed sequence that keeps failing on one token
    /// yields a single diagnostic.
    pub(crate) fn error(&mut self, code: &'static str, message: impl Into<String>) {
        if self.halted {
            return;
        }
        if let Some((pos, index)) = self.last_error {
            let still_logged = matches!(self.events.get(index), Some(Event::Error { .. }));
            if pos == self.pos && still_logged {
                return;
            }
        }
        let range = self.error_range();
        self.errors += 1;
        self.last_error = Some((self.pos, self.events.len()));
        self.events.push(Event::Error {
            code,
            message: message.into(),
            range,
        });
    }

    /// Errors reported so far, rolled back ones included.
    pub(crate) fn error_count(&self) -> usize {
        self.errors
    }

    /// The current token, or the point right after the previous one when the
    /// current token sits on a later line or input has ended.
    fn error_range(&self) -> TextRange {
        if (self.has_line_break_before() || self.at_eof()) && self.pos > 0 {
            return TextRange::empty(self.input.range(self.pos - 1).end());
        }
        self.input.range(self.pos)
    }

    // ---- rule guard -----------------------------------------------------

    /// Runs one grammar rule under the cancellation poll, the depth limit
    /// and the same-rule-same-position re-entry limit.
    pub(crate) fn rule(
        &mut self,
        rule: Rule,
        parse: impl FnOnce(&mut Parser<'t>) -> Outcome,
    ) -> Outcome {
        if self.cancelled || self.cancel.is_cancelled() {
            self.cancelled = true;
            return Outcome::NoMatch;
        }
        if self.halted {
            return Outcome::NoMatch;
        }
        if self.depth >= self.max_depth {
            self.halt_too_deep();
            return Outcome::NoMatch;
        }
        let key = (rule, self.pos);
        let active = self.active.entry(key).or_insert(0);
        if *active >= self.reentry_limit {
            self.error(
                "E2008",
                format!("rule {rule:?} re-entered too often at the same position"),
            );
            return Outcome::NoMatch;
        }
        *active += 1;

        trace!("{rule:?}: next token = {:?}", self.current());
        self.depth += 1;
        let outcome = parse(self);
        self.depth -= 1;

        if let Some(active) = self.active.get_mut(&key) {
            *active = active.saturating_sub(1);
        }
        outcome
    }

    /// Reports once, then swallows the rest of the input into an error node
    /// so every enclosing rule unwinds at end of input.
    fn halt_too_deep(&mut self) {
        self.last_error = None;
        self.error("E2007", "nesting too deep");
        let m = self.start();
        while !self.at_eof() {
            self.bump_any();
        }
        m.complete(self, SyntaxKind::Error);
        self.halted = true;
    }
}

/// An open node. Must be closed exactly once, innermost first.
#[must_use]
pub(crate) struct Marker {
    pos: u32,
    checkpoint: Checkpoint,
    /// Completed node this marker was created to wrap, if any.
    preceded: Option<u32>,
}

impl Marker {
    /// Closes the marker as a node of `kind`.
    pub(crate) fn complete(self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.close(p, kind, false)
    }

    /// Like `complete`, but the node is elided in favor of its only child
    /// node when it has nothing else.
    pub(crate) fn collapse(self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.close(p, kind, true)
    }

    fn close(self, p: &mut Parser<'_>, kind: SyntaxKind, collapse: bool) -> CompletedMarker {
        p.close_marker(self.pos);
        if let Some(Event::Start {
            kind: slot,
            collapse: collapse_slot,
            ..
        }) = p.events.get_mut(self.pos as usize)
        {
            *slot = kind;
            *collapse_slot = collapse;
        }
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Drops the marker without any effect on the tree; whatever it
    /// covered stays attached to the enclosing node.
    pub(crate) fn abandon(self, p: &mut Parser<'_>) {
        p.close_marker(self.pos);
        self.unlink(p);
        let index = self.pos as usize;
        if index + 1 == p.events.len() {
            p.events.pop();
        }
    }

    /// Drops the marker and rewinds the cursor and log to where it opened.
    /// Only silent speculation may roll back: a diagnostic reported since
    /// the marker opened would be lost.
    pub(crate) fn rollback(self, p: &mut Parser<'_>) {
        debug_assert!(
            p.halted || !p.reported_since(self.checkpoint),
            "rolled back past a reported diagnostic"
        );
        p.close_marker(self.pos);
        self.unlink(p);
        p.rewind(self.checkpoint);
    }

    fn unlink(&self, p: &mut Parser<'_>) {
        if let Some(child) = self.preceded {
            if let Some(Event::Start { forward_parent, .. }) = p.events.get_mut(child as usize) {
                *forward_parent = None;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    /// Opens a new marker that will enclose this already completed node
    /// (left-wrap): `a` becomes the first child of `a + b`.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let mut marker = p.start();
        if let Some(Event::Start { forward_parent, .. }) = p.events.get_mut(self.pos as usize) {
            *forward_parent = Some(marker.pos - self.pos);
        }
        marker.preceded = Some(self.pos);
        // rolling back a wrapper must never drop the node it wraps
        marker.checkpoint.events = marker.pos as usize;
        marker.checkpoint.pos = p.pos;
        marker
    }
}
