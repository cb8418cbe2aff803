use rowan::{GreenNode, GreenNodeBuilder};

use super::event::{Event, TOMBSTONE};
use crate::diagnostics::{Diagnostic, LineIndex};
use crate::lexer::Token;
use crate::syntax_kind::SyntaxKind;

/// Event log with left-wraps resolved into plain nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Open { kind: SyntaxKind, collapse: bool },
    Close,
    Token { kind: SyntaxKind, n_raw: u8 },
}

/// Replays the surviving events into a green tree.
///
/// Trivia is reattached here: every run of trivia before a token or a node
/// goes to the node that is open at that point, and whatever is left at
/// the end of input goes to the root.
pub(crate) fn build_tree(
    text: &str,
    tokens: &[Token],
    events: Vec<Event>,
) -> (GreenNode, Vec<Diagnostic>) {
    let lines = LineIndex::new(text);
    let (steps, errors) = resolve(events);
    let mut diagnostics: Vec<Diagnostic> = errors
        .into_iter()
        .map(|(code, message, range)| Diagnostic::error(code, message, range, &lines))
        .collect();
    diagnostics.sort_by_key(|diagnostic| diagnostic.range.start());

    let elided = elided_steps(&steps);
    let mut writer = Writer {
        text,
        tokens,
        raw: 0,
        builder: GreenNodeBuilder::new(),
    };

    if !steps.iter().any(|step| matches!(step, Step::Open { .. })) {
        writer.builder.start_node(SyntaxKind::Program.into());
        writer.flush();
        writer.builder.finish_node();
        return (writer.builder.finish(), diagnostics);
    }

    let mut open = 0usize;
    for (step, elided) in steps.into_iter().zip(elided) {
        match step {
            Step::Open { kind, .. } => {
                if elided {
                    continue;
                }
                if open > 0 {
                    writer.eat_trivia();
                }
                writer.builder.start_node(kind.into());
                open += 1;
            }
            Step::Close => {
                if elided {
                    continue;
                }
                open -= 1;
                if open == 0 {
                    writer.flush();
                }
                writer.builder.finish_node();
            }
            Step::Token { kind, n_raw } => {
                writer.eat_trivia();
                writer.token(kind, n_raw);
            }
        }
    }
    (writer.builder.finish(), diagnostics)
}

type RawError = (&'static str, String, rowan::TextRange);

/// Flattens `forward_parent` chains and drops abandoned starts.
fn resolve(mut events: Vec<Event>) -> (Vec<Step>, Vec<RawError>) {
    let mut steps = Vec::with_capacity(events.len());
    let mut errors = Vec::new();
    let mut parents = Vec::new();

    for index in 0..events.len() {
        match std::mem::replace(&mut events[index], Event::tombstone()) {
            Event::Start {
                kind,
                forward_parent,
                collapse,
            } => {
                if kind != TOMBSTONE {
                    parents.push((kind, collapse));
                }
                let mut at = index;
                let mut next = forward_parent;
                while let Some(distance) = next {
                    at += distance as usize;
                    next = None;
                    if let Some(Event::Start {
                        kind,
                        forward_parent,
                        collapse,
                    }) = events.get_mut(at).map(|slot| std::mem::replace(slot, Event::tombstone()))
                    {
                        if kind != TOMBSTONE {
                            parents.push((kind, collapse));
                        }
                        next = forward_parent;
                    }
                }
                for (kind, collapse) in parents.drain(..).rev() {
                    steps.push(Step::Open { kind, collapse });
                }
            }
            Event::Finish => steps.push(Step::Close),
            Event::Token { kind, n_raw } => steps.push(Step::Token { kind, n_raw }),
            Event::Error {
                code,
                message,
                range,
            } => errors.push((code, message, range)),
        }
    }
    (steps, errors)
}

/// Marks the open and close step of every collapse node whose only content
/// is a single child node.
fn elided_steps(steps: &[Step]) -> Vec<bool> {
    struct Frame {
        open: usize,
        collapse: bool,
        nodes: usize,
        tokens: usize,
    }

    let mut elided = vec![false; steps.len()];
    let mut stack: Vec<Frame> = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        match *step {
            Step::Open { collapse, .. } => stack.push(Frame {
                open: index,
                collapse,
                nodes: 0,
                tokens: 0,
            }),
            Step::Token { .. } => {
                if let Some(frame) = stack.last_mut() {
                    frame.tokens += 1;
                }
            }
            Step::Close => {
                let Some(frame) = stack.pop() else {
                    continue;
                };
                if frame.collapse && frame.nodes == 1 && frame.tokens == 0 {
                    elided[frame.open] = true;
                    elided[index] = true;
                }
                if let Some(parent) = stack.last_mut() {
                    parent.nodes += 1;
                }
            }
        }
    }
    elided
}

struct Writer<'a> {
    text: &'a str,
    tokens: &'a [Token],
    raw: usize,
    builder: GreenNodeBuilder<'static>,
}

impl Writer<'_> {
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.raw) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text(self.text));
            self.raw += 1;
        }
    }

    /// Emits one leaf whose text is that of the next `n_raw` raw tokens.
    fn token(&mut self, kind: SyntaxKind, n_raw: u8) {
        let end = (self.raw + usize::from(n_raw)).min(self.tokens.len());
        let raw = self.tokens.get(self.raw..end).unwrap_or_default();
        if let [single] = raw {
            self.builder.token(kind.into(), single.text(self.text));
        } else if !raw.is_empty() {
            let text: String = raw.iter().map(|token| token.text(self.text)).collect();
            self.builder.token(kind.into(), &text);
        }
        self.raw = end;
    }

    /// Everything not yet emitted: trailing trivia, plus any raw token the
    /// grammar never consumed.
    fn flush(&mut self) {
        while let Some(token) = self.tokens.get(self.raw) {
            self.builder.token(token.kind.into(), token.text(self.text));
            self.raw += 1;
        }
    }
}
