use rowan::TextRange;

use crate::syntax_kind::SyntaxKind;

/// Kind carried by a `Start` that was abandoned, or that is still open.
pub(crate) const TOMBSTONE: SyntaxKind = SyntaxKind::__Last;

/// One entry of the parser's append-only production log.
///
/// The tree is not built while parsing. Rules only append events; a rollback
/// truncates the log, and the sink replays whatever survives once at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    /// Opens a node. `forward_parent` is the distance to a later `Start`
    /// that must enclose this one (left-wrap). A `collapse` node is elided
    /// when it ends up with exactly one child node and nothing else.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<u32>,
        collapse: bool,
    },
    Finish,
    /// One leaf made of `n_raw` adjacent significant tokens (`&&`, `>>=`).
    Token { kind: SyntaxKind, n_raw: u8 },
    Error {
        code: &'static str,
        message: String,
        range: TextRange,
    },
}

impl Event {
    pub(crate) fn tombstone() -> Self {
        Event::Start {
            kind: TOMBSTONE,
            forward_parent: None,
            collapse: false,
        }
    }
}
