use rowan::NodeOrToken;
use serde::Serialize;

use crate::diagnostics::{Diagnostic, LineIndex, Span};
use crate::syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode};

/// Serializable mirror of one tree element. Tokens carry their text,
/// nodes their children.
#[derive(Debug, Clone, Serialize)]
pub struct CstNode {
    pub kind: SyntaxKind,
    pub range: [u32; 2],
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CstNode>,
}

#[derive(Debug, Serialize)]
pub struct CstFile {
    pub path: String,
    pub byte_count: usize,
    pub line_count: usize,
    pub tree: CstNode,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct CstBundle {
    pub files: Vec<CstFile>,
}

impl CstBundle {
    pub fn has_errors(&self) -> bool {
        self.files
            .iter()
            .any(|file| file.diagnostics.iter().any(Diagnostic::is_error))
    }
}

/// Converts a tree into its serializable form. Iterative, so left-deep
/// operator chains do not exhaust the stack.
pub fn cst_node(root: &SyntaxNode, text: &str) -> CstNode {
    let lines = LineIndex::new(text);
    let root_element: SyntaxElement = NodeOrToken::Node(root.clone());
    let mut stack = vec![(convert(&root_element, &lines), root.children_with_tokens())];

    while let Some((_, children)) = stack.last_mut() {
        let next = children.next();
        match next {
            Some(NodeOrToken::Node(child)) => {
                let node = convert(&NodeOrToken::Node(child.clone()), &lines);
                stack.push((node, child.children_with_tokens()));
            }
            Some(token) => {
                let node = convert(&token, &lines);
                if let Some((parent, _)) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            None => {
                let Some((done, _)) = stack.pop() else {
                    break;
                };
                match stack.last_mut() {
                    Some((parent, _)) => parent.children.push(done),
                    None => return done,
                }
            }
        }
    }
    convert(&root_element, &lines)
}

fn convert(element: &SyntaxElement, lines: &LineIndex) -> CstNode {
    let range = element.text_range();
    let text = match element {
        NodeOrToken::Token(token) => Some(token.text().to_string()),
        NodeOrToken::Node(_) => None,
    };
    CstNode {
        kind: element.kind(),
        range: [u32::from(range.start()), u32::from(range.end())],
        span: lines.span(range),
        text,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_program;

    fn leaves(node: &CstNode, out: &mut String) {
        if let Some(text) = &node.text {
            out.push_str(text);
        }
        for child in &node.children {
            leaves(child, out);
        }
    }

    #[test]
    fn dump_keeps_every_token_in_order() {
        let text = "var x = 1 + 2 // sum\n";
        let parse = parse_program(text);
        let dump = cst_node(&parse.syntax(), text);
        assert_eq!(dump.kind, SyntaxKind::Program);
        let mut rebuilt = String::new();
        leaves(&dump, &mut rebuilt);
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn dump_serializes_kinds_by_name() {
        let text = "x";
        let parse = parse_program(text);
        let json = serde_json::to_value(cst_node(&parse.syntax(), text)).expect("serialize");
        assert_eq!(json["kind"], "Program");
        assert_eq!(json["children"][0]["kind"], "VarReference");
        assert_eq!(json["children"][0]["children"][0]["text"], "x");
    }
}
