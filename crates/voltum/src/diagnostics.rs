use rowan::{TextRange, TextSize};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticLabel {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    #[serde(serialize_with = "serialize_range")]
    pub range: TextRange,
    pub span: Span,
    pub labels: Vec<DiagnosticLabel>,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>, range: TextRange, lines: &LineIndex) -> Self {
        Self {
            code: code.to_string(),
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            range,
            span: lines.span(range),
            labels: Vec::new(),
        }
    }

    pub fn warning(
        code: &str,
        message: impl Into<String>,
        range: TextRange,
        lines: &LineIndex,
    ) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            ..Self::error(code, message, range, lines)
        }
    }

    pub fn with_label(mut self, message: impl Into<String>, range: TextRange, lines: &LineIndex) -> Self {
        self.labels.push(DiagnosticLabel {
            message: message.into(),
            span: lines.span(range),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

fn serialize_range<S: Serializer>(range: &TextRange, serializer: S) -> Result<S::Ok, S::Error> {
    [u32::from(range.start()), u32::from(range.end())].serialize(serializer)
}

/// Maps byte offsets to one-based line/column positions. Columns count
/// characters, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { text, line_starts }
    }

    pub fn position(&self, offset: TextSize) -> Position {
        let offset = usize::from(offset).min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .text
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Position {
            line: line + 1,
            column: column + 1,
        }
    }

    /// Inclusive span; an empty range yields `start == end`.
    pub fn span(&self, range: TextRange) -> Span {
        let start = self.position(range.start());
        let end = if range.is_empty() {
            start
        } else {
            let last = self
                .text
                .get(..usize::from(range.end()))
                .unwrap_or(self.text)
                .char_indices()
                .next_back()
                .map(|(index, _)| index)
                .unwrap_or(0);
            self.position(TextSize::from(last as u32))
        };
        Span { start, end }
    }
}

pub fn render_diagnostics(path: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&render_diagnostic(path, diagnostic));
    }
    output
}

pub fn render_diagnostic(path: &str, diagnostic: &Diagnostic) -> String {
    let mut output = String::new();
    let severity = match diagnostic.severity {
        DiagnosticSeverity::Error => "error",
        DiagnosticSeverity::Warning => "warning",
    };
    let start = &diagnostic.span.start;
    output.push_str(&format!(
        "{severity}[{}] {}:{}:{} {}\n",
        diagnostic.code, path, start.line, start.column, diagnostic.message
    ));
    for label in &diagnostic.labels {
        let pos = &label.span.start;
        output.push_str(&format!(
            "  note: {} at {}:{}:{}\n",
            label.message, path, pos.line, pos.column
        ));
    }
    output.trim_end().to_string()
}
