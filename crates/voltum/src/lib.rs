//! Lossless concrete syntax trees for VoltumScript.
//!
//! [`lex`] turns text into a token stream, [`parse_tokens`] turns a token
//! stream into a [`Parse`]: a `rowan` tree that reproduces the input byte
//! for byte, plus every diagnostic found on the way. Invalid input still
//! yields a complete tree.

use std::fs;
use std::path::{Path, PathBuf};

mod cancel;
mod config;
mod cst;
mod diagnostics;
mod lexer;
mod parser;
mod syntax;
mod syntax_kind;

pub use cancel::CancelToken;
pub use config::{load_options, read_voltum_toml, EntryPoint, ParseOptions, VoltumToml};
pub use cst::{cst_node, CstBundle, CstFile, CstNode};
pub use diagnostics::{
    render_diagnostic, render_diagnostics, Diagnostic, DiagnosticLabel, DiagnosticSeverity,
    LineIndex, Position, Span,
};
pub use lexer::{lex, Token};
pub use parser::{parse_tokens, Parse, TokenSet};
pub use syntax::keyword_kind;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, VoltumLanguage};

/// Engine-level failure. Syntax errors are never reported this way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("parse cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum VoltumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("diagnostics emitted")]
    Diagnostics,
}

/// Lexes and parses `text` from `options.entry`, merging lexical and
/// syntactic diagnostics in source order.
pub fn parse_text(
    text: &str,
    options: &ParseOptions,
    cancel: &CancelToken,
) -> Result<Parse, ParseError> {
    let (tokens, lex_diagnostics) = lex(text);
    let mut parse = parse_tokens(text, &tokens, options, cancel)?;
    parse.push_diagnostics(lex_diagnostics);
    Ok(parse)
}

fn parse_uncancellable(text: &str, entry: EntryPoint) -> Parse {
    let (tokens, lex_diagnostics) = lex(text);
    let mut parse = parser::parse_to_end(text, &tokens, &ParseOptions::with_entry(entry));
    parse.push_diagnostics(lex_diagnostics);
    parse
}

pub fn parse_program(text: &str) -> Parse {
    parse_uncancellable(text, EntryPoint::Program)
}

pub fn parse_expression(text: &str) -> Parse {
    parse_uncancellable(text, EntryPoint::Expression)
}

pub fn parse_statement(text: &str) -> Parse {
    parse_uncancellable(text, EntryPoint::Statement)
}

pub fn parse_block(text: &str) -> Parse {
    parse_uncancellable(text, EntryPoint::Block)
}

pub fn parse_target(target: &str, options: &ParseOptions) -> Result<CstBundle, VoltumError> {
    let mut files = Vec::new();
    for path in expand_target(target)? {
        files.push(parse_file(&path, options)?);
    }
    Ok(CstBundle { files })
}

pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<CstFile, VoltumError> {
    let content = fs::read_to_string(path)?;
    let parse = parse_text(&content, options, &CancelToken::new())?;
    log::debug!(
        "parsed {}: {} diagnostic(s)",
        path.display(),
        parse.diagnostics().len()
    );
    Ok(CstFile {
        path: path.display().to_string(),
        byte_count: content.len(),
        line_count: content.lines().count(),
        tree: cst_node(&parse.syntax(), &content),
        diagnostics: parse.diagnostics().to_vec(),
    })
}

fn expand_target(target: &str) -> Result<Vec<PathBuf>, VoltumError> {
    let mut paths = Vec::new();
    let (base, recursive) = match target.strip_suffix("/...") {
        Some(base) => (if base.is_empty() { "." } else { base }, true),
        None => (target, false),
    };

    let path = Path::new(base);
    if !path.exists() {
        return Err(VoltumError::InvalidPath(target.to_string()));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if recursive {
        collect_files(path, &mut paths)?;
    } else {
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_file() && is_source(&entry_path) {
                paths.push(entry_path);
            }
        }
    }

    paths.sort();
    if paths.is_empty() {
        return Err(VoltumError::InvalidPath(target.to_string()));
    }
    Ok(paths)
}

fn collect_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), VoltumError> {
    for entry in fs::read_dir(dir)? {
        let entry_path = entry?.path();
        if entry_path.is_dir() {
            collect_files(&entry_path, paths)?;
            continue;
        }
        if is_source(&entry_path) {
            paths.push(entry_path);
        }
    }
    Ok(())
}

fn is_source(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("vlt")
}
