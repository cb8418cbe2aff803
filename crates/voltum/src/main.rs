use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use voltum::{
    lex, load_options, parse_target, render_diagnostics, CstNode, Diagnostic, EntryPoint,
    ParseOptions, SyntaxKind, VoltumError,
};

/// Writes `voltum` records to stderr at the level named by `RUST_LOG`.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.target().starts_with("voltum")
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let Some(level) = env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<log::LevelFilter>().ok())
    else {
        return;
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(VoltumError::Diagnostics) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), VoltumError> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_help();
        return Ok(());
    };
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "-h" | "--help" => {
            print_help();
            Ok(())
        }
        "parse" => cmd_parse(&rest),
        "lex" => cmd_lex(&rest),
        other => Err(VoltumError::InvalidCommand(format!(
            "unknown command {other}"
        ))),
    }
}

fn cmd_parse(args: &[String]) -> Result<(), VoltumError> {
    let mut target = None;
    let mut entry = None;
    let mut config = None;
    let mut tree = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tree" => tree = true,
            "--entry" => {
                let value = iter.next().ok_or_else(|| {
                    VoltumError::InvalidCommand("--entry expects a value".to_string())
                })?;
                entry = Some(value.parse::<EntryPoint>()?);
            }
            "--config" => {
                let value = iter.next().ok_or_else(|| {
                    VoltumError::InvalidCommand("--config expects a path".to_string())
                })?;
                config = Some(value.clone());
            }
            value if !value.starts_with('-') && target.is_none() => {
                target = Some(value.to_string());
            }
            other => {
                return Err(VoltumError::InvalidCommand(format!(
                    "unexpected parse argument {other}"
                )));
            }
        }
    }
    let Some(target) = target else {
        print_help();
        return Ok(());
    };

    let mut options = match config {
        Some(path) => load_options(Path::new(&path))?,
        None => default_options(),
    };
    if let Some(entry) = entry {
        options.entry = entry;
    }

    let bundle = parse_target(&target, &options)?;
    if tree {
        for file in &bundle.files {
            println!("// {}", file.path);
            print_node(&file.tree, 0);
        }
    } else {
        let output = serde_json::to_string_pretty(&bundle)
            .map_err(|err| VoltumError::Io(std::io::Error::other(err)))?;
        println!("{output}");
    }
    for file in &bundle.files {
        report(&file.path, &file.diagnostics);
    }

    if bundle.has_errors() {
        return Err(VoltumError::Diagnostics);
    }
    Ok(())
}

/// `voltum.toml` in the working directory, when there is one.
fn default_options() -> ParseOptions {
    let path = Path::new("voltum.toml");
    if !path.is_file() {
        return ParseOptions::default();
    }
    match load_options(path) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("ignoring voltum.toml: {err}");
            ParseOptions::default()
        }
    }
}

fn print_node(node: &CstNode, indent: usize) {
    let [start, end] = node.range;
    match &node.text {
        Some(text) => println!("{}{:?}@{start}..{end} {text:?}", "  ".repeat(indent), node.kind),
        None => println!("{}{:?}@{start}..{end}", "  ".repeat(indent), node.kind),
    }
    for child in &node.children {
        print_node(child, indent + 1);
    }
}

fn report(path: &str, diagnostics: &[Diagnostic]) {
    let rendered = render_diagnostics(path, diagnostics);
    if !rendered.is_empty() {
        eprintln!("{rendered}");
    }
}

#[derive(Serialize)]
struct LexedToken<'a> {
    kind: SyntaxKind,
    range: [u32; 2],
    text: &'a str,
}

#[derive(Serialize)]
struct LexOutput<'a> {
    path: String,
    tokens: Vec<LexedToken<'a>>,
    diagnostics: Vec<Diagnostic>,
}

fn cmd_lex(args: &[String]) -> Result<(), VoltumError> {
    let Some(path) = args.first() else {
        print_help();
        return Ok(());
    };
    let content = fs::read_to_string(path)?;
    let (tokens, diagnostics) = lex(&content);
    let output = LexOutput {
        path: path.clone(),
        tokens: tokens
            .iter()
            .map(|token| LexedToken {
                kind: token.kind,
                range: [u32::from(token.range.start()), u32::from(token.range.end())],
                text: token.text(&content),
            })
            .collect(),
        diagnostics,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|err| VoltumError::Io(std::io::Error::other(err)))?;
    println!("{json}");
    report(path, &output.diagnostics);
    if output.diagnostics.iter().any(Diagnostic::is_error) {
        return Err(VoltumError::Diagnostics);
    }
    Ok(())
}

fn print_help() {
    println!(
        "voltum\n\nUSAGE:\n  voltum <COMMAND>\n\nCOMMANDS:\n  parse <path|dir/...> [--entry program|expression|statement|block] [--config voltum.toml] [--tree]\n  lex <path>\n\n  -h, --help"
    );
}
