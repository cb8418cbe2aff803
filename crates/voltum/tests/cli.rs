use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write file");
}

fn voltum(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_voltum"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("run voltum")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

#[test]
fn parse_prints_the_tree_as_json() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("main.vlt"), "var x = 1 + 2\n");

    let output = voltum(temp.path(), &["parse", "main.vlt"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    let file = &json["files"][0];
    assert_eq!(file["path"], "main.vlt");
    assert_eq!(file["tree"]["kind"], "Program");
    assert_eq!(file["tree"]["children"][0]["kind"], "VariableDeclaration");
    assert_eq!(file["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn syntax_errors_fail_and_are_rendered() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("broken.vlt"), ") x\n");

    let output = voltum(temp.path(), &["parse", "broken.vlt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[E2004] broken.vlt:1:1"), "{stderr}");
    // the tree is still printed
    assert_eq!(stdout_json(&output)["files"][0]["tree"]["kind"], "Program");
}

#[test]
fn recursive_target_collects_nested_sources() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("src/a.vlt"), "a\n");
    write_file(&temp.path().join("src/nested/b.vlt"), "b\n");
    write_file(&temp.path().join("src/notes.txt"), "not a source");

    let output = voltum(temp.path(), &["parse", "src/..."]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["files"].as_array().map(Vec::len), Some(2));
}

#[test]
fn tree_flag_prints_an_indented_outline() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("main.vlt"), "f(x)");

    let output = voltum(temp.path(), &["parse", "main.vlt", "--tree"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Program@0..4"), "{stdout}");
    assert!(stdout.contains("  CallExpr@0..4"), "{stdout}");
    assert!(stdout.contains("Ident@0..1 \"f\""), "{stdout}");
}

#[test]
fn entry_flag_overrides_the_config_file() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("voltum.toml"), "[parser]\nentry = \"block\"\n");
    write_file(&temp.path().join("frag.vlt"), "{ }");

    let from_config = voltum(temp.path(), &["parse", "frag.vlt"]);
    assert!(from_config.status.success(), "{}", String::from_utf8_lossy(&from_config.stderr));
    let tree = &stdout_json(&from_config)["files"][0]["tree"];
    assert_eq!(tree["kind"], "BlockFragment");
    assert_eq!(tree["children"][0]["kind"], "BlockBody");

    let from_flag = voltum(temp.path(), &["parse", "frag.vlt", "--entry", "expression"]);
    assert!(from_flag.status.success(), "{}", String::from_utf8_lossy(&from_flag.stderr));
    let tree = &stdout_json(&from_flag)["files"][0]["tree"];
    assert_eq!(tree["kind"], "ExpressionFragment");
    assert_eq!(tree["children"][0]["kind"], "DictionaryValue");
}

#[test]
fn explicit_config_path_is_honoured() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("conf/parse.toml"), "[parser]\nentry = \"statement\"\n");
    write_file(&temp.path().join("stmt.vlt"), "if (a) { }");

    let output = voltum(temp.path(), &["parse", "stmt.vlt", "--config", "conf/parse.toml"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["files"][0]["tree"]["kind"], "StatementFragment");
}

#[test]
fn lex_prints_every_token() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("main.vlt"), "a && b");

    let output = voltum(temp.path(), &["lex", "main.vlt"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    let kinds: Vec<&str> = json["tokens"]
        .as_array()
        .expect("tokens")
        .iter()
        .filter_map(|token| token["kind"].as_str())
        .collect();
    assert_eq!(kinds, ["Ident", "Whitespace", "Amp", "Amp", "Whitespace", "Ident"]);
}

#[test]
fn unknown_command_and_missing_path_fail() {
    let temp = TempDir::new().expect("tempdir");
    let unknown = voltum(temp.path(), &["format"]);
    assert!(!unknown.status.success());
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("unknown command format"));

    let missing = voltum(temp.path(), &["parse", "nope.vlt"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Invalid path: nope.vlt"));
}

#[test]
fn rust_log_turns_on_parser_tracing() {
    let temp = TempDir::new().expect("tempdir");
    write_file(&temp.path().join("broken.vlt"), "var x = 1\n) y\n");

    let quiet = voltum(temp.path(), &["parse", "broken.vlt"]);
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("[TRACE"));

    let traced = Command::new(env!("CARGO_BIN_EXE_voltum"))
        .args(["parse", "broken.vlt"])
        .current_dir(temp.path())
        .env("RUST_LOG", "trace")
        .output()
        .expect("run voltum");
    let stderr = String::from_utf8_lossy(&traced.stderr);
    assert!(stderr.contains("[TRACE voltum::parser]"), "{stderr}");
    assert!(stderr.contains("[DEBUG voltum::parser::recovery]"), "{stderr}");
    assert!(stderr.contains("error[E2004]"), "{stderr}");
}
