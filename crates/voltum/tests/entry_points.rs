use voltum::{
    lex, parse_block, parse_expression, parse_program, parse_statement, parse_text, parse_tokens,
    CancelToken, EntryPoint, ParseError, ParseOptions, SyntaxKind,
};

#[test]
fn empty_program_is_a_clean_empty_root() {
    let parse = parse_program("");
    assert!(parse.ok());
    assert!(parse.diagnostics().is_empty());
    let root = parse.syntax();
    assert_eq!(root.kind(), SyntaxKind::Program);
    assert_eq!(root.children().count(), 0);
    assert_eq!(root.text().to_string(), "");
}

#[test]
fn whitespace_and_comments_only() {
    let src = "  // nothing here\n/* still nothing */\n";
    let parse = parse_program(src);
    assert!(parse.diagnostics().is_empty());
    assert_eq!(parse.syntax().children().count(), 0);
    assert_eq!(parse.syntax().text().to_string(), src);
}

#[test]
fn each_entry_point_has_its_own_root() {
    assert_eq!(
        parse_expression("1 + 2").syntax().kind(),
        SyntaxKind::ExpressionFragment
    );
    assert_eq!(
        parse_statement("var x = 1;").syntax().kind(),
        SyntaxKind::StatementFragment
    );
    let block = parse_block("{ a; b }");
    assert!(block.diagnostics().is_empty());
    assert_eq!(block.syntax().kind(), SyntaxKind::BlockFragment);
    assert_eq!(
        block.syntax().first_child().map(|node| node.kind()),
        Some(SyntaxKind::BlockBody)
    );
}

#[test]
fn empty_expression_fragment_is_clean() {
    let parse = parse_expression("");
    assert!(parse.diagnostics().is_empty());
    assert_eq!(parse.syntax().kind(), SyntaxKind::ExpressionFragment);
}

#[test]
fn fragment_reports_what_follows_its_construct_once() {
    let parse = parse_expression("a b c");
    let [diag] = parse.diagnostics() else {
        panic!("expected one diagnostic: {:#?}", parse.diagnostics());
    };
    assert_eq!(diag.code, "E2005");
    let error = parse.syntax().last_child().expect("error node");
    assert_eq!(error.kind(), SyntaxKind::Error);
    assert_eq!(error.text().to_string(), "b c");
}

#[test]
fn block_entry_requires_a_brace() {
    let parse = parse_block("a");
    let codes: Vec<&str> = parse
        .diagnostics()
        .iter()
        .map(|diag| diag.code.as_str())
        .collect();
    assert_eq!(codes, ["E2001"]);
    assert_eq!(
        parse.syntax().first_child().map(|node| node.kind()),
        Some(SyntaxKind::Error)
    );
}

#[test]
fn entry_point_comes_from_the_options() {
    let options = ParseOptions::with_entry(EntryPoint::Statement);
    let parse = parse_text("if (a) { }", &options, &CancelToken::new()).expect("not cancelled");
    assert_eq!(parse.syntax().kind(), SyntaxKind::StatementFragment);
    assert_eq!(
        parse.syntax().first_child().map(|node| node.kind()),
        Some(SyntaxKind::IfStatement)
    );
}

#[test]
fn cancelled_token_aborts_the_parse() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = parse_text("var x = 1", &ParseOptions::default(), &cancel);
    assert_eq!(result, Err(ParseError::Cancelled));
}

#[test]
fn cancelling_the_parent_cancels_a_child_token() {
    let parent = CancelToken::new();
    let child = parent.child();
    parent.cancel();
    let src = "function f() { return 1 }";
    let (tokens, _) = lex(src);
    let result = parse_tokens(src, &tokens, &ParseOptions::default(), &child);
    assert_eq!(result, Err(ParseError::Cancelled));
}

#[test]
fn same_input_same_tree() {
    let src = "type A struct { x int }\nfunction f(A a) int { return a.x * 2 }\n";
    assert_eq!(parse_program(src), parse_program(src));
}

#[test]
fn nesting_beyond_the_limit_is_reported_once() {
    let depth = 200;
    let src = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let options = ParseOptions {
        max_depth: 64,
        ..ParseOptions::with_entry(EntryPoint::Expression)
    };
    let parse = parse_text(&src, &options, &CancelToken::new()).expect("not cancelled");
    let codes: Vec<&str> = parse
        .diagnostics()
        .iter()
        .map(|diag| diag.code.as_str())
        .collect();
    assert_eq!(codes, ["E2007"]);
    assert_eq!(parse.syntax().text().to_string(), src);
}

#[test]
fn default_limit_handles_deep_but_finite_nesting() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let src = format!("{}1{}", "[".repeat(100), "]".repeat(100));
            let parse = parse_expression(&src);
            assert!(parse.diagnostics().is_empty(), "{:#?}", parse.diagnostics());
            assert_eq!(parse.syntax().text().to_string(), src);
        })
        .expect("spawn parser thread");
    handle.join().expect("parser thread");
}

#[test]
fn reentry_limit_of_zero_rejects_the_root() {
    let src = "var x = 1";
    let options = ParseOptions {
        reentry_limit: 0,
        ..ParseOptions::default()
    };
    let parse = parse_text(src, &options, &CancelToken::new()).expect("not cancelled");
    let codes: Vec<&str> = parse
        .diagnostics()
        .iter()
        .map(|diag| diag.code.as_str())
        .collect();
    assert_eq!(codes, ["E2008"]);
    assert_eq!(parse.syntax().children().count(), 0);
    assert_eq!(parse.syntax().text().to_string(), src);
}
