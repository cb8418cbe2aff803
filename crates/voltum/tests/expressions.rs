use rowan::NodeOrToken;
use voltum::{parse_expression, parse_program, Parse, SyntaxKind, SyntaxNode};

/// Nodes as `Kind(children)`, significant tokens as their text.
fn shape(node: &SyntaxNode) -> String {
    let parts: Vec<String> = node
        .children_with_tokens()
        .filter_map(|element| match element {
            NodeOrToken::Node(child) => Some(shape(&child)),
            NodeOrToken::Token(token) if !token.kind().is_trivia() => {
                Some(token.text().to_string())
            }
            NodeOrToken::Token(_) => None,
        })
        .collect();
    format!("{:?}({})", node.kind(), parts.join(" "))
}

fn clean(parse: &Parse) {
    assert!(
        parse.diagnostics().is_empty(),
        "unexpected diagnostics: {:#?}",
        parse.diagnostics()
    );
}

/// The shape of the single construct under an expression fragment.
fn expr(src: &str) -> String {
    let parse = parse_expression(src);
    clean(&parse);
    let root = parse.syntax();
    assert_eq!(root.kind(), SyntaxKind::ExpressionFragment);
    assert_eq!(root.text().to_string(), src);
    let children: Vec<_> = root.children().collect();
    assert_eq!(children.len(), 1, "{}", parse.debug_tree());
    shape(&children[0])
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        expr("a + b * c"),
        "BinaryExpr(VarReference(a) BinaryOp(+) BinaryExpr(VarReference(b) BinaryOp(*) VarReference(c)))"
    );
    assert_eq!(
        expr("a * b + c"),
        "BinaryExpr(BinaryExpr(VarReference(a) BinaryOp(*) VarReference(b)) BinaryOp(+) VarReference(c))"
    );
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(
        expr("a - b - c"),
        "BinaryExpr(BinaryExpr(VarReference(a) BinaryOp(-) VarReference(b)) BinaryOp(-) VarReference(c))"
    );
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(
        expr("a = b = c"),
        "BinaryExpr(VarReference(a) BinaryOp(=) BinaryExpr(VarReference(b) BinaryOp(=) VarReference(c)))"
    );
    assert_eq!(
        expr("a >>= b <<= c"),
        "BinaryExpr(VarReference(a) BinaryOp(>>=) BinaryExpr(VarReference(b) BinaryOp(<<=) VarReference(c)))"
    );
}

#[test]
fn glued_logical_operators_are_not_split() {
    assert_eq!(
        expr("a & b && c"),
        "BinaryExpr(BinaryExpr(VarReference(a) BinaryOp(&) VarReference(b)) BinaryOp(&&) VarReference(c))"
    );
    assert_eq!(
        expr("a | b || c"),
        "BinaryExpr(BinaryExpr(VarReference(a) BinaryOp(|) VarReference(b)) BinaryOp(||) VarReference(c))"
    );
    assert_eq!(
        expr("a || b && c"),
        "BinaryExpr(VarReference(a) BinaryOp(||) BinaryExpr(VarReference(b) BinaryOp(&&) VarReference(c)))"
    );
}

#[test]
fn shifts_bind_tighter_than_comparisons() {
    assert_eq!(
        expr("a > b >> c"),
        "BinaryExpr(VarReference(a) BinaryOp(>) BinaryExpr(VarReference(b) BinaryOp(>>) VarReference(c)))"
    );
    assert_eq!(
        expr("a >= b == c"),
        "BinaryExpr(BinaryExpr(VarReference(a) BinaryOp(>=) VarReference(b)) BinaryOp(==) VarReference(c))"
    );
}

#[test]
fn separated_angle_brackets_stay_two_operators() {
    let parse = parse_expression("a > = b");
    assert!(parse
        .diagnostics()
        .iter()
        .any(|diag| diag.code == "E2002"));
    assert_eq!(parse.syntax().text().to_string(), "a > = b");
}

#[test]
fn unary_minus_binds_tighter_than_multiplication() {
    assert_eq!(
        expr("-a * b"),
        "BinaryExpr(UnaryExpr(- VarReference(a)) BinaryOp(*) VarReference(b))"
    );
    assert_eq!(expr("!done"), "UnaryExpr(! VarReference(done))");
}

#[test]
fn prefix_operators_nest() {
    assert_eq!(expr("++a"), "PrefixIncExpr(++ VarReference(a))");
    assert_eq!(
        expr("++ -- - a"),
        "PrefixIncExpr(++ PrefixDecExpr(-- UnaryExpr(- VarReference(a))))"
    );
    assert_eq!(
        expr("await f(x)"),
        "AwaitExpr(await CallExpr(VarReference(f) ArgumentList(( VarReference(x) ))))"
    );
    assert_eq!(
        expr("range items"),
        "RangeExpr(range VarReference(items))"
    );
}

#[test]
fn postfix_increment_wraps_its_operand() {
    assert_eq!(expr("a++"), "PostfixIncExpr(VarReference(a) ++)");
    assert_eq!(expr("a--"), "PostfixDecExpr(VarReference(a) --)");
}

#[test]
fn minus_minus_before_an_operand_is_a_prefix_decrement() {
    let parse = parse_program("a --b");
    clean(&parse);
    let items: Vec<String> = parse.syntax().children().map(|node| shape(&node)).collect();
    assert_eq!(
        items,
        ["VarReference(a)", "PrefixDecExpr(-- VarReference(b))"]
    );
}

#[test]
fn parentheses_tuples_and_calls_are_told_apart() {
    assert_eq!(expr("foo"), "VarReference(foo)");
    assert_eq!(
        expr("foo(x)"),
        "CallExpr(VarReference(foo) ArgumentList(( VarReference(x) )))"
    );
    assert_eq!(expr("(a)"), "ParenExpr(( VarReference(a) ))");
    assert_eq!(
        expr("(a, b)"),
        "TupleExpr(( VarReference(a) , VarReference(b) ))"
    );
    assert_eq!(expr("(a,)"), "TupleExpr(( VarReference(a) , ))");
    assert_eq!(expr("()"), "TupleExpr(( ))");
}

#[test]
fn member_index_and_call_suffixes_chain_left_to_right() {
    assert_eq!(
        expr("a.b[0].c(d)"),
        "CallExpr(Path(Path(Path(VarReference(a) . VarReference(b)) [ LiteralExpr(0) ]) . VarReference(c)) ArgumentList(( VarReference(d) )))"
    );
}

#[test]
fn generic_call_needs_a_closing_angle_and_parenthesis() {
    assert_eq!(
        expr("f<int>(x)"),
        "CallExpr(VarReference(f) TypeArgumentList(< TypeRef(int) >) ArgumentList(( VarReference(x) )))"
    );
    assert_eq!(
        expr("a < b"),
        "BinaryExpr(VarReference(a) BinaryOp(<) VarReference(b))"
    );
    assert_eq!(
        expr("a < b > c"),
        "BinaryExpr(BinaryExpr(VarReference(a) BinaryOp(<) VarReference(b)) BinaryOp(>) VarReference(c))"
    );
}

#[test]
fn nested_type_arguments_close_on_a_single_shift_token() {
    assert_eq!(
        expr("f<List<Map<K, V>>>(x)"),
        "CallExpr(VarReference(f) TypeArgumentList(< TypeRef(List TypeArgumentList(< TypeRef(Map TypeArgumentList(< TypeRef(K) , TypeRef(V) >)) >)) >) ArgumentList(( VarReference(x) )))"
    );
}

#[test]
fn literals_lists_and_dictionaries() {
    assert_eq!(expr("\"hi\""), "LiteralExpr(\"hi\")");
    assert_eq!(expr("null"), "LiteralExpr(null)");
    assert_eq!(
        expr("{ a: 1, \"b\": [1, 2] }"),
        "DictionaryValue({ DictionaryField(FieldId(a) : LiteralExpr(1)) , DictionaryField(\"b\" : ListValue([ LiteralExpr(1) , LiteralExpr(2) ])) })"
    );
    assert_eq!(expr("[]"), "ListValue([ ])");
}

#[test]
fn arrow_functions_are_recognized_by_their_arrow() {
    assert_eq!(
        expr("(a, b) => a + b"),
        "AnonymousFunc(ArgumentDeclarationList(( IdentifierWithType(ArgumentId(a)) , IdentifierWithType(ArgumentId(b)) )) => BinaryExpr(VarReference(a) BinaryOp(+) VarReference(b)))"
    );
    assert_eq!(
        expr("(int x): int => { return x }"),
        "AnonymousFunc(ArgumentDeclarationList(( IdentifierWithType(TypeRef(int) ArgumentId(x)) )) : TypeRef(int) => BlockBody({ ReturnExpr(return VarReference(x)) }))"
    );
}

#[test]
fn function_keyword_lambdas() {
    assert_eq!(
        expr("function (int x) { return x }"),
        "AnonymousFunc(function ArgumentDeclarationList(( IdentifierWithType(TypeRef(int) ArgumentId(x)) )) BlockBody({ ReturnExpr(return VarReference(x)) }))"
    );
    assert_eq!(
        expr("async function () { }"),
        "AnonymousFunc(async function ArgumentDeclarationList(( )) BlockBody({ }))"
    );
}

#[test]
fn return_operand_must_start_on_the_same_line() {
    let parse = parse_program("return a + b\nreturn\nx");
    clean(&parse);
    let items: Vec<String> = parse.syntax().children().map(|node| shape(&node)).collect();
    assert_eq!(
        items,
        [
            "ReturnExpr(return BinaryExpr(VarReference(a) BinaryOp(+) VarReference(b)))",
            "ReturnExpr(return)",
            "VarReference(x)",
        ]
    );
}

#[test]
fn jump_and_defer_forms() {
    assert_eq!(expr("break 2"), "BreakExpr(break 2)");
    assert_eq!(expr("continue"), "ContinueExpr(continue)");
    assert_eq!(
        expr("defer { close() }"),
        "DeferExpr(defer BlockBody({ CallExpr(VarReference(close) ArgumentList(( ))) }))"
    );
}
