use rowan::NodeOrToken;
use voltum::{parse_program, SyntaxKind, SyntaxNode};

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

fn program(src: &str) -> SyntaxNode {
    let parse = parse_program(src);
    assert!(
        parse.diagnostics().is_empty(),
        "unexpected diagnostics: {:#?}",
        parse.diagnostics()
    );
    let root = parse.syntax();
    assert_eq!(root.text().to_string(), src);
    root
}

#[test]
fn function_declaration_with_return_type() {
    let root = program("function add(int a, int b) int { return a + b }");
    assert_eq!(
        shape(&root.first_child().expect("declaration")),
        "FuncDeclaration(function FuncId(add) ArgumentDeclarationList(( \
         IdentifierWithType(TypeRef(int) ArgumentId(a)) , IdentifierWithType(TypeRef(int) ArgumentId(b)) )) \
         TypeRef(int) BlockBody({ ReturnExpr(return BinaryExpr(VarReference(a) BinaryOp(+) VarReference(b))) }))"
    );
}

#[test]
fn attributes_modifiers_and_type_parameters() {
    let root = program("[Export] async function load<T>(string path) { }");
    assert_eq!(
        shape(&root.first_child().expect("declaration")),
        "FuncDeclaration(Attribute([ VarReference(Export) ]) async function FuncId(load) \
         TypeArgumentList(< TypeRef(T) >) ArgumentDeclarationList(( \
         IdentifierWithType(TypeRef(string) ArgumentId(path)) )) BlockBody({ }))"
    );
}

#[test]
fn attribute_may_be_a_call() {
    let root = program("[Route(\"/home\")]\nfunction home() { }");
    let attribute = root
        .descendants()
        .find(|node| node.kind() == SyntaxKind::Attribute)
        .expect("attribute");
    assert_eq!(
        shape(&attribute),
        "Attribute([ CallExpr(VarReference(Route) ArgumentList(( LiteralExpr(\"/home\") ))) ])"
    );
}

#[test]
fn variadic_and_array_parameter_types() {
    let root = program("function log(string[] tags, ...object rest) { }");
    let params = root
        .descendants()
        .find(|node| node.kind() == SyntaxKind::ArgumentDeclarationList)
        .expect("parameters");
    assert_eq!(
        shape(&params),
        "ArgumentDeclarationList(( IdentifierWithType(TypeRef(string [ ]) ArgumentId(tags)) , \
         IdentifierWithType(TypeRef(... object) ArgumentId(rest)) ))"
    );
}

#[test]
fn struct_members_are_classified() {
    let src = "type Point struct {
    x float
    y float
    Point(float x, float y) { }
    def length() float { return 0 }
    async refresh() { }
}
";
    let root = program(src);
    let declaration = root.first_child().expect("type declaration");
    assert_eq!(declaration.kind(), SyntaxKind::TypeDeclaration);
    let body = declaration
        .children()
        .find(|node| node.kind() == SyntaxKind::TypeDeclarationBody)
        .expect("body");
    let members: Vec<SyntaxKind> = body.children().map(|node| node.kind()).collect();
    assert_eq!(
        members,
        [
            SyntaxKind::TypeDeclarationFieldMember,
            SyntaxKind::TypeDeclarationFieldMember,
            SyntaxKind::TypeDeclarationConstructor,
            SyntaxKind::TypeDeclarationMethodMember,
            SyntaxKind::TypeDeclarationMethodMember,
        ]
    );
    assert_eq!(
        shape(&body.first_child().expect("field")),
        "TypeDeclarationFieldMember(VarId(x) TypeRef(float))"
    );
}

#[test]
fn method_with_return_type_is_not_a_constructor() {
    let root = program("type Box interface {\n  Box() Box\n}");
    let member = root
        .descendants()
        .find(|node| node.kind() == SyntaxKind::TypeDeclarationMethodMember);
    assert!(member.is_some(), "{}", shape(&root));
}

#[test]
fn enum_and_signal_declarations() {
    let root = program("type Color enum { }\nsignal changed(int value)");
    let items: Vec<String> = root.children().map(|node| shape(&node)).collect();
    assert_eq!(
        items,
        [
            "TypeDeclaration(type TypeId(Color) enum TypeDeclarationBody({ }))",
            "SignalDeclaration(signal changed ArgumentDeclarationList(( \
             IdentifierWithType(TypeRef(int) ArgumentId(value)) )))",
        ]
    );
}

#[test]
fn top_level_mixes_declarations_statements_and_expressions() {
    let root = program("var greeting = \"hi\";\nfunction main() { print(greeting) }\nmain()\n");
    let kinds: Vec<SyntaxKind> = root.children().map(|node| node.kind()).collect();
    assert_eq!(
        kinds,
        [
            SyntaxKind::VariableDeclaration,
            SyntaxKind::FuncDeclaration,
            SyntaxKind::CallExpr,
        ]
    );
}

#[test]
fn function_without_a_name_is_a_lambda_expression() {
    let root = program("function () { }");
    assert_eq!(
        root.first_child().map(|node| node.kind()),
        Some(SyntaxKind::AnonymousFunc)
    );
}
