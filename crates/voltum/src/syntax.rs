use crate::syntax_kind::SyntaxKind::{self, *};

pub const KEYWORDS_DECLARATION: &[(&str, SyntaxKind)] = &[
    ("var", VarKw),
    ("type", TypeKw),
    ("struct", StructKw),
    ("interface", InterfaceKw),
    ("enum", EnumKw),
    ("function", FunctionKw),
    ("signal", SignalKw),
    ("def", DefKw),
    ("async", AsyncKw),
    ("coroutine", CoroutineKw),
];

pub const KEYWORDS_CONTROL: &[(&str, SyntaxKind)] = &[
    ("if", IfKw),
    ("else", ElseKw),
    ("for", ForKw),
    ("return", ReturnKw),
    ("break", BreakKw),
    ("continue", ContinueKw),
    ("defer", DeferKw),
    ("range", RangeKw),
    ("await", AwaitKw),
    ("yield", YieldKw),
];

pub const LITERAL_KEYWORDS: &[(&str, SyntaxKind)] =
    &[("true", TrueKw), ("false", FalseKw), ("null", NullKw)];

/// Builtin type names; several spellings map to the same kind.
pub const TYPE_NAMES: &[(&str, SyntaxKind)] = &[
    ("int", IntKw),
    ("int32", IntKw),
    ("i32", IntKw),
    ("float", FloatKw),
    ("float32", FloatKw),
    ("f32", FloatKw),
    ("double", DoubleKw),
    ("float64", DoubleKw),
    ("f64", DoubleKw),
    ("string", StringKw),
    ("str", StringKw),
    ("bool", BoolKw),
    ("boolean", BoolKw),
    ("object", ObjectKw),
    ("Object", ObjectKw),
    ("array", ArrayKw),
    ("Array", ArrayKw),
];

pub const SYMBOLS_3: &[([char; 3], SyntaxKind)] = &[
    (['.', '.', '.'], DotDotDot),
    (['<', '<', '='], LtLtEq),
];

// `&&`, `||` and every `>`-prefixed operator are deliberately absent: the
// lexer emits the single characters and the parser glues adjacent ones, so
// `List<List<int>>` still closes two type argument lists.
pub const SYMBOLS_2: &[([char; 2], SyntaxKind)] = &[
    (['=', '>'], FatArrow),
    (['-', '>'], Arrow),
    (['=', '='], EqEq),
    (['!', '='], BangEq),
    (['<', '='], LtEq),
    (['<', '<'], LtLt),
    ([':', ':'], ColonColon),
    (['.', '.'], DotDot),
    (['+', '+'], PlusPlus),
    (['-', '-'], MinusMinus),
    (['+', '='], PlusEq),
    (['-', '='], MinusEq),
    (['*', '='], StarEq),
    (['/', '='], SlashEq),
    (['%', '='], PercentEq),
    (['^', '='], CaretEq),
    (['&', '='], AmpEq),
    (['|', '='], PipeEq),
];

pub const SYMBOLS_1: &[(char, SyntaxKind)] = &[
    ('(', LParen),
    (')', RParen),
    ('[', LBrack),
    (']', RBrack),
    ('{', LCurly),
    ('}', RCurly),
    (',', Comma),
    (';', Semicolon),
    (':', Colon),
    ('.', Dot),
    ('?', Question),
    ('~', Tilde),
    ('=', Eq),
    ('!', Bang),
    ('<', Lt),
    ('>', Gt),
    ('+', Plus),
    ('-', Minus),
    ('*', Star),
    ('/', Slash),
    ('%', Percent),
    ('^', Caret),
    ('&', Amp),
    ('|', Pipe),
];

pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    KEYWORDS_DECLARATION
        .iter()
        .chain(KEYWORDS_CONTROL)
        .chain(LITERAL_KEYWORDS)
        .chain(TYPE_NAMES)
        .find(|(spelling, _)| *spelling == text)
        .map(|(_, kind)| *kind)
}
