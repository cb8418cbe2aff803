//! Every terminal and node kind the tree can hold.
//!
//! Terminals come first so that [`TokenSet`](crate::parser::TokenSet) can
//! index them in a `u128`; nodes follow, then the `__Last` sentinel.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum SyntaxKind {
    // trivia
    Whitespace = 0,
    Newline,
    LineComment,
    BlockComment,
    Unknown,

    // literals
    Ident,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    TrueKw,
    FalseKw,
    NullKw,

    // keywords
    VarKw,
    TypeKw,
    StructKw,
    InterfaceKw,
    EnumKw,
    FunctionKw,
    SignalKw,
    RangeKw,
    ReturnKw,
    BreakKw,
    ContinueKw,
    IfKw,
    ElseKw,
    ForKw,
    DeferKw,
    DefKw,
    AsyncKw,
    AwaitKw,
    CoroutineKw,
    YieldKw,
    IntKw,
    FloatKw,
    DoubleKw,
    StringKw,
    BoolKw,
    ObjectKw,
    ArrayKw,

    // punctuation
    LParen,
    RParen,
    LBrack,
    RBrack,
    LCurly,
    RCurly,
    Comma,
    Semicolon,
    Colon,
    ColonColon,
    Dot,
    DotDot,
    DotDotDot,
    Arrow,
    FatArrow,
    Question,
    Tilde,
    Eq,
    EqEq,
    Bang,
    BangEq,
    Lt,
    LtEq,
    LtLt,
    LtLtEq,
    Gt,
    Plus,
    PlusEq,
    PlusPlus,
    Minus,
    MinusEq,
    MinusMinus,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Caret,
    CaretEq,
    Amp,
    AmpEq,
    Pipe,
    PipeEq,

    // glued by the parser from adjacent raw tokens
    AmpAmp,
    PipePipe,
    GtEq,
    GtGt,
    GtGtEq,

    Eof,

    // roots
    Program,
    ExpressionFragment,
    StatementFragment,
    BlockFragment,
    Error,

    // items
    Attribute,
    FuncDeclaration,
    FuncId,
    SignalDeclaration,
    TypeDeclaration,
    TypeId,
    TypeDeclarationBody,
    TypeDeclarationFieldMember,
    TypeDeclarationMethodMember,
    TypeDeclarationConstructor,
    ArgumentDeclarationList,
    IdentifierWithType,
    ArgumentId,
    TypeRef,
    TypeArgumentList,

    // statements
    BlockBody,
    Statement,
    IfStatement,
    ElseStatement,
    ForLoopStatement,
    VariableDeclaration,
    VarId,

    // expressions
    ReturnExpr,
    ContinueExpr,
    BreakExpr,
    DeferExpr,
    RangeExpr,
    AwaitExpr,
    PrefixIncExpr,
    PrefixDecExpr,
    UnaryExpr,
    BinaryExpr,
    BinaryOp,
    PostfixIncExpr,
    PostfixDecExpr,
    LiteralExpr,
    DictionaryValue,
    DictionaryField,
    FieldId,
    ListValue,
    AnonymousFunc,
    Path,
    VarReference,
    CallExpr,
    ArgumentList,
    ParenExpr,
    TupleExpr,

    #[doc(hidden)]
    __Last,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    pub fn is_token(self) -> bool {
        (self as u16) <= (Eof as u16)
    }

    pub fn is_node(self) -> bool {
        (self as u16) > (Eof as u16) && self != __Last
    }

    /// Type-name keywords double as identifiers (`int` is both a type and a
    /// valid name for a member access).
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            IntKw | FloatKw | DoubleKw | StringKw | BoolKw | ObjectKw | ArrayKw
        )
    }

    /// Short human label used in "expected ..." diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Ident => "identifier",
            IntLiteral => "integer literal",
            FloatLiteral => "float literal",
            StringLiteral => "string literal",
            LParen => "'('",
            RParen => "')'",
            LBrack => "'['",
            RBrack => "']'",
            LCurly => "'{'",
            RCurly => "'}'",
            Comma => "','",
            Semicolon => "';'",
            Colon => "':'",
            Dot => "'.'",
            FatArrow => "'=>'",
            Eq => "'='",
            Lt => "'<'",
            Gt => "'>'",
            StructKw => "'struct'",
            InterfaceKw => "'interface'",
            EnumKw => "'enum'",
            FunctionKw => "'function'",
            Eof => "end of input",
            _ if self.is_token() => "token",
            _ => "syntax",
        }
    }

    /// `u16` back into a kind; values past the sentinel are rejected.
    pub fn from_raw(raw: u16) -> Option<SyntaxKind> {
        ALL.get(usize::from(raw)).copied()
    }
}

/// Every kind in discriminant order, so a raw value indexes its kind.
const ALL: [SyntaxKind; __Last as usize] = [
    Whitespace, Newline, LineComment, BlockComment, Unknown, Ident, IntLiteral, FloatLiteral,
    StringLiteral, TrueKw, FalseKw, NullKw, VarKw, TypeKw, StructKw, InterfaceKw, EnumKw,
    FunctionKw, SignalKw, RangeKw, ReturnKw, BreakKw, ContinueKw, IfKw, ElseKw, ForKw, DeferKw,
    DefKw, AsyncKw, AwaitKw, CoroutineKw, YieldKw, IntKw, FloatKw, DoubleKw, StringKw, BoolKw,
    ObjectKw, ArrayKw, LParen, RParen, LBrack, RBrack, LCurly, RCurly, Comma, Semicolon, Colon,
    ColonColon, Dot, DotDot, DotDotDot, Arrow, FatArrow, Question, Tilde, Eq, EqEq, Bang,
    BangEq, Lt, LtEq, LtLt, LtLtEq, Gt, Plus, PlusEq, PlusPlus, Minus, MinusEq, MinusMinus,
    Star, StarEq, Slash, SlashEq, Percent, PercentEq, Caret, CaretEq, Amp, AmpEq, Pipe, PipeEq,
    AmpAmp, PipePipe, GtEq, GtGt, GtGtEq, Eof, Program, ExpressionFragment, StatementFragment,
    BlockFragment, Error, Attribute, FuncDeclaration, FuncId, SignalDeclaration,
    TypeDeclaration, TypeId, TypeDeclarationBody, TypeDeclarationFieldMember,
    TypeDeclarationMethodMember, TypeDeclarationConstructor, ArgumentDeclarationList,
    IdentifierWithType, ArgumentId, TypeRef, TypeArgumentList, BlockBody, Statement,
    IfStatement, ElseStatement, ForLoopStatement, VariableDeclaration, VarId, ReturnExpr,
    ContinueExpr, BreakExpr, DeferExpr, RangeExpr, AwaitExpr, PrefixIncExpr, PrefixDecExpr,
    UnaryExpr, BinaryExpr, BinaryOp, PostfixIncExpr, PostfixDecExpr, LiteralExpr,
    DictionaryValue, DictionaryField, FieldId, ListValue, AnonymousFunc, Path, VarReference,
    CallExpr, ArgumentList, ParenExpr, TupleExpr,
];

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoltumLanguage {}

impl rowan::Language for VoltumLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0).unwrap_or(Error)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<VoltumLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<VoltumLanguage>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;
