//! Precedence climbing over a fixed table of levels.
//!
//! | level | operators |
//! |---|---|
//! | 0-3 | `return` `continue` `break` `defer` (prefix) |
//! | 4 | `range` (prefix) |
//! | 5 | `await` (prefix) |
//! | 6 | `=` `+=` `-=` `*=` `/=` `%=` `\|=` `^=` `&=` `<<=` `>>=` (right) |
//! | 7 | `\|\|` |
//! | 8 | `&&` |
//! | 9 | `==` `!=` |
//! | 10 | `<` `<=` `>` `>=` |
//! | 11 | `\|` |
//! | 12 | `^` |
//! | 13 | `&` |
//! | 14 | `<<` `>>` |
//! | 15 | `++` (prefix) |
//! | 16 | `--` (prefix) |
//! | 17 | `++` (postfix) |
//! | 18 | `--` (postfix) |
//! | 19 | `+` `-` |
//! | 20 | `*` `/` `%` |
//! | 21 | `-` `+` `*` `!` `&` (prefix) |
//! | 22 | atoms |
//!
//! A call with gate `g` consumes only operators whose level is above `g`.

use super::{EXPR_FIRST, IDENT_LIKE, LITERAL_FIRST};
use crate::parser::{CompletedMarker, Outcome, Parser, Rule};
use crate::syntax_kind::SyntaxKind::{self, *};

/// Gate that lets every operator through.
const ANY: i32 = -1;

#[derive(Debug, Clone, Copy)]
struct InfixOp {
    token: SyntaxKind,
    level: i32,
    shape: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Left,
    Right,
    Postfix(SyntaxKind),
}

impl<'t> Parser<'t> {
    /// A full expression.
    pub(crate) fn expr(&mut self) -> Outcome {
        let errors = self.error_count();
        match self.expr_node() {
            None => Outcome::NoMatch,
            Some(_) if self.error_count() > errors => Outcome::Recovered,
            Some(_) => Outcome::Matched,
        }
    }

    pub(crate) fn expr_node(&mut self) -> Option<CompletedMarker> {
        self.expr_bp(ANY)
    }

    fn expr_bp(&mut self, gate: i32) -> Option<CompletedMarker> {
        self.rule_node(Rule::Expr, |p| {
            let mut lhs = p.prefix_or_atom()?;
            while let Some(op) = p.infix_op() {
                if op.level <= gate {
                    break;
                }
                let m = lhs.precede(p);
                match op.shape {
                    Shape::Postfix(kind) => {
                        p.bump(op.token);
                        lhs = m.complete(p, kind);
                    }
                    Shape::Left | Shape::Right => {
                        let o = p.start();
                        p.bump(op.token);
                        o.complete(p, BinaryOp);
                        // a right-associative operator may nest itself on the right
                        let rhs_gate = if op.shape == Shape::Right {
                            op.level - 1
                        } else {
                            op.level
                        };
                        if p.expr_bp(rhs_gate).is_none() {
                            p.error("E2002", "expected expression");
                        }
                        lhs = m.complete(p, BinaryExpr);
                    }
                }
            }
            Some(lhs)
        })
    }

    /// The binary or postfix operator at the cursor. Glued operators are
    /// checked before their single-character prefixes, so `&` never takes
    /// half of `&&` and `>` never takes half of `>>` or `>=`.
    fn infix_op(&self) -> Option<InfixOp> {
        let glued = [
            (GtGtEq, 6, Shape::Right),
            (PipePipe, 7, Shape::Left),
            (AmpAmp, 8, Shape::Left),
            (GtEq, 10, Shape::Left),
            (GtGt, 14, Shape::Left),
        ];
        for (token, level, shape) in glued {
            if self.at(token) {
                return Some(InfixOp {
                    token,
                    level,
                    shape,
                });
            }
        }
        let token = self.current();
        let op = match token {
            Eq | PlusEq | MinusEq | StarEq | SlashEq | PercentEq | PipeEq | CaretEq | AmpEq
            | LtLtEq => InfixOp {
                token,
                level: 6,
                shape: Shape::Right,
            },
            EqEq | BangEq => binary(token, 9),
            Lt | LtEq | Gt => binary(token, 10),
            Pipe => binary(token, 11),
            Caret => binary(token, 12),
            Amp => binary(token, 13),
            LtLt => binary(token, 14),
            PlusPlus if !self.has_line_break_before() => postfix(token, 17, PostfixIncExpr),
            // `a --b` is `a` followed by a prefix decrement
            MinusMinus
                if !self.has_line_break_before() && !EXPR_FIRST.contains(self.nth(1)) =>
            {
                postfix(token, 18, PostfixDecExpr)
            }
            Plus | Minus => binary(token, 19),
            Star | Slash | Percent => binary(token, 20),
            _ => return None,
        };
        Some(op)
    }

    /// Prefix forms recurse into the engine at their own level; everything
    /// else is an atom.
    fn prefix_or_atom(&mut self) -> Option<CompletedMarker> {
        let (kind, level) = match self.current() {
            ReturnKw => return Some(self.return_expr()),
            ContinueKw => return Some(self.leaf(ContinueExpr)),
            BreakKw => return Some(self.break_expr()),
            DeferKw => return Some(self.defer_expr()),
            RangeKw => (RangeExpr, 4),
            AwaitKw => (AwaitExpr, 5),
            PlusPlus => (PrefixIncExpr, 15),
            MinusMinus => (PrefixDecExpr, 16),
            Minus | Plus | Star | Bang | Amp => (UnaryExpr, 21),
            _ => return self.atom(),
        };
        let m = self.start();
        self.bump_any();
        if self.expr_bp(level).is_none() {
            self.error("E2002", "expected expression");
        }
        Some(m.complete(self, kind))
    }

    /// `'return' expr?`; the operand has to start on the same line.
    fn return_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(ReturnKw);
        if !self.has_line_break_before() && self.at_set(EXPR_FIRST) {
            self.expr_bp(0);
        }
        m.complete(self, ReturnExpr)
    }

    fn break_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(BreakKw);
        if !self.has_line_break_before() {
            self.eat(IntLiteral);
        }
        m.complete(self, BreakExpr)
    }

    /// `'defer' (AnonymousFunc | BlockBody)`
    fn defer_expr(&mut self) -> CompletedMarker {
        let m = self.start();
        self.bump(DeferKw);
        let deferred = if self.at(LCurly) {
            self.block_body()
        } else {
            self.anonymous_function()
        };
        if !deferred.is_match() {
            self.error("E2002", "expected function or block after 'defer'");
        }
        m.complete(self, DeferExpr)
    }

    fn atom(&mut self) -> Option<CompletedMarker> {
        self.rule_node(Rule::Atom, |p| {
            let current = p.current();
            if LITERAL_FIRST.contains(current) {
                return Some(p.leaf(LiteralExpr));
            }
            if IDENT_LIKE.contains(current) {
                return p.path_or_call();
            }
            match current {
                LCurly => p.dictionary(),
                LBrack => p.list(),
                FunctionKw | AsyncKw | CoroutineKw => p.anonymous_function_node(),
                LParen => p.anonymous_function_node().or_else(|| p.paren_or_tuple()),
                _ => None,
            }
        })
    }

    /// A reference followed by any number of member accesses, index
    /// accesses and calls, each wrapping what came before it.
    pub(crate) fn path_or_call(&mut self) -> Option<CompletedMarker> {
        self.rule_node(Rule::PathOrCall, |p| {
            if !p.at_set(IDENT_LIKE) {
                return None;
            }
            let mut lhs = p.leaf(VarReference);
            loop {
                if p.at(Dot) {
                    let m = lhs.precede(p);
                    p.bump(Dot);
                    if p.at_set(IDENT_LIKE) {
                        p.leaf(VarReference);
                    }
                    lhs = m.complete(p, Path);
                } else if p.at(LBrack) && !p.has_line_break_before() {
                    let m = lhs.precede(p);
                    p.bump(LBrack);
                    p.required_expr();
                    p.expect(RBrack);
                    lhs = m.complete(p, Path);
                } else if p.at(LParen) && !p.has_line_break_before() {
                    let m = lhs.precede(p);
                    p.argument_list();
                    lhs = m.complete(p, CallExpr);
                } else if p.at(Lt) {
                    // `f<T>(x)` is a generic call only if the type arguments
                    // close and a `(` follows; otherwise `<` is a comparison
                    let m = lhs.precede(p);
                    if p.type_argument_list().is_match() && p.at(LParen) {
                        p.argument_list();
                        lhs = m.complete(p, CallExpr);
                    } else {
                        m.rollback(p);
                        break;
                    }
                } else {
                    break;
                }
            }
            Some(lhs)
        })
    }

    /// `'(' (expr (',' expr)* ','?)? ')'`
    fn argument_list(&mut self) -> Outcome {
        self.rule(Rule::ArgumentList, |p| {
            let m = p.start();
            p.bump(LParen);
            p.comma_list(RParen, "E2002", "expression", |p| p.expr());
            let closed = p.expect(RParen);
            m.complete(p, ArgumentList);
            if closed {
                Outcome::Matched
            } else {
                Outcome::Recovered
            }
        })
    }

    /// `'{' ^ (DictionaryField (',' DictionaryField)* ','?)? '}'`
    fn dictionary(&mut self) -> Option<CompletedMarker> {
        self.rule_node(Rule::Dictionary, |p| {
            let m = p.start();
            p.bump(LCurly);
            p.comma_list(RCurly, "E2001", "dictionary field", |p| p.dictionary_field());
            p.expect(RCurly);
            Some(m.complete(p, DictionaryValue))
        })
    }

    /// `(FieldId | StringLiteral) ':' expr`
    fn dictionary_field(&mut self) -> Outcome {
        let m = self.start();
        if self.at_set(IDENT_LIKE) {
            self.leaf(FieldId);
        } else if !self.eat(StringLiteral) {
            m.abandon(self);
            return Outcome::NoMatch;
        }
        let mut outcome = Outcome::Matched;
        if !self.expect(Colon) {
            outcome = Outcome::Recovered;
        }
        outcome = outcome.and(self.required_expr());
        m.complete(self, DictionaryField);
        outcome
    }

    /// `'[' ^ (expr (',' expr)* ','?)? ']'`
    fn list(&mut self) -> Option<CompletedMarker> {
        self.rule_node(Rule::List, |p| {
            let m = p.start();
            p.bump(LBrack);
            p.comma_list(RBrack, "E2002", "expression", |p| p.expr());
            p.expect(RBrack);
            Some(m.complete(p, ListValue))
        })
    }

    fn anonymous_function(&mut self) -> Outcome {
        match self.anonymous_function_node() {
            Some(_) => Outcome::Matched,
            None => Outcome::NoMatch,
        }
    }

    /// `async? coroutine? function ArgumentDeclarationList (':' TypeRef)? BlockBody`
    /// or the arrow form `(params) (':' TypeRef)? '=>' (BlockBody | statement | expr)`.
    ///
    /// The arrow form is speculative up to `=>`: a parenthesized expression
    /// rolls back without a trace.
    fn anonymous_function_node(&mut self) -> Option<CompletedMarker> {
        self.rule_node(Rule::AnonymousFunc, |p| {
            let m = p.start();
            let modifiers = {
                let is_async = p.eat(AsyncKw);
                let is_coroutine = p.eat(CoroutineKw);
                is_async || is_coroutine
            };

            if p.eat(FunctionKw) {
                if p.at(LParen) {
                    p.argument_declarations();
                } else {
                    p.error("E2001", format!("expected {}", LParen.describe()));
                }
                p.return_annotation();
                if !p.block_body().is_match() {
                    p.error("E2001", format!("expected {}", LCurly.describe()));
                }
                return Some(m.complete(p, AnonymousFunc));
            }

            if p.at(LParen) && p.arrow_head() {
                let body = if p.at(LCurly) {
                    p.block_body()
                } else {
                    p.statement_or_expr()
                };
                if !body.is_match() {
                    p.error("E2002", "expected function body");
                }
                return Some(m.complete(p, AnonymousFunc));
            }

            if modifiers {
                p.error("E2001", "expected 'function' or a parameter list");
                return Some(m.complete(p, AnonymousFunc));
            }
            m.rollback(p);
            None
        })
    }

    /// `(params) (':' TypeRef)? '=>'`, consumed only as a whole.
    fn arrow_head(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if self.arrow_parameters() {
            if self.at(Colon) && IDENT_LIKE.contains(self.nth(1)) {
                self.bump(Colon);
                self.type_ref();
            }
            if self.eat(FatArrow) {
                return true;
            }
        }
        self.rewind(checkpoint);
        false
    }

    fn return_annotation(&mut self) {
        if !self.eat(Colon) {
            return;
        }
        if !self.type_ref().is_match() {
            self.error("E2006", "expected return type");
        }
    }

    /// `'(' expr ')'` or a tuple once a comma shows up after the first
    /// element; `()` is the empty tuple.
    fn paren_or_tuple(&mut self) -> Option<CompletedMarker> {
        self.rule_node(Rule::ParenOrTuple, |p| {
            let m = p.start();
            p.bump(LParen);
            if p.eat(RParen) {
                return Some(m.complete(p, TupleExpr));
            }
            p.required_expr();
            let kind = if p.eat(Comma) {
                p.comma_list(RParen, "E2002", "expression", |p| p.expr());
                TupleExpr
            } else {
                ParenExpr
            };
            p.expect(RParen);
            Some(m.complete(p, kind))
        })
    }
}

fn binary(token: SyntaxKind, level: i32) -> InfixOp {
    InfixOp {
        token,
        level,
        shape: Shape::Left,
    }
}

fn postfix(token: SyntaxKind, level: i32, node: SyntaxKind) -> InfixOp {
    InfixOp {
        token,
        level,
        shape: Shape::Postfix(node),
    }
}
