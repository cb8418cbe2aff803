use super::IDENT_LIKE;
use crate::parser::recovery::BLOCK_SYNC;
use crate::parser::{Outcome, Parser, Rule};
use crate::syntax_kind::SyntaxKind::{self, *};

impl<'t> Parser<'t> {
    /// `'{' ^ block_statement* '}'`
    pub(crate) fn block_body(&mut self) -> Outcome {
        self.rule(Rule::BlockBody, |p| {
            if !p.at(LCurly) {
                return Outcome::NoMatch;
            }
            let m = p.start();
            p.bump(LCurly);
            while !p.at(RCurly) && !p.at_eof() {
                let before = p.position();
                p.block_statement();
                p.ensure_progress(before);
            }
            let closed = p.expect(RCurly);
            m.complete(p, BlockBody);
            if closed {
                Outcome::Matched
            } else {
                Outcome::Recovered
            }
        })
    }

    fn block_statement(&mut self) {
        self.rule(Rule::BlockStatement, |p| {
            if p.eat(Semicolon) {
                return Outcome::Matched;
            }
            let outcome = p.statement_or_expr();
            p.recover_after(outcome, BLOCK_SYNC, "E2003", "expected statement");
            p.eat(Semicolon);
            outcome
        });
    }

    pub(crate) fn statement_or_expr(&mut self) -> Outcome {
        match self.statement() {
            Outcome::NoMatch => self.expr(),
            outcome => outcome,
        }
    }

    /// `IfStatement | ForLoopStatement | VariableDeclaration`, inside a
    /// `Statement` wrapper that never survives into the tree.
    pub(crate) fn statement(&mut self) -> Outcome {
        self.rule(Rule::Statement, |p| {
            let m = p.start();
            let outcome = match p.current() {
                IfKw => p.if_statement(),
                ForKw => p.for_statement(),
                VarKw => p.variable_declaration(),
                _ => Outcome::NoMatch,
            };
            if outcome.is_match() {
                m.collapse(p, Statement);
            } else {
                m.abandon(p);
            }
            outcome
        })
    }

    /// A block that has to be there.
    fn required_block(&mut self) -> Outcome {
        match self.block_body() {
            Outcome::NoMatch => {
                self.error("E2001", format!("expected {}", LCurly.describe()));
                Outcome::Recovered
            }
            outcome => outcome,
        }
    }

    /// An expression that has to be there.
    pub(crate) fn required_expr(&mut self) -> Outcome {
        match self.expr() {
            Outcome::NoMatch => {
                self.error("E2002", "expected expression");
                Outcome::Recovered
            }
            outcome => outcome,
        }
    }

    fn expect_outcome(&mut self, kind: SyntaxKind) -> Outcome {
        if self.expect(kind) {
            Outcome::Matched
        } else {
            Outcome::Recovered
        }
    }

    /// `'if' ^ '(' expr ')' BlockBody ElseStatement?`
    fn if_statement(&mut self) -> Outcome {
        self.rule(Rule::IfStatement, |p| {
            let m = p.start();
            p.bump(IfKw);
            let mut outcome = p.expect_outcome(LParen);
            outcome = outcome.and(p.required_expr());
            outcome = outcome.and(p.expect_outcome(RParen));
            outcome = outcome.and(p.required_block());
            if p.at(ElseKw) {
                outcome = outcome.and(p.else_statement());
            }
            m.complete(p, IfStatement);
            outcome
        })
    }

    /// `'else' ^ (IfStatement | BlockBody)`
    fn else_statement(&mut self) -> Outcome {
        self.rule(Rule::ElseStatement, |p| {
            let m = p.start();
            p.bump(ElseKw);
            let outcome = if p.at(IfKw) {
                p.if_statement()
            } else {
                p.required_block()
            };
            m.complete(p, ElseStatement);
            outcome
        })
    }

    /// `'for' ^ ('(' VariableDeclaration? ';'? (expr ';')? expr? ')')? BlockBody`
    fn for_statement(&mut self) -> Outcome {
        self.rule(Rule::ForLoop, |p| {
            let m = p.start();
            p.bump(ForKw);
            let mut outcome = Outcome::Matched;
            if p.eat(LParen) {
                if p.at(VarKw) {
                    outcome = outcome.and(p.variable_declaration());
                }
                p.eat(Semicolon);
                if !p.at(RParen) && !p.at(Semicolon) {
                    outcome = outcome.and(p.required_expr());
                }
                if p.eat(Semicolon) && !p.at(RParen) {
                    outcome = outcome.and(p.required_expr());
                }
                outcome = outcome.and(p.expect_outcome(RParen));
            }
            outcome = outcome.and(p.required_block());
            m.complete(p, ForLoopStatement);
            outcome
        })
    }

    /// `'var' ^ (VarId ('=' expr)? | '(' VarId (',' VarId)* ','? ')' ('=' expr (',' expr)*)?)`
    ///
    /// Several values after a tuple target are wrapped into one `TupleExpr`.
    fn variable_declaration(&mut self) -> Outcome {
        self.rule(Rule::VariableDeclaration, |p| {
            let m = p.start();
            p.bump(VarKw);
            let mut outcome = Outcome::Matched;
            if p.eat(LParen) {
                p.comma_list(RParen, "E2001", "variable name", |p| {
                    if p.at_set(IDENT_LIKE) {
                        p.leaf(VarId);
                        Outcome::Matched
                    } else {
                        Outcome::NoMatch
                    }
                });
                outcome = outcome.and(p.expect_outcome(RParen));
                if p.eat(Eq) {
                    outcome = outcome.and(p.tuple_initializer());
                }
            } else if p.at_set(IDENT_LIKE) {
                p.leaf(VarId);
                if p.eat(Eq) {
                    outcome = outcome.and(p.required_expr());
                }
            } else {
                p.error("E2001", "expected variable name");
                outcome = Outcome::Recovered;
            }
            m.complete(p, VariableDeclaration);
            outcome
        })
    }

    fn tuple_initializer(&mut self) -> Outcome {
        let errors = self.error_count();
        let Some(first) = self.expr_node() else {
            self.error("E2002", "expected expression");
            return Outcome::Recovered;
        };
        if self.at(Comma) {
            let tuple = first.precede(self);
            while self.eat(Comma) {
                if self.expr_node().is_none() {
                    self.error("E2002", "expected expression");
                    break;
                }
            }
            tuple.complete(self, TupleExpr);
        }
        if self.error_count() > errors {
            Outcome::Recovered
        } else {
            Outcome::Matched
        }
    }
}
