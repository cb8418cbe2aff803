use super::IDENT_LIKE;
use crate::parser::recovery::MEMBER_SYNC;
use crate::parser::{Outcome, Parser, Rule, TokenSet};
use crate::syntax_kind::SyntaxKind::{self, *};

const ATTRIBUTE_SYNC: TokenSet = TokenSet::new(&[RBrack, RCurly, Semicolon]);

impl<'t> Parser<'t> {
    /// One top-level item: a declaration, a statement or an expression,
    /// with an optional trailing `;`.
    pub(crate) fn item(&mut self) -> Outcome {
        self.rule(Rule::Item, |p| {
            let outcome = match p.declaration_ahead() {
                Some(FunctionKw) => p.func_declaration(),
                Some(TypeKw) => p.type_declaration(),
                Some(SignalKw) => p.signal_declaration(),
                _ => p.statement_or_expr(),
            };
            if outcome.is_match() {
                p.eat(Semicolon);
            }
            outcome
        })
    }

    /// Which declaration starts at the cursor, looking past attributes and
    /// modifiers without consuming anything.
    fn declaration_ahead(&self) -> Option<SyntaxKind> {
        let attributes = self.attributes_len();
        let modifiers = self.modifiers_len(attributes);
        let at = attributes + modifiers;
        match self.nth(at) {
            FunctionKw if IDENT_LIKE.contains(self.nth(at + 1)) => Some(FunctionKw),
            TypeKw if modifiers == 0 => Some(TypeKw),
            SignalKw if modifiers == 0 => Some(SignalKw),
            _ => None,
        }
    }

    fn attributes(&mut self) {
        while self.at(LBrack) {
            self.attribute();
        }
    }

    /// `'[' ^ (call | path) ']'`
    fn attribute(&mut self) -> Outcome {
        self.rule(Rule::Attribute, |p| {
            let m = p.start();
            p.bump(LBrack);
            let mut outcome = Outcome::Matched;
            if !p.at_set(IDENT_LIKE) || p.path_or_call().is_none() {
                p.error("E2001", "expected attribute name");
                outcome = Outcome::Recovered;
            }
            if !p.at(RBrack) {
                p.error("E2001", format!("expected {}", RBrack.describe()));
                p.recover(ATTRIBUTE_SYNC, false);
                outcome = Outcome::Recovered;
            }
            p.eat(RBrack);
            m.complete(p, Attribute);
            outcome
        })
    }

    /// A one-token name node, or a report if there is no name.
    fn name(&mut self, kind: SyntaxKind, what: &str) -> Outcome {
        if self.at_set(IDENT_LIKE) {
            self.leaf(kind);
            return Outcome::Matched;
        }
        self.error("E2001", format!("expected {what}"));
        Outcome::Recovered
    }

    /// Eats the `def`, `async` and `coroutine` modifiers, in that order.
    /// Returns whether `async` or `coroutine` was among them.
    fn modifiers(&mut self) -> bool {
        self.eat(DefKw);
        let is_async = self.eat(AsyncKw);
        let is_coroutine = self.eat(CoroutineKw);
        is_async || is_coroutine
    }

    fn func_declaration(&mut self) -> Outcome {
        self.rule(Rule::FuncDeclaration, |p| {
            let m = p.start();
            p.attributes();
            p.modifiers();
            // malformed attributes can leave the cursor short of `function`
            let mut outcome = if p.expect(FunctionKw) {
                p.name(FuncId, "function name")
            } else {
                Outcome::Recovered
            };
            if p.at(Lt) && !p.type_argument_list().is_match() {
                p.error("E2006", "expected type parameters");
                outcome = Outcome::Recovered;
            }
            outcome = outcome.and(p.required_arguments());
            if p.at_type_start() {
                outcome = outcome.and(p.type_ref());
            }
            if p.at(LCurly) {
                outcome = outcome.and(p.block_body());
            }
            m.complete(p, FuncDeclaration);
            outcome
        })
    }

    /// `'signal' ^ name ArgumentDeclarationList`
    fn signal_declaration(&mut self) -> Outcome {
        self.rule(Rule::SignalDeclaration, |p| {
            let m = p.start();
            p.attributes();
            let mut outcome = Outcome::Matched;
            if !p.expect(SignalKw) {
                outcome = Outcome::Recovered;
            } else if p.at_set(IDENT_LIKE) {
                p.bump_any();
            } else {
                p.error("E2001", "expected signal name");
                outcome = Outcome::Recovered;
            }
            outcome = outcome.and(p.required_arguments());
            m.complete(p, SignalDeclaration);
            outcome
        })
    }

    /// `'type' ^ TypeId ('struct' | 'interface' | 'enum') TypeDeclarationBody`
    fn type_declaration(&mut self) -> Outcome {
        self.rule(Rule::TypeDeclaration, |p| {
            let m = p.start();
            p.attributes();
            let mut outcome = if p.expect(TypeKw) {
                Outcome::Matched
            } else {
                Outcome::Recovered
            };
            let name = if p.at_set(IDENT_LIKE) {
                p.current_text()
            } else {
                ""
            };
            outcome = outcome.and(p.name(TypeId, "type name"));
            if !(p.eat(StructKw) || p.eat(InterfaceKw) || p.eat(EnumKw)) {
                p.error("E2001", "expected 'struct', 'interface' or 'enum'");
                outcome = Outcome::Recovered;
            }
            if p.at(LCurly) {
                outcome = outcome.and(p.type_body(name));
            } else {
                p.error("E2001", format!("expected {}", LCurly.describe()));
                outcome = Outcome::Recovered;
            }
            m.complete(p, TypeDeclaration);
            outcome
        })
    }

    fn type_body(&mut self, type_name: &str) -> Outcome {
        let m = self.start();
        self.bump(LCurly);
        while !self.at(RCurly) && !self.at_eof() {
            if self.eat(Semicolon) {
                continue;
            }
            let before = self.position();
            let outcome = self.type_member(type_name);
            self.recover_after(outcome, MEMBER_SYNC, "E2009", "expected field or method");
            self.ensure_progress(before);
        }
        let closed = self.expect(RCurly);
        m.complete(self, TypeDeclarationBody);
        if closed {
            Outcome::Matched
        } else {
            Outcome::Recovered
        }
    }

    /// A field (`name Type`), a method (`def? async? coroutine? name(...)`)
    /// or a constructor: a method named after its type, without `async`,
    /// `coroutine` or a return type.
    fn type_member(&mut self, type_name: &str) -> Outcome {
        let attributes = self.attributes_len();
        let modifiers = self.modifiers_len(attributes);
        if !IDENT_LIKE.contains(self.nth(attributes + modifiers)) {
            return Outcome::NoMatch;
        }
        let method_shaped = modifiers > 0 || self.nth(attributes + modifiers + 1) == LParen;

        self.rule(Rule::TypeMember, |p| {
            let m = p.start();
            p.attributes();
            if !method_shaped {
                let mut outcome = p.name(VarId, "field name");
                if p.at_type_start() {
                    outcome = outcome.and(p.type_ref());
                } else {
                    p.error("E2006", "expected field type");
                    outcome = Outcome::Recovered;
                }
                p.eat(Semicolon);
                m.complete(p, TypeDeclarationFieldMember);
                return outcome;
            }

            let suspends = p.modifiers();
            let named_like_type = p.at_set(IDENT_LIKE) && p.current_text() == type_name;
            let mut outcome = p.name(FuncId, "method name");
            outcome = outcome.and(p.required_arguments());
            let mut returns = false;
            if p.at_type_start() {
                returns = true;
                outcome = outcome.and(p.type_ref());
            }
            if p.at(LCurly) {
                outcome = outcome.and(p.block_body());
            }
            p.eat(Semicolon);
            let kind = if named_like_type && !suspends && !returns {
                TypeDeclarationConstructor
            } else {
                TypeDeclarationMethodMember
            };
            m.complete(p, kind);
            outcome
        })
    }

    /// An `ArgumentDeclarationList` that has to be there.
    fn required_arguments(&mut self) -> Outcome {
        if self.at(LParen) {
            return self.argument_declarations();
        }
        self.error("E2001", format!("expected {}", LParen.describe()));
        Outcome::Recovered
    }

    /// `'(' ^ (IdentifierWithType (',' IdentifierWithType)* ','?)? ')'`
    pub(crate) fn argument_declarations(&mut self) -> Outcome {
        self.rule(Rule::ArgumentDeclarationList, |p| {
            let m = p.start();
            p.bump(LParen);
            p.comma_list(RParen, "E2001", "parameter", |p| p.parameter(true));
            let closed = p.expect(RParen);
            m.complete(p, ArgumentDeclarationList);
            if closed {
                Outcome::Matched
            } else {
                Outcome::Recovered
            }
        })
    }

    /// The parameter list of an arrow function. Never reports: on anything
    /// unexpected the list is rolled back and `false` returned.
    pub(crate) fn arrow_parameters(&mut self) -> bool {
        let m = self.start();
        self.bump(LParen);
        while !self.at(RParen) {
            if !self.parameter(false).is_match() {
                m.rollback(self);
                return false;
            }
            if !self.eat(Comma) {
                break;
            }
        }
        if !self.eat(RParen) {
            m.rollback(self);
            return false;
        }
        m.complete(self, ArgumentDeclarationList);
        true
    }

    /// `TypeRef? ArgumentId`; the type is present when a name is followed
    /// by another name, by type arguments or by `[]`.
    fn parameter(&mut self, report: bool) -> Outcome {
        let typed = self.at_parameter_type();
        if !typed && !self.at_set(IDENT_LIKE) {
            return Outcome::NoMatch;
        }
        let m = self.start();
        if typed {
            self.type_ref();
        }
        if self.at_set(IDENT_LIKE) {
            self.leaf(ArgumentId);
            m.complete(self, IdentifierWithType);
            return Outcome::Matched;
        }
        if !report {
            m.rollback(self);
            return Outcome::NoMatch;
        }
        self.error("E2001", "expected parameter name");
        m.complete(self, IdentifierWithType);
        Outcome::Recovered
    }

    fn at_parameter_type(&self) -> bool {
        let name = |n: usize| IDENT_LIKE.contains(self.nth(n));
        if self.at(DotDotDot) {
            return name(1);
        }
        name(0)
            && (name(1) || self.nth(1) == Lt || (self.nth(1) == LBrack && self.nth(2) == RBrack))
    }
}
