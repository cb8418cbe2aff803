use super::IDENT_LIKE;
use crate::parser::{Outcome, Parser, Rule};
use crate::syntax_kind::SyntaxKind::*;

impl<'t> Parser<'t> {
    pub(crate) fn at_type_start(&self) -> bool {
        self.at_set(IDENT_LIKE) || (self.at(DotDotDot) && IDENT_LIKE.contains(self.nth(1)))
    }

    /// `'...' name TypeArgumentList? | name TypeArgumentList? ('[' ']')?`
    pub(crate) fn type_ref(&mut self) -> Outcome {
        self.rule(Rule::TypeRef, |p| {
            if !p.at_type_start() {
                return Outcome::NoMatch;
            }
            let m = p.start();
            let variadic = p.eat(DotDotDot);
            p.bump_any();
            if p.at(Lt) {
                p.type_argument_list();
            }
            if !variadic && p.at(LBrack) && p.nth(1) == RBrack {
                p.bump(LBrack);
                p.bump(RBrack);
            }
            m.complete(p, TypeRef);
            Outcome::Matched
        })
    }

    /// `'<' TypeRef (',' TypeRef)* ','? '>'`, always speculative: anything
    /// else rolls the list back and leaves `<` to the caller.
    ///
    /// The closing `>` may be the first half of `>>` or `>=`, which is how
    /// `List<Map<K, V>>` closes both lists.
    pub(crate) fn type_argument_list(&mut self) -> Outcome {
        self.rule(Rule::TypeArgumentList, |p| {
            let m = p.start();
            p.bump(Lt);
            loop {
                if !p.at_type_start() || !p.type_ref().is_match() {
                    m.rollback(p);
                    return Outcome::NoMatch;
                }
                if !p.eat(Comma) || p.current() == Gt {
                    break;
                }
            }
            if p.current() != Gt {
                m.rollback(p);
                return Outcome::NoMatch;
            }
            p.bump(Gt);
            m.complete(p, TypeArgumentList);
            Outcome::Matched
        })
    }
}
