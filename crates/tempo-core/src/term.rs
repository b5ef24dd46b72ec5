//! Raw theory terms as handed over by the backend.

use std::fmt;

use crate::lit::Lit;

/// Unelaborated theory-term AST.
///
/// The front-end embeds temporal formulas in the program as theory atoms;
/// during grounding the backend surfaces their term trees in this shape.
/// Operator applications arrive as [`TheoryTerm::Function`] whose name is the
/// operator string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TheoryTerm {
    Number(i64),
    /// Plain identifier (possibly a quoted string or `#inf`/`#sup`).
    Symbol(String),
    Function(String, Vec<TheoryTerm>),
    Tuple(Vec<TheoryTerm>),
    List(Vec<TheoryTerm>),
    Set(Vec<TheoryTerm>),
}

impl TheoryTerm {
    /// Function shorthand.
    #[must_use]
    pub fn fun(name: impl Into<String>, args: Vec<TheoryTerm>) -> Self {
        TheoryTerm::Function(name.into(), args)
    }

    /// Identifier shorthand.
    #[must_use]
    pub fn sym(name: impl Into<String>) -> Self {
        TheoryTerm::Symbol(name.into())
    }
}

impl fmt::Display for TheoryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[TheoryTerm]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }
        match self {
            TheoryTerm::Number(n) => write!(f, "{n}"),
            TheoryTerm::Symbol(s) => write!(f, "{s}"),
            TheoryTerm::Function(name, args) => {
                write!(f, "{name}(")?;
                list(f, args)?;
                write!(f, ")")
            }
            TheoryTerm::Tuple(items) => {
                write!(f, "(")?;
                list(f, items)?;
                write!(f, ")")
            }
            TheoryTerm::List(items) => {
                write!(f, "[")?;
                list(f, items)?;
                write!(f, "]")
            }
            TheoryTerm::Set(items) => {
                write!(f, "{{")?;
                list(f, items)?;
                write!(f, "}}")
            }
        }
    }
}

/// One temporal theory atom discovered during grounding: the formula term,
/// the backend literal attached to the occurrence, and the time step it was
/// grounded at.
#[derive(Debug, Clone)]
pub struct TheoryAtom {
    pub term: TheoryTerm,
    pub literal: Lit,
    pub step: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_shapes() {
        let term = TheoryTerm::fun(
            ">?",
            vec![TheoryTerm::sym("a"), TheoryTerm::fun("p", vec![TheoryTerm::Number(1)])],
        );
        assert_eq!(term.to_string(), ">?(a,p(1))");
        assert_eq!(
            TheoryTerm::Tuple(vec![TheoryTerm::sym("a"), TheoryTerm::sym("b")]).to_string(),
            "(a,b)"
        );
    }
}
