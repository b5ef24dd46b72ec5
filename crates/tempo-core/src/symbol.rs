//! Ground symbols as the backend's symbol table sees them.

use std::fmt;

/// A fully ground term: what a backend symbol-table entry is named by.
///
/// Functions carry a classical sign so negated predicate occurrences remain
/// distinct symbols. A constant is a zero-argument function; a tuple is a
/// function with an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Number(i64),
    String(String),
    Function {
        name: String,
        args: Vec<Symbol>,
        positive: bool,
    },
    Infimum,
    Supremum,
}

impl Symbol {
    /// Positive function symbol.
    #[must_use]
    pub fn fun(name: impl Into<String>, args: Vec<Symbol>) -> Self {
        Symbol::Function {
            name: name.into(),
            args,
            positive: true,
        }
    }

    /// Function symbol with explicit sign.
    #[must_use]
    pub fn fun_signed(name: impl Into<String>, args: Vec<Symbol>, positive: bool) -> Self {
        Symbol::Function {
            name: name.into(),
            args,
            positive,
        }
    }

    /// Zero-argument positive constant.
    #[must_use]
    pub fn constant(name: impl Into<String>) -> Self {
        Symbol::fun(name, Vec::new())
    }

    /// The last argument as a number, if this is a function whose last
    /// argument is one. Time-indexed predicates keep the step there.
    #[must_use]
    pub fn step_argument(&self) -> Option<i64> {
        match self {
            Symbol::Function { args, .. } => match args.last() {
                Some(Symbol::Number(n)) => Some(*n),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Number(n) => write!(f, "{n}"),
            Symbol::String(s) => write!(f, "\"{s}\""),
            Symbol::Function {
                name,
                args,
                positive,
            } => {
                if !positive {
                    write!(f, "-")?;
                }
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Symbol::Infimum => write!(f, "#inf"),
            Symbol::Supremum => write!(f, "#sup"),
        }
    }
}
