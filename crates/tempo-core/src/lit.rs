//! Solver literals.

use std::fmt;
use std::ops::Neg;

/// A signed reference to a backend boolean atom.
///
/// Positive values denote the atom itself, negative values its negation,
/// matching the program-literal convention of clause-level backends. Zero is
/// not a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Wrap a raw signed program literal. Panics on zero.
    #[must_use]
    pub fn new(raw: i32) -> Self {
        assert!(raw != 0, "0 is not a literal");
        Self(raw)
    }

    /// Positive literal for an atom index (1-based).
    #[must_use]
    pub fn positive(atom: u32) -> Self {
        Self::new(atom as i32)
    }

    /// The raw signed value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Index of the underlying atom, sign stripped.
    #[must_use]
    pub const fn atom(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Whether this literal is the positive polarity of its atom.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truth value for externally controlled atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruthValue {
    True,
    False,
    /// Left open: the external no longer pins the atom and the clauses on it
    /// take over.
    Free,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_flips_sign() {
        let lit = Lit::new(7);
        assert_eq!((-lit).raw(), -7);
        assert_eq!(-(-lit), lit);
        assert_eq!((-lit).atom(), 7);
        assert!(!(-lit).is_positive());
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(Lit::new(-3) < Lit::new(2));
        assert!(Lit::new(2) < Lit::new(5));
    }

    #[test]
    #[should_panic]
    fn test_zero_rejected() {
        let _ = Lit::new(0);
    }
}
