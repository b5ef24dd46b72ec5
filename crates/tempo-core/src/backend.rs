//! The grounding/solving backend interface.

use crate::lit::{Lit, TruthValue};
use crate::symbol::Symbol;
use crate::term::TheoryAtom;

/// Result of one backend solve call.
///
/// `Unknown` covers every inconclusive outcome, including an exhausted
/// internal restart/conflict budget; it is a normal scheduling signal, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    Sat,
    Unsat,
    Unknown,
}

impl SolveResult {
    #[must_use]
    pub fn is_sat(self) -> bool {
        self == SolveResult::Sat
    }

    #[must_use]
    pub fn is_unsat(self) -> bool {
        self == SolveResult::Unsat
    }

    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == SolveResult::Unknown
    }
}

/// Restart and conflict budget handed through to the backend untouched.
///
/// A `conflicts_per_restart` of zero means the backend's own restart policy
/// is left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub restarts_per_solve: u32,
    pub conflicts_per_restart: u32,
}

/// One program part instance to ground: part name plus the `[t-i, t]`
/// parameter pair of the step it is instantiated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundPart {
    pub name: String,
    pub params: [usize; 2],
}

impl GroundPart {
    #[must_use]
    pub fn new(name: impl Into<String>, base: usize, step: usize) -> Self {
        GroundPart {
            name: name.into(),
            params: [base, step],
        }
    }
}

/// Narrow primitive interface to the grounding/solving backend.
///
/// The encoding and scheduling layers consume the backend exclusively through
/// this trait; no solving machinery is implemented in this workspace. Rule
/// and external emission are infallible by contract — a backend in trouble
/// reports it by returning [`SolveResult::Unknown`] from [`Backend::solve`].
pub trait Backend {
    /// Whatever the backend reports a model as; forwarded verbatim to the
    /// model consumer.
    type Model;

    /// Allocate a fresh boolean atom. The atom is false unless a rule (or
    /// choice, or external control) later gives it support.
    fn add_atom(&mut self) -> Lit;

    /// Add the rule `head :- body`. Negative body literals are default
    /// negation; an empty head makes it an integrity constraint forbidding
    /// the body. With `choice` the head atoms are left free.
    fn add_rule(&mut self, choice: bool, head: &[Lit], body: &[Lit]);

    /// Put a literal under external control with the given truth value, or
    /// hand it back to its clauses with [`TruthValue::Free`].
    fn add_external(&mut self, lit: Lit, value: TruthValue);

    /// Literal of a ground symbol, if the symbol table knows it.
    fn symbol_literal(&self, symbol: &Symbol) -> Option<Lit>;

    /// All ground atoms matching `name/arity` with the given classical sign.
    fn signature_atoms(&self, name: &str, arity: usize, positive: bool) -> Vec<(Symbol, Lit)>;

    /// Temporal theory atoms discovered since the last call.
    fn new_theory_atoms(&mut self) -> Vec<TheoryAtom>;

    /// Ground the given program part instances.
    fn ground(&mut self, parts: &[GroundPart]);

    /// Let the backend simplify after grounding and external changes.
    fn cleanup(&mut self);

    /// Assign a symbolic external to a boolean value. Reversible.
    fn assign_external(&mut self, symbol: &Symbol, value: bool);

    /// Permanently drop external status from a symbolic external.
    fn release_external(&mut self, symbol: &Symbol);

    /// Pass the restart/conflict budget through to the backend.
    fn set_restart_policy(&mut self, policy: RestartPolicy);

    /// Solve under unit assumptions, streaming models to `on_model`.
    fn solve(
        &mut self,
        assumptions: &[Lit],
        on_model: &mut dyn FnMut(&Self::Model),
    ) -> SolveResult;
}
