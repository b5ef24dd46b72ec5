//! Incremental solving sessions over scheduled horizon lengths.
//!
//! The loops in [`session`] drive a caller-supplied [`Backend`] and
//! [`tempo_theory::Theory`] through the ground / translate / solve cycle, one
//! horizon length per iteration: [`session::solve_incremental`] grows the
//! horizon step by step, [`session::solve_scheduled`] follows a
//! [`tempo_scheduler::Scheduler`] and may revisit lengths out of order. The
//! [`Solver`] keeps the grounding bookkeeping that makes revisits possible:
//! which steps are grounded, where the final-state marker sits, and which
//! steps are currently skipped.
//!
//! The front-end that rewrites a temporal program into [`ProgramPart`]s and
//! [`FutureSignature`]s is out of scope; sessions consume its output.

pub mod session;
pub mod solver;

pub use session::{solve_incremental, solve_scheduled};
pub use solver::Solver;

use tempo_core::{Backend, GroundPart, Lit, SolveResult, Symbol, FINAL_MARKER, SKIP_PREDICATE};
use tempo_scheduler::ConfigError;
use tempo_theory::TheoryError;
use thiserror::Error;

/// Error ending a session early.
///
/// Inconclusive or failed backend solves are not errors; they surface as
/// [`SolveResult::Unknown`] and feed the schedule.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("theory error: {0}")]
    Theory(#[from] TheoryError),

    #[error("scheduler configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type SessionResult<T> = Result<T, SolveError>;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A model was found, or the stop criterion was met, at this length.
    Stopped { result: SolveResult, length: usize },
    /// The schedule ran dry without meeting the stop criterion.
    Exhausted,
    /// The iteration cap ended the session first.
    Capped { last: Option<SolveResult> },
}

/// Result kind that ends a session once `imin` solving steps are behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopCondition {
    #[default]
    Sat,
    Unsat,
    Unknown,
}

impl StopCondition {
    /// Whether `result` meets the criterion.
    #[must_use]
    pub fn met(self, result: SolveResult) -> bool {
        match self {
            StopCondition::Sat => result.is_sat(),
            StopCondition::Unsat => result.is_unsat(),
            StopCondition::Unknown => result.is_unknown(),
        }
    }
}

/// Iteration bounds and stop criterion of one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolveOptions {
    /// Minimum number of solving steps before `istop` is consulted.
    pub imin: usize,
    /// Maximum number of solving steps; `None` leaves the session unbounded.
    pub imax: Option<usize>,
    /// Result kind that ends the session.
    pub istop: StopCondition,
}

/// When a program part is instantiated, in terms of the back-shifted step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRoot {
    /// Only at `t - i == 0`.
    Initial,
    /// At every `t - i >= 0`.
    Always,
    /// Only at `t - i > 0`.
    Dynamic,
}

impl PartRoot {
    fn admits(self, base: usize) -> bool {
        match self {
            PartRoot::Initial => base == 0,
            PartRoot::Always => true,
            PartRoot::Dynamic => base > 0,
        }
    }
}

/// Named rule group grounded per step, back-shifted over `range`.
///
/// With range `[0, 1]` and root `Always`, step `t` instantiates the part at
/// `t` and at `t - 1`, the latter only once `t` is past the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramPart {
    pub root: PartRoot,
    pub name: String,
    pub range: Vec<usize>,
}

impl ProgramPart {
    #[must_use]
    pub fn new(root: PartRoot, name: impl Into<String>, range: Vec<usize>) -> Self {
        ProgramPart {
            root,
            name: name.into(),
            range,
        }
    }
}

/// Predicate signature whose future incarnations get assumed false.
///
/// An atom of this signature whose step argument exceeds the attempted
/// length refers to a state beyond the horizon. The session assumes it false
/// for that attempt and leaves it open again afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureSignature {
    pub name: String,
    pub arity: usize,
    pub positive: bool,
}

impl FutureSignature {
    #[must_use]
    pub fn new(name: impl Into<String>, arity: usize, positive: bool) -> Self {
        FutureSignature {
            name: name.into(),
            arity,
            positive,
        }
    }
}

/// Part instances to ground for one new step.
#[must_use]
pub fn step_instances(parts: &[ProgramPart], step: usize) -> Vec<GroundPart> {
    let mut instances = Vec::new();
    for part in parts {
        for &shift in &part.range {
            let Some(base) = step.checked_sub(shift) else {
                continue;
            };
            if part.root.admits(base) {
                instances.push(GroundPart::new(part.name.clone(), base, step));
            }
        }
    }
    instances
}

/// Unit assumptions negating every future-signature atom whose step argument
/// lies beyond `length`.
#[must_use]
pub fn future_assumptions<B: Backend>(
    backend: &B,
    future: &[FutureSignature],
    length: usize,
) -> Vec<Lit> {
    let mut assumptions = Vec::new();
    for sig in future {
        for (symbol, lit) in backend.signature_atoms(&sig.name, sig.arity, sig.positive) {
            if symbol.step_argument().is_some_and(|step| step > length as i64) {
                assumptions.push(-lit);
            }
        }
    }
    assumptions
}

/// The `__final(step)` marker symbol.
#[must_use]
pub fn final_marker(step: usize) -> Symbol {
    Symbol::fun(FINAL_MARKER, vec![Symbol::Number(step as i64)])
}

/// The `skip(step)` suppression symbol.
#[must_use]
pub fn skip_atom(step: usize) -> Symbol {
    Symbol::fun(SKIP_PREDICATE, vec![Symbol::Number(step as i64)])
}
