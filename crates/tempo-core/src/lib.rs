//! Shared vocabulary for the tempo workspace.
//!
//! Everything a grounding/solving backend and the encoding layers have to
//! agree on lives here: literals, truth values, ground symbols, raw theory
//! terms, and the [`Backend`] trait through which the rest of the workspace
//! consumes the backend. This crate deliberately has no dependencies; it is
//! the leaf every other tempo crate builds on.

pub mod backend;
pub mod lit;
pub mod symbol;
pub mod term;

pub use backend::{Backend, GroundPart, RestartPolicy, SolveResult};
pub use lit::{Lit, TruthValue};
pub use symbol::Symbol;
pub use term::{TheoryAtom, TheoryTerm};

/// Ground atom marking the initial state, supplied by the front-end programs.
pub const INITIAL_MARKER: &str = "__initial";

/// Ground atom marking the final state of the currently attempted horizon.
pub const FINAL_MARKER: &str = "__final";

/// External predicate suppressing actions beyond the attempted length.
pub const SKIP_PREDICATE: &str = "skip";
