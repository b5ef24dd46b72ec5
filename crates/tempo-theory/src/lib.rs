//! Temporal formula store and Tseitin-style clausal translation.
//!
//! The front-end embeds temporal formulas in logic programs as theory atoms.
//! This crate elaborates their raw term trees into interned formula nodes and
//! compiles each node, per time step, into an equisatisfiable set of backend
//! clauses: one literal per (node, step), memoized, with forward references
//! from next-like operators bridged by externally controlled placeholder
//! atoms that are unified and released once the horizon has grown far enough.

pub mod elaborate;
pub mod formula;
pub mod theory;

pub use formula::{BoolOp, Formula, NodeId, TelOp};
pub use theory::Theory;

use thiserror::Error;

/// A theory term that does not denote a well-formed temporal formula.
///
/// Raised during elaboration, before any clause is emitted for the offending
/// batch; translation itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("invalid atom: {0}")]
    InvalidAtom(String),
    #[error("invalid temporal formula: {0}")]
    InvalidFormula(String),
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
    #[error("temporal formulas use < instead of leading primes: {0}")]
    LeadingPrime(String),
    #[error("temporal formulas use > instead of trailing primes: {0}")]
    TrailingPrime(String),
}

pub type TheoryResult<T> = Result<T, TheoryError>;
