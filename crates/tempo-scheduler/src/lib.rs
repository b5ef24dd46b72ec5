//! Horizon length scheduling for incremental solving.
//!
//! A scheduler decides which horizon lengths to attempt and in which order,
//! steered by the outcome of each attempt. Three algorithms are provided: a
//! fixed window of linearly increasing lengths ([`SchedulerA`]), an
//! effort-balanced pool with geometric admission decay ([`SchedulerB`]), and
//! a geometrically growing queue ([`SchedulerC`]). All implement the
//! [`Scheduler`] trait; [`SchedulerConfig`] selects and builds one.

pub mod config;
pub mod scheduler_a;
pub mod scheduler_b;
pub mod scheduler_c;

pub use config::{ConfigError, SchedulerConfig};
pub use scheduler_a::SchedulerA;
pub use scheduler_b::{Run, SchedulerB};
pub use scheduler_c::SchedulerC;

use tempo_core::SolveResult;

/// Decides the sequence of horizon lengths to attempt.
pub trait Scheduler: std::fmt::Debug {
    /// Feeds back the outcome of the previous attempt and returns the next
    /// length to try.
    ///
    /// A `result` of `None` means the previous attempt produced no conclusive
    /// outcome yet (still running elsewhere, or skipped). A returned `None`
    /// means the schedule is exhausted: every queued length is blocked, the
    /// queue drained with no replacement within `limit`, or the construction
    /// parameters were invalid to begin with. The solve loop treats it as "no
    /// plan found" and stops.
    fn next(&mut self, result: Option<SolveResult>) -> Option<usize>;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn next(&mut self, result: Option<SolveResult>) -> Option<usize> {
        (**self).next(result)
    }
}
