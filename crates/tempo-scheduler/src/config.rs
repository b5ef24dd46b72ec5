//! Scheduler selection and construction.

use tempo_core::RestartPolicy;
use thiserror::Error;
use tracing::debug;

use crate::scheduler_a::SchedulerA;
use crate::scheduler_b::SchedulerB;
use crate::scheduler_c::SchedulerC;
use crate::Scheduler;

/// Rejected scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// More than one of the three algorithm selectors is set. Surfaces at
    /// build time, before anything is grounded or solved.
    #[error("choose only one scheduler: A, B, or C")]
    MultipleSchedulers,
}

/// Knobs for the scheduling layer of a solving session.
///
/// At most one of the three algorithm selectors may be set; with none set,
/// [`SchedulerConfig::build`] falls back to algorithm A with a window of 5.
/// The restart fields are not interpreted here, they are handed through to
/// the backend by the solve loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Algorithm A, carrying its window size.
    pub algorithm_a: Option<i64>,
    /// Algorithm B, carrying its decay factor gamma.
    pub algorithm_b: Option<f64>,
    /// Algorithm C, carrying its growth factor.
    pub algorithm_c: Option<f64>,
    /// Distance between consecutive fresh lengths (algorithms A and B).
    pub inc: i64,
    /// First length to schedule.
    pub start: i64,
    /// Largest length the schedule may propose.
    pub limit: i64,
    /// Window size for algorithm B.
    pub processes: i64,
    /// After a length comes back unsatisfiable, drop every shorter one still
    /// queued.
    pub propagate_unsat: bool,
    /// Restarts granted to each backend solve call.
    pub restarts_per_solve: u32,
    /// Conflicts per restart; zero leaves the backend's own policy open.
    pub conflicts_per_restart: u32,
    /// Keep the final-state marker on the attempted length instead of the
    /// highest grounded one.
    pub move_final: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            algorithm_a: None,
            algorithm_b: None,
            algorithm_c: None,
            inc: 5,
            start: 0,
            limit: 3000,
            processes: 20,
            propagate_unsat: true,
            restarts_per_solve: 100,
            conflicts_per_restart: 60,
            move_final: true,
        }
    }
}

impl SchedulerConfig {
    /// Builds the selected scheduler.
    ///
    /// Fails fast when more than one algorithm is selected, before any
    /// grounding or solving has happened.
    pub fn build(&self) -> Result<Box<dyn Scheduler>, ConfigError> {
        let selected = [
            self.algorithm_a.is_some(),
            self.algorithm_b.is_some(),
            self.algorithm_c.is_some(),
        ]
        .iter()
        .filter(|&&set| set)
        .count();
        if selected > 1 {
            return Err(ConfigError::MultipleSchedulers);
        }

        if let Some(size) = self.algorithm_a {
            debug!(size, start = self.start, inc = self.inc, limit = self.limit, "scheduler A");
            Ok(Box::new(SchedulerA::new(
                self.start,
                self.inc,
                self.limit,
                size,
                self.propagate_unsat,
            )))
        } else if let Some(gamma) = self.algorithm_b {
            debug!(gamma, processes = self.processes, start = self.start, "scheduler B");
            Ok(Box::new(SchedulerB::new(
                self.start,
                self.inc,
                self.limit,
                self.processes,
                self.propagate_unsat,
                gamma,
            )))
        } else if let Some(growth) = self.algorithm_c {
            debug!(growth, start = self.start, limit = self.limit, "scheduler C");
            Ok(Box::new(SchedulerC::new(
                self.start,
                growth,
                self.limit,
                self.propagate_unsat,
            )))
        } else {
            debug!("no scheduler selected, using A with a window of 5");
            Ok(Box::new(SchedulerA::new(
                self.start,
                self.inc,
                self.limit,
                5,
                self.propagate_unsat,
            )))
        }
    }

    /// Restart budget to hand through to the backend.
    pub fn restart_policy(&self) -> RestartPolicy {
        RestartPolicy {
            restarts_per_solve: self.restarts_per_solve,
            conflicts_per_restart: self.conflicts_per_restart,
        }
    }
}
