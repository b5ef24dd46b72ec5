//! Algorithm B: an effort-balanced run pool with geometric admission decay.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::mem;

use tempo_core::SolveResult;
use tracing::debug;

use crate::Scheduler;

/// One scheduled length with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Position of the length in the arithmetic progression.
    pub index: i32,
    /// The horizon length itself.
    pub length: i64,
    /// Number of attempts this length has received so far.
    pub effort: i64,
    /// Whether the run takes part in the current cycle.
    pub solve: bool,
}

impl Run {
    fn new(index: i32, length: i64) -> Self {
        Run {
            index,
            length,
            effort: 0,
            solve: true,
        }
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{},{})",
            self.index, self.length, self.effort, self.solve
        )
    }
}

fn render<'a, I>(runs: I) -> String
where
    I: IntoIterator<Item = &'a Run>,
{
    let parts: Vec<String> = runs.into_iter().map(|run| run.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Cycles through an active run queue, parking runs in a pending pool between
/// cycles.
///
/// When the active queue drains it is rebuilt from the pending pool: the
/// oldest run always participates again, and a younger run with distance `d`
/// to it participates only while its effort stays below
/// `(first.effort + 1) * gamma^d + 0.5`. Large `gamma` therefore keeps many
/// lengths in flight, small `gamma` concentrates attempts on the shortest
/// ones. Fresh lengths `start + inc*index` are appended under the same
/// threshold while `size` and `limit` allow. An unsatisfiable outcome with
/// `propagate_unsat` discards the whole pending pool.
#[derive(Debug, Clone)]
pub struct SchedulerB {
    index: i32,
    start: i64,
    inc: i64,
    limit: i64,
    size: i64,
    propagate_unsat: bool,
    gamma: f64,
    runs: VecDeque<Run>,
    next_runs: Vec<Run>,
    first: bool,
    nones: HashSet<i32>,
}

impl SchedulerB {
    pub fn new(
        start: i64,
        inc: i64,
        limit: i64,
        size: i64,
        propagate_unsat: bool,
        gamma: f64,
    ) -> Self {
        SchedulerB {
            index: 0,
            start,
            inc,
            limit,
            size,
            propagate_unsat,
            gamma,
            runs: VecDeque::new(),
            next_runs: Vec::new(),
            first: true,
            nones: HashSet::new(),
        }
    }
}

impl Scheduler for SchedulerB {
    fn next(&mut self, result: Option<SolveResult>) -> Option<usize> {
        if self.first {
            if self.start < 0 || self.inc <= 0 || self.start > self.limit {
                return None;
            }
            self.first = false;
        } else {
            if self.runs.is_empty() {
                return None;
            }
            let current_index = self.runs[0].index;
            match result {
                None => {
                    self.nones.insert(current_index);
                    if self.nones.len() == self.runs.len() {
                        return None;
                    }
                    if let Some(run) = self.runs.pop_front() {
                        self.next_runs.push(run);
                    }
                }
                Some(outcome) => {
                    self.nones.remove(&current_index);
                    if outcome.is_unknown() {
                        if let Some(mut run) = self.runs.pop_front() {
                            run.effort += 1;
                            self.next_runs.push(run);
                        }
                    } else {
                        if outcome.is_unsat() && self.propagate_unsat {
                            self.next_runs.clear();
                        }
                        self.runs.pop_front();
                    }
                }
            }
            // Park non-participating runs until the next rebuild.
            while self.runs.front().is_some_and(|run| !run.solve) {
                if let Some(run) = self.runs.pop_front() {
                    self.next_runs.push(run);
                }
            }
        }

        if self.runs.is_empty() {
            let (first_index, first_effort);
            if !self.next_runs.is_empty() {
                if self.nones.len() == self.next_runs.len() {
                    return None;
                }
                let pending = mem::take(&mut self.next_runs);
                first_index = pending[0].index;
                first_effort = pending[0].effort;
                for (position, mut run) in pending.into_iter().enumerate() {
                    run.solve = position == 0
                        || (run.effort as f64)
                            < (first_effort + 1) as f64 * self.gamma.powi(run.index - first_index)
                                + 0.5;
                    self.runs.push_back(run);
                }
            } else {
                if self.runs.len() as i64 >= self.size {
                    return None;
                }
                let run = Run::new(self.index, self.start + self.inc * i64::from(self.index));
                self.index += 1;
                first_index = run.index;
                first_effort = run.effort;
                let past_limit = run.length > self.limit;
                self.runs.push_back(run);
                if past_limit {
                    return None;
                }
            }
            while 0.5 < (first_effort + 1) as f64 * self.gamma.powi(self.index - first_index)
                && self.nones.is_empty()
            {
                if self.runs.len() as i64 >= self.size {
                    break;
                }
                let next_length = self.start + self.inc * i64::from(self.index);
                if next_length > self.limit {
                    break;
                }
                self.runs.push_back(Run::new(self.index, next_length));
                self.index += 1;
            }
        }

        debug!(
            queue = %render(&self.runs),
            pending = %render(&self.next_runs),
            "run pool state"
        );
        self.runs.front().map(|run| run.length as usize)
    }
}
