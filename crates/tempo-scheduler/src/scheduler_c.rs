//! Algorithm C: a single queue growing geometrically from a start length.

use std::collections::{HashSet, VecDeque};

use tempo_core::SolveResult;
use tracing::debug;

use crate::Scheduler;

/// Grows the queue by a factor of `inc` on every conclusive result.
///
/// The high-water mark is kept as a float so fractional growth carries over
/// between steps; a growth step whose truncation would not move the mark is
/// bumped to `+1` instead. Unknown outcomes re-enqueue the current length, a
/// conclusive one drops it (with `propagate_unsat` also every queued length
/// below it).
#[derive(Debug, Clone)]
pub struct SchedulerC {
    length: f64,
    inc: f64,
    limit: i64,
    propagate_unsat: bool,
    runs: VecDeque<i64>,
    first: bool,
    nones: HashSet<i64>,
}

impl SchedulerC {
    pub fn new(start: i64, inc: f64, limit: i64, propagate_unsat: bool) -> Self {
        SchedulerC {
            length: start as f64,
            inc,
            limit,
            propagate_unsat,
            runs: VecDeque::new(),
            first: true,
            nones: HashSet::new(),
        }
    }
}

impl Scheduler for SchedulerC {
    fn next(&mut self, result: Option<SolveResult>) -> Option<usize> {
        if self.first {
            if self.length < 0.0
                || self.limit < 0
                || self.inc < 1.0
                || self.length > self.limit as f64
            {
                return None;
            }
            self.runs.push_back(self.length as i64);
            self.first = false;
        } else {
            let current = *self.runs.front()?;
            match result {
                None => {
                    self.nones.insert(current);
                    if self.nones.len() == self.runs.len() {
                        return None;
                    }
                    self.runs.rotate_left(1);
                }
                Some(outcome) => {
                    self.nones.remove(&current);
                    let mut next_length = self.length * self.inc;
                    if next_length as i64 == self.length as i64 {
                        next_length = self.length + 1.0;
                    }
                    if next_length as i64 <= self.limit && self.nones.is_empty() {
                        self.runs.push_back(next_length as i64);
                        self.length = next_length;
                    }
                    if outcome.is_unknown() {
                        self.runs.push_back(current);
                    } else if self.propagate_unsat {
                        self.runs.retain(|&length| length >= current);
                    }
                    self.runs.pop_front();
                }
            }
        }
        debug!(queue = ?self.runs, "queue state");
        self.runs.front().map(|&length| length as usize)
    }
}
