//! Algorithm A: a fixed-size window of linearly increasing lengths.

use std::collections::{HashSet, VecDeque};

use tempo_core::SolveResult;
use tracing::debug;

use crate::Scheduler;

/// Keeps up to `size` lengths `start + i*inc` in flight at once.
///
/// An unknown outcome rotates the current length to the back of the window.
/// A conclusive outcome drops it (with `propagate_unsat` also every queued
/// length below it) and tops the window back up, stepping by `inc` while
/// `limit` allows.
#[derive(Debug, Clone)]
pub struct SchedulerA {
    length: i64,
    inc: i64,
    limit: i64,
    size: i64,
    propagate_unsat: bool,
    runs: VecDeque<i64>,
    first: bool,
    nones: HashSet<i64>,
}

impl SchedulerA {
    pub fn new(start: i64, inc: i64, limit: i64, size: i64, propagate_unsat: bool) -> Self {
        SchedulerA {
            length: start,
            inc,
            limit,
            size,
            propagate_unsat,
            runs: VecDeque::new(),
            first: true,
            nones: HashSet::new(),
        }
    }
}

impl Scheduler for SchedulerA {
    fn next(&mut self, result: Option<SolveResult>) -> Option<usize> {
        if self.first {
            if self.length < 0 || self.limit < self.length || self.inc <= 0 {
                return None;
            }
            self.first = false;
            self.runs = (0..self.size)
                .map(|i| self.length + i * self.inc)
                .filter(|&length| length <= self.limit)
                .collect();
            if let Some(&last) = self.runs.back() {
                self.length = last;
            }
        } else if self.runs.is_empty() {
            return None;
        } else {
            let current = self.runs[0];
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
                    if outcome.is_unknown() {
                        self.runs.push_back(current);
                    } else {
                        if self.propagate_unsat {
                            self.runs.retain(|&length| length >= current);
                        }
                        let next_length = self.length + self.inc;
                        if next_length <= self.limit && self.nones.is_empty() {
                            self.length = next_length;
                            self.runs.push_back(self.length);
                        }
                        if self.propagate_unsat {
                            // Top the window back up. The high-water mark
                            // follows the last probed value even when the
                            // probe overshot the limit.
                            let mut probe = next_length;
                            while self.runs.len() as i64 <= self.size {
                                probe += self.inc;
                                if probe > self.limit {
                                    break;
                                }
                                self.runs.push_back(probe);
                            }
                            self.length = probe;
                        }
                    }
                    self.runs.pop_front();
                }
            }
        }
        debug!(queue = ?self.runs, "window state");
        self.runs.front().map(|&length| length as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters_are_permanent() {
        for scheduler in [
            SchedulerA::new(-5, 5, 30, 4, true),
            SchedulerA::new(35, 5, 30, 4, true),
            SchedulerA::new(0, 0, 30, 4, true),
        ] {
            let mut scheduler = scheduler;
            assert_eq!(scheduler.next(None), None);
            assert_eq!(scheduler.next(Some(SolveResult::Sat)), None);
            assert_eq!(scheduler.next(Some(SolveResult::Unknown)), None);
        }
    }

    #[test]
    fn test_zero_size_window_is_empty() {
        let mut scheduler = SchedulerA::new(0, 5, 30, 0, true);
        assert_eq!(scheduler.next(None), None);
        assert_eq!(scheduler.next(Some(SolveResult::Sat)), None);
    }

    #[test]
    fn test_blocked_lengths_block_the_schedule() {
        let mut scheduler = SchedulerA::new(0, 5, 30, 4, true);
        assert_eq!(scheduler.next(None), Some(0));
        assert_eq!(scheduler.next(None), Some(5));
        assert_eq!(scheduler.next(None), Some(10));
        // An unknown rotates the current length without blocking it.
        assert_eq!(scheduler.next(Some(SolveResult::Unknown)), Some(15));
        assert_eq!(scheduler.next(None), Some(0));
        assert_eq!(scheduler.next(None), Some(5));
        assert_eq!(scheduler.next(None), Some(10));
        // Now every length in the window is blocked.
        assert_eq!(scheduler.next(None), None);
    }

    #[test]
    fn test_exhaustion_past_limit_is_permanent() {
        let mut scheduler = SchedulerA::new(30, 5, 30, 1, true);
        assert_eq!(scheduler.next(None), Some(30));
        assert_eq!(scheduler.next(Some(SolveResult::Sat)), None);
        assert_eq!(scheduler.next(Some(SolveResult::Unknown)), None);
        assert_eq!(scheduler.next(None), None);
    }
}
