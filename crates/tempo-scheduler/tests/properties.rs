//! Randomized invariants shared by all three scheduling algorithms.
//!
//! Properties tested:
//!   1. Every proposed length lies within `[start, limit]`
//!   2. Unusable parameters yield an empty schedule from the first call on
//!   3. Once a schedule runs out it stays out (algorithm B only under
//!      conclusive results, an unknown can revive its pool)
//!   4. Under steady satisfiable results the proposals strictly increase
//!   5. A valid schedule always opens with `start`

use proptest::prelude::*;
use tempo_core::SolveResult;
use tempo_scheduler::{Scheduler, SchedulerA, SchedulerB, SchedulerC};

const SAT: Option<SolveResult> = Some(SolveResult::Sat);
const UNSAT: Option<SolveResult> = Some(SolveResult::Unsat);
const UNKNOWN: Option<SolveResult> = Some(SolveResult::Unknown);
const NO_RESULT: Option<SolveResult> = None;

/// Any of the four per-step outcomes a solve loop can report back.
fn any_outcome() -> impl Strategy<Value = Option<SolveResult>> {
    prop_oneof![Just(SAT), Just(UNSAT), Just(UNKNOWN), Just(NO_RESULT)]
}

/// Outcomes of solve calls that actually ran to an answer or a timeout.
fn solved_outcome() -> impl Strategy<Value = Option<SolveResult>> {
    prop_oneof![Just(SAT), Just(UNSAT), Just(UNKNOWN)]
}

/// Outcomes of solve calls that settled the length for good.
fn conclusive_outcome() -> impl Strategy<Value = Option<SolveResult>> {
    prop_oneof![Just(SAT), Just(UNSAT)]
}

/// Mirrors the solve loop: feeds `results` cyclically, collects proposals,
/// stops on `None` or after `imax` proposals.
fn schedule_capped(
    mut scheduler: impl Scheduler,
    results: &[Option<SolveResult>],
    imax: usize,
) -> Vec<usize> {
    let mut lengths = Vec::new();
    match scheduler.next(None) {
        Some(first) => lengths.push(first),
        None => return lengths,
    }
    let mut iteration = 1;
    loop {
        for &result in results {
            match scheduler.next(result) {
                Some(length) if iteration < imax => {
                    lengths.push(length);
                    iteration += 1;
                }
                _ => return lengths,
            }
        }
    }
}

/// Feeds `results` cyclically until the scheduler first returns `None`,
/// with a call cap for scripts that cycle forever.
fn exhaust(
    scheduler: &mut impl Scheduler,
    results: &[Option<SolveResult>],
    max_calls: usize,
) -> bool {
    if scheduler.next(None).is_none() {
        return true;
    }
    let mut calls = 0;
    loop {
        for &result in results {
            calls += 1;
            if calls > max_calls {
                return false;
            }
            if scheduler.next(result).is_none() {
                return true;
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn a_proposals_stay_in_bounds(
        start in 0i64..15,
        inc in 1i64..6,
        extra in 0i64..40,
        size in 1i64..6,
        propagate in any::<bool>(),
        results in prop::collection::vec(any_outcome(), 1..10),
    ) {
        let limit = start + extra;
        let scheduler = SchedulerA::new(start, inc, limit, size, propagate);
        for length in schedule_capped(scheduler, &results, 30) {
            prop_assert!(length as i64 >= start && length as i64 <= limit);
        }
    }

    #[test]
    fn b_proposals_stay_in_bounds(
        start in 0i64..15,
        inc in 1i64..6,
        extra in 0i64..40,
        size in 1i64..6,
        propagate in any::<bool>(),
        gamma in -0.5f64..1.5,
        results in prop::collection::vec(any_outcome(), 1..10),
    ) {
        let limit = start + extra;
        let scheduler = SchedulerB::new(start, inc, limit, size, propagate, gamma);
        for length in schedule_capped(scheduler, &results, 30) {
            prop_assert!(length as i64 >= start && length as i64 <= limit);
        }
    }

    #[test]
    fn c_proposals_stay_in_bounds(
        start in 0i64..15,
        inc in 1.0f64..3.0,
        extra in 0i64..40,
        propagate in any::<bool>(),
        results in prop::collection::vec(any_outcome(), 1..10),
    ) {
        let limit = start + extra;
        let scheduler = SchedulerC::new(start, inc, limit, propagate);
        for length in schedule_capped(scheduler, &results, 30) {
            prop_assert!(length as i64 >= start && length as i64 <= limit);
        }
    }

    #[test]
    fn rejected_parameters_schedule_nothing(
        start in -10i64..10,
        inc in -3i64..4,
        limit in -10i64..10,
        size in 1i64..5,
        results in prop::collection::vec(any_outcome(), 1..6),
    ) {
        // Each algorithm validates on the first call; a rejected start never
        // produces a proposal afterwards either.
        if start < 0 || inc <= 0 || start > limit {
            let a = SchedulerA::new(start, inc, limit, size, true);
            prop_assert!(schedule_capped(a, &results, 20).is_empty());
            let b = SchedulerB::new(start, inc, limit, size, true, 0.5);
            prop_assert!(schedule_capped(b, &results, 20).is_empty());
        }
        if start < 0 || limit < 0 || (inc as f64) < 1.0 || start > limit {
            let c = SchedulerC::new(start, inc as f64, limit, true);
            prop_assert!(schedule_capped(c, &results, 20).is_empty());
        }
    }

    #[test]
    fn a_exhaustion_is_permanent(
        start in 0i64..10,
        inc in 1i64..5,
        extra in 0i64..25,
        size in 1i64..5,
        propagate in any::<bool>(),
        results in prop::collection::vec(solved_outcome(), 1..8),
    ) {
        let mut scheduler = SchedulerA::new(start, inc, start + extra, size, propagate);
        if exhaust(&mut scheduler, &results, 200) {
            for result in [SAT, UNSAT, UNKNOWN, NO_RESULT] {
                prop_assert_eq!(scheduler.next(result), None);
            }
        }
    }

    #[test]
    fn c_exhaustion_is_permanent(
        start in 0i64..10,
        inc in 1.0f64..3.0,
        extra in 0i64..25,
        propagate in any::<bool>(),
        results in prop::collection::vec(solved_outcome(), 1..8),
    ) {
        let mut scheduler = SchedulerC::new(start, inc, start + extra, propagate);
        if exhaust(&mut scheduler, &results, 200) {
            for result in [SAT, UNSAT, UNKNOWN, NO_RESULT] {
                prop_assert_eq!(scheduler.next(result), None);
            }
        }
    }

    #[test]
    fn b_exhaustion_is_permanent_under_conclusive_results(
        start in 0i64..10,
        inc in 1i64..5,
        extra in 0i64..25,
        size in 1i64..5,
        propagate in any::<bool>(),
        gamma in -0.5f64..1.5,
        results in prop::collection::vec(conclusive_outcome(), 1..8),
    ) {
        let mut scheduler = SchedulerB::new(start, inc, start + extra, size, propagate, gamma);
        if exhaust(&mut scheduler, &results, 200) {
            for result in [SAT, UNSAT, SAT, UNSAT] {
                prop_assert_eq!(scheduler.next(result), None);
            }
        }
    }

    #[test]
    fn steady_sat_proposes_increasing_lengths(
        start in 0i64..10,
        inc in 1i64..5,
        extra in 0i64..40,
        size in 1i64..6,
        gamma in -0.5f64..1.5,
        growth in 1.0f64..3.0,
    ) {
        let limit = start + extra;
        for lengths in [
            schedule_capped(SchedulerA::new(start, inc, limit, size, true), &[SAT], 30),
            schedule_capped(SchedulerB::new(start, inc, limit, size, true, gamma), &[SAT], 30),
            schedule_capped(SchedulerC::new(start, growth, limit, true), &[SAT], 30),
        ] {
            prop_assert!(lengths.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn valid_schedules_open_with_start(
        start in 0i64..10,
        inc in 1i64..5,
        extra in 0i64..25,
        size in 1i64..5,
        gamma in -0.5f64..1.5,
        growth in 1.0f64..3.0,
    ) {
        let limit = start + extra;
        let mut a = SchedulerA::new(start, inc, limit, size, true);
        prop_assert_eq!(a.next(None), Some(start as usize));
        let mut b = SchedulerB::new(start, inc, limit, size, true, gamma);
        prop_assert_eq!(b.next(None), Some(start as usize));
        let mut c = SchedulerC::new(start, growth, limit, true);
        prop_assert_eq!(c.next(None), Some(start as usize));
    }
}
