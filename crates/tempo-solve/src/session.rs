//! The two incremental solving loops.

use tracing::{debug, info};

use tempo_core::{Backend, SolveResult};
use tempo_scheduler::{Scheduler, SchedulerConfig};
use tempo_theory::Theory;

use crate::{
    final_marker, future_assumptions, step_instances, FutureSignature, ProgramPart, SearchOutcome,
    SessionResult, SolveOptions, Solver,
};

/// Stop decision shared by both loops: the stop criterion once past `imin`,
/// then the iteration cap. A `counter` of zero (before the first solve, or
/// with a step increment of zero) never consults the criterion.
fn session_gate(
    counter: i64,
    last: Option<SolveResult>,
    attempted: usize,
    options: &SolveOptions,
) -> Option<SearchOutcome> {
    if counter != 0 && counter >= options.imin as i64 {
        if let Some(result) = last {
            if options.istop.met(result) {
                return Some(SearchOutcome::Stopped {
                    result,
                    length: attempted,
                });
            }
        }
    }
    if let Some(imax) = options.imax {
        if counter >= imax as i64 {
            return Some(SearchOutcome::Capped { last });
        }
    }
    None
}

/// Grows the horizon one step per iteration until the stop criterion is met.
///
/// Each iteration retires the previous final-state marker for good, grounds
/// the part instances of the new step, runs a translation cycle, marks the
/// new final state, and solves under future-atom assumptions. Models are
/// forwarded together with the step they were found at.
pub fn solve_incremental<B: Backend>(
    backend: &mut B,
    theory: &mut Theory,
    parts: &[ProgramPart],
    future: &[FutureSignature],
    options: &SolveOptions,
    mut on_model: impl FnMut(&B::Model, usize),
) -> SessionResult<SearchOutcome> {
    let mut step = 0usize;
    let mut last = None;
    loop {
        if let Some(outcome) = session_gate(step as i64, last, step.saturating_sub(1), options) {
            return Ok(outcome);
        }
        let instances = step_instances(parts, step);
        if step > 0 {
            backend.release_external(&final_marker(step - 1));
            backend.cleanup();
        }
        debug!(step, ?instances, "grounding");
        backend.ground(&instances);
        theory.translate(backend, step)?;
        backend.assign_external(&final_marker(step), true);
        let assumptions = future_assumptions(backend, future, step);
        let result = backend.solve(&assumptions, &mut |model| on_model(model, step));
        info!(step, ?result, "step finished");
        last = Some(result);
        step += 1;
    }
}

/// Runs the scheduled solving loop until a model is found, the stop
/// criterion is met, the iteration cap strikes, or the schedule runs dry.
///
/// The scheduler is built from `config` before the backend is touched, so a
/// conflicting configuration fails without side effects. Step 0 is grounded
/// up front; every iteration then feeds the previous result back to the
/// scheduler, solves the length it proposes, and advances the step counter
/// by `config.inc`. A satisfiable attempt ends the session regardless of the
/// stop criterion.
pub fn solve_scheduled<B: Backend>(
    backend: &mut B,
    theory: &mut Theory,
    parts: &[ProgramPart],
    future: &[FutureSignature],
    options: &SolveOptions,
    config: &SchedulerConfig,
    mut on_model: impl FnMut(&B::Model, usize),
) -> SessionResult<SearchOutcome> {
    let mut scheduler = config.build()?;
    let mut solver = Solver::new(
        backend,
        theory,
        parts,
        config.restart_policy(),
        config.move_final,
    )?;

    let mut counter = 0i64;
    let mut last = None;
    let mut attempted = 0;
    let mut iteration = 0usize;
    loop {
        if let Some(outcome) = session_gate(counter, last, attempted, options) {
            return Ok(outcome);
        }
        iteration += 1;
        let Some(length) = scheduler.next(last) else {
            info!(iteration, "no plan found");
            return Ok(SearchOutcome::Exhausted);
        };
        debug!(iteration, length, "iteration");
        let result = solver.solve(backend, theory, parts, future, length, &mut |model| {
            on_model(model, length)
        })?;
        last = Some(result);
        attempted = length;
        if result.is_sat() {
            info!(length, "plan found");
            return Ok(SearchOutcome::Stopped { result, length });
        }
        counter += config.inc;
    }
}
