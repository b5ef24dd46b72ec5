//! Per-session grounding bookkeeping and solve dispatch.

use tracing::{debug, info};

use tempo_core::{Backend, RestartPolicy, SolveResult};
use tempo_theory::Theory;

use crate::{
    final_marker, future_assumptions, skip_atom, step_instances, FutureSignature, ProgramPart,
    SessionResult,
};

/// Grounds and solves scheduled lengths, in any order.
///
/// Grounding only ever grows: revisiting a shorter length suppresses the
/// surplus steps through `skip(t)` externals instead of undoing anything.
/// The final-state marker `__final(t)` follows the attempted length when
/// `move_final` is set and the highest grounded step otherwise; both are
/// repositioned with reversible assignments so no position is burnt.
#[derive(Debug)]
pub struct Solver {
    grounded: usize,
    last_attempted: usize,
    final_at: Option<usize>,
    move_final: bool,
}

impl Solver {
    /// Opens a session: hands the restart budget to the backend, grounds the
    /// step-0 part instances, runs the first translation cycle, and places
    /// the final-state marker at the origin.
    pub fn new<B: Backend>(
        backend: &mut B,
        theory: &mut Theory,
        parts: &[ProgramPart],
        policy: RestartPolicy,
        move_final: bool,
    ) -> SessionResult<Self> {
        backend.set_restart_policy(policy);
        let instances = step_instances(parts, 0);
        debug!(?instances, "grounding origin");
        backend.ground(&instances);
        theory.translate(backend, 0)?;
        backend.assign_external(&final_marker(0), true);
        Ok(Solver {
            grounded: 0,
            last_attempted: 0,
            final_at: Some(0),
            move_final,
        })
    }

    /// Highest grounded step.
    #[must_use]
    pub fn grounded(&self) -> usize {
        self.grounded
    }

    /// Grounds (if necessary) and solves one length, forwarding models.
    ///
    /// Steps beyond `grounded` are instantiated and translated first. The
    /// final marker and the skip band are then adjusted to the attempted
    /// length, and the backend runs under assumptions negating every
    /// future-signature atom past `length`.
    pub fn solve<B: Backend>(
        &mut self,
        backend: &mut B,
        theory: &mut Theory,
        parts: &[ProgramPart],
        future: &[FutureSignature],
        length: usize,
        on_model: &mut dyn FnMut(&B::Model),
    ) -> SessionResult<SolveResult> {
        debug!(grounded = self.grounded, length, "attempt");
        if self.grounded < length {
            let mut instances = Vec::new();
            for t in self.grounded + 1..=length {
                instances.extend(step_instances(parts, t));
            }
            // The marker must not pin the final state while the program
            // grows under it.
            if let Some(old) = self.final_at.take() {
                backend.assign_external(&final_marker(old), false);
            }
            debug!(?instances, "grounding");
            backend.ground(&instances);
            backend.cleanup();
            theory.translate(backend, length)?;
            self.grounded = length;
        }

        let marker = if self.move_final {
            length
        } else {
            self.grounded
        };
        if self.final_at != Some(marker) {
            if let Some(old) = self.final_at {
                backend.assign_external(&final_marker(old), false);
            }
            backend.assign_external(&final_marker(marker), true);
            self.final_at = Some(marker);
        }

        // Block steps above the attempted length, unblock up to it.
        if length < self.last_attempted {
            debug!(from = length + 1, to = self.last_attempted, "blocking steps");
            for t in length + 1..=self.last_attempted {
                backend.assign_external(&skip_atom(t), true);
            }
        } else if self.last_attempted < length {
            debug!(from = self.last_attempted + 1, to = length, "unblocking steps");
            for t in self.last_attempted + 1..=length {
                backend.assign_external(&skip_atom(t), false);
            }
        }

        let assumptions = future_assumptions(backend, future, length);
        let result = backend.solve(&assumptions, on_model);
        info!(length, ?result, "attempt finished");
        self.last_attempted = length;
        Ok(result)
    }
}
