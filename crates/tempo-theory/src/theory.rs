//! Session-owned formula store and the step-indexed translation engine.

use std::collections::{BTreeSet, HashMap, HashSet};

use smallvec::SmallVec;
use tracing::debug;

use tempo_core::{Backend, Lit, Symbol, TruthValue};

use crate::elaborate::formula_from_term;
use crate::formula::{BoolOp, Formula, NodeId, TelOp};
use crate::TheoryResult;

/// Emit the equality clause pair forcing `a` and `b` to agree.
pub(crate) fn make_equal<B: Backend>(backend: &mut B, a: Lit, b: Lit) {
    backend.add_rule(false, &[], &[a, -b]);
    backend.add_rule(false, &[], &[-a, b]);
}

/// Emit the three clauses encoding `e ↔ a ∨ b`.
pub(crate) fn make_disjunction<B: Backend>(backend: &mut B, e: Lit, a: Lit, b: Lit) {
    backend.add_rule(false, &[], &[e, -a, -b]);
    backend.add_rule(false, &[], &[-e, a]);
    backend.add_rule(false, &[], &[-e, b]);
}

/// Per-(node, step) translation cache.
#[derive(Debug)]
struct StepData {
    /// The node's literal at this step, assigned exactly once.
    literal: Option<Lit>,
    /// Theory-atom literals aliased to this node at this step. Ordered so
    /// canonical literal selection is deterministic (smallest wins).
    linked: BTreeSet<Lit>,
    /// Aliases still awaiting their equality clause pair.
    pending: SmallVec<[Lit; 2]>,
    /// False only while a Next placeholder waits for its target step.
    resolved: bool,
}

impl Default for StepData {
    fn default() -> Self {
        StepData {
            literal: None,
            linked: BTreeSet::new(),
            pending: SmallVec::new(),
            resolved: true,
        }
    }
}

impl StepData {
    /// Pick the canonical literal: the smallest alias when one exists,
    /// otherwise a fresh free atom.
    fn assign_literal<B: Backend>(&mut self, backend: &mut B) -> Lit {
        debug_assert!(self.literal.is_none(), "literal assigned twice");
        let lit = match self.linked.iter().next().copied() {
            Some(first) => {
                self.linked.remove(&first);
                first
            }
            None => {
                let fresh = backend.add_atom();
                backend.add_rule(true, &[fresh], &[]);
                fresh
            }
        };
        self.literal = Some(lit);
        lit
    }
}

/// Owns every formula node of one solving session together with all
/// translation state: the intern table, per-step caches, the worklist of
/// (step, node) pairs awaiting clause emission, and the shared false literal.
///
/// The store only ever grows; the encoding horizon moves forward even when
/// the search revisits shorter lengths.
#[derive(Debug, Default)]
pub struct Theory {
    nodes: Vec<Formula>,
    interned: HashMap<Formula, NodeId>,
    /// Future formula -> its paired Next placeholder.
    futures: HashMap<NodeId, NodeId>,
    steps: HashMap<(NodeId, usize), StepData>,
    todo: Vec<(usize, NodeId)>,
    todo_keys: HashSet<(usize, NodeId)>,
    false_lit: Option<Lit>,
}

impl Theory {
    #[must_use]
    pub fn new() -> Self {
        Theory::default()
    }

    /// Number of distinct interned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The formula behind a handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Formula {
        &self.nodes[id.index()]
    }

    fn intern(&mut self, formula: Formula) -> NodeId {
        if let Some(&id) = self.interned.get(&formula) {
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(formula.clone());
        self.interned.insert(formula, id);
        id
    }

    /// Intern a predicate atom. Names carrying the reserved prime markers are
    /// rejected; the temporal operators express those shifts.
    pub fn atom(&mut self, name: &str, args: Vec<Symbol>, positive: bool) -> TheoryResult<NodeId> {
        if name.starts_with('\'') {
            return Err(crate::TheoryError::LeadingPrime(name.to_string()));
        }
        if name.ends_with('\'') {
            return Err(crate::TheoryError::TrailingPrime(name.to_string()));
        }
        Ok(self.intern(Formula::Atom {
            name: name.to_string(),
            args,
            positive,
        }))
    }

    pub fn constant(&mut self, value: bool) -> NodeId {
        self.intern(Formula::Constant(value))
    }

    pub fn negation(&mut self, arg: NodeId) -> NodeId {
        self.intern(Formula::Not(arg))
    }

    pub fn boolean(&mut self, op: BoolOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.intern(Formula::Binary { op, lhs, rhs })
    }

    pub fn previous(&mut self, arg: NodeId, weak: bool) -> NodeId {
        self.intern(Formula::Previous { arg, weak })
    }

    pub fn initially(&mut self, arg: NodeId) -> NodeId {
        self.intern(Formula::Initially(arg))
    }

    pub fn next(&mut self, arg: NodeId, weak: bool) -> NodeId {
        self.intern(Formula::Next { arg, weak })
    }

    pub fn tel_past(&mut self, op: TelOp, lhs: Option<NodeId>, rhs: NodeId) -> NodeId {
        self.intern(Formula::TelPast { op, lhs, rhs })
    }

    /// Intern a future fixed-point formula together with its paired Next
    /// placeholder (weak for Trigger, strong for Since). The pairing is the
    /// one cyclic relationship in the store and lives in a side table.
    pub fn tel_future(&mut self, op: TelOp, lhs: Option<NodeId>, rhs: NodeId) -> NodeId {
        let id = self.intern(Formula::TelFuture { op, lhs, rhs });
        let future = self.intern(Formula::Next {
            arg: id,
            weak: op == TelOp::Trigger,
        });
        self.futures.insert(id, future);
        id
    }

    /// Record a backend theory-atom literal as an alias of (node, step).
    pub fn add_atom(&mut self, node: NodeId, step: usize, literal: Lit) {
        let data = self.steps.entry((node, step)).or_default();
        if data.linked.insert(literal) {
            data.pending.push(literal);
        }
    }

    /// Queue (step, node) for clause emission on the next drain.
    pub fn add_todo(&mut self, step: usize, node: NodeId) {
        if self.todo_keys.insert((step, node)) {
            self.todo.push((step, node));
        }
    }

    /// The shared literal standing in for every absent atom, allocated once
    /// per session and pinned false by a unit constraint.
    fn false_literal<B: Backend>(&mut self, backend: &mut B) -> Lit {
        match self.false_lit {
            Some(lit) => lit,
            None => {
                let lit = backend.add_atom();
                backend.add_rule(false, &[], &[lit]);
                self.false_lit = Some(lit);
                lit
            }
        }
    }

    /// One drain cycle at the given horizon: elaborate every theory atom the
    /// backend discovered since the last cycle, then translate the worklist
    /// (including deferred placeholder resolutions carried over from earlier
    /// cycles).
    ///
    /// A malformed formula aborts the cycle before any clause is emitted.
    pub fn translate<B: Backend>(&mut self, backend: &mut B, horizon: usize) -> TheoryResult<()> {
        for atom in backend.new_theory_atoms() {
            let node = formula_from_term(self, &atom.term)?;
            self.add_atom(node, atom.step, atom.literal);
            self.add_todo(atom.step, node);
        }
        if self.todo.is_empty() {
            return Ok(());
        }
        let todo = std::mem::take(&mut self.todo);
        self.todo_keys.clear();
        debug!(horizon, entries = todo.len(), "translating worklist");
        for (step, node) in todo {
            self.translate_node(backend, horizon, node, step);
        }
        Ok(())
    }

    /// Translate (node, step) and return its literal. Memoized: repeat calls
    /// return the same literal and emit nothing beyond equality pairs for
    /// newly linked aliases.
    pub fn translate_node<B: Backend>(
        &mut self,
        backend: &mut B,
        horizon: usize,
        node: NodeId,
        step: usize,
    ) -> Lit {
        let lit = self.encode(backend, horizon, node, step);
        let data = self.steps.entry((node, step)).or_default();
        if !data.pending.is_empty() {
            let pending = std::mem::take(&mut data.pending);
            for alias in pending {
                make_equal(backend, alias, lit);
            }
        }
        lit
    }

    /// Assign the literal for (node, step) and emit its defining clauses.
    /// Runs the per-variant logic at most once; afterwards only the deferred
    /// branch of Next placeholders can emit again.
    fn encode<B: Backend>(
        &mut self,
        backend: &mut B,
        horizon: usize,
        node: NodeId,
        step: usize,
    ) -> Lit {
        debug_assert!(step <= horizon, "step beyond the grounded horizon");
        let cached = self
            .steps
            .get(&(node, step))
            .map(|data| (data.literal, data.resolved));
        if let Some((Some(lit), true)) = cached {
            return lit;
        }
        let formula = self.nodes[node.index()].clone();
        match formula {
            Formula::Atom {
                name,
                args,
                positive,
            } => {
                let mut args = args;
                args.push(Symbol::Number(step as i64));
                let symbol = Symbol::fun_signed(name, args, positive);
                let lit = match backend.symbol_literal(&symbol) {
                    Some(lit) => lit,
                    None => self.false_literal(backend),
                };
                self.step_mut(node, step).literal = Some(lit);
                lit
            }
            Formula::Constant(value) => {
                let false_lit = self.false_literal(backend);
                let lit = if value { -false_lit } else { false_lit };
                self.step_mut(node, step).literal = Some(lit);
                lit
            }
            Formula::Not(arg) => {
                let lit = -self.translate_node(backend, horizon, arg, step);
                self.step_mut(node, step).literal = Some(lit);
                lit
            }
            Formula::Binary { op, lhs, rhs } => {
                let lhs = self.translate_node(backend, horizon, lhs, step);
                let rhs = self.translate_node(backend, horizon, rhs, step);
                let lit = self.step_mut(node, step).assign_literal(backend);
                match op {
                    BoolOp::And => make_disjunction(backend, -lit, -lhs, -rhs),
                    BoolOp::Or => make_disjunction(backend, lit, lhs, rhs),
                    BoolOp::LeftImplies => make_disjunction(backend, lit, lhs, -rhs),
                    BoolOp::RightImplies => make_disjunction(backend, lit, -lhs, rhs),
                    BoolOp::Eq => {
                        backend.add_rule(false, &[], &[lit, rhs, lhs]);
                        backend.add_rule(false, &[], &[lit, -rhs, -lhs]);
                        backend.add_rule(false, &[], &[-lit, rhs, -lhs]);
                        backend.add_rule(false, &[], &[-lit, -rhs, lhs]);
                    }
                }
                lit
            }
            Formula::Previous { arg, weak } => {
                let lit = if step > 0 {
                    self.translate_node(backend, horizon, arg, step - 1)
                } else {
                    let false_lit = self.false_literal(backend);
                    if weak {
                        -false_lit
                    } else {
                        false_lit
                    }
                };
                self.step_mut(node, step).literal = Some(lit);
                lit
            }
            Formula::Initially(arg) => {
                let lit = self.translate_node(backend, horizon, arg, 0);
                self.step_mut(node, step).literal = Some(lit);
                lit
            }
            Formula::Next { arg, weak } => match cached.and_then(|(lit, _)| lit) {
                None if step < horizon => {
                    let lit = self.translate_node(backend, horizon, arg, step + 1);
                    self.step_mut(node, step).literal = Some(lit);
                    lit
                }
                None => {
                    // Nothing grounded at step+1 yet: stand in an externally
                    // controlled placeholder at the operator's default truth
                    // and requeue for the next drain cycle.
                    let lit = backend.add_atom();
                    let default = if weak {
                        TruthValue::True
                    } else {
                        TruthValue::False
                    };
                    backend.add_external(lit, default);
                    let data = self.step_mut(node, step);
                    data.literal = Some(lit);
                    data.resolved = false;
                    self.add_todo(step, node);
                    debug!(?node, step, %lit, weak, "deferred next placeholder");
                    lit
                }
                Some(lit) => {
                    if step < horizon {
                        let arg_lit = self.translate_node(backend, horizon, arg, step + 1);
                        make_equal(backend, lit, arg_lit);
                        backend.add_external(lit, TruthValue::Free);
                        self.step_mut(node, step).resolved = true;
                        debug!(?node, step, %lit, "resolved next placeholder");
                    } else {
                        // Horizon unchanged since the placeholder was made;
                        // keep the entry alive for the drain that extends it.
                        self.add_todo(step, node);
                    }
                    lit
                }
            },
            Formula::TelPast { op, lhs, rhs } => {
                if step == 0 {
                    let lit = self.translate_node(backend, horizon, rhs, 0);
                    self.step_mut(node, step).literal = Some(lit);
                    lit
                } else {
                    let pre = self.translate_node(backend, horizon, node, step - 1);
                    self.encode_fixpoint(backend, horizon, node, step, op, lhs, rhs, pre)
                }
            }
            Formula::TelFuture { op, lhs, rhs } => {
                let future = match self.futures.get(&node) {
                    Some(&future) => future,
                    None => unreachable!("future formulas are interned with their placeholder"),
                };
                let fut = self.translate_node(backend, horizon, future, step);
                self.encode_fixpoint(backend, horizon, node, step, op, lhs, rhs, fut)
            }
        }
    }

    /// Clause set tying a fixed-point literal to its unrolling: with `L` the
    /// node's literal and `pre` the neighbouring step's, enforce
    /// `L ↔ rhs ∨ (lhs ∧ pre)` (`L ↔ rhs ∨ pre` without lhs). Trigger is the
    /// dual: all polarities flip before emission.
    #[allow(clippy::too_many_arguments)]
    fn encode_fixpoint<B: Backend>(
        &mut self,
        backend: &mut B,
        horizon: usize,
        node: NodeId,
        step: usize,
        op: TelOp,
        lhs: Option<NodeId>,
        rhs: NodeId,
        pre: Lit,
    ) -> Lit {
        let lhs = lhs.map(|lhs| self.translate_node(backend, horizon, lhs, step));
        let rhs = self.translate_node(backend, horizon, rhs, step);
        let assigned = self.step_mut(node, step).assign_literal(backend);
        let (lit, rhs, pre, lhs) = if op == TelOp::Trigger {
            (-assigned, -rhs, -pre, lhs.map(|lhs| -lhs))
        } else {
            (assigned, rhs, pre, lhs)
        };
        backend.add_rule(false, &[], &[-lit, rhs]);
        backend.add_rule(false, &[], &[-rhs, -pre, lit]);
        match lhs {
            Some(lhs) => {
                backend.add_rule(false, &[], &[-lit, lhs, pre]);
                backend.add_rule(false, &[], &[-rhs, -lhs, lit]);
            }
            None => backend.add_rule(false, &[], &[-lit, pre]),
        }
        assigned
    }

    fn step_mut(&mut self, node: NodeId, step: usize) -> &mut StepData {
        self.steps.entry((node, step)).or_default()
    }
}
