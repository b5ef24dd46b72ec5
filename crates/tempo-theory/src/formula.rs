//! Formula nodes and handles.

use tempo_core::Symbol;

/// Stable handle to an interned formula node.
///
/// Handles index into the owning [`Theory`](crate::Theory)'s arena and stay
/// valid for the whole session; nodes are never evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binary boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
    Eq,
    /// `lhs <- rhs`
    LeftImplies,
    /// `lhs -> rhs`
    RightImplies,
}

/// The two temporal fixed-point connectives; Trigger is the dual of Since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelOp {
    Since,
    Trigger,
}

/// One immutable temporal/boolean formula variant.
///
/// Children are [`NodeId`] handles, so the variant tree doubles as the
/// structural interning key: two formulas built bottom-up from the same parts
/// hash and compare equal and therefore share one node. The paired future
/// placeholder of a [`Formula::TelFuture`] node is deliberately *not* part of
/// the variant (it is derived state, kept in a side table by the store).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// Predicate reference, resolved against the backend symbol table with
    /// the step appended as final argument.
    Atom {
        name: String,
        args: Vec<Symbol>,
        positive: bool,
    },
    Constant(bool),
    Not(NodeId),
    Binary {
        op: BoolOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    /// Value one step earlier; at step 0 false, or true when weak.
    Previous {
        arg: NodeId,
        weak: bool,
    },
    /// Value of the argument fixed at step 0.
    Initially(NodeId),
    /// Value one step later; at the horizon boundary a placeholder defaulting
    /// to `weak` until the next step exists.
    Next {
        arg: NodeId,
        weak: bool,
    },
    /// `lhs op rhs` unrolled backward through the node's own step−1 literal.
    TelPast {
        op: TelOp,
        lhs: Option<NodeId>,
        rhs: NodeId,
    },
    /// `lhs op rhs` unrolled forward through a paired Next placeholder.
    TelFuture {
        op: TelOp,
        lhs: Option<NodeId>,
        rhs: NodeId,
    },
}
