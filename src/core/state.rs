//! State graph: nodes, handles, and the handler contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::event::Event;
use crate::engine::Context;

/// Handle to a state in a [`StateGraph`].
///
/// Handles are arena indices issued by `GraphBuilder`. A substate's parent
/// must already exist when the substate is defined, so parent links always
/// point backwards in the arena and the hierarchy can never contain a cycle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Position of this state in its graph's node table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Control code returned by a state handler to steer event bubbling.
///
/// Suppress codes take effect only while an event bubbles upward; during
/// entry sequencing the engine invokes handlers unconditionally on the way
/// down and ignores their return values.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Outcome {
    /// Let the event continue bubbling to the next superstate.
    #[default]
    Continue,

    /// Stop bubbling; no superstate sees this event.
    SuppressSuperstates,

    /// Skip exactly the immediate superstate, then resume bubbling above it.
    SuppressImmediateSuperstate,
}

/// A state's event handler.
///
/// Handlers receive a [`Context`] restricted to transition requests and
/// active-state queries. Dispatching from inside a handler is not
/// expressible: the engine's single-nesting invariant depends on it.
pub type Handler = Box<dyn Fn(&mut Context<'_>, &Event) -> Outcome + Send + Sync>;

pub(crate) struct StateNode {
    pub(crate) handler: Handler,
    pub(crate) parent: Option<StateId>,
    pub(crate) debug_id: u8,
}

/// Immutable tree of states.
///
/// Built once by `GraphBuilder` and read-only thereafter. The graph owns its
/// nodes for the machine's whole lifetime; states are never created or
/// destroyed afterwards.
pub struct StateGraph {
    nodes: Vec<StateNode>,
    max_depth: usize,
}

impl StateGraph {
    pub(crate) fn new(nodes: Vec<StateNode>, max_depth: usize) -> Self {
        StateGraph { nodes, max_depth }
    }

    /// Number of states in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no states.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a state in this graph.
    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.nodes.len()
    }

    /// The superstate of `id`, or `None` for a root.
    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.nodes[id.index()].parent
    }

    /// Debug identifier of `id`, for tracing and tests only.
    pub fn debug_id(&self, id: StateId) -> u8 {
        self.nodes[id.index()].debug_id
    }

    /// The maximum ancestor-chain length this graph was built under.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn handler(&self, id: StateId) -> &Handler {
        &self.nodes[id.index()].handler
    }
}

impl fmt::Debug for StateGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("states", &self.nodes.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
