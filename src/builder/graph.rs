//! Builder for immutable state graphs with a bounded hierarchy depth.

use crate::builder::error::BuildError;
use crate::core::state::{StateGraph, StateId, StateNode};
use crate::core::{Event, Handler, Outcome};
use crate::engine::Context;

/// Default maximum ancestor-chain length. Five levels covers typical
/// control hierarchies; deeper graphs need an explicit bound.
pub const DEFAULT_MAX_DEPTH: usize = 5;

struct NodeSpec {
    handler: Option<Handler>,
    parent: Option<StateId>,
    debug_id: u8,
    depth: usize,
}

/// Builder for [`StateGraph`]s.
///
/// States are declared first and handlers attached afterwards, so a handler
/// may refer to any state in the graph regardless of declaration order. A
/// state left without a handler passes every event through unhandled, which
/// is the common shape for plain container superstates.
///
/// Exceeding the configured maximum hierarchy depth is a construction-time
/// error, never a runtime one.
///
/// # Example
///
/// ```rust
/// use overstory::builder::GraphBuilder;
/// use overstory::{Outcome, Signal};
///
/// const SIG_TOGGLE: Signal = Signal(Signal::USER_START.0);
///
/// let mut builder = GraphBuilder::new();
/// let lamp = builder.state(0);
/// let off = builder.substate(1, lamp)?;
/// let on = builder.substate(2, lamp)?;
///
/// builder.on(off, move |ctx, event| {
///     if event.signal == SIG_TOGGLE {
///         ctx.request_transition(on);
///     }
///     Outcome::Continue
/// })?;
/// builder.on(on, move |ctx, event| {
///     if event.signal == SIG_TOGGLE {
///         ctx.request_transition(off);
///     }
///     Outcome::Continue
/// })?;
///
/// let graph = builder.build();
/// assert_eq!(graph.len(), 3);
/// # Ok::<(), overstory::builder::BuildError>(())
/// ```
pub struct GraphBuilder {
    nodes: Vec<NodeSpec>,
    max_depth: usize,
}

impl GraphBuilder {
    /// Create a builder with the default maximum depth of 5.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create a builder with a custom maximum ancestor-chain length.
    pub fn with_max_depth(max_depth: usize) -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            max_depth,
        }
    }

    /// Define a root state and return its handle.
    pub fn state(&mut self, debug_id: u8) -> StateId {
        self.push(debug_id, None, 1)
    }

    /// Define a substate of `parent` and return its handle.
    ///
    /// Fails when `parent` was not issued by this builder, or when the new
    /// state's ancestor chain would exceed the configured maximum depth.
    pub fn substate(&mut self, debug_id: u8, parent: StateId) -> Result<StateId, BuildError> {
        if parent.index() >= self.nodes.len() {
            return Err(BuildError::UnknownParent);
        }
        let depth = self.nodes[parent.index()].depth + 1;
        if depth > self.max_depth {
            return Err(BuildError::DepthExceeded {
                debug_id,
                depth,
                max_depth: self.max_depth,
            });
        }
        Ok(self.push(debug_id, Some(parent), depth))
    }

    /// Attach the event handler for `state`.
    ///
    /// Each state's handler is defined at most once; attaching a second one
    /// is an error.
    pub fn on<F>(&mut self, state: StateId, handler: F) -> Result<(), BuildError>
    where
        F: Fn(&mut Context<'_>, &Event) -> Outcome + Send + Sync + 'static,
    {
        let node = self
            .nodes
            .get_mut(state.index())
            .ok_or(BuildError::UnknownState)?;
        if node.handler.is_some() {
            return Err(BuildError::DuplicateHandler {
                debug_id: node.debug_id,
            });
        }
        node.handler = Some(Box::new(handler));
        Ok(())
    }

    /// Freeze the graph. States without a handler get a pass-through that
    /// returns [`Outcome::Continue`] for every event.
    pub fn build(self) -> StateGraph {
        let nodes = self
            .nodes
            .into_iter()
            .map(|spec| StateNode {
                handler: spec
                    .handler
                    .unwrap_or_else(|| Box::new(|_: &mut Context<'_>, _: &Event| Outcome::Continue)),
                parent: spec.parent,
                debug_id: spec.debug_id,
            })
            .collect();
        StateGraph::new(nodes, self.max_depth)
    }

    fn push(&mut self, debug_id: u8, parent: Option<StateId>, depth: usize) -> StateId {
        let id = StateId(self.nodes.len() as u32);
        self.nodes.push(NodeSpec {
            handler: None,
            parent,
            debug_id,
            depth,
        });
        id
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
