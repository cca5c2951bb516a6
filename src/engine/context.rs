//! Handler-facing view of a machine during dispatch.

use crate::core::{Signal, StateGraph, StateId};

/// What a state handler sees of the machine.
///
/// A context can request a deferred transition and answer active-state
/// queries. It deliberately cannot dispatch: recursive dispatch from inside
/// a handler would break the engine's single-nesting invariant, so the type
/// simply does not offer it.
pub struct Context<'m> {
    pub(crate) graph: &'m StateGraph,
    pub(crate) active: StateId,
    pub(crate) signal: Signal,
    pub(crate) pending: &'m mut Option<StateId>,
}

impl Context<'_> {
    /// The state the machine currently considers active.
    ///
    /// During an exit sequence this is still the transition source; during
    /// an entry sequence it is already the target.
    pub fn active(&self) -> StateId {
        self.active
    }

    /// True iff `candidate` is the active state or one of its superstates.
    pub fn is_active(&self, candidate: StateId) -> bool {
        self.graph.ancestors(self.active).any(|id| id == candidate)
    }

    /// The signal of the event currently being handled.
    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Debug identifier of a state, for logging from handlers.
    pub fn debug_id(&self, id: StateId) -> u8 {
        self.graph.debug_id(id)
    }

    /// Record `target` as the transition to perform once the current event
    /// has finished bubbling. No exit or entry handling runs here.
    ///
    /// Repeated requests while one event is handled overwrite each other;
    /// the last one wins. Requests made while an ENTRY or EXIT event is
    /// being handled are silently ignored, which is what keeps transition
    /// resolution from re-entering itself. Handles that do not refer to a
    /// state in this machine's graph are ignored as well.
    pub fn request_transition(&mut self, target: StateId) {
        if !self.graph.contains(target) {
            return;
        }
        if self.signal != Signal::ENTRY && self.signal != Signal::EXIT {
            *self.pending = Some(target);
        }
    }
}
