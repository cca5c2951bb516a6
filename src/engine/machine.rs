//! The dispatch and transition engine.

use crate::builder::BuildError;
use crate::core::{Event, Outcome, Signal, StateGraph, StateId};
use crate::engine::context::Context;
use crate::engine::error::MachineError;
use crate::trace::Observer;

/// A running hierarchical state machine.
///
/// A machine owns its [`StateGraph`] and tracks the single active state.
/// Events bubble from the active state upward through its superstates;
/// handlers steer the bubble with [`Outcome`] codes and may request a
/// transition, which is deferred until the event finishes bubbling and then
/// executed as the minimal exit/entry sequence through the lowest common
/// ancestor of source and target.
///
/// Lifecycle: construct with [`Machine::new`], call [`Machine::init`]
/// exactly once, then feed events through [`Machine::dispatch`] from a
/// single scheduler call site. The engine is synchronous and single-
/// threaded; the host must not dispatch concurrently on one machine, which
/// `&mut self` already enforces within safe code.
pub struct Machine {
    graph: StateGraph,
    active: StateId,
    pending: Option<StateId>,
    last_event: Option<Event>,
    initialized: bool,
    observer: Option<Box<dyn Observer>>,
}

impl Machine {
    /// Create a machine over `graph` that will start in `initial`.
    ///
    /// Fails when `initial` does not refer to a state in `graph`.
    pub fn new(graph: StateGraph, initial: StateId) -> Result<Self, BuildError> {
        if !graph.contains(initial) {
            return Err(BuildError::UnknownState);
        }
        Ok(Machine {
            graph,
            active: initial,
            pending: None,
            last_event: None,
            initialized: false,
            observer: None,
        })
    }

    /// Attach an observer invoked on every dispatched event, synthetic
    /// INIT/ENTRY/EXIT included, before any state handler runs. Observers
    /// are a telemetry side channel; they never affect control flow.
    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The currently active state.
    pub fn active(&self) -> StateId {
        self.active
    }

    /// True iff `candidate` is the active state or one of its superstates.
    pub fn is_active(&self, candidate: StateId) -> bool {
        self.graph.ancestors(self.active).any(|id| id == candidate)
    }

    /// The event most recently dispatched, including synthetic ones.
    pub fn last_event(&self) -> Option<Event> {
        self.last_event
    }

    /// Borrow the underlying state graph.
    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    /// Run the initialization protocol.
    ///
    /// A synthetic INIT is delivered to the initial state alone (its
    /// superstates never see INIT), then a synthetic ENTRY runs over the
    /// full ancestor chain, root first, ending with the initial state. This
    /// establishes the machine as "already inside" every superstate before
    /// the first application event arrives.
    ///
    /// Must be called exactly once, before any [`Machine::dispatch`].
    pub fn init(&mut self) -> Result<(), MachineError> {
        if self.initialized {
            return Err(MachineError::AlreadyInitialized);
        }
        self.initialized = true;

        let stop = self.graph.parent(self.active);
        self.dispatch_span(&Event::new(Signal::INIT, 0), stop, false);
        self.dispatch_span(&Event::new(Signal::ENTRY, 0), None, true);
        Ok(())
    }

    /// Dispatch one event to the active state and let it bubble upward.
    ///
    /// If a handler requested a transition, it is executed after the bubble
    /// completes, before this call returns.
    pub fn dispatch(&mut self, event: Event) -> Result<(), MachineError> {
        if !self.initialized {
            return Err(MachineError::NotInitialized);
        }
        self.dispatch_span(&event, None, false);
        Ok(())
    }

    /// One walk over the span from the active state up to (but excluding)
    /// `stop_before`, or to the root when no stop state is given.
    ///
    /// Ascending mode invokes handlers while climbing and honors their
    /// suppress codes. Descending mode collects the span first, then invokes
    /// it outermost-first with suppress codes ignored; entry sequencing
    /// relies on this to run ancestor-to-target order without the graph
    /// carrying downward links.
    fn dispatch_span(&mut self, event: &Event, stop_before: Option<StateId>, descending: bool) {
        self.last_event = Some(*event);

        let active = self.active;
        let Machine {
            graph,
            pending,
            observer,
            ..
        } = self;
        let graph: &StateGraph = graph;

        if let Some(observer) = observer.as_mut() {
            observer.on_event(graph, active, event);
        }

        let mut ctx = Context {
            graph,
            active,
            signal: event.signal,
            pending,
        };

        let mut collected: Vec<StateId> = Vec::with_capacity(graph.max_depth());
        let mut cursor = Some(active);
        while let Some(id) = cursor {
            if stop_before == Some(id) {
                break;
            }
            if descending {
                collected.push(id);
                cursor = graph.parent(id);
                continue;
            }
            match (graph.handler(id))(&mut ctx, event) {
                Outcome::Continue => cursor = graph.parent(id),
                Outcome::SuppressSuperstates => break,
                Outcome::SuppressImmediateSuperstate => {
                    // Jump over the next superstate; the walk resumes at the
                    // one above it.
                    cursor = graph.parent(id).and_then(|skipped| graph.parent(skipped));
                }
            }
        }

        for id in collected.iter().rev() {
            (graph.handler(*id))(&mut ctx, event);
        }

        // Requests are rejected while ENTRY/EXIT events are handled, so the
        // spans a transition dispatches below can never re-arm the pending
        // target: transition resolution nests at most one level deep.
        if let Some(target) = self.pending.take() {
            self.transition(target);
        }
    }

    /// Execute the minimal exit-then-entry sequence from the active state to
    /// `target`.
    ///
    /// Exits run from the active state outward, stopping before the lowest
    /// common ancestor; entries run from just below that ancestor down to
    /// the target. With no common ancestor the active branch is torn down to
    /// its root and the target branch entered from its root.
    fn transition(&mut self, target: StateId) {
        let lca = self.graph.lowest_common_ancestor(self.active, target);
        self.dispatch_span(&Event::new(Signal::EXIT, 0), lca, false);
        self.active = target;
        self.dispatch_span(&Event::new(Signal::ENTRY, 0), lca, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use std::sync::{Arc, Mutex};

    const SIG_USER: Signal = Signal::USER_START;

    type Log = Arc<Mutex<Vec<(u8, Signal)>>>;

    fn recorder(
        log: &Log,
        debug_id: u8,
    ) -> impl Fn(&mut Context<'_>, &Event) -> Outcome + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |_, event| {
            log.lock().unwrap().push((debug_id, event.signal));
            Outcome::Continue
        }
    }

    fn drain(log: &Log) -> Vec<(u8, Signal)> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    // a (root) -> b, c;  c -> d;  e is an unrelated root. Debug ids 0..=4.
    fn fixture(log: &Log) -> (StateGraph, [StateId; 5]) {
        let mut builder = GraphBuilder::new();
        let a = builder.state(0);
        let b = builder.substate(1, a).unwrap();
        let c = builder.substate(2, a).unwrap();
        let d = builder.substate(3, c).unwrap();
        let e = builder.state(4);
        for (id, debug_id) in [(a, 0), (b, 1), (c, 2), (d, 3), (e, 4)] {
            builder.on(id, recorder(log, debug_id)).unwrap();
        }
        (builder.build(), [a, b, c, d, e])
    }

    #[test]
    fn init_delivers_init_then_root_first_entry() {
        let log = Log::default();
        let (graph, [_, b, ..]) = fixture(&log);
        let mut machine = Machine::new(graph, b).unwrap();

        assert!(drain(&log).is_empty());
        machine.init().unwrap();

        assert_eq!(
            drain(&log),
            vec![(1, Signal::INIT), (0, Signal::ENTRY), (1, Signal::ENTRY)]
        );
    }

    #[test]
    fn dispatch_before_init_is_rejected() {
        let log = Log::default();
        let (graph, [a, ..]) = fixture(&log);
        let mut machine = Machine::new(graph, a).unwrap();

        let result = machine.dispatch(Event::new(SIG_USER, 0));
        assert_eq!(result, Err(MachineError::NotInitialized));
        assert!(drain(&log).is_empty());
    }

    #[test]
    fn init_twice_is_rejected() {
        let log = Log::default();
        let (graph, [a, ..]) = fixture(&log);
        let mut machine = Machine::new(graph, a).unwrap();

        machine.init().unwrap();
        assert_eq!(machine.init(), Err(MachineError::AlreadyInitialized));
    }

    #[test]
    fn new_rejects_initial_state_outside_the_graph() {
        let log = Log::default();
        let (graph, _) = fixture(&log);

        let mut other = GraphBuilder::new();
        for debug_id in 0..5 {
            other.state(debug_id);
        }
        let beyond = other.state(5);

        assert!(matches!(
            Machine::new(graph, beyond),
            Err(BuildError::UnknownState)
        ));
    }

    #[test]
    fn is_active_covers_the_active_chain_and_nothing_else() {
        let log = Log::default();
        let (graph, [a, b, c, d, e]) = fixture(&log);
        let mut machine = Machine::new(graph, d).unwrap();
        machine.init().unwrap();

        assert!(machine.is_active(d));
        assert!(machine.is_active(c));
        assert!(machine.is_active(a));
        assert!(!machine.is_active(b));
        assert!(!machine.is_active(e));
    }

    #[test]
    fn last_event_reflects_the_most_recent_dispatch() {
        let log = Log::default();
        let (graph, [a, ..]) = fixture(&log);
        let mut machine = Machine::new(graph, a).unwrap();

        assert_eq!(machine.last_event(), None);
        machine.init().unwrap();
        assert_eq!(machine.last_event(), Some(Event::new(Signal::ENTRY, 0)));

        let event = Event::new(SIG_USER, 99);
        machine.dispatch(event).unwrap();
        assert_eq!(machine.last_event(), Some(event));
    }

    #[test]
    fn observer_sees_every_span_including_synthetics() {
        let observed = Log::default();
        let observer = {
            let observed = Arc::clone(&observed);
            move |graph: &StateGraph, active: StateId, event: &Event| {
                observed
                    .lock()
                    .unwrap()
                    .push((graph.debug_id(active), event.signal));
            }
        };

        let log = Log::default();
        let (graph, [_, b, _, d, _]) = fixture(&log);
        let mut machine = Machine::new(graph, d).unwrap().with_observer(observer);
        machine.init().unwrap();
        assert_eq!(
            drain(&observed),
            vec![(3, Signal::INIT), (3, Signal::ENTRY)]
        );

        // A transition dispatches two further synthetic spans.
        machine.pending = Some(b);
        machine.dispatch(Event::new(SIG_USER, 0)).unwrap();
        assert_eq!(
            drain(&observed),
            vec![(3, SIG_USER), (3, Signal::EXIT), (1, Signal::ENTRY)]
        );
    }

    #[test]
    fn transition_requested_during_init_runs_before_the_entry_chain() {
        let log = Log::default();
        let mut builder = GraphBuilder::new();
        let root = builder.state(0);
        let x = builder.substate(1, root).unwrap();
        let y = builder.substate(2, root).unwrap();

        builder.on(root, recorder(&log, 0)).unwrap();
        builder.on(y, recorder(&log, 2)).unwrap();
        builder
            .on(x, {
                let log = Arc::clone(&log);
                move |ctx, event| {
                    log.lock().unwrap().push((1, event.signal));
                    if event.signal == Signal::INIT {
                        ctx.request_transition(y);
                    }
                    Outcome::Continue
                }
            })
            .unwrap();

        let mut machine = Machine::new(builder.build(), x).unwrap();
        machine.init().unwrap();

        // INIT's span resolves the pending target first; the init entry
        // chain then runs over the new active branch.
        assert_eq!(
            drain(&log),
            vec![
                (1, Signal::INIT),
                (1, Signal::EXIT),
                (2, Signal::ENTRY),
                (0, Signal::ENTRY),
                (2, Signal::ENTRY),
            ]
        );
        assert_eq!(machine.active(), y);
    }

    #[test]
    fn suppress_during_entry_does_not_curtail_the_entry_sequence() {
        let log = Log::default();
        let mut builder = GraphBuilder::new();
        let a = builder.state(0);
        let b = builder.substate(1, a).unwrap();
        let c = builder.substate(2, b).unwrap();
        let x = builder.substate(3, a).unwrap();

        builder.on(a, recorder(&log, 0)).unwrap();
        builder
            .on(b, {
                let log = Arc::clone(&log);
                move |_, event| {
                    log.lock().unwrap().push((1, event.signal));
                    match event.signal {
                        Signal::ENTRY => Outcome::SuppressSuperstates,
                        _ => Outcome::Continue,
                    }
                }
            })
            .unwrap();
        builder
            .on(c, {
                let log = Arc::clone(&log);
                move |_, event| {
                    log.lock().unwrap().push((2, event.signal));
                    match event.signal {
                        Signal::ENTRY => Outcome::SuppressImmediateSuperstate,
                        _ => Outcome::Continue,
                    }
                }
            })
            .unwrap();
        builder
            .on(x, {
                let log = Arc::clone(&log);
                move |ctx, event| {
                    log.lock().unwrap().push((3, event.signal));
                    if event.signal == SIG_USER {
                        ctx.request_transition(c);
                    }
                    Outcome::Continue
                }
            })
            .unwrap();

        let mut machine = Machine::new(builder.build(), x).unwrap();
        machine.init().unwrap();
        drain(&log);

        machine.dispatch(Event::new(SIG_USER, 0)).unwrap();

        // Suppress codes steer the ascending bubble only; the descending
        // entry chain b, c runs to completion whatever the handlers return.
        assert_eq!(
            drain(&log),
            vec![
                (3, SIG_USER),
                (0, SIG_USER),
                (3, Signal::EXIT),
                (1, Signal::ENTRY),
                (2, Signal::ENTRY),
            ]
        );
        assert_eq!(machine.active(), c);
    }

    #[test]
    fn requests_with_foreign_handles_are_ignored() {
        let log = Log::default();
        let mut builder = GraphBuilder::new();
        let a = builder.state(0);
        let b = builder.substate(1, a).unwrap();

        let mut other = GraphBuilder::new();
        for debug_id in 0..3 {
            other.state(debug_id);
        }
        let foreign = other.state(3);

        builder.on(a, recorder(&log, 0)).unwrap();
        builder
            .on(b, {
                let log = Arc::clone(&log);
                move |ctx, event| {
                    log.lock().unwrap().push((1, event.signal));
                    if event.signal == SIG_USER {
                        ctx.request_transition(foreign);
                    }
                    Outcome::Continue
                }
            })
            .unwrap();

        let mut machine = Machine::new(builder.build(), b).unwrap();
        machine.init().unwrap();
        drain(&log);

        machine.dispatch(Event::new(SIG_USER, 0)).unwrap();

        // The handle indexes past this graph's node table; the request is
        // dropped and no exit or entry sequence runs.
        assert_eq!(machine.active(), b);
        assert_eq!(drain(&log), vec![(1, SIG_USER), (0, SIG_USER)]);
    }

    #[test]
    fn suppress_during_exit_curtails_the_exit_sequence() {
        let log = Log::default();
        let mut builder = GraphBuilder::new();
        let a = builder.state(0);
        let b = builder.substate(1, a).unwrap();
        let c = builder.substate(2, a).unwrap();
        let d = builder.substate(3, c).unwrap();

        builder.on(a, recorder(&log, 0)).unwrap();
        builder.on(b, recorder(&log, 1)).unwrap();
        builder.on(c, recorder(&log, 2)).unwrap();
        builder
            .on(d, {
                let log = Arc::clone(&log);
                move |ctx, event| {
                    log.lock().unwrap().push((3, event.signal));
                    match event.signal {
                        SIG_USER => {
                            ctx.request_transition(b);
                            Outcome::Continue
                        }
                        // Exit handling runs ascending, so suppress codes
                        // still apply there, unlike during entry.
                        Signal::EXIT => Outcome::SuppressSuperstates,
                        _ => Outcome::Continue,
                    }
                }
            })
            .unwrap();

        let mut machine = Machine::new(builder.build(), d).unwrap();
        machine.init().unwrap();
        drain(&log);

        machine.dispatch(Event::new(SIG_USER, 0)).unwrap();
        assert_eq!(
            drain(&log),
            vec![
                (3, SIG_USER),
                (2, SIG_USER),
                (0, SIG_USER),
                (3, Signal::EXIT),
                (1, Signal::ENTRY),
            ]
        );
    }
}
