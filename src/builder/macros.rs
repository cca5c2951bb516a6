//! Macro for declarative state graph definitions.

/// Define a state graph and a struct of named state handles in one place.
///
/// Each line declares a `state` (root) or a `substate` with its parent, a
/// debug identifier, and optionally its handler. All handles are in scope
/// before any handler is attached, so handlers may target states declared
/// later in the list; capture the handles with `move` closures. States
/// without a handler pass every event through.
///
/// The generated struct carries one `StateId` field per state and a
/// `build()` constructor returning the graph alongside the handles.
///
/// # Example
///
/// ```rust
/// use overstory::{state_graph, Machine, Outcome, Signal};
///
/// const SIG_TOGGLE: Signal = Signal(Signal::USER_START.0);
///
/// state_graph! {
///     pub struct Lamp {
///         state root(0);
///         substate off(1): root = move |ctx, event| {
///             if event.signal == SIG_TOGGLE {
///                 ctx.request_transition(on);
///             }
///             Outcome::Continue
///         };
///         substate on(2): root = move |ctx, event| {
///             if event.signal == SIG_TOGGLE {
///                 ctx.request_transition(off);
///             }
///             Outcome::Continue
///         };
///     }
/// }
///
/// let (graph, lamp) = Lamp::build().unwrap();
/// let mut machine = Machine::new(graph, lamp.off).unwrap();
/// machine.init().unwrap();
/// assert!(machine.is_active(lamp.off));
/// ```
#[macro_export]
macro_rules! state_graph {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $kw:tt $state:ident ($debug:expr) $(: $parent:ident)? $(= $handler:expr)? ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        $vis struct $name {
            $( $vis $state: $crate::core::StateId, )+
        }

        impl $name {
            /// Build the graph and the named state handles.
            $vis fn build() -> ::std::result::Result<
                ($crate::core::StateGraph, Self),
                $crate::builder::BuildError,
            > {
                let mut builder = $crate::builder::GraphBuilder::new();
                $( let $state = $crate::state_graph!(@declare builder, $kw, $debug $(, $parent)?); )+
                $( $crate::state_graph!(@attach builder, $state $(, $handler)?); )+
                Ok((builder.build(), Self { $($state),+ }))
            }
        }
    };

    (@declare $b:ident, state, $debug:expr) => {
        $b.state($debug)
    };
    (@declare $b:ident, substate, $debug:expr, $parent:ident) => {
        $b.substate($debug, $parent)?
    };
    (@attach $b:ident, $state:ident) => {};
    (@attach $b:ident, $state:ident, $handler:expr) => {
        $b.on($state, $handler)?;
    };
}
