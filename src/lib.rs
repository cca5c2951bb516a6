//! Overstory: a hierarchical state machine runtime.
//!
//! States form a superstate/substate tree. Events dispatch to the single
//! active state and bubble upward through its superstates until a handler
//! suppresses them. Handlers never act on the machine directly; they may
//! request a transition, which is deferred until the current event finishes
//! bubbling and then executed as the minimal exit/entry sequence through the
//! lowest common ancestor of source and target.
//!
//! The engine is synchronous and single-threaded: dispatch is driven from
//! one host call site, handlers cannot dispatch recursively (the handler
//! [`Context`] simply has no such operation), and every operation is bounded
//! by the hierarchy depth.
//!
//! # Core concepts
//!
//! - **StateGraph**: immutable tree of states, built once via
//!   [`builder::GraphBuilder`] or the [`state_graph!`] macro
//! - **Machine**: the active state plus the dispatch/transition engine
//! - **Outcome**: handler return codes that steer event bubbling
//! - **Observer**: optional per-event telemetry hook
//!
//! # Example
//!
//! ```rust
//! use overstory::builder::GraphBuilder;
//! use overstory::{Event, Machine, Outcome, Signal};
//!
//! const SIG_TOGGLE: Signal = Signal(Signal::USER_START.0);
//!
//! let mut builder = GraphBuilder::new();
//! let lamp = builder.state(0);
//! let off = builder.substate(1, lamp)?;
//! let on = builder.substate(2, lamp)?;
//!
//! builder.on(off, move |ctx, event| {
//!     if event.signal == SIG_TOGGLE {
//!         ctx.request_transition(on);
//!     }
//!     Outcome::Continue
//! })?;
//! builder.on(on, move |ctx, event| {
//!     if event.signal == SIG_TOGGLE {
//!         ctx.request_transition(off);
//!     }
//!     Outcome::Continue
//! })?;
//!
//! let mut machine = Machine::new(builder.build(), off)?;
//! machine.init()?;
//!
//! machine.dispatch(Event::new(SIG_TOGGLE, 0))?;
//! assert!(machine.is_active(on));
//! assert!(machine.is_active(lamp));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod trace;

// Re-export commonly used types
pub use crate::builder::{BuildError, GraphBuilder};
pub use crate::core::{Ancestors, Event, Handler, Outcome, Signal, StateGraph, StateId};
pub use crate::engine::{Context, Machine, MachineError};
pub use crate::trace::{Observer, SharedTraceLog, TraceLog, TraceRecord};
