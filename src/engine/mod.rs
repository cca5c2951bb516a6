//! The dispatch and transition engine.
//!
//! This module holds the machine's mutable side: the active state, the
//! deferred transition target, and the bubbling walk that drives handlers.
//! Handlers only ever see the restricted [`Context`] view, which is what
//! keeps dispatch non-reentrant by construction.

mod context;
mod error;
mod machine;

pub use context::Context;
pub use error::MachineError;
pub use machine::Machine;
