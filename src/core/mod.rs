//! Core state machine types.
//!
//! This module holds the value types the engine is built from:
//! - Events and signal numbering, including the reserved synthetic signals
//! - State handles and the immutable state graph arena
//! - Ancestor iteration and lowest-common-ancestor resolution
//!
//! Everything here is a pure value transformation; mutation lives in the
//! engine module.

mod event;
mod lca;
pub(crate) mod state;

pub use event::{Event, Signal};
pub use lca::Ancestors;
pub use state::{Handler, Outcome, StateGraph, StateId};
