//! Build errors for state graph and machine construction.

use thiserror::Error;

/// Errors that can occur while defining a state graph or constructing a
/// machine over one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("state {debug_id} would sit at depth {depth}, past the configured maximum of {max_depth}")]
    DepthExceeded {
        debug_id: u8,
        depth: usize,
        max_depth: usize,
    },

    #[error("parent handle was not issued by this builder")]
    UnknownParent,

    #[error("state handle does not refer to a state in this graph")]
    UnknownState,

    #[error("state {debug_id} already has a handler. Handlers are defined once")]
    DuplicateHandler { debug_id: u8 },
}
