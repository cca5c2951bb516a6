//! Machine lifecycle errors.

use thiserror::Error;

/// Precondition violations on the machine lifecycle.
///
/// Normal operation has no recoverable runtime errors: suppressed
/// transitions, disjoint-tree targets, and unhandled events are all defined
/// behavior. What remains is calling lifecycle operations out of order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("dispatch called before init")]
    NotInitialized,

    #[error("init called more than once")]
    AlreadyInitialized,
}
