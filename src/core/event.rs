//! Event values and signal numbering.

use serde::{Deserialize, Serialize};

/// Signal number carried by an [`Event`].
///
/// Values 1 through 3 are reserved for the synthetic INIT, ENTRY, and EXIT
/// events the engine generates itself. Application signals start at
/// [`Signal::USER_START`].
///
/// # Example
///
/// ```rust
/// use overstory::Signal;
///
/// const SIG_PLAY: Signal = Signal(Signal::USER_START.0);
/// const SIG_STOP: Signal = Signal(Signal::USER_START.0 + 1);
///
/// assert!(!SIG_PLAY.is_reserved());
/// assert!(Signal::ENTRY.is_reserved());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Signal(pub u16);

impl Signal {
    /// Dispatched once to the configured initial state during initialization.
    pub const INIT: Signal = Signal(1);

    /// Dispatched to each state as it is entered.
    pub const ENTRY: Signal = Signal(2);

    /// Dispatched to each state as it is exited.
    pub const EXIT: Signal = Signal(3);

    /// First signal value available to applications.
    pub const USER_START: Signal = Signal(4);

    /// Whether this is one of the engine-generated INIT/ENTRY/EXIT signals.
    pub fn is_reserved(self) -> bool {
        self >= Signal::INIT && self <= Signal::EXIT
    }
}

/// A dispatched event: a signal plus an opaque 32-bit parameter.
///
/// Events are transient values. The engine never retains one beyond the
/// dispatch that carries it, and no state owns an event.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Event {
    /// What happened.
    pub signal: Signal,

    /// Opaque payload; the engine never interprets it.
    pub param: u32,
}

impl Event {
    /// Create an event.
    pub fn new(signal: Signal, param: u32) -> Self {
        Event { signal, param }
    }
}
