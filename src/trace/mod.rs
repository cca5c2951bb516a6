//! Observation of dispatched events.
//!
//! The engine accepts an optional observer that is invoked on every
//! dispatched event, synthetic INIT/ENTRY/EXIT spans included, before any
//! state handler runs. Observers are a pure side channel for logging and
//! diagnostics: their output is ignored and they can never alter control
//! flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::core::{Event, Signal, StateGraph, StateId};

/// Telemetry hook invoked once per dispatched event span.
///
/// `active` is the state the event is about to be delivered to. Any `FnMut`
/// with the matching signature is an observer.
pub trait Observer: Send {
    fn on_event(&mut self, graph: &StateGraph, active: StateId, event: &Event);
}

impl<F> Observer for F
where
    F: FnMut(&StateGraph, StateId, &Event) + Send,
{
    fn on_event(&mut self, graph: &StateGraph, active: StateId, event: &Event) {
        self(graph, active, event)
    }
}

/// One observed dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TraceRecord {
    /// State that was active when the event was dispatched.
    pub state: StateId,

    /// That state's debug identifier.
    pub debug_id: u8,

    /// Signal of the dispatched event.
    pub signal: Signal,

    /// The event's payload.
    pub param: u32,

    /// When the dispatch was observed.
    pub timestamp: DateTime<Utc>,
}

/// Observer that records every dispatched event in order.
///
/// Records serialize with serde, so a captured trace can be dumped as JSON
/// for offline inspection or golden-file comparison in tests.
#[derive(Default, Serialize)]
pub struct TraceLog {
    records: Vec<TraceRecord>,
}

impl TraceLog {
    /// Create an empty log.
    pub fn new() -> Self {
        TraceLog::default()
    }

    /// All records, in dispatch order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Number of recorded dispatches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Signals observed so far, in dispatch order.
    pub fn signals(&self) -> Vec<Signal> {
        self.records.iter().map(|r| r.signal).collect()
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn observe(&mut self, graph: &StateGraph, active: StateId, event: &Event) {
        self.records.push(TraceRecord {
            state: active,
            debug_id: graph.debug_id(active),
            signal: event.signal,
            param: event.param,
            timestamp: Utc::now(),
        });
    }
}

impl Observer for TraceLog {
    fn on_event(&mut self, graph: &StateGraph, active: StateId, event: &Event) {
        self.observe(graph, active, event);
    }
}

/// Cloneable handle to a [`TraceLog`], usable as a machine observer while
/// the host keeps a reading end.
///
/// The machine owns its observer, so a plain [`TraceLog`] handed to
/// [`crate::Machine::with_observer`] can no longer be read by the host; a
/// shared log solves that.
#[derive(Clone, Default)]
pub struct SharedTraceLog(Arc<Mutex<TraceLog>>);

impl SharedTraceLog {
    /// Create an empty shared log.
    pub fn new() -> Self {
        SharedTraceLog::default()
    }

    /// Copy of all records so far, in dispatch order.
    pub fn snapshot(&self) -> Vec<TraceRecord> {
        self.0.lock().map(|log| log.records.clone()).unwrap_or_default()
    }

    /// Signals observed so far, in dispatch order.
    pub fn signals(&self) -> Vec<Signal> {
        self.0.lock().map(|log| log.signals()).unwrap_or_default()
    }

    /// Drop all records.
    pub fn clear(&self) {
        if let Ok(mut log) = self.0.lock() {
            log.clear();
        }
    }
}

impl Observer for SharedTraceLog {
    fn on_event(&mut self, graph: &StateGraph, active: StateId, event: &Event) {
        if let Ok(mut log) = self.0.lock() {
            log.observe(graph, active, event);
        }
    }
}
