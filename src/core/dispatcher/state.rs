//! Dispatcher states and run accounting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the dispatch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchState {
    /// Waiting for the next record
    Idle,
    /// Queue non-empty, notifying listeners
    Draining,
    /// Source exhausted and queue empty
    Closed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Idle => write!(f, "Idle"),
            DispatchState::Draining => write!(f, "Draining"),
            DispatchState::Closed => write!(f, "Closed"),
        }
    }
}

/// Counters for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records pulled from the source
    pub records_read: usize,
    /// Records that decoded to no event
    pub records_skipped: usize,
    /// Records dropped because they failed to decode
    pub decode_errors: usize,
    /// Events decoded from records
    pub primary_events: usize,
    /// Events emitted by listeners
    pub emitted_events: usize,
    /// Total `process` calls across all listeners
    pub notifications: usize,
    /// `process` calls that returned an error
    pub listener_errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// Primary plus emitted events
    pub fn events_dispatched(&self) -> usize {
        self.primary_events + self.emitted_events
    }
}
