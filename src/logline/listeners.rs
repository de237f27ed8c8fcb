//! Listeners for [`LogEvent`]s.

use super::LogEvent;
use crate::core::listener::{InterestSet, Listener};
use crate::error::ListenerError;
use crate::events::{Emitter, Event, EventCode};
use std::collections::BTreeMap;
use std::io::Write;

/// Reacts to measurements and statuses by emitting two reactions each
pub struct ReactionListener {
    interests: InterestSet,
    notes: [String; 2],
}

impl ReactionListener {
    pub fn new() -> Self {
        Self::with_notes(
            "event emitted by listener",
            "another event emitted by listener",
        )
    }

    /// Use custom notes for the two emitted reactions
    pub fn with_notes(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            interests: InterestSet::of([LogEvent::MEASUREMENT, LogEvent::STATUS]),
            notes: [first.into(), second.into()],
        }
    }
}

impl Default for ReactionListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener<LogEvent> for ReactionListener {
    fn name(&self) -> &str {
        "reaction"
    }

    fn interests(&self) -> &InterestSet {
        &self.interests
    }

    fn process(&mut self, _event: &LogEvent, emitter: &Emitter<LogEvent>) -> Result<(), ListenerError> {
        for note in &self.notes {
            emitter.emit(LogEvent::reaction(note.clone()));
        }
        Ok(())
    }
}

/// Writes one line per received event
pub struct EchoListener<W> {
    name: String,
    interests: InterestSet,
    out: W,
}

impl<W: Write> EchoListener<W> {
    pub fn new(name: impl Into<String>, interests: InterestSet, out: W) -> Self {
        Self {
            name: name.into(),
            interests,
            out,
        }
    }

    /// Recover the writer, e.g. to inspect a buffer in tests
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Listener<LogEvent> for EchoListener<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn interests(&self) -> &InterestSet {
        &self.interests
    }

    fn process(&mut self, event: &LogEvent, _emitter: &Emitter<LogEvent>) -> Result<(), ListenerError> {
        writeln!(
            self.out,
            "Caught {} with value {} by {}",
            event.code(),
            event.value(),
            self.name
        )
        .map_err(|e| ListenerError::failed(format!("write failed: {}", e)))
    }
}

/// Counts events per code
#[derive(Debug)]
pub struct CodeCounter {
    interests: InterestSet,
    counts: BTreeMap<EventCode, usize>,
}

impl CodeCounter {
    pub fn new() -> Self {
        Self {
            interests: InterestSet::any(),
            counts: BTreeMap::new(),
        }
    }

    /// Events seen with this code
    pub fn count(&self, code: &EventCode) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    /// All events seen
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Per-code counts, sorted by code
    pub fn counts(&self) -> &BTreeMap<EventCode, usize> {
        &self.counts
    }
}

impl Default for CodeCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> Listener<E> for CodeCounter {
    fn name(&self) -> &str {
        "counter"
    }

    fn interests(&self) -> &InterestSet {
        &self.interests
    }

    fn process(&mut self, event: &E, _emitter: &Emitter<E>) -> Result<(), ListenerError> {
        *self.counts.entry(event.code()).or_insert(0) += 1;
        Ok(())
    }
}
