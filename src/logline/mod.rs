//! # Log Line Module
//!
//! Decodes timestamped log lines into [`LogEvent`]s.
//!
//! ## Format
//! ```text
//! 2018-03-01 10:15:00 Event1 a=1.5 b=2
//! 2018-03-01 10:15:01 Event2 sit=4 abc="hello"
//! ```
//! The third whitespace-separated token is the event code. The rest of
//! the line is scanned for `key=value` fields. Blank lines carry no
//! event.
//!
//! `Event3` never appears in logs; it is emitted by [`ReactionListener`].

mod fields;
mod listeners;

pub use fields::Fields;
pub use listeners::{CodeCounter, EchoListener, ReactionListener};

use crate::core::decoder::{Decoder, RegistryDecoder};
use crate::error::DecodeError;
use crate::events::{Event, EventCode, VariantRegistry};
use serde::{Deserialize, Serialize};

/// Events decoded from (or reacting to) log lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogEvent {
    /// `Event1 a=<number> b=<number>`
    Measurement { a: f64, b: f64 },
    /// `Event2 sit=<number> abc="<word>"`
    Status { sit: f64, abc: String },
    /// Synthesized by listeners
    Reaction { note: String },
}

impl LogEvent {
    pub const MEASUREMENT: EventCode = EventCode::from_static("Event1");
    pub const STATUS: EventCode = EventCode::from_static("Event2");
    pub const REACTION: EventCode = EventCode::from_static("Event3");

    /// Build a [`LogEvent::Measurement`] from a log line
    pub fn measurement_from_line(line: &str) -> Result<Self, DecodeError> {
        let fields = Fields::parse(line);
        Ok(LogEvent::Measurement {
            a: fields.float("a")?,
            b: fields.float("b")?,
        })
    }

    /// Build a [`LogEvent::Status`] from a log line
    pub fn status_from_line(line: &str) -> Result<Self, DecodeError> {
        let fields = Fields::parse(line);
        Ok(LogEvent::Status {
            sit: fields.float("sit")?,
            abc: fields.word("abc")?,
        })
    }

    pub fn reaction(note: impl Into<String>) -> Self {
        LogEvent::Reaction { note: note.into() }
    }

    /// Variants that can appear in a log file
    pub fn registry() -> VariantRegistry<str, LogEvent> {
        VariantRegistry::new()
            .with_variant(Self::MEASUREMENT, Self::measurement_from_line)
            .with_variant(Self::STATUS, Self::status_from_line)
    }
}

impl Event for LogEvent {
    fn code(&self) -> EventCode {
        match self {
            LogEvent::Measurement { .. } => Self::MEASUREMENT,
            LogEvent::Status { .. } => Self::STATUS,
            LogEvent::Reaction { .. } => Self::REACTION,
        }
    }

    fn value(&self) -> String {
        match self {
            LogEvent::Measurement { a, b } => format!("a={}, b={}", a, b),
            LogEvent::Status { sit, abc } => format!("sit={}, abc={}", sit, abc),
            LogEvent::Reaction { note } => note.clone(),
        }
    }
}

/// Extract the event code of a log line
///
/// Returns `Ok(None)` for blank lines.
pub fn code_of(line: &str) -> Result<Option<EventCode>, DecodeError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    line.split_whitespace()
        .nth(2)
        .map(|code| Some(EventCode::new(code)))
        .ok_or_else(|| DecodeError::MissingCode {
            record: line.to_string(),
        })
}

type CodeExtractor = fn(&str) -> Result<Option<EventCode>, DecodeError>;

/// Decoder for the log line format
pub struct LineDecoder {
    inner: RegistryDecoder<str, LogEvent, CodeExtractor>,
}

impl LineDecoder {
    /// Decoder for the standard `Event1`/`Event2` variants
    pub fn new() -> Self {
        Self::with_registry(LogEvent::registry())
    }

    /// Decoder over a custom variant table
    pub fn with_registry(registry: VariantRegistry<str, LogEvent>) -> Self {
        Self {
            inner: RegistryDecoder::new(code_of as CodeExtractor, registry),
        }
    }

    /// Codes this decoder can produce
    pub fn codes(&self) -> impl Iterator<Item = &EventCode> {
        self.inner.registry().codes()
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineDecoder {
    type Record = str;
    type Event = LogEvent;

    fn decode(&self, line: &str) -> Result<Option<LogEvent>, DecodeError> {
        self.inner.decode(line)
    }
}
