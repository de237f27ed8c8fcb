//! Core event type definitions.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Stable identifier of an event variant
///
/// Codes declared by variants are usually `&'static str` and cost
/// nothing to clone. Codes read from records are owned. Both compare
/// by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCode(Cow<'static, str>);

impl EventCode {
    /// Create a code from a static string (usable in `const` items)
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Create a code from an owned string
    pub fn new(code: impl Into<String>) -> Self {
        Self(Cow::Owned(code.into()))
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&'static str> for EventCode {
    fn from(code: &'static str) -> Self {
        Self::from_static(code)
    }
}

impl From<String> for EventCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl PartialEq<str> for EventCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// An immutable, tagged unit of information flowing through the pipeline
///
/// Implement this for your event type (normally an enum with one
/// variant per code). The code of a value must not change over its
/// lifetime; the dispatcher only ever hands events to listeners by
/// shared reference.
pub trait Event: fmt::Debug {
    /// The code of this variant
    fn code(&self) -> EventCode;

    /// Human-readable rendering of the decoded fields
    ///
    /// Used for display and inspection only.
    fn value(&self) -> String {
        format!("{:?}", self)
    }
}
