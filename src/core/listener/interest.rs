//! The set of codes a listener subscribes to.

use crate::events::EventCode;
use std::collections::BTreeSet;
use std::fmt;

/// Codes a listener processes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterestSet {
    /// Every code, including ones no decoder knows about yet
    Any,
    /// Exactly these codes
    Codes(BTreeSet<EventCode>),
}

impl InterestSet {
    /// Interest in the given codes
    pub fn of<C: Into<EventCode>>(codes: impl IntoIterator<Item = C>) -> Self {
        InterestSet::Codes(codes.into_iter().map(Into::into).collect())
    }

    /// Interest in every code
    pub fn any() -> Self {
        InterestSet::Any
    }

    /// Interest in nothing
    pub fn none() -> Self {
        InterestSet::Codes(BTreeSet::new())
    }

    /// Add a code to the set
    pub fn with(mut self, code: impl Into<EventCode>) -> Self {
        if let InterestSet::Codes(codes) = &mut self {
            codes.insert(code.into());
        }
        self
    }

    /// Check membership of a code
    pub fn contains(&self, code: &EventCode) -> bool {
        match self {
            InterestSet::Any => true,
            InterestSet::Codes(codes) => codes.contains(code),
        }
    }
}

impl fmt::Display for InterestSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestSet::Any => write!(f, "*"),
            InterestSet::Codes(codes) => {
                let names: Vec<_> = codes.iter().map(EventCode::as_str).collect();
                write!(f, "{{{}}}", names.join(", "))
            }
        }
    }
}
