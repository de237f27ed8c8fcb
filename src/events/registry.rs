//! Explicit code → constructor table for event variants.

use super::{Event, EventCode};
use crate::error::DecodeError;
use std::collections::BTreeMap;
use std::fmt;

/// Builds one event variant from a raw record
pub type Constructor<R, E> = fn(&R) -> Result<E, DecodeError>;

/// Maps event codes to the constructor of the matching variant
///
/// The table is filled once at startup. Resolving a code that was
/// never registered fails with [`DecodeError::UnknownCode`]; it never
/// yields a partially built event.
pub struct VariantRegistry<R: ?Sized, E> {
    constructors: BTreeMap<EventCode, Constructor<R, E>>,
}

impl<R: ?Sized, E: Event> VariantRegistry<R, E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register a variant, builder style
    pub fn with_variant(mut self, code: EventCode, constructor: Constructor<R, E>) -> Self {
        self.register(code, constructor);
        self
    }

    /// Register a variant
    ///
    /// Returns `true` if an earlier constructor for the same code
    /// was replaced.
    pub fn register(&mut self, code: EventCode, constructor: Constructor<R, E>) -> bool {
        self.constructors.insert(code, constructor).is_some()
    }

    /// Construct the variant registered under `code` from `record`
    pub fn construct(&self, code: &EventCode, record: &R) -> Result<E, DecodeError> {
        let constructor = self
            .constructors
            .get(code)
            .ok_or_else(|| DecodeError::UnknownCode {
                code: code.to_string(),
            })?;
        constructor(record)
    }

    /// Whether a code has a registered variant
    pub fn contains(&self, code: &EventCode) -> bool {
        self.constructors.contains_key(code)
    }

    /// Registered codes, in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &EventCode> {
        self.constructors.keys()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<R: ?Sized, E: Event> Default for VariantRegistry<R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized, E> fmt::Debug for VariantRegistry<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("codes", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
